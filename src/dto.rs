//! Request bodies and response projections. JSON field names are camelCase;
//! enumerators travel as their canonical upper-case names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Tag, TeamMember, TeamMembership, Todo, User};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub name: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub tag_ids: Option<Vec<i64>>,
    pub team_id: Option<i64>,
}

/// Every field is optional; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Replaces the existing tag set when present.
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub filter_type: String,
    pub filter_value: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortParams {
    pub sort_type: String,
    pub sort_direction: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateTagRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: i64,
    pub role: Option<String>,
}

/// Desensitized user: no password, no hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub enabled: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            enabled: user.enabled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub priority: String,
    pub user_id: i64,
    pub team_id: Option<i64>,
    /// Tag names, not ids.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Todo> for TodoResponse {
    fn from(todo: &Todo) -> Self {
        let mut tags: Vec<String> = todo.tags.iter().map(|t| t.name.clone()).collect();
        tags.sort();
        tags.dedup();

        Self {
            id: todo.id,
            name: todo.name.clone(),
            description: todo.description.clone(),
            due_date: todo.due_date,
            status: todo.status.as_str().to_string(),
            priority: todo.priority.as_str().to_string(),
            user_id: todo.user_id,
            team_id: todo.team_id,
            tags,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            created_at: tag.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub creator_id: i64,
    /// The caller's role in this team.
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&TeamMembership> for TeamResponse {
    fn from(membership: &TeamMembership) -> Self {
        Self {
            id: membership.team.id,
            name: membership.team.name.clone(),
            description: membership.team.description.clone(),
            creator_id: membership.team.creator_id,
            role: membership.role.as_str().to_string(),
            created_at: membership.team.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    pub user_id: i64,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl From<&TeamMember> for TeamMemberResponse {
    fn from(member: &TeamMember) -> Self {
        Self {
            user_id: member.user_id,
            role: member.role.as_str().to_string(),
            joined_at: member.joined_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategiesResponse {
    pub filters: Vec<String>,
    pub sorts: Vec<String>,
}
