use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamRole {
    Admin,
    Member,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Admin => "ADMIN",
            TeamRole::Member => "MEMBER",
        }
    }
}

impl FromStr for TeamRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(TeamRole::Admin),
            "MEMBER" => Ok(TeamRole::Member),
            _ => Err(ParseEnumError::new("team role", s)),
        }
    }
}

impl TryFrom<String> for TeamRole {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: i64,
    pub user_id: i64,
    #[sqlx(try_from = "String")]
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

/// A team as seen by one of its members.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TeamMembership {
    #[sqlx(flatten)]
    pub team: Team,
    #[sqlx(try_from = "String")]
    pub role: TeamRole,
}

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub description: Option<String>,
    pub creator_id: i64,
}
