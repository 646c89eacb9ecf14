use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ParseEnumError, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::NotStarted => "NOT_STARTED",
            TodoStatus::InProgress => "IN_PROGRESS",
            TodoStatus::Completed => "COMPLETED",
        }
    }
}

impl FromStr for TodoStatus {
    type Err = ParseEnumError;

    /// Case-insensitive match against the canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NOT_STARTED" => Ok(TodoStatus::NotStarted),
            "IN_PROGRESS" => Ok(TodoStatus::InProgress),
            "COMPLETED" => Ok(TodoStatus::Completed),
            _ => Err(ParseEnumError::new("status", s)),
        }
    }
}

impl TryFrom<String> for TodoStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoPriority {
    Low,
    Medium,
    High,
}

impl TodoPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoPriority::Low => "LOW",
            TodoPriority::Medium => "MEDIUM",
            TodoPriority::High => "HIGH",
        }
    }
}

impl FromStr for TodoPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(TodoPriority::Low),
            "MEDIUM" => Ok(TodoPriority::Medium),
            "HIGH" => Ok(TodoPriority::High),
            _ => Err(ParseEnumError::new("priority", s)),
        }
    }
}

impl TryFrom<String> for TodoPriority {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TodoPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: TodoStatus,
    #[sqlx(try_from = "String")]
    pub priority: TodoPriority,
    pub user_id: i64,
    pub team_id: Option<i64>,
    #[sqlx(skip)]
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    pub fn tag_ids(&self) -> Vec<i64> {
        self.tags.iter().map(|t| t.id).collect()
    }

    /// Refresh the modification timestamp. Every mutation path calls this.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// A to-do that has been assembled but not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub name: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    pub user_id: i64,
    pub team_id: Option<i64>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTodo {
    pub fn tag_ids(&self) -> Vec<i64> {
        self.tags.iter().map(|t| t.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("completed".parse::<TodoStatus>(), Ok(TodoStatus::Completed));
        assert_eq!("In_Progress".parse::<TodoStatus>(), Ok(TodoStatus::InProgress));
        assert_eq!("NOT_STARTED".parse::<TodoStatus>(), Ok(TodoStatus::NotStarted));
    }

    #[test]
    fn unknown_status_names_the_value() {
        let err = "done".parse::<TodoStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid status value: done");
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("high".parse::<TodoPriority>(), Ok(TodoPriority::High));
        assert!("urgent".parse::<TodoPriority>().is_err());
    }

    #[test]
    fn canonical_names_round_trip_through_serde() {
        let json = serde_json::to_string(&TodoStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        assert_eq!(TodoPriority::Medium.to_string(), "MEDIUM");
    }

    #[test]
    fn declaration_order_drives_ordering() {
        assert!(TodoStatus::NotStarted < TodoStatus::InProgress);
        assert!(TodoStatus::InProgress < TodoStatus::Completed);
        assert!(TodoPriority::Low < TodoPriority::High);
    }
}
