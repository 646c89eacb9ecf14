use chrono::{DateTime, Utc};

use super::TodoBuilder;
use crate::models::{Tag, TodoPriority, TodoStatus};

/// Which preset the factory applies when a to-do is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionPolicy {
    Regular,
    HighPriority,
}

impl ConstructionPolicy {
    /// A requested priority of `HIGH` (any case) selects the high-priority
    /// preset; anything else, including no priority, is regular.
    pub fn for_requested_priority(priority: Option<&str>) -> Self {
        match priority {
            Some(p) if p.eq_ignore_ascii_case("HIGH") => ConstructionPolicy::HighPriority,
            _ => ConstructionPolicy::Regular,
        }
    }
}

pub struct TodoFactory;

impl TodoFactory {
    /// `NOT_STARTED` / `MEDIUM`, no tags.
    pub fn regular(
        name: impl Into<String>,
        description: Option<String>,
        due_date: DateTime<Utc>,
        user_id: i64,
    ) -> TodoBuilder {
        TodoBuilder::new(name, due_date, user_id)
            .description(description)
            .status(TodoStatus::NotStarted)
            .priority(TodoPriority::Medium)
    }

    /// `IN_PROGRESS` / `HIGH`, with tags fixed at construction.
    pub fn high_priority(
        name: impl Into<String>,
        description: Option<String>,
        due_date: DateTime<Utc>,
        user_id: i64,
        tags: Vec<Tag>,
    ) -> TodoBuilder {
        TodoBuilder::new(name, due_date, user_id)
            .description(description)
            .status(TodoStatus::InProgress)
            .priority(TodoPriority::High)
            .tags(tags)
    }

    pub fn create(
        policy: ConstructionPolicy,
        name: impl Into<String>,
        description: Option<String>,
        due_date: DateTime<Utc>,
        user_id: i64,
        tags: Vec<Tag>,
    ) -> TodoBuilder {
        match policy {
            ConstructionPolicy::HighPriority => {
                Self::high_priority(name, description, due_date, user_id, tags)
            }
            ConstructionPolicy::Regular => {
                Self::regular(name, description, due_date, user_id).tags(tags)
            }
        }
    }
}
