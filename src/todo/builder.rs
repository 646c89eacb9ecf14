use chrono::{DateTime, Utc};

use crate::models::{NewTodo, Tag, TodoPriority, TodoStatus};

/// Assembles a [`NewTodo`]. Fields left unset fall back to
/// `NOT_STARTED`, `MEDIUM` and no tags.
#[derive(Debug, Clone)]
pub struct TodoBuilder {
    name: String,
    due_date: DateTime<Utc>,
    user_id: i64,
    description: Option<String>,
    status: Option<TodoStatus>,
    priority: Option<TodoPriority>,
    team_id: Option<i64>,
    tags: Option<Vec<Tag>>,
}

impl TodoBuilder {
    pub fn new(name: impl Into<String>, due_date: DateTime<Utc>, user_id: i64) -> Self {
        Self {
            name: name.into(),
            due_date,
            user_id,
            description: None,
            status: None,
            priority: None,
            team_id: None,
            tags: None,
        }
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn status(mut self, status: TodoStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: TodoPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn team(mut self, team_id: i64) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn build(self) -> NewTodo {
        self.build_at(Utc::now())
    }

    pub fn build_at(self, now: DateTime<Utc>) -> NewTodo {
        NewTodo {
            name: self.name,
            description: self.description,
            due_date: self.due_date,
            status: self.status.unwrap_or(TodoStatus::NotStarted),
            priority: self.priority.unwrap_or(TodoPriority::Medium),
            user_id: self.user_id,
            team_id: self.team_id,
            tags: self.tags.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn unset_fields_take_defaults() {
        let todo = TodoBuilder::new("write report", due(), 7).build();

        assert_eq!(todo.status, TodoStatus::NotStarted);
        assert_eq!(todo.priority, TodoPriority::Medium);
        assert!(todo.tags.is_empty());
        assert_eq!(todo.team_id, None);
        assert_eq!(todo.user_id, 7);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn explicit_fields_win() {
        let tag = Tag {
            id: 3,
            name: "work".into(),
            user_id: 7,
            created_at: due(),
        };
        let todo = TodoBuilder::new("ship", due(), 7)
            .description(Some("v2".into()))
            .status(TodoStatus::Completed)
            .priority(TodoPriority::Low)
            .team(11)
            .tags(vec![tag.clone()])
            .build_at(due());

        assert_eq!(todo.description.as_deref(), Some("v2"));
        assert_eq!(todo.status, TodoStatus::Completed);
        assert_eq!(todo.priority, TodoPriority::Low);
        assert_eq!(todo.team_id, Some(11));
        assert_eq!(todo.tags, vec![tag]);
        assert_eq!(todo.created_at, due());
    }
}
