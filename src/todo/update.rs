use chrono::{DateTime, Utc};

use crate::models::{Tag, Todo, TodoPriority, TodoStatus};

/// A validated partial update. `None` leaves the field alone; `Some` for
/// `tags` replaces the whole association.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
    pub tags: Option<Vec<Tag>>,
}

impl TodoChanges {
    pub fn apply(self, todo: &mut Todo, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            todo.name = name;
        }
        if let Some(description) = self.description {
            todo.description = Some(description);
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(tags) = self.tags {
            todo.tags = tags;
        }
        todo.touch(now);
    }
}
