use std::str::FromStr;

use super::StrategyError;
use crate::models::{Todo, TodoPriority, TodoStatus};

/// The closed set of filters a caller can name with `filterType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStrategy {
    Status,
    Priority,
}

impl FilterStrategy {
    pub const ALL: [FilterStrategy; 2] = [FilterStrategy::Status, FilterStrategy::Priority];

    pub fn key(&self) -> &'static str {
        match self {
            FilterStrategy::Status => "status",
            FilterStrategy::Priority => "priority",
        }
    }

    /// Keeps the to-dos matching `value`, preserving their relative order.
    pub fn apply(&self, todos: Vec<Todo>, value: &str) -> Result<Vec<Todo>, StrategyError> {
        match self {
            FilterStrategy::Status => {
                let status: TodoStatus = value.parse()?;
                Ok(todos.into_iter().filter(|t| t.status == status).collect())
            }
            FilterStrategy::Priority => {
                let priority: TodoPriority = value.parse()?;
                Ok(todos.into_iter().filter(|t| t.priority == priority).collect())
            }
        }
    }
}

impl FromStr for FilterStrategy {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| StrategyError::Unsupported {
                kind: "filter",
                key: s.to_string(),
            })
    }
}
