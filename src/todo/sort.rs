use std::cmp::Ordering;
use std::str::FromStr;

use super::StrategyError;
use crate::models::Todo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Only `desc` (any case) reverses; anything else, or nothing, is ascending.
    pub fn from_param(direction: Option<&str>) -> Self {
        match direction {
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// The closed set of orderings a caller can name with `sortType`.
///
/// Ties keep no secondary key; their relative order is unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    DueDate,
    Name,
    Status,
    Priority,
}

impl SortStrategy {
    pub const ALL: [SortStrategy; 4] = [
        SortStrategy::DueDate,
        SortStrategy::Name,
        SortStrategy::Status,
        SortStrategy::Priority,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SortStrategy::DueDate => "dueDate",
            SortStrategy::Name => "name",
            SortStrategy::Status => "status",
            SortStrategy::Priority => "priority",
        }
    }

    fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        match self {
            SortStrategy::DueDate => a.due_date.cmp(&b.due_date),
            SortStrategy::Name => a.name.cmp(&b.name),
            SortStrategy::Status => a.status.cmp(&b.status),
            SortStrategy::Priority => a.priority.cmp(&b.priority),
        }
    }

    pub fn apply(&self, mut todos: Vec<Todo>, direction: SortDirection) -> Vec<Todo> {
        match direction {
            SortDirection::Asc => todos.sort_by(|a, b| self.compare(a, b)),
            SortDirection::Desc => todos.sort_by(|a, b| self.compare(a, b).reverse()),
        }
        todos
    }
}

impl FromStr for SortStrategy {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| StrategyError::Unsupported {
                kind: "sort",
                key: s.to_string(),
            })
    }
}
