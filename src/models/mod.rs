pub mod tag;
pub mod team;
pub mod todo;
pub mod user;

pub use tag::Tag;
pub use team::{NewTeam, Team, TeamMember, TeamMembership, TeamRole};
pub use todo::{NewTodo, Todo, TodoPriority, TodoStatus};
pub use user::{NewUser, User, UserRole};

use crate::error::AppError;

/// An enumerator string that matched none of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl From<ParseEnumError> for AppError {
    fn from(err: ParseEnumError) -> Self {
        AppError::InvalidArgument(err.to_string())
    }
}
