//! To-do lifecycle rules that do not touch storage: construction, partial
//! updates and the filter/sort strategy sets.

pub mod builder;
pub mod factory;
pub mod filter;
pub mod sort;
pub mod update;

pub use builder::TodoBuilder;
pub use factory::{ConstructionPolicy, TodoFactory};
pub use filter::FilterStrategy;
pub use sort::{SortDirection, SortStrategy};
pub use update::TodoChanges;

use crate::error::AppError;
use crate::models::ParseEnumError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    #[error("Unsupported {kind} type: {key}")]
    Unsupported { kind: &'static str, key: String },
    #[error(transparent)]
    InvalidValue(#[from] ParseEnumError),
}

impl From<StrategyError> for AppError {
    fn from(err: StrategyError) -> Self {
        AppError::InvalidArgument(err.to_string())
    }
}
