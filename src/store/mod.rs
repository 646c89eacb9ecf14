//! Persistence seam used by the services.
//!
//! Lookups return `Option`/empty collections on absence; they never fail just
//! because a row is missing. Each call is one unit of work: writes that touch
//! more than one table (a to-do and its tag links, a team and its creator's
//! membership) are applied atomically by every implementation.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::models::{
    NewTeam, NewTodo, NewUser, Tag, Team, TeamMember, TeamMembership, TeamRole, Todo, User,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Conflict(String),
    /// The row an update targeted no longer exists.
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn user_exists_by_username(&self, username: &str) -> StoreResult<bool>;
    async fn user_exists_by_email(&self, email: &str) -> StoreResult<bool>;
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn count_users(&self) -> StoreResult<i64>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn find_todo_by_id(&self, id: i64) -> StoreResult<Option<Todo>>;
    async fn find_todos_by_owner(&self, user_id: i64) -> StoreResult<Vec<Todo>>;
    async fn find_todos_by_team(&self, team_id: i64) -> StoreResult<Vec<Todo>>;
    async fn insert_todo(&self, todo: NewTodo) -> StoreResult<Todo>;
    /// Overwrites every column and replaces the tag links.
    async fn save_todo(&self, todo: &Todo) -> StoreResult<Todo>;
    /// Removes the to-do and its tag links, never the tags.
    async fn delete_todo(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    async fn find_tag_by_id(&self, id: i64) -> StoreResult<Option<Tag>>;
    /// Only tags owned by `user_id` are returned; unknown ids are skipped.
    async fn find_tags_by_ids(&self, ids: &[i64], user_id: i64) -> StoreResult<Vec<Tag>>;
    async fn find_tags_by_owner(&self, user_id: i64) -> StoreResult<Vec<Tag>>;
    async fn tag_exists_by_name_and_owner(&self, name: &str, user_id: i64) -> StoreResult<bool>;
    async fn insert_tag(&self, name: &str, user_id: i64) -> StoreResult<Tag>;
    async fn delete_tag(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn find_team_by_id(&self, id: i64) -> StoreResult<Option<Team>>;
    async fn team_exists_by_name(&self, name: &str) -> StoreResult<bool>;
    async fn find_teams_by_member(&self, user_id: i64) -> StoreResult<Vec<TeamMembership>>;
    async fn find_team_role(&self, team_id: i64, user_id: i64) -> StoreResult<Option<TeamRole>>;
    /// Creates the team with its creator as an `ADMIN` member.
    async fn insert_team(&self, team: NewTeam) -> StoreResult<Team>;
    async fn insert_team_member(
        &self,
        team_id: i64,
        user_id: i64,
        role: TeamRole,
    ) -> StoreResult<TeamMember>;
    async fn find_team_members(&self, team_id: i64) -> StoreResult<Vec<TeamMember>>;
}

/// Everything the services need from storage.
pub trait Store: UserStore + TodoStore + TagStore + TeamStore {}

impl<T> Store for T where T: UserStore + TodoStore + TagStore + TeamStore {}
