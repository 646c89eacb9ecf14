use async_trait::async_trait;
use sqlx::PgPool;

use super::{Store, StoreError, StoreResult, TagStore, TeamStore, TodoStore, UserStore};
use crate::db;
use crate::models::{
    NewTeam, NewTodo, NewUser, Tag, Team, TeamMember, TeamMembership, TeamRole, Todo, User,
};

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn into_shared(self) -> std::sync::Arc<dyn Store> {
        std::sync::Arc::new(self)
    }
}

fn conflict_or_db(err: sqlx::Error, message: &str) -> StoreError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(message.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(db::users::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(db::users::find_by_username(&self.pool, username).await?)
    }

    async fn user_exists_by_username(&self, username: &str) -> StoreResult<bool> {
        Ok(db::users::exists_by_username(&self.pool, username).await?)
    }

    async fn user_exists_by_email(&self, email: &str) -> StoreResult<bool> {
        Ok(db::users::exists_by_email(&self.pool, email).await?)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        db::users::create(&self.pool, &user)
            .await
            .map_err(|e| conflict_or_db(e, "Username or email already exists"))
    }

    async fn count_users(&self) -> StoreResult<i64> {
        Ok(db::users::count_all(&self.pool).await?)
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn find_todo_by_id(&self, id: i64) -> StoreResult<Option<Todo>> {
        Ok(db::todos::find_by_id(&self.pool, id).await?)
    }

    async fn find_todos_by_owner(&self, user_id: i64) -> StoreResult<Vec<Todo>> {
        Ok(db::todos::list_by_owner(&self.pool, user_id).await?)
    }

    async fn find_todos_by_team(&self, team_id: i64) -> StoreResult<Vec<Todo>> {
        Ok(db::todos::list_by_team(&self.pool, team_id).await?)
    }

    async fn insert_todo(&self, todo: NewTodo) -> StoreResult<Todo> {
        Ok(db::todos::create(&self.pool, &todo).await?)
    }

    async fn save_todo(&self, todo: &Todo) -> StoreResult<Todo> {
        match db::todos::update(&self.pool, todo).await {
            Ok(saved) => Ok(saved),
            Err(sqlx::Error::RowNotFound) => {
                Err(StoreError::NotFound("Todo not found".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_todo(&self, id: i64) -> StoreResult<()> {
        Ok(db::todos::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl TagStore for PgStore {
    async fn find_tag_by_id(&self, id: i64) -> StoreResult<Option<Tag>> {
        Ok(db::tags::find_by_id(&self.pool, id).await?)
    }

    async fn find_tags_by_ids(&self, ids: &[i64], user_id: i64) -> StoreResult<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(db::tags::find_by_ids_and_owner(&self.pool, ids, user_id).await?)
    }

    async fn find_tags_by_owner(&self, user_id: i64) -> StoreResult<Vec<Tag>> {
        Ok(db::tags::list_by_owner(&self.pool, user_id).await?)
    }

    async fn tag_exists_by_name_and_owner(&self, name: &str, user_id: i64) -> StoreResult<bool> {
        Ok(db::tags::exists_by_name_and_owner(&self.pool, name, user_id).await?)
    }

    async fn insert_tag(&self, name: &str, user_id: i64) -> StoreResult<Tag> {
        db::tags::create(&self.pool, name, user_id)
            .await
            .map_err(|e| conflict_or_db(e, "A tag with this name already exists"))
    }

    async fn delete_tag(&self, id: i64) -> StoreResult<()> {
        Ok(db::tags::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl TeamStore for PgStore {
    async fn find_team_by_id(&self, id: i64) -> StoreResult<Option<Team>> {
        Ok(db::teams::find_by_id(&self.pool, id).await?)
    }

    async fn team_exists_by_name(&self, name: &str) -> StoreResult<bool> {
        Ok(db::teams::exists_by_name(&self.pool, name).await?)
    }

    async fn find_teams_by_member(&self, user_id: i64) -> StoreResult<Vec<TeamMembership>> {
        Ok(db::teams::list_by_member(&self.pool, user_id).await?)
    }

    async fn find_team_role(&self, team_id: i64, user_id: i64) -> StoreResult<Option<TeamRole>> {
        db::teams::find_role(&self.pool, team_id, user_id)
            .await?
            .map(|role| {
                role.parse::<TeamRole>()
                    .map_err(|e| StoreError::Corrupt(e.to_string()))
            })
            .transpose()
    }

    async fn insert_team(&self, team: NewTeam) -> StoreResult<Team> {
        db::teams::create(&self.pool, &team)
            .await
            .map_err(|e| conflict_or_db(e, "A team with this name already exists"))
    }

    async fn insert_team_member(
        &self,
        team_id: i64,
        user_id: i64,
        role: TeamRole,
    ) -> StoreResult<TeamMember> {
        db::teams::add_member(&self.pool, team_id, user_id, role)
            .await
            .map_err(|e| conflict_or_db(e, "User is already a member of this team"))
    }

    async fn find_team_members(&self, team_id: i64) -> StoreResult<Vec<TeamMember>> {
        Ok(db::teams::list_members(&self.pool, team_id).await?)
    }
}
