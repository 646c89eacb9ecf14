use sqlx::PgPool;

use crate::models::{NewTeam, Team, TeamMember, TeamMembership, TeamRole};

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists_by_name(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM teams WHERE name = $1)")
        .bind(name)
        .fetch_one(pool)
        .await
}

pub async fn list_by_member(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<TeamMembership>, sqlx::Error> {
    sqlx::query_as::<_, TeamMembership>(
        "SELECT t.id, t.name, t.description, t.creator_id, t.created_at, m.role
         FROM teams t JOIN team_members m ON m.team_id = t.id
         WHERE m.user_id = $1
         ORDER BY t.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_role(
    pool: &PgPool,
    team_id: i64,
    user_id: i64,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT role FROM team_members WHERE team_id = $1 AND user_id = $2",
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Inserts the team and its creator's `ADMIN` membership in one transaction.
pub async fn create(pool: &PgPool, team: &NewTeam) -> Result<Team, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let created = sqlx::query_as::<_, Team>(
        "INSERT INTO teams (name, description, creator_id) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&team.name)
    .bind(&team.description)
    .bind(team.creator_id)
    .fetch_one(&mut *tx)
    .await?;

    add_member(&mut *tx, created.id, team.creator_id, TeamRole::Admin).await?;
    tx.commit().await?;

    Ok(created)
}

pub async fn add_member<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    team_id: i64,
    user_id: i64,
    role: TeamRole,
) -> Result<TeamMember, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(
        "INSERT INTO team_members (team_id, user_id, role) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(team_id)
    .bind(user_id)
    .bind(role.as_str())
    .fetch_one(executor)
    .await
}

pub async fn list_members(pool: &PgPool, team_id: i64) -> Result<Vec<TeamMember>, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(
        "SELECT * FROM team_members WHERE team_id = $1 ORDER BY joined_at, user_id",
    )
    .bind(team_id)
    .fetch_all(pool)
    .await
}
