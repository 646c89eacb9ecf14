use sqlx::PgPool;

use crate::models::Tag;

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Ids that don't exist or belong to another user are simply not returned.
pub async fn find_by_ids_and_owner(
    pool: &PgPool,
    ids: &[i64],
    user_id: i64,
) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        "SELECT * FROM tags WHERE id = ANY($1) AND user_id = $2 ORDER BY name",
    )
    .bind(ids.to_vec())
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_owner(pool: &PgPool, user_id: i64) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE user_id = $1 ORDER BY name")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn exists_by_name_and_owner(
    pool: &PgPool,
    name: &str,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM tags WHERE name = $1 AND user_id = $2)",
    )
    .bind(name)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn create(pool: &PgPool, name: &str, user_id: i64) -> Result<Tag, sqlx::Error> {
    sqlx::query_as::<_, Tag>("INSERT INTO tags (name, user_id) VALUES ($1, $2) RETURNING *")
        .bind(name)
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
