use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};

use crate::models::{NewTodo, Tag, Todo};

#[derive(sqlx::FromRow)]
struct TagLink {
    todo_id: i64,
    #[sqlx(flatten)]
    tag: Tag,
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Todo>, sqlx::Error> {
    let todo = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match todo {
        Some(todo) => {
            let mut todos = vec![todo];
            attach_tags(pool, &mut todos).await?;
            Ok(todos.pop())
        }
        None => Ok(None),
    }
}

pub async fn list_by_owner(pool: &PgPool, user_id: i64) -> Result<Vec<Todo>, sqlx::Error> {
    let mut todos = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE user_id = $1 ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    attach_tags(pool, &mut todos).await?;
    Ok(todos)
}

pub async fn list_by_team(pool: &PgPool, team_id: i64) -> Result<Vec<Todo>, sqlx::Error> {
    let mut todos = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE team_id = $1 ORDER BY id")
        .bind(team_id)
        .fetch_all(pool)
        .await?;
    attach_tags(pool, &mut todos).await?;
    Ok(todos)
}

pub async fn create(pool: &PgPool, todo: &NewTodo) -> Result<Todo, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut created = sqlx::query_as::<_, Todo>(
        "INSERT INTO todos
            (name, description, due_date, status, priority,
             user_id, team_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(&todo.name)
    .bind(&todo.description)
    .bind(todo.due_date)
    .bind(todo.status.as_str())
    .bind(todo.priority.as_str())
    .bind(todo.user_id)
    .bind(todo.team_id)
    .bind(todo.created_at)
    .bind(todo.updated_at)
    .fetch_one(&mut *tx)
    .await?;

    link_tags(&mut tx, created.id, todo.tag_ids()).await?;
    tx.commit().await?;

    created.tags = todo.tags.clone();
    Ok(created)
}

pub async fn update(pool: &PgPool, todo: &Todo) -> Result<Todo, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut saved = sqlx::query_as::<_, Todo>(
        "UPDATE todos SET name = $2, description = $3, due_date = $4, status = $5,
                priority = $6, team_id = $7, updated_at = $8
         WHERE id = $1 RETURNING *",
    )
    .bind(todo.id)
    .bind(&todo.name)
    .bind(&todo.description)
    .bind(todo.due_date)
    .bind(todo.status.as_str())
    .bind(todo.priority.as_str())
    .bind(todo.team_id)
    .bind(todo.updated_at)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM todo_tags WHERE todo_id = $1")
        .bind(todo.id)
        .execute(&mut *tx)
        .await?;
    link_tags(&mut tx, todo.id, todo.tag_ids()).await?;
    tx.commit().await?;

    saved.tags = todo.tags.clone();
    Ok(saved)
}

/// Tag links go with the row through `ON DELETE CASCADE`.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM todos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

async fn link_tags(
    conn: &mut PgConnection,
    todo_id: i64,
    tag_ids: Vec<i64>,
) -> Result<(), sqlx::Error> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO todo_tags (todo_id, tag_id)
         SELECT $1, UNNEST($2::BIGINT[])
         ON CONFLICT DO NOTHING",
    )
    .bind(todo_id)
    .bind(tag_ids)
    .execute(conn)
    .await?;
    Ok(())
}

async fn attach_tags(pool: &PgPool, todos: &mut [Todo]) -> Result<(), sqlx::Error> {
    if todos.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = todos.iter().map(|t| t.id).collect();
    let links = sqlx::query_as::<_, TagLink>(
        "SELECT tt.todo_id, t.id, t.name, t.user_id, t.created_at
         FROM todo_tags tt JOIN tags t ON t.id = tt.tag_id
         WHERE tt.todo_id = ANY($1)
         ORDER BY t.name",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    let mut by_todo: HashMap<i64, Vec<Tag>> = HashMap::new();
    for link in links {
        by_todo.entry(link.todo_id).or_default().push(link.tag);
    }
    for todo in todos.iter_mut() {
        todo.tags = by_todo.remove(&todo.id).unwrap_or_default();
    }
    Ok(())
}
