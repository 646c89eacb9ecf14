use chrono::Utc;

use super::{require_non_blank, resolve_tags};
use crate::dto::{
    CreateTodoRequest, FilterParams, SortParams, StrategiesResponse, TodoResponse,
    UpdateTodoRequest,
};
use crate::error::AppError;
use crate::models::{Todo, TodoPriority, TodoStatus};
use crate::store::Store;
use crate::todo::{
    ConstructionPolicy, FilterStrategy, SortDirection, SortStrategy, TodoChanges, TodoFactory,
};

/// Matches the `VARCHAR(500)` column.
const MAX_DESCRIPTION_LEN: usize = 500;

fn check_description(description: Option<&str>) -> Result<(), AppError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(AppError::InvalidArgument(
            format!("Todo description must be at most {MAX_DESCRIPTION_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

fn project(todos: &[Todo]) -> Vec<TodoResponse> {
    todos.iter().map(TodoResponse::from).collect()
}

/// Existence first, ownership second: an unknown id is always `NotFound`,
/// whoever asks.
async fn load_owned(
    store: &dyn Store,
    caller: i64,
    id: i64,
    action: &str,
) -> Result<Todo, AppError> {
    let todo = store
        .find_todo_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Todo not found with id: {id}")))?;

    if !todo.is_owned_by(caller) {
        return Err(AppError::AccessDenied(format!(
            "You are not authorized to {action} this todo"
        )));
    }

    Ok(todo)
}

pub async fn create(
    store: &dyn Store,
    caller: i64,
    req: CreateTodoRequest,
) -> Result<TodoResponse, AppError> {
    if store.find_user_by_id(caller).await?.is_none() {
        return Err(AppError::NotFound(format!("User not found with id: {caller}")));
    }

    let name = require_non_blank(&req.name, "Todo name")?;
    check_description(req.description.as_deref())?;
    let tags = resolve_tags(store, req.tag_ids.as_deref().unwrap_or_default(), caller).await?;

    let policy = ConstructionPolicy::for_requested_priority(req.priority.as_deref());
    let mut builder =
        TodoFactory::create(policy, name, req.description, req.due_date, caller, tags);

    if let Some(team_id) = req.team_id {
        if store.find_team_role(team_id, caller).await?.is_none() {
            return Err(AppError::NotFound("Team not found or not accessible".to_string()));
        }
        builder = builder.team(team_id);
    }

    if let Some(status) = req.status.as_deref() {
        builder = builder.status(status.parse::<TodoStatus>()?);
    }
    if let Some(priority) = req.priority.as_deref() {
        builder = builder.priority(priority.parse::<TodoPriority>()?);
    }

    let todo = store.insert_todo(builder.build()).await?;

    tracing::info!(todo_id = todo.id, user_id = caller, ?policy, "Todo created");
    Ok(TodoResponse::from(&todo))
}

pub async fn get(store: &dyn Store, caller: i64, id: i64) -> Result<TodoResponse, AppError> {
    let todo = load_owned(store, caller, id, "access").await?;
    Ok(TodoResponse::from(&todo))
}

pub async fn list(store: &dyn Store, caller: i64) -> Result<Vec<TodoResponse>, AppError> {
    let todos = store.find_todos_by_owner(caller).await?;
    Ok(project(&todos))
}

pub async fn filter(
    store: &dyn Store,
    caller: i64,
    params: &FilterParams,
) -> Result<Vec<TodoResponse>, AppError> {
    let strategy: FilterStrategy = params.filter_type.parse()?;
    let todos = store.find_todos_by_owner(caller).await?;
    let matched = strategy.apply(todos, &params.filter_value)?;
    Ok(project(&matched))
}

pub async fn sort(
    store: &dyn Store,
    caller: i64,
    params: &SortParams,
) -> Result<Vec<TodoResponse>, AppError> {
    let strategy: SortStrategy = params.sort_type.parse()?;
    let direction = SortDirection::from_param(params.sort_direction.as_deref());
    let todos = store.find_todos_by_owner(caller).await?;
    Ok(project(&strategy.apply(todos, direction)))
}

pub fn strategies() -> StrategiesResponse {
    StrategiesResponse {
        filters: FilterStrategy::ALL.iter().map(|f| f.key().to_string()).collect(),
        sorts: SortStrategy::ALL.iter().map(|s| s.key().to_string()).collect(),
    }
}

pub async fn update(
    store: &dyn Store,
    caller: i64,
    id: i64,
    req: UpdateTodoRequest,
) -> Result<TodoResponse, AppError> {
    let mut todo = load_owned(store, caller, id, "update").await?;

    let name = req
        .name
        .as_deref()
        .map(|n| require_non_blank(n, "Todo name"))
        .transpose()?;
    check_description(req.description.as_deref())?;
    let status = req.status.as_deref().map(str::parse::<TodoStatus>).transpose()?;
    let priority = req.priority.as_deref().map(str::parse::<TodoPriority>).transpose()?;
    let tags = match req.tag_ids.as_deref() {
        Some(ids) => Some(resolve_tags(store, ids, caller).await?),
        None => None,
    };

    TodoChanges {
        name,
        description: req.description,
        due_date: req.due_date,
        status,
        priority,
        tags,
    }
    .apply(&mut todo, Utc::now());

    let saved = store.save_todo(&todo).await?;

    tracing::info!(todo_id = saved.id, user_id = caller, "Todo updated");
    Ok(TodoResponse::from(&saved))
}

pub async fn delete(store: &dyn Store, caller: i64, id: i64) -> Result<(), AppError> {
    let todo = load_owned(store, caller, id, "delete").await?;
    store.delete_todo(todo.id).await?;

    tracing::info!(todo_id = id, user_id = caller, "Todo deleted");
    Ok(())
}
