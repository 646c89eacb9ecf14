pub mod tags;
pub mod teams;
pub mod todos;
pub mod users;

use axum::Router;
use axum::routing::{delete, get, post};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Users
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .route("/api/users/me", get(users::me))
        // Todos
        .route("/api/todos", get(todos::list).post(todos::create))
        .route("/api/todos/filter", get(todos::filter))
        .route("/api/todos/sort", get(todos::sort))
        .route("/api/todos/strategies", get(todos::strategies))
        .route(
            "/api/todos/{id}",
            get(todos::get).put(todos::update).delete(todos::delete),
        )
        // Tags
        .route("/api/tags", get(tags::list).post(tags::create))
        .route("/api/tags/{id}", delete(tags::delete))
        // Teams
        .route("/api/teams", get(teams::list).post(teams::create))
        .route(
            "/api/teams/{id}/members",
            get(teams::members).post(teams::add_member),
        )
        .route("/api/teams/{id}/todos", get(teams::todos))
}
