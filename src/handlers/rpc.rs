use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::{http::StatusCode, Json};
use tracing::{info, warn};

use crate::db::{create_todo, delete_todo, get_todo, list_todos, toggle_todo, update_todo};
use crate::error::AppError;
use crate::models::{
    now_millis, CreateTodo, DeleteResult, DeleteTodo, Health, Todo, TodoId, ToggleTodo,
    UpdateTodo,
};
use crate::AppState;

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        warn!("Rejected empty title");
        return Err(AppError::Validation("Title cannot be empty"));
    }
    Ok(())
}

pub async fn healthcheck() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        timestamp: now_millis(),
    })
}

pub async fn get_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = list_todos(&state.db)?;
    info!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

pub async fn get_single_todo(
    State(state): State<AppState>,
    query: Result<Query<TodoId>, QueryRejection>,
) -> Result<Json<Todo>, AppError> {
    let Query(TodoId { id }) = query?;
    match get_todo(&state.db, id)? {
        Some(todo) => Ok(Json(todo)),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_new_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Json(req) = payload?;
    validate_title(&req.title)?;

    let todo = create_todo(&state.db, &req.title, req.description.as_deref())?;
    info!(id = todo.id, title = %todo.title, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_existing_todo(
    State(state): State<AppState>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Json(req) = payload?;
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }

    match update_todo(&state.db, &req)? {
        Some(todo) => {
            info!(id = todo.id, completed = todo.completed, "Updated todo");
            Ok(Json(todo))
        }
        None => Err(AppError::NotFound),
    }
}

pub async fn toggle_existing_todo(
    State(state): State<AppState>,
    payload: Result<Json<ToggleTodo>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Json(req) = payload?;

    match toggle_todo(&state.db, req.id, req.completed)? {
        Some(todo) => {
            info!(id = todo.id, completed = todo.completed, "Toggled todo");
            Ok(Json(todo))
        }
        None => Err(AppError::NotFound),
    }
}

/// A missing row is reported as `success: false`, not as an error.
pub async fn delete_existing_todo(
    State(state): State<AppState>,
    payload: Result<Json<DeleteTodo>, JsonRejection>,
) -> Result<Json<DeleteResult>, AppError> {
    let Json(req) = payload?;
    let success = delete_todo(&state.db, req.id)?;
    info!(id = req.id, success, "Deleted todo");
    Ok(Json(DeleteResult { success }))
}
