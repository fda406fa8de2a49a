use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;
use tracing::info;

use crate::db::{create_todo, delete_todo, get_todo, list_todos, list_todos_due, update_todo_field};
use crate::error::AppError;
use crate::models::{
    format_todo, format_todos, AgendaQuery, CreateTodo, ListQuery, NewTodo, TodoFilter,
    TodoResponse, UpdateTodo,
};
use crate::validate::{normalize_date, select_update};
use crate::{schema, AppState};

pub async fn list_all_todos(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let Query(query) = query?;
    let filter = TodoFilter::from(query);
    let todos = format_todos(list_todos(&state.db, &filter)?);
    info!(count = todos.len(), ?filter, "Listed todos");
    Ok(Json(todos))
}

pub async fn get_single_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TodoResponse>, AppError> {
    let Path(id) = id?;
    match format_todo(get_todo(&state.db, id)?) {
        Some(todo) => Ok(Json(todo)),
        None => Err(AppError::NotFound),
    }
}

pub async fn agenda(
    State(state): State<AppState>,
    query: Result<Query<AgendaQuery>, QueryRejection>,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let Query(query) = query?;
    let date = query.date.as_deref().ok_or(AppError::InvalidDate)?;
    let date = normalize_date(date)?;
    let todos = format_todos(list_todos_due(&state.db, &date)?);
    info!(count = todos.len(), %date, "Listed agenda");
    Ok(Json(todos))
}

pub async fn create_new_todo(
    State(state): State<AppState>,
    req: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    let todo = NewTodo::try_from(req)?;
    let id = create_todo(&state.db, &todo)?;
    info!(id, due_date = %todo.due_date, "Created todo");

    let location = format!("{}/todos/{}/", state.base_path, id);
    Ok((
        StatusCode::OK,
        [(LOCATION, location)],
        "Todo Successfully Added",
    ))
}

pub async fn update_existing_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    req: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<&'static str, AppError> {
    let Path(id) = id?;
    let Json(req) = req?;
    let update = select_update(&req)?;

    if update_todo_field(&state.db, id, &update)? {
        info!(id, column = update.column(), "Updated todo");
        Ok(update.acknowledgement())
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn delete_existing_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<&'static str, AppError> {
    let Path(id) = id?;
    let existed = delete_todo(&state.db, id)?;
    info!(id, existed, "Deleted todo");
    Ok("Todo Deleted")
}

pub async fn describe_schema() -> Json<Value> {
    Json(schema::describe())
}
