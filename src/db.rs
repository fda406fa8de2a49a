use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params_from_iter, Connection, Result, Row};

use crate::error::AppError;
use crate::models::{NewTodo, Todo, TodoFilter};
use crate::validate::FieldUpdate;

pub type DbPool = Arc<Mutex<Connection>>;

const TODO_COLUMNS: &str = "id, todo, priority, status, category, due_date";

pub fn init_db(path: impl AsRef<Path>) -> Result<DbPool> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS todo (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            todo TEXT NOT NULL DEFAULT '',
            priority TEXT NOT NULL,
            status TEXT NOT NULL,
            category TEXT NOT NULL,
            due_date TEXT NOT NULL
        );
        ",
    )
}

/// The guard is the connection scope of a single request.
fn connection(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, AppError> {
    pool.lock()
        .map_err(|_| AppError::Database("connection lock poisoned".to_string()))
}

fn todo_from_row(row: &Row<'_>) -> Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        todo: row.get(1)?,
        priority: row.get(2)?,
        status: row.get(3)?,
        category: row.get(4)?,
        due_date: row.get(5)?,
    })
}

/// Unicode-aware, case-insensitive substring match on the todo text.
/// SQLite's `LIKE` only folds ASCII, so this runs on the fetched rows.
/// `keyword` is already lowercased.
fn matches_keyword(todo: &Todo, keyword: &str) -> bool {
    todo.todo.to_lowercase().contains(keyword)
}

pub fn list_todos(pool: &DbPool, filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
    let conn = connection(pool)?;

    let mut query = format!("SELECT {TODO_COLUMNS} FROM todo WHERE 1=1");
    let mut params: Vec<String> = Vec::new();

    for (column, value) in [
        ("status", &filter.status),
        ("priority", &filter.priority),
        ("category", &filter.category),
    ] {
        if let Some(v) = value {
            params.push(v.clone());
            query.push_str(&format!(" AND {column} = ?{}", params.len()));
        }
    }

    let mut stmt = conn.prepare(&query)?;
    let todos = stmt
        .query_map(params_from_iter(params.iter()), todo_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    match &filter.search {
        Some(keyword) => {
            let keyword = keyword.to_lowercase();
            Ok(todos
                .into_iter()
                .filter(|todo| matches_keyword(todo, &keyword))
                .collect())
        }
        None => Ok(todos),
    }
}

pub fn get_todo(pool: &DbPool, id: i64) -> Result<Option<Todo>, AppError> {
    let conn = connection(pool)?;
    let mut stmt = conn.prepare(&format!("SELECT {TODO_COLUMNS} FROM todo WHERE id = ?1"))?;
    let mut rows = stmt.query([id])?;

    if let Some(row) = rows.next()? {
        Ok(Some(todo_from_row(row)?))
    } else {
        Ok(None)
    }
}

/// `due_date` must already be canonical.
pub fn list_todos_due(pool: &DbPool, due_date: &str) -> Result<Vec<Todo>, AppError> {
    let conn = connection(pool)?;
    let mut stmt =
        conn.prepare(&format!("SELECT {TODO_COLUMNS} FROM todo WHERE due_date = ?1"))?;
    let todos = stmt
        .query_map([due_date], todo_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(todos)
}

pub fn create_todo(pool: &DbPool, todo: &NewTodo) -> Result<i64, AppError> {
    let conn = connection(pool)?;
    conn.execute(
        "INSERT INTO todo (todo, priority, status, category, due_date) VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &todo.todo,
            &todo.priority,
            &todo.status,
            &todo.category,
            &todo.due_date,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

/// Returns whether a row with `id` existed.
pub fn update_todo_field(
    pool: &DbPool,
    id: i64,
    update: &FieldUpdate,
) -> Result<bool, AppError> {
    let conn = connection(pool)?;
    // Column names come from `FieldUpdate`, never from the request.
    let query = format!("UPDATE todo SET {} = ?1 WHERE id = ?2", update.column());
    let rows = conn.execute(&query, (update.value(), id))?;
    Ok(rows > 0)
}

pub fn delete_todo(pool: &DbPool, id: i64) -> Result<bool, AppError> {
    let conn = connection(pool)?;
    let rows = conn.execute("DELETE FROM todo WHERE id = ?1", [id])?;
    Ok(rows > 0)
}
