use serde::{Deserialize, Serialize};

/// A row of the `todo` table.
#[derive(Debug, Clone)]
pub struct Todo {
    pub id: i64,
    pub todo: String,
    pub priority: String,
    pub status: String,
    pub category: String,
    pub due_date: String,
}

/// External shape of a todo; only the due date key differs from the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: i64,
    pub todo: String,
    pub priority: String,
    pub status: String,
    pub category: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

impl From<Todo> for TodoResponse {
    fn from(row: Todo) -> Self {
        TodoResponse {
            id: row.id,
            todo: row.todo,
            priority: row.priority,
            status: row.status,
            category: row.category,
            due_date: row.due_date,
        }
    }
}

pub fn format_todo(row: Option<Todo>) -> Option<TodoResponse> {
    row.map(TodoResponse::from)
}

pub fn format_todos(rows: Vec<Todo>) -> Vec<TodoResponse> {
    rows.into_iter().map(TodoResponse::from).collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub search_q: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgendaQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    pub todo: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    pub todo: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}

/// A fully validated todo ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub todo: String,
    pub priority: String,
    pub status: String,
    pub category: String,
    pub due_date: String,
}

/// Listing constraints, combined with AND. `None` imposes nothing.
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl From<ListQuery> for TodoFilter {
    fn from(query: ListQuery) -> Self {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());
        TodoFilter {
            status: present(query.status),
            priority: present(query.priority),
            category: present(query.category),
            search: present(query.search_q),
        }
    }
}
