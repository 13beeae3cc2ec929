use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row};

use crate::error::AppError;
use crate::models::{now_millis, Todo, UpdateTodo};

pub type DbPool = Arc<Mutex<Connection>>;

const TODO_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

pub fn init_db(path: impl AsRef<Path>) -> rusqlite::Result<DbPool> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub fn open_in_memory() -> rusqlite::Result<DbPool> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            completed INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000),
            updated_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
        );
        ",
    )
}

fn lock(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, AppError> {
    pool.lock()
        .map_err(|_| AppError::Database("connection lock poisoned".to_string()))
}

fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get::<_, i32>(3)? != 0,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn get_todo_internal(conn: &Connection, id: i64) -> Result<Option<Todo>, AppError> {
    let mut stmt = conn.prepare(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1"))?;
    let mut rows = stmt.query([id])?;

    if let Some(row) = rows.next()? {
        Ok(Some(todo_from_row(row)?))
    } else {
        Ok(None)
    }
}

pub fn create_todo(
    pool: &DbPool,
    title: &str,
    description: Option<&str>,
) -> Result<Todo, AppError> {
    let conn = lock(pool)?;
    let now = now_millis();

    conn.execute(
        "INSERT INTO todos (title, description, completed, created_at, updated_at)
         VALUES (?1, ?2, 0, ?3, ?3)",
        (title, description, now),
    )?;
    let id = conn.last_insert_rowid();

    get_todo_internal(&conn, id)?.ok_or(AppError::NotFound)
}

pub fn list_todos(pool: &DbPool) -> Result<Vec<Todo>, AppError> {
    let conn = lock(pool)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {TODO_COLUMNS} FROM todos ORDER BY created_at DESC, id DESC"
    ))?;
    let todos = stmt
        .query_map([], todo_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(todos)
}

pub fn get_todo(pool: &DbPool, id: i64) -> Result<Option<Todo>, AppError> {
    let conn = lock(pool)?;
    get_todo_internal(&conn, id)
}

/// Writes the present fields of `update`. Returns `None` when no row has the id.
pub fn update_todo(pool: &DbPool, update: &UpdateTodo) -> Result<Option<Todo>, AppError> {
    let conn = lock(pool)?;

    let mut updates = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(title) = &update.title {
        updates.push("title = ?");
        params.push(Box::new(title.clone()));
    }
    if let Some(description) = &update.description {
        updates.push("description = ?");
        params.push(Box::new(description.clone()));
    }
    if let Some(completed) = update.completed {
        updates.push("completed = ?");
        params.push(Box::new(completed as i32));
    }

    updates.push("updated_at = MAX(?, updated_at + 1)");
    params.push(Box::new(now_millis()));
    params.push(Box::new(update.id));

    let query = format!("UPDATE todos SET {} WHERE id = ?", updates.join(", "));

    let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    if conn.execute(&query, params_refs.as_slice())? == 0 {
        return Ok(None);
    }

    get_todo_internal(&conn, update.id)
}

pub fn toggle_todo(pool: &DbPool, id: i64, completed: bool) -> Result<Option<Todo>, AppError> {
    update_todo(
        pool,
        &UpdateTodo {
            id,
            completed: Some(completed),
            ..Default::default()
        },
    )
}

pub fn delete_todo(pool: &DbPool, id: i64) -> Result<bool, AppError> {
    let conn = lock(pool)?;
    let rows = conn.execute("DELETE FROM todos WHERE id = ?1", [id])?;
    Ok(rows > 0)
}
