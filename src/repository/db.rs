//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Connection shared by all repositories. `None` until `init_db` finishes.
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
    pub path: PathBuf,
}

impl DbState {
    pub fn new(path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            path,
        }
    }

    pub fn shared(&self) -> SharedConnection {
        self.conn.clone()
    }

    pub async fn is_ready(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

/// Borrow the connection out of a locked slot
pub(crate) fn ready(slot: &Option<Connection>) -> DomainResult<&Connection> {
    slot.as_ref()
        .ok_or_else(|| DomainError::Internal("Database not initialized".to_string()))
}

/// Map a write error, treating constraint violations as conflicts
pub(crate) fn write_error(e: rusqlite::Error) -> DomainError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DomainError::Conflict(e.to_string())
        }
        _ => DomainError::Internal(e.to_string()),
    }
}

/// Initialize database with path (":memory:" for tests)
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = Connection::open(db_path)
        .map_err(|e| format!("Failed to open db {}: {}", db_path.display(), e))?;

    run_migrations(&conn)?;

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);

    log::info!("Database ready at {}", db_path.display());
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(names) = stmt.query_map([], |row| row.get::<_, String>(1)) else {
        return false;
    };
    let found = names.flatten().any(|name| name == column);
    found
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS layout_widgets (
            id TEXT PRIMARY KEY,
            column_name TEXT NOT NULL DEFAULT 'main',
            position INTEGER NOT NULL DEFAULT 0,
            title TEXT NOT NULL DEFAULT '',
            widget_type TEXT NOT NULL,
            settings TEXT NOT NULL,
            updated_at INTEGER
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS menu_items (
            id TEXT PRIMARY KEY,
            parent_id TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            label TEXT NOT NULL,
            updated_at INTEGER
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    // Link targets were added after the first release
    if !column_exists(conn, "menu_items", "url") {
        conn.execute("ALTER TABLE menu_items ADD COLUMN url TEXT", [])
            .map_err(|e| format!("Failed to add url: {}", e))?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_layout_column ON layout_widgets(column_name, position)",
        [],
    )
    .map_err(|e| e.to_string())?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_menu_parent ON menu_items(parent_id, position)",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert!(column_exists(&conn, "menu_items", "url"));
        assert!(column_exists(&conn, "layout_widgets", "column_name"));
        assert!(!column_exists(&conn, "layout_widgets", "parent_id"));
    }

    #[test]
    fn test_adds_url_to_old_menu_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE menu_items (id TEXT PRIMARY KEY, parent_id TEXT, position INTEGER NOT NULL DEFAULT 0, label TEXT NOT NULL, updated_at INTEGER)",
            [],
        )
        .unwrap();
        assert!(!column_exists(&conn, "menu_items", "url"));

        run_migrations(&conn).unwrap();
        assert!(column_exists(&conn, "menu_items", "url"));
    }

    #[tokio::test]
    async fn test_uninitialized_state_reports_error() {
        let state = DbState::new(PathBuf::from("unused.db"));
        assert!(!state.is_ready().await);
        let guard = state.conn.lock().await;
        assert!(matches!(ready(&guard), Err(DomainError::Internal(_))));
    }
}
