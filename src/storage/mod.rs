//! Session persistence
//!
//! [`SessionStore`] is the seam the chat handler talks to: point lookup and
//! full-record upsert keyed by session id. [`SqliteSessionStore`] is the
//! durable implementation.

use crate::error::{Result, WayfarerError};
use crate::session::ChatSession;
use async_trait::async_trait;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub mod types;
pub use types::SessionRow;

/// Durable key-value store for chat sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Checks the store can serve requests
    ///
    /// # Errors
    ///
    /// `WayfarerError::StoreUnavailable` when not connected.
    async fn ensure_available(&self) -> Result<()>;

    /// Looks up a session by exact id
    ///
    /// # Errors
    ///
    /// `WayfarerError::StoreUnavailable` when not connected;
    /// `WayfarerError::Storage` for query failures and corrupt records.
    async fn get(&self, session_id: &str) -> Result<Option<ChatSession>>;

    /// Inserts or fully replaces the session stored under its id
    ///
    /// # Errors
    ///
    /// `WayfarerError::StoreUnavailable` when not connected;
    /// `WayfarerError::Storage` for write failures.
    async fn save(&self, session: &ChatSession) -> Result<()>;
}

/// SQLite-backed session store
///
/// Holds one connection shared by all requests. Queries run on tokio's
/// blocking pool so slow disk I/O never stalls the async workers. After
/// [`close`](Self::close) every operation fails with `StoreUnavailable`.
pub struct SqliteSessionStore {
    db_path: PathBuf,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteSessionStore {
    /// Opens (creating if needed) the database at `db_path`
    ///
    /// Creates missing parent directories and the schema, then checks the
    /// connection answers a query.
    ///
    /// # Errors
    ///
    /// Returns `WayfarerError::StoreUnavailable` if the database cannot be
    /// opened or initialized.
    pub async fn connect<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();
        let path = db_path.clone();

        let conn = tokio::task::spawn_blocking(move || open_database(&path))
            .await
            .map_err(|e| WayfarerError::StoreUnavailable(format!("connect task failed: {}", e)))??;

        tracing::info!("Connected session store at {}", db_path.display());

        Ok(Self {
            db_path,
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Opens the database at [`default_path`](Self::default_path)
    pub async fn connect_default() -> Result<Self> {
        Self::connect(Self::default_path()?).await
    }

    /// Resolves the default database location
    ///
    /// `WAYFARER_SESSION_DB` wins when set; otherwise `sessions.db` in the
    /// user's data directory.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(override_path) = std::env::var("WAYFARER_SESSION_DB") {
            return Ok(PathBuf::from(override_path));
        }

        let proj_dirs = ProjectDirs::from("com", "wayfarer", "wayfarer")
            .ok_or_else(|| WayfarerError::Storage("Could not determine data directory".into()))?;

        Ok(proj_dirs.data_dir().join("sessions.db"))
    }

    /// Path of the backing database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Whether the store currently holds an open connection
    pub fn is_connected(&self) -> bool {
        self.conn.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Releases the connection
    ///
    /// Closing an already-closed store is a no-op.
    pub fn close(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| WayfarerError::Storage("connection lock poisoned".to_string()))?
            .take();

        if let Some(conn) = conn {
            conn.close().map_err(|(_, e)| {
                WayfarerError::Storage(format!("Failed to close database: {}", e))
            })?;
            tracing::info!("Closed session store at {}", self.db_path.display());
        }

        Ok(())
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| WayfarerError::Storage("connection lock poisoned".to_string()))?;
            let conn = guard.as_ref().ok_or_else(|| {
                WayfarerError::StoreUnavailable("session store is not connected".to_string())
            })?;
            op(conn)
        })
        .await
        .map_err(|e| WayfarerError::Storage(format!("storage task failed: {}", e)))?
    }
}

fn open_database(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WayfarerError::StoreUnavailable(format!(
                    "Failed to create parent directory for database: {}",
                    e
                ))
            })?;
        }
    }

    let conn = Connection::open(db_path)
        .map_err(|e| WayfarerError::StoreUnavailable(format!("Failed to open database: {}", e)))?;

    conn.busy_timeout(Duration::from_secs(5))
        .map_err(|e| WayfarerError::StoreUnavailable(format!("Failed to configure database: {}", e)))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS chat_sessions (
            session_id TEXT PRIMARY KEY,
            summary TEXT NOT NULL,
            recent_messages TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| WayfarerError::StoreUnavailable(format!("Failed to create tables: {}", e)))?;

    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .map_err(|e| WayfarerError::StoreUnavailable(format!("Database did not respond: {}", e)))?;

    Ok(conn)
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn ensure_available(&self) -> Result<()> {
        self.with_connection(|_| Ok(())).await
    }

    async fn get(&self, session_id: &str) -> Result<Option<ChatSession>> {
        let id = session_id.to_string();
        let row = self
            .with_connection(move |conn| {
                conn.query_row(
                    "SELECT session_id, summary, recent_messages, created_at, updated_at
                     FROM chat_sessions WHERE session_id = ?",
                    params![id],
                    |row| {
                        Ok(SessionRow {
                            session_id: row.get(0)?,
                            summary: row.get(1)?,
                            recent_messages: row.get(2)?,
                            created_at: row.get(3)?,
                            updated_at: row.get(4)?,
                        })
                    },
                )
                .optional()
                .map_err(|e| {
                    WayfarerError::Storage(format!("Failed to query session: {}", e)).into()
                })
            })
            .await?;

        row.map(SessionRow::into_session).transpose()
    }

    async fn save(&self, session: &ChatSession) -> Result<()> {
        let row = SessionRow::from_session(session)?;
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO chat_sessions
                    (session_id, summary, recent_messages, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(session_id) DO UPDATE SET
                    summary = excluded.summary,
                    recent_messages = excluded.recent_messages,
                    created_at = excluded.created_at,
                    updated_at = excluded.updated_at",
                params![
                    row.session_id,
                    row.summary,
                    row.recent_messages,
                    row.created_at,
                    row.updated_at
                ],
            )
            .map_err(|e| WayfarerError::Storage(format!("Failed to save session: {}", e)))?;
            Ok(())
        })
        .await
    }
}
