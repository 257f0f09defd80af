//! Transport-agnostic application state.
//!
//! `CoreState` owns the single SQLite connection shared by every HTTP
//! handler. The connection sits behind a `Mutex`; handlers take the lock,
//! run one lifecycle operation synchronously and release it before any
//! `.await`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Lock poisoned")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub struct CoreState {
    conn: Mutex<Connection>,
    started_at: Instant,
}

impl CoreState {
    /// Open (and migrate) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "Database opened");
        Ok(Self::with_connection(conn))
    }

    /// In-memory state for tests and throwaway runs.
    pub fn in_memory() -> Result<Self, CoreError> {
        Ok(Self::with_connection(db::open_memory_database()?))
    }

    pub fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            started_at: Instant::now(),
        }
    }

    /// Acquire the shared connection. Never hold the guard across `.await`.
    pub fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_state_is_migrated() {
        let state = CoreState::in_memory().unwrap();
        let conn = state.lock_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 5);
    }

    #[test]
    fn open_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upstac.db");
        let _state = CoreState::open(&path).unwrap();
        assert!(path.exists());
    }
}
