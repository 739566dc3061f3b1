//! Bounded SQLite connection pool.
//!
//! # Responsibility
//! - Run storage closures on tokio's blocking pool with a pooled connection.
//! - Cap concurrent connections; callers beyond the cap wait for a permit.
//!
//! # Invariants
//! - At most `max_connections` connections exist at once.
//! - Every pooled connection went through `open_db`, so it has foreign keys
//!   enabled and migrations applied.

use clinic_core::db::open_db;
use clinic_core::DbError;
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("connection pool is closed")]
    Closed,
    #[error("connection pool lock poisoned")]
    Poisoned,
    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Cloneable handle to the shared pool.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    path: PathBuf,
    idle: Mutex<Vec<Connection>>,
    permits: Arc<Semaphore>,
    max_connections: usize,
}

impl Store {
    /// Opens the database once to apply migrations and fail fast on a bad
    /// path; that connection seeds the pool.
    pub fn open(path: impl AsRef<Path>, max_connections: usize) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let max_connections = max_connections.max(1);
        let first = open_db(&path)?;
        info!(
            "event=store_open module=api status=ok path={} max_connections={max_connections}",
            path.display()
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                path,
                idle: Mutex::new(vec![first]),
                permits: Arc::new(Semaphore::new(max_connections)),
                max_connections,
            }),
        })
    }

    pub fn max_connections(&self) -> usize {
        self.inner.max_connections
    }

    /// Runs `work` with exclusive use of one pooled connection.
    pub async fn run<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.inner.permits)
            .acquire_owned()
            .await
            .map_err(|_| StoreError::Closed)?;
        let inner = Arc::clone(&self.inner);

        tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
            let _permit = permit;
            let mut conn = inner.checkout()?;
            let output = work(&mut conn);
            inner.checkin(conn);
            Ok(output)
        })
        .await?
    }
}

impl StoreInner {
    fn checkout(&self) -> Result<Connection, StoreError> {
        let pooled = self
            .idle
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .pop();
        match pooled {
            Some(conn) => Ok(conn),
            None => {
                debug!("event=store_grow module=api status=ok");
                Ok(open_db(&self.path)?)
            }
        }
    }

    fn checkin(&self, conn: Connection) {
        if let Ok(mut idle) = self.idle.lock() {
            idle.push(conn);
        }
    }

    #[cfg(test)]
    fn idle_count(&self) -> usize {
        self.idle.lock().map(|idle| idle.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_returns_closure_output_and_reuses_connection() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("pool.sqlite3"), 4).unwrap();

        let version: u32 = store
            .run(|conn| {
                conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
                    .unwrap()
            })
            .await
            .unwrap();
        assert_eq!(version, clinic_core::db::migrations::latest_version());
        assert_eq!(store.inner.idle_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_never_exceed_pool_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("pool.sqlite3"), 2).unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .run(|_| std::thread::sleep(std::time::Duration::from_millis(10)))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert!(store.inner.idle_count() <= 2);
        assert_eq!(store.max_connections(), 2);
    }

    #[test]
    fn open_fails_for_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = Store::open(dir.path().join("missing").join("db.sqlite3"), 1);
        assert!(matches!(result, Err(StoreError::Db(_))));
    }
}
