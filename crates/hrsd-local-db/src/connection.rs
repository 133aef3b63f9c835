//! Database connection management.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::reconcile::{Reconciler, SchemaCapabilities};

/// Connection wrapper for one SQLite store.
///
/// Opening a store always reconciles its schema first, so every caller sees
/// the current column set regardless of which release created the file.
#[derive(Debug, Clone)]
pub struct Database {
    connection: Arc<std::sync::Mutex<Connection>>,
    capabilities: SchemaCapabilities,
}

impl Database {
    /// Get the bootstrap store path based on the HRSD_HOME environment
    /// variable or platform defaults.
    ///
    /// Priority order:
    /// 1. HRSD_HOME environment variable (custom)
    /// 2. Platform-specific defaults:
    ///    - Linux: `${XDG_STATE_HOME:-~/.local/state}/hrsd/desk.db`
    ///    - macOS: `~/Library/Application Support/hrsd/desk.db`
    ///    - Windows: `%LOCALAPPDATA%\hrsd\desk.db`
    pub fn default_path() -> crate::Result<PathBuf> {
        // Check HRSD_HOME first
        if let Ok(hrsd_home) = std::env::var("HRSD_HOME") {
            return Ok(PathBuf::from(hrsd_home).join("desk.db"));
        }

        // Platform-specific defaults
        #[cfg(target_os = "linux")]
        {
            let xdg_state_home = match std::env::var("XDG_STATE_HOME") {
                Ok(dir) => PathBuf::from(dir),
                Err(_) => {
                    let home = std::env::var("HOME")
                        .map_err(|_| crate::Error::generic("HOME environment variable not set"))?;
                    PathBuf::from(home).join(".local").join("state")
                }
            };
            Ok(xdg_state_home.join("hrsd").join("desk.db"))
        }

        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME")
                .map_err(|_| crate::Error::generic("HOME environment variable not set"))?;
            Ok(PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("hrsd")
                .join("desk.db"))
        }

        #[cfg(target_os = "windows")]
        {
            let local_appdata = std::env::var("LOCALAPPDATA").map_err(|_| {
                crate::Error::generic("LOCALAPPDATA environment variable not set")
            })?;
            Ok(PathBuf::from(local_appdata).join("hrsd").join("desk.db"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            // Fallback for other platforms
            let home = std::env::var("HOME")
                .map_err(|_| crate::Error::generic("HOME environment variable not set"))?;
            Ok(PathBuf::from(home).join(".hrsd").join("desk.db"))
        }
    }

    /// Open the store at the default bootstrap path, creating its parent
    /// directories on demand.
    pub fn open_default() -> crate::Result<Self> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(&path)
    }
}

impl Database {
    /// Open the store at the specified path.
    ///
    /// If the path doesn't exist, the store will be created.
    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let conn = Connection::open(path)?;
        let capabilities = Self::initialize(&conn)?;
        Ok(Self {
            connection: Arc::new(std::sync::Mutex::new(conn)),
            capabilities,
        })
    }

    /// Open an in-memory store for testing.
    pub fn open_in_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory()?;
        let capabilities = Self::initialize(&conn)?;
        Ok(Self {
            connection: Arc::new(std::sync::Mutex::new(conn)),
            capabilities,
        })
    }

    /// Apply connection pragmas and reconcile the schema.
    fn initialize(conn: &Connection) -> crate::Result<SchemaCapabilities> {
        // WAL keeps readers unblocked while a write is in flight
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "busy_timeout", 5000)?;

        Reconciler::reconcile(conn)
    }

    /// Schema capabilities observed when this store was opened.
    pub fn capabilities(&self) -> SchemaCapabilities {
        self.capabilities
    }

    /// Re-run schema reconciliation on the open store.
    ///
    /// Callers use this defensively ahead of writes when the store file may
    /// have been replaced or truncated since the open.
    pub fn reconcile(&self) -> crate::Result<SchemaCapabilities> {
        let conn = self.connection.lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })?;
        Reconciler::reconcile(&conn)
    }

    /// Get a reference to the underlying connection.
    ///
    /// This method provides access to the connection for executing queries.
    /// The caller must ensure proper locking if used concurrently.
    pub fn connection(&self) -> &std::sync::Mutex<Connection> {
        &self.connection
    }

    /// Execute a transaction with automatic rollback on error.
    pub fn transaction<F, T>(&self, f: F) -> crate::Result<T>
    where
        F: FnOnce(&Connection) -> crate::Result<T>,
    {
        let conn = self.connection.lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })?;

        let tx = conn.unchecked_transaction()?;
        match f(&tx) {
            Ok(result) => {
                tx.commit()?;
                Ok(result)
            }
            Err(e) => {
                tx.rollback()?;
                Err(e)
            }
        }
    }
}
