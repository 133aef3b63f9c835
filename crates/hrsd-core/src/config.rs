//! Desk configuration.
//!
//! One explicit configuration object is resolved from the bootstrap store
//! at startup and handed to the operations that need it. Nothing here is
//! process-global; after a settings change the desk re-resolves.

use std::path::{Path, PathBuf};

use hrsd_local_db::{Database, SettingsRecord, SettingsStore};

/// Resolved desk configuration.
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// Store holding the settings row.
    pub bootstrap_path: PathBuf,
    /// Store holding request data under the current settings. May coincide
    /// with the bootstrap store.
    pub active_path: PathBuf,
    /// Display name of the organization.
    pub company_name: String,
    /// Directory attachment bytes are saved into.
    pub upload_dir: PathBuf,
}

impl DeskConfig {
    /// The bootstrap store path for this machine (HRSD_HOME or the platform
    /// state directory).
    pub fn default_bootstrap_path() -> crate::Result<PathBuf> {
        Ok(Database::default_path()?)
    }

    /// Resolve configuration through the bootstrap store at `bootstrap_path`.
    ///
    /// Creates the settings row with defaults on first access, resolves the
    /// active store path (creating its parent directory when the settings
    /// point elsewhere) and makes sure the upload directory exists.
    pub fn resolve(bootstrap_path: PathBuf) -> crate::Result<Self> {
        if let Some(parent) = bootstrap_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let settings = {
            let bootstrap = Database::open(&bootstrap_path)?;
            let conn = bootstrap.connection().lock().map_err(|e| {
                crate::Error::generic(format!("Failed to acquire database lock: {}", e))
            })?;
            SettingsStore::new(&conn).load_or_init(&Self::default_settings(&bootstrap_path))?
        };

        let active_path = match settings.company_db_path.trim() {
            "" => bootstrap_path.clone(),
            override_path => {
                let path = PathBuf::from(override_path);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                path
            }
        };

        let upload_dir = match settings.upload_folder.trim() {
            "" => Self::default_upload_dir(&bootstrap_path),
            dir => PathBuf::from(dir),
        };
        std::fs::create_dir_all(&upload_dir)?;

        tracing::debug!(
            active = %active_path.display(),
            uploads = %upload_dir.display(),
            "Resolved desk configuration"
        );

        Ok(Self {
            bootstrap_path,
            active_path,
            company_name: settings.company_name,
            upload_dir,
        })
    }

    /// Settings written on first access to a bootstrap store.
    pub fn default_settings(bootstrap_path: &Path) -> SettingsRecord {
        SettingsRecord {
            company_name: "My Company".to_string(),
            company_db_path: String::new(),
            upload_folder: Self::default_upload_dir(bootstrap_path)
                .to_string_lossy()
                .to_string(),
        }
    }

    /// Upload directory used when the settings leave it blank: `uploads/`
    /// next to the bootstrap store.
    pub fn default_upload_dir(bootstrap_path: &Path) -> PathBuf {
        match bootstrap_path.parent() {
            Some(parent) => parent.join("uploads"),
            None => PathBuf::from("uploads"),
        }
    }
}
