//! Schema reconciliation.
//!
//! Stores are not migrated by versioned scripts. Every open converges the
//! store onto the current schema instead: baseline tables are created if
//! absent, columns introduced by later releases are patched in, and the
//! legacy attachment location column is backfilled into its successor.
//! Running the reconciler twice in a row performs no further alterations.

use rusqlite::Connection;

use crate::schema;

/// Optional columns observed in a store when it was opened.
///
/// Computed from the same `PRAGMA table_info` pass the reconciler performs,
/// so per-operation SQL never has to re-query schema metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCapabilities {
    /// The pre-rename attachment location column is present.
    pub legacy_attachment_path: bool,
}

/// Schema reconciler.
pub struct Reconciler;

impl Reconciler {
    /// Converge the store behind `conn` onto the current column set.
    ///
    /// Existing rows are never dropped or rewritten beyond the location
    /// backfill. A failed alteration propagates; alterations already applied
    /// are not rolled back.
    pub fn reconcile(conn: &Connection) -> crate::Result<SchemaCapabilities> {
        Self::ensure_tables(conn)?;
        Self::ensure_columns(conn)?;
        let capabilities = Self::capabilities(conn)?;
        if capabilities.legacy_attachment_path {
            Self::backfill_stored_path(conn)?;
        }
        Ok(capabilities)
    }

    /// Create the baseline tables if they do not exist.
    pub fn ensure_tables(conn: &Connection) -> crate::Result<()> {
        conn.execute_batch(
            r#"
            -- Employee requests, one row per submission
            CREATE TABLE IF NOT EXISTS requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                request_no TEXT NOT NULL UNIQUE,
                employee_id TEXT NOT NULL,
                employee_name TEXT NOT NULL,
                cluster TEXT,
                department TEXT,
                category TEXT NOT NULL,
                request_type TEXT,
                details TEXT,
                status TEXT NOT NULL,
                assignee TEXT,
                duration_days INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Files recorded against a request at submission time
            CREATE TABLE IF NOT EXISTS attachments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                request_id INTEGER NOT NULL REFERENCES requests(id) ON DELETE CASCADE,
                filename TEXT NOT NULL,
                stored_path TEXT,
                uploaded_at TEXT
            );
            "#,
        )?;
        Ok(())
    }

    /// Create the settings table if it does not exist.
    ///
    /// Only the bootstrap store carries settings; data stores resolved
    /// through it never get this table.
    pub fn ensure_settings_table(conn: &Connection) -> crate::Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY,
                company_name TEXT,
                company_db_path TEXT,
                upload_folder TEXT
            );
            "#,
        )?;
        Ok(())
    }

    /// Add any expected column missing from an older store.
    ///
    /// Columns are added nullable with no default, so existing rows are left
    /// untouched and readers treat the absent values as empty.
    pub fn ensure_columns(conn: &Connection) -> crate::Result<()> {
        for table in [schema::TABLE_REQUESTS, schema::TABLE_ATTACHMENTS] {
            let present = Self::table_columns(conn, table)?;
            for (expected_table, column, column_type) in schema::EXPECTED_COLUMNS {
                if *expected_table != table || present.iter().any(|c| c == column) {
                    continue;
                }
                tracing::info!(table, column, "Adding missing column");
                conn.execute_batch(&format!(
                    "ALTER TABLE {} ADD COLUMN {} {}",
                    table, column, column_type
                ))?;
            }
        }
        Ok(())
    }

    /// Record which legacy columns this store still carries.
    pub fn capabilities(conn: &Connection) -> crate::Result<SchemaCapabilities> {
        let attachment_columns = Self::table_columns(conn, schema::TABLE_ATTACHMENTS)?;
        Ok(SchemaCapabilities {
            legacy_attachment_path: attachment_columns
                .iter()
                .any(|c| c == schema::attachments::LEGACY_PATH),
        })
    }

    /// Copy attachment locations recorded under the legacy column name into
    /// the current column wherever the current one is still null.
    fn backfill_stored_path(conn: &Connection) -> crate::Result<()> {
        let count = conn.execute(
            "UPDATE attachments SET stored_path = path \
             WHERE stored_path IS NULL AND path IS NOT NULL",
            [],
        )?;
        if count > 0 {
            tracing::info!(count, "Backfilled attachment locations from legacy column");
        }
        Ok(())
    }

    /// Column names of `table` in declaration order.
    fn table_columns(conn: &Connection, table: &str) -> crate::Result<Vec<String>> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(columns)
    }
}
