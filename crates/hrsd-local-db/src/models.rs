//! Database models and persistence operations.

use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::reconcile::{Reconciler, SchemaCapabilities};
use crate::schema;

/// Database model for employee requests.
///
/// Status and timestamps stay plain strings at this layer; the domain crate
/// owns their typed forms and validates on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: i64,
    pub request_no: String,
    pub employee_id: String,
    pub employee_name: String,
    pub cluster: String,
    pub department: String,
    pub category: String,
    pub request_type: String,
    pub details: String,
    pub status: String,
    pub assignee: String,
    pub duration_days: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Database model for request attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub id: i64,
    pub request_id: i64,
    pub filename: String,
    pub stored_path: String,
    pub uploaded_at: String,
}

/// Database model for the desk settings singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub company_name: String,
    pub company_db_path: String,
    pub upload_folder: String,
}

// Columns selected for request reads. Stores patched up from older releases
// hold NULL in the later-added columns, so everything optional is coalesced
// here instead of in every caller.
const REQUEST_COLUMNS: &str = "id, request_no, \
    COALESCE(employee_id, ''), COALESCE(employee_name, ''), \
    COALESCE(cluster, ''), COALESCE(department, ''), COALESCE(category, ''), \
    COALESCE(request_type, ''), COALESCE(details, ''), COALESCE(status, ''), \
    COALESCE(assignee, ''), COALESCE(duration_days, 0), \
    COALESCE(created_at, ''), COALESCE(updated_at, created_at, '')";

fn request_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RequestRecord> {
    Ok(RequestRecord {
        id: row.get(0)?,
        request_no: row.get(1)?,
        employee_id: row.get(2)?,
        employee_name: row.get(3)?,
        cluster: row.get(4)?,
        department: row.get(5)?,
        category: row.get(6)?,
        request_type: row.get(7)?,
        details: row.get(8)?,
        status: row.get(9)?,
        assignee: row.get(10)?,
        duration_days: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

/// Database operations for requests.
pub struct RequestStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> RequestStore<'a> {
    /// Create a new request store.
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Insert a new request row. Returns the internal rowid.
    ///
    /// `record.id` is ignored; the store assigns it. A duplicate
    /// `request_no` surfaces as the UNIQUE-constraint database error the
    /// caller's retry policy watches for.
    pub fn insert(&self, record: &RequestRecord) -> crate::Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO requests
                (request_no, employee_id, employee_name, cluster, department,
                 category, request_type, details, status, assignee,
                 duration_days, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                record.request_no,
                record.employee_id,
                record.employee_name,
                record.cluster,
                record.department,
                record.category,
                record.request_type,
                record.details,
                record.status,
                record.assignee,
                record.duration_days,
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a request by its external number.
    pub fn get_by_no(&self, request_no: &str) -> crate::Result<Option<RequestRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM requests WHERE request_no = ?",
            REQUEST_COLUMNS
        ))?;

        let mut rows = stmt.query_map(params![request_no], request_from_row)?;

        match rows.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// List all requests, newest first.
    pub fn list(&self) -> crate::Result<Vec<RequestRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM requests ORDER BY created_at DESC, id DESC",
            REQUEST_COLUMNS
        ))?;

        let records = stmt.query_map(params![], request_from_row)?;

        let mut requests = Vec::new();
        for record in records {
            requests.push(record?);
        }
        Ok(requests)
    }

    /// List the newest `limit` requests.
    pub fn recent(&self, limit: i64) -> crate::Result<Vec<RequestRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM requests ORDER BY created_at DESC, id DESC LIMIT ?",
            REQUEST_COLUMNS
        ))?;

        let records = stmt.query_map(params![limit], request_from_row)?;

        let mut requests = Vec::new();
        for record in records {
            requests.push(record?);
        }
        Ok(requests)
    }

    /// Update status and assignee of the request with `request_no`.
    ///
    /// Returns the number of rows changed; an unknown number changes zero
    /// rows and is not an error.
    pub fn update_status(
        &self,
        request_no: &str,
        status: &str,
        assignee: &str,
        updated_at: &str,
    ) -> crate::Result<usize> {
        let changed = self.conn.execute(
            "UPDATE requests SET status = ?, assignee = ?, updated_at = ? WHERE request_no = ?",
            params![status, assignee, updated_at, request_no],
        )?;
        Ok(changed)
    }

    /// All external request numbers in the store.
    pub fn request_nos(&self) -> crate::Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT request_no FROM requests")?;
        let rows = stmt.query_map(params![], |row| row.get::<_, String>(0))?;

        let mut numbers = Vec::new();
        for row in rows {
            numbers.push(row?);
        }
        Ok(numbers)
    }

    /// Whether a request with `request_no` exists.
    pub fn exists(&self, request_no: &str) -> crate::Result<bool> {
        let mut stmt = self.conn.prepare("SELECT 1 FROM requests WHERE request_no = ?")?;
        Ok(stmt.exists(params![request_no])?)
    }

    /// Total number of requests.
    pub fn count(&self) -> crate::Result<i64> {
        let mut stmt = self.conn.prepare("SELECT COUNT(*) FROM requests")?;
        Ok(stmt.query_row(params![], |row| row.get(0))?)
    }

    /// Request counts grouped by status.
    pub fn count_by_status(&self) -> crate::Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(status, ''), COUNT(*) FROM requests GROUP BY status",
        )?;
        let rows = stmt.query_map(params![], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    /// Request counts grouped by category, busiest first.
    pub fn count_by_category(&self) -> crate::Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(category, ''), COUNT(*) FROM requests \
             GROUP BY category ORDER BY COUNT(*) DESC, category ASC",
        )?;
        let rows = stmt.query_map(params![], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }
}

/// Database operations for attachments.
pub struct AttachmentStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> AttachmentStore<'a> {
    /// Create a new attachment store.
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Insert a new attachment row. Returns the internal rowid.
    ///
    /// When the store still carries the legacy location column, the location
    /// is mirrored into it so pre-rename tooling keeps resolving files.
    pub fn insert(
        &self,
        capabilities: SchemaCapabilities,
        record: &AttachmentRecord,
    ) -> crate::Result<i64> {
        if capabilities.legacy_attachment_path {
            self.conn.execute(
                r#"
                INSERT INTO attachments (request_id, filename, stored_path, path, uploaded_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
                params![
                    record.request_id,
                    record.filename,
                    record.stored_path,
                    record.stored_path,
                    record.uploaded_at
                ],
            )?;
        } else {
            self.conn.execute(
                r#"
                INSERT INTO attachments (request_id, filename, stored_path, uploaded_at)
                VALUES (?, ?, ?, ?)
                "#,
                params![
                    record.request_id,
                    record.filename,
                    record.stored_path,
                    record.uploaded_at
                ],
            )?;
        }
        Ok(self.conn.last_insert_rowid())
    }

    /// List attachments recorded against one request, oldest first.
    pub fn list_for_request(&self, request_id: i64) -> crate::Result<Vec<AttachmentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, request_id, COALESCE(filename, ''), COALESCE(stored_path, ''), \
             COALESCE(uploaded_at, '') \
             FROM attachments WHERE request_id = ? ORDER BY id",
        )?;

        let records = stmt.query_map(params![request_id], |row| {
            Ok(AttachmentRecord {
                id: row.get(0)?,
                request_id: row.get(1)?,
                filename: row.get(2)?,
                stored_path: row.get(3)?,
                uploaded_at: row.get(4)?,
            })
        })?;

        let mut attachments = Vec::new();
        for record in records {
            attachments.push(record?);
        }
        Ok(attachments)
    }
}

/// Database operations for the settings singleton in the bootstrap store.
pub struct SettingsStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> SettingsStore<'a> {
    /// Create a new settings store.
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Read the settings row, creating it from `defaults` on first access.
    pub fn load_or_init(&self, defaults: &SettingsRecord) -> crate::Result<SettingsRecord> {
        Reconciler::ensure_settings_table(self.conn)?;
        if let Some(record) = self.get()? {
            return Ok(record);
        }
        self.conn.execute(
            "INSERT INTO settings (id, company_name, company_db_path, upload_folder) \
             VALUES (?, ?, ?, ?)",
            params![
                schema::settings::SINGLETON_ID,
                defaults.company_name,
                defaults.company_db_path,
                defaults.upload_folder
            ],
        )?;
        Ok(defaults.clone())
    }

    /// Get the settings row if it exists.
    pub fn get(&self) -> crate::Result<Option<SettingsRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(company_name, ''), COALESCE(company_db_path, ''), \
             COALESCE(upload_folder, '') FROM settings WHERE id = ?",
        )?;

        let mut rows = stmt.query_map(params![schema::settings::SINGLETON_ID], |row| {
            Ok(SettingsRecord {
                company_name: row.get(0)?,
                company_db_path: row.get(1)?,
                upload_folder: row.get(2)?,
            })
        })?;

        match rows.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Write the settings row, inserting or updating as needed.
    ///
    /// Safe to call repeatedly with the same values.
    pub fn upsert(&self, record: &SettingsRecord) -> crate::Result<()> {
        Reconciler::ensure_settings_table(self.conn)?;
        self.conn.execute(
            r#"
            INSERT INTO settings (id, company_name, company_db_path, upload_folder)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                company_name = excluded.company_name,
                company_db_path = excluded.company_db_path,
                upload_folder = excluded.upload_folder
            "#,
            params![
                schema::settings::SINGLETON_ID,
                record.company_name,
                record.company_db_path,
                record.upload_folder
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;

    fn sample_request(no: &str) -> RequestRecord {
        RequestRecord {
            id: 0,
            request_no: no.to_string(),
            employee_id: "E1042".to_string(),
            employee_name: "Huda".to_string(),
            cluster: "Riyadh".to_string(),
            department: "Finance".to_string(),
            category: "الدعم التقني".to_string(),
            request_type: "Access".to_string(),
            details: "VPN account".to_string(),
            status: "Submitted".to_string(),
            assignee: "IT Support".to_string(),
            duration_days: 1,
            created_at: "2024-01-10T09:00:00+00:00".to_string(),
            updated_at: "2024-01-10T09:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let db = Database::open_in_memory().expect("open in-memory store");
        let conn = db.connection().lock().expect("lock");
        let store = RequestStore::new(&conn);

        let id = store.insert(&sample_request("1001")).expect("insert");
        assert!(id > 0);

        let found = store.get_by_no("1001").expect("get").expect("present");
        assert_eq!(found.id, id);
        assert_eq!(found.employee_name, "Huda");
        assert_eq!(found.assignee, "IT Support");

        assert!(store.get_by_no("9999").expect("get").is_none());
    }

    #[test]
    fn list_orders_newest_first() {
        let db = Database::open_in_memory().expect("open in-memory store");
        let conn = db.connection().lock().expect("lock");
        let store = RequestStore::new(&conn);

        let mut early = sample_request("1");
        early.created_at = "2024-01-01T00:00:00+00:00".to_string();
        let mut late = sample_request("2");
        late.created_at = "2024-02-01T00:00:00+00:00".to_string();
        store.insert(&early).expect("insert");
        store.insert(&late).expect("insert");

        let listed = store.list().expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].request_no, "2");
        assert_eq!(listed[1].request_no, "1");
    }

    #[test]
    fn update_status_missing_request_changes_nothing() {
        let db = Database::open_in_memory().expect("open in-memory store");
        let conn = db.connection().lock().expect("lock");
        let store = RequestStore::new(&conn);

        let changed = store
            .update_status("does-not-exist", "Completed", "", "2024-01-11T09:00:00+00:00")
            .expect("update");
        assert_eq!(changed, 0);
    }

    #[test]
    fn duplicate_request_no_is_rejected_by_the_store() {
        let db = Database::open_in_memory().expect("open in-memory store");
        let conn = db.connection().lock().expect("lock");
        let store = RequestStore::new(&conn);

        store.insert(&sample_request("77")).expect("insert");
        let err = store.insert(&sample_request("77")).expect_err("duplicate");
        assert!(crate::allocator::is_unique_violation(&err));
    }

    #[test]
    fn attachments_cascade_with_their_request() {
        let db = Database::open_in_memory().expect("open in-memory store");
        let conn = db.connection().lock().expect("lock");
        let requests = RequestStore::new(&conn);
        let attachments = AttachmentStore::new(&conn);

        let request_id = requests.insert(&sample_request("5")).expect("insert");
        attachments
            .insert(
                db.capabilities(),
                &AttachmentRecord {
                    id: 0,
                    request_id,
                    filename: "scan.pdf".to_string(),
                    stored_path: "/tmp/uploads/5_scan.pdf".to_string(),
                    uploaded_at: "2024-01-10T09:00:00+00:00".to_string(),
                },
            )
            .expect("insert attachment");
        assert_eq!(attachments.list_for_request(request_id).expect("list").len(), 1);

        conn.execute("DELETE FROM requests WHERE id = ?", rusqlite::params![request_id])
            .expect("delete request");
        assert!(attachments.list_for_request(request_id).expect("list").is_empty());
    }

    #[test]
    fn settings_init_then_upsert() {
        let db = Database::open_in_memory().expect("open in-memory store");
        let conn = db.connection().lock().expect("lock");
        let store = SettingsStore::new(&conn);

        let defaults = SettingsRecord {
            company_name: "My Company".to_string(),
            company_db_path: String::new(),
            upload_folder: "/tmp/uploads".to_string(),
        };
        let first = store.load_or_init(&defaults).expect("init");
        assert_eq!(first, defaults);

        // Second load returns the stored row, not the defaults
        let changed = SettingsRecord {
            company_name: "Absher".to_string(),
            company_db_path: "/srv/desk/live.db".to_string(),
            upload_folder: "/srv/desk/uploads".to_string(),
        };
        store.upsert(&changed).expect("upsert");
        store.upsert(&changed).expect("upsert again");

        let loaded = store.load_or_init(&defaults).expect("load");
        assert_eq!(loaded, changed);
    }
}
