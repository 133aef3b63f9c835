//! Desk boundary operations.
//!
//! `DeskService` owns the resolved configuration and the open active store
//! and exposes the operations callers build on: submit, attach, update,
//! list, look up, summarize and settings maintenance. Every operation is a
//! bounded synchronous unit of work.

use std::path::Path;

use hrsd_local_db::{
    allocate_request_no, is_unique_violation, AttachmentRecord, AttachmentStore, Database,
    RequestRecord, RequestStore, SettingsRecord, SettingsStore,
};
use serde::Serialize;

use crate::config::DeskConfig;
use crate::request::{CreatedRequest, NewRequest, Request, RequestDetail};
use crate::routing::RoutingTable;
use crate::status::RequestStatus;

/// How many of the newest requests a dashboard shows.
const DASHBOARD_RECENT: i64 = 5;

/// Request count for one status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: RequestStatus,
    pub count: i64,
}

/// Request count for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Aggregate view over the active store.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total: i64,
    /// One entry per status in lifecycle order, zeroes included.
    pub by_status: Vec<StatusCount>,
    /// Busiest categories first.
    pub by_category: Vec<CategoryCount>,
    /// Newest submissions.
    pub recent: Vec<Request>,
}

/// The desk service over one resolved configuration.
pub struct DeskService {
    config: DeskConfig,
    routing: RoutingTable,
    db: Database,
}

impl DeskService {
    /// Open the desk with configuration resolved from the default
    /// bootstrap store.
    pub fn open_default() -> crate::Result<Self> {
        Self::open(DeskConfig::default_bootstrap_path()?)
    }

    /// Open the desk with configuration resolved from the bootstrap store
    /// at `bootstrap_path`.
    pub fn open<P: AsRef<Path>>(bootstrap_path: P) -> crate::Result<Self> {
        let config = DeskConfig::resolve(bootstrap_path.as_ref().to_path_buf())?;
        let db = Database::open(&config.active_path)?;
        Ok(Self {
            config,
            routing: RoutingTable::builtin(),
            db,
        })
    }

    /// Replace the routing table.
    pub fn with_routing(mut self, routing: RoutingTable) -> Self {
        self.routing = routing;
        self
    }

    /// The resolved configuration this desk operates under.
    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// The routing table in effect.
    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// Path of the store request data currently lives in.
    pub fn active_store_location(&self) -> &Path {
        &self.config.active_path
    }

    /// Submit a new request.
    ///
    /// The status is always `Submitted`, the assignee comes from the
    /// routing table and the number from the allocator. If the insert still
    /// trips the UNIQUE constraint, the allocator is consulted once more
    /// and the insert retried exactly once before giving up.
    pub fn create_request(&self, input: &NewRequest) -> crate::Result<CreatedRequest> {
        // The active store file may have been replaced since the open
        self.db.reconcile()?;

        let now = chrono::Utc::now().to_rfc3339();
        let assignee = self.routing.team_for(&input.category).to_string();
        let duration_days = input
            .duration_days
            .unwrap_or_else(|| self.routing.sla_days_for(&input.category));

        let conn = self.db.connection().lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })?;
        let store = RequestStore::new(&conn);

        let request_no = allocate_request_no(&store, &input.suggested_no)?;
        let record = Self::build_record(input, &request_no, &assignee, duration_days, &now);

        match store.insert(&record) {
            Ok(id) => {
                tracing::info!(request_no = %record.request_no, id, "Request created");
                Ok(CreatedRequest {
                    request_no: record.request_no,
                    id,
                })
            }
            Err(e) if is_unique_violation(&e) => {
                // Lost the race for this number; take a fresh one and retry
                tracing::warn!(
                    request_no = %record.request_no,
                    "Request number already taken, reallocating"
                );
                let retry_no = allocate_request_no(&store, &record.request_no)?;
                let retry = Self::build_record(input, &retry_no, &assignee, duration_days, &now);
                let id = store.insert(&retry)?;
                tracing::info!(request_no = %retry.request_no, id, "Request created after retry");
                Ok(CreatedRequest {
                    request_no: retry.request_no,
                    id,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn build_record(
        input: &NewRequest,
        request_no: &str,
        assignee: &str,
        duration_days: i64,
        now: &str,
    ) -> RequestRecord {
        RequestRecord {
            id: 0, // assigned by the store
            request_no: request_no.to_string(),
            employee_id: input.employee_id.trim().to_string(),
            employee_name: input.employee_name.trim().to_string(),
            cluster: input.cluster.trim().to_string(),
            department: input.department.trim().to_string(),
            category: input.category.trim().to_string(),
            request_type: input.request_type.trim().to_string(),
            details: input.details.trim().to_string(),
            status: RequestStatus::Submitted.as_str().to_string(),
            assignee: assignee.to_string(),
            duration_days,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Record an attachment against a request's internal id.
    ///
    /// The file itself is expected to be in place already; see
    /// [`DeskService::save_upload`].
    pub fn attach_file(
        &self,
        request_id: i64,
        filename: &str,
        stored_path: &str,
    ) -> crate::Result<i64> {
        // Re-check the schema here rather than trusting the capabilities
        // captured at open; the active store file may have been replaced.
        let capabilities = self.db.reconcile()?;

        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.db.connection().lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })?;
        let store = AttachmentStore::new(&conn);
        let id = store.insert(
            capabilities,
            &AttachmentRecord {
                id: 0,
                request_id,
                filename: filename.to_string(),
                stored_path: stored_path.to_string(),
                uploaded_at: now,
            },
        )?;
        Ok(id)
    }

    /// Save upload bytes into the configured upload directory, returning
    /// the stored path for [`DeskService::attach_file`].
    pub fn save_upload(
        &self,
        request_no: &str,
        filename: &str,
        bytes: &[u8],
    ) -> crate::Result<std::path::PathBuf> {
        crate::uploads::store_upload(&self.config.upload_dir, request_no, filename, bytes)
    }

    /// Update status and assignee of a request.
    ///
    /// An unknown request number is a silent no-op.
    pub fn update_status(
        &self,
        request_no: &str,
        status: RequestStatus,
        assignee: &str,
    ) -> crate::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.db.connection().lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })?;
        let store = RequestStore::new(&conn);
        let changed = store.update_status(request_no, status.as_str(), assignee, &now)?;
        if changed == 0 {
            tracing::debug!(request_no, "Status update matched no request");
        }
        Ok(())
    }

    /// All requests, newest first.
    pub fn list_requests(&self) -> crate::Result<Vec<Request>> {
        let conn = self.db.connection().lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })?;
        let store = RequestStore::new(&conn);

        let mut requests = Vec::new();
        for record in store.list()? {
            requests.push(Request::from_record(&record)?);
        }
        Ok(requests)
    }

    /// One request with its attachments, if it exists.
    pub fn get_request(&self, request_no: &str) -> crate::Result<Option<RequestDetail>> {
        let conn = self.db.connection().lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })?;
        let store = RequestStore::new(&conn);

        let record = match store.get_by_no(request_no)? {
            Some(record) => record,
            None => return Ok(None),
        };
        let attachments = AttachmentStore::new(&conn).list_for_request(record.id)?;
        Ok(Some(RequestDetail {
            request: Request::from_record(&record)?,
            attachments,
        }))
    }

    /// Aggregate volumes over the active store.
    pub fn dashboard(&self) -> crate::Result<DashboardSummary> {
        let conn = self.db.connection().lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })?;
        let store = RequestStore::new(&conn);

        let total = store.count()?;
        let raw_status = store.count_by_status()?;
        let by_status = RequestStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: raw_status
                    .iter()
                    .find(|(name, _)| name == status.as_str())
                    .map(|(_, count)| *count)
                    .unwrap_or(0),
            })
            .collect();
        let by_category = store
            .count_by_category()?
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();

        let mut recent = Vec::new();
        for record in store.recent(DASHBOARD_RECENT)? {
            recent.push(Request::from_record(&record)?);
        }

        Ok(DashboardSummary {
            total,
            by_status,
            by_category,
            recent,
        })
    }

    /// Current settings from the bootstrap store.
    pub fn settings(&self) -> crate::Result<SettingsRecord> {
        let bootstrap = Database::open(&self.config.bootstrap_path)?;
        let conn = bootstrap.connection().lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })?;
        let store = SettingsStore::new(&conn);
        Ok(store.load_or_init(&DeskConfig::default_settings(&self.config.bootstrap_path))?)
    }

    /// Write settings and re-resolve the configuration, reopening (and
    /// reconciling) whichever store the new settings make active.
    pub fn update_settings(&mut self, settings: &SettingsRecord) -> crate::Result<()> {
        {
            let bootstrap = Database::open(&self.config.bootstrap_path)?;
            let conn = bootstrap.connection().lock().map_err(|e| {
                crate::Error::generic(format!("Failed to acquire database lock: {}", e))
            })?;
            SettingsStore::new(&conn).upsert(settings)?;
        }
        self.reload()
    }

    /// Re-resolve configuration from the bootstrap store and reopen the
    /// active store.
    pub fn reload(&mut self) -> crate::Result<()> {
        self.config = DeskConfig::resolve(self.config.bootstrap_path.clone())?;
        self.db = Database::open(&self.config.active_path)?;
        Ok(())
    }
}
