//! Database schema definitions and constants.

// Table names
pub const TABLE_REQUESTS: &str = "requests";
pub const TABLE_ATTACHMENTS: &str = "attachments";
pub const TABLE_SETTINGS: &str = "settings";

// Column names for requests table
pub mod requests {
    pub const ID: &str = "id";
    pub const REQUEST_NO: &str = "request_no";
    pub const EMPLOYEE_ID: &str = "employee_id";
    pub const EMPLOYEE_NAME: &str = "employee_name";
    pub const CLUSTER: &str = "cluster";
    pub const DEPARTMENT: &str = "department";
    pub const CATEGORY: &str = "category";
    pub const REQUEST_TYPE: &str = "request_type";
    pub const DETAILS: &str = "details";
    pub const STATUS: &str = "status";
    pub const ASSIGNEE: &str = "assignee";
    pub const DURATION_DAYS: &str = "duration_days";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
}

// Column names for attachments table
pub mod attachments {
    pub const ID: &str = "id";
    pub const REQUEST_ID: &str = "request_id";
    pub const FILENAME: &str = "filename";
    pub const STORED_PATH: &str = "stored_path";
    /// Storage-location column name used before the `stored_path` rename.
    /// Still present in stores created by older releases.
    pub const LEGACY_PATH: &str = "path";
    pub const UPLOADED_AT: &str = "uploaded_at";
}

// Column names for settings table
pub mod settings {
    pub const ID: &str = "id";
    pub const COMPANY_NAME: &str = "company_name";
    pub const COMPANY_DB_PATH: &str = "company_db_path";
    pub const UPLOAD_FOLDER: &str = "upload_folder";

    /// The settings table holds exactly one row under this id.
    pub const SINGLETON_ID: i64 = 1;
}

/// Columns added to the baseline tables since the first release, as
/// `(table, column, type)` triples. The reconciler patches older stores up
/// to this set; columns it does not know about are left alone.
pub const EXPECTED_COLUMNS: &[(&str, &str, &str)] = &[
    (TABLE_REQUESTS, requests::CLUSTER, "TEXT"),
    (TABLE_REQUESTS, requests::ASSIGNEE, "TEXT"),
    (TABLE_REQUESTS, requests::DURATION_DAYS, "INTEGER"),
    (TABLE_REQUESTS, requests::UPDATED_AT, "TEXT"),
    (TABLE_ATTACHMENTS, attachments::STORED_PATH, "TEXT"),
    (TABLE_ATTACHMENTS, attachments::UPLOADED_AT, "TEXT"),
];
