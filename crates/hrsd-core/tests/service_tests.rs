//! Tests for the desk boundary operations.
//!
//! These drive the service the way a caller would: resolve configuration
//! from a bootstrap store in a temp directory, submit requests, attach
//! files, update statuses and read the results back.

use rusqlite::Connection;
use tempfile::TempDir;

use hrsd_core::{DeskService, NewRequest, RequestStatus, SettingsRecord};

fn desk_in(dir: &TempDir) -> DeskService {
    DeskService::open(dir.path().join("desk.db")).expect("open desk")
}

fn submission(category: &str) -> NewRequest {
    NewRequest {
        suggested_no: String::new(),
        employee_id: "E2001".to_string(),
        employee_name: "Noura".to_string(),
        cluster: "Riyadh".to_string(),
        department: "Operations".to_string(),
        category: category.to_string(),
        request_type: "General".to_string(),
        details: "Details go here".to_string(),
        duration_days: None,
    }
}

#[test]
fn submission_gets_status_assignee_and_duration() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    let created = desk
        .create_request(&submission("الدعم التقني"))
        .expect("create request");
    assert_eq!(created.request_no, "1");
    assert!(created.id > 0);

    let detail = desk
        .get_request(&created.request_no)
        .expect("get request")
        .expect("present");
    assert_eq!(detail.request.status, RequestStatus::Submitted);
    assert_eq!(detail.request.assignee, "IT Support");
    assert_eq!(detail.request.duration_days, 1);
    assert_eq!(detail.request.created_at, detail.request.updated_at);
}

#[test]
fn unknown_category_still_succeeds_with_empty_assignee() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    let created = desk
        .create_request(&submission("unknown-category"))
        .expect("create request");
    let detail = desk
        .get_request(&created.request_no)
        .expect("get request")
        .expect("present");
    assert_eq!(detail.request.assignee, "");
    assert_eq!(detail.request.duration_days, hrsd_core::DEFAULT_SLA_DAYS);
}

#[test]
fn caller_supplied_duration_wins_over_the_routed_one() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    let mut input = submission("الدعم التقني");
    input.duration_days = Some(10);
    let created = desk.create_request(&input).expect("create request");
    let detail = desk
        .get_request(&created.request_no)
        .expect("get request")
        .expect("present");
    assert_eq!(detail.request.duration_days, 10);
}

#[test]
fn numbers_continue_from_the_highest_numeric_identifier() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    for suggestion in ["3", "10", "7x"] {
        let mut input = submission("التأمين الطبي");
        input.suggested_no = suggestion.to_string();
        let created = desk.create_request(&input).expect("create request");
        assert_eq!(created.request_no, suggestion);
    }

    let created = desk
        .create_request(&submission("التأمين الطبي"))
        .expect("create request");
    assert_eq!(created.request_no, "11");
}

#[test]
fn taken_suggestion_gets_a_suffix() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    let mut input = submission("الدعم التقني");
    input.suggested_no = "42".to_string();
    assert_eq!(desk.create_request(&input).expect("create").request_no, "42");
    assert_eq!(desk.create_request(&input).expect("create").request_no, "42-1");
    assert_eq!(desk.create_request(&input).expect("create").request_no, "42-2");
}

#[test]
fn racing_writer_triggers_one_reallocation() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    // Simulate a second writer grabbing the freshly allocated number in the
    // window between the availability check and the insert.
    let raw = Connection::open(desk.active_store_location()).expect("open raw store");
    raw.execute_batch(
        r#"
        CREATE TRIGGER steal_number BEFORE INSERT ON requests
        WHEN NEW.request_no = '1'
        BEGIN
            INSERT INTO requests
                (request_no, employee_id, employee_name, category, status,
                 created_at, updated_at)
            VALUES
                ('1', 'E-RACE', 'Racer', 'x', 'Submitted',
                 '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00');
        END;
        "#,
    )
    .expect("install trigger");

    let created = desk
        .create_request(&submission("الدعم التقني"))
        .expect("create request survives one conflict");
    assert_eq!(created.request_no, "1-1");

    let racer = desk.get_request("1").expect("get").expect("racer row kept");
    assert_eq!(racer.request.employee_id, "E-RACE");
}

#[test]
fn second_conflict_aborts_the_submission() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    let raw = Connection::open(desk.active_store_location()).expect("open raw store");
    raw.execute_batch(
        r#"
        CREATE TRIGGER steal_every_number BEFORE INSERT ON requests
        WHEN NEW.request_no IN ('7', '7-1') AND NEW.employee_id != 'E-RACE'
        BEGIN
            INSERT INTO requests
                (request_no, employee_id, employee_name, category, status,
                 created_at, updated_at)
            VALUES
                (NEW.request_no, 'E-RACE', 'Racer', 'x', 'Submitted',
                 '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00');
        END;
        "#,
    )
    .expect("install trigger");

    let mut input = submission("الدعم التقني");
    input.suggested_no = "7".to_string();
    let err = desk.create_request(&input).expect_err("retry budget exhausted");
    assert!(matches!(err, hrsd_core::Error::Database(_)));
}

#[test]
fn list_is_newest_first() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    let first = desk.create_request(&submission("الدعم التقني")).expect("create");
    let second = desk.create_request(&submission("التأمين الطبي")).expect("create");

    let listed = desk.list_requests().expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].request_no, second.request_no);
    assert_eq!(listed[1].request_no, first.request_no);
}

#[test]
fn status_updates_touch_only_existing_requests() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    let created = desk.create_request(&submission("الدعم التقني")).expect("create");
    desk.update_status(&created.request_no, RequestStatus::InProgress, "Omar")
        .expect("update");

    let detail = desk
        .get_request(&created.request_no)
        .expect("get")
        .expect("present");
    assert_eq!(detail.request.status, RequestStatus::InProgress);
    assert_eq!(detail.request.assignee, "Omar");
    assert!(detail.request.updated_at >= detail.request.created_at);

    // Unknown numbers are a silent no-op
    desk.update_status("no-such-request", RequestStatus::Completed, "")
        .expect("no-op update");
    assert!(desk.get_request("no-such-request").expect("get").is_none());
}

#[test]
fn uploads_are_saved_and_recorded() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    let created = desk.create_request(&submission("المستندات والخطابات")).expect("create");
    let stored = desk
        .save_upload(&created.request_no, "employment letter.pdf", b"%PDF-1.4")
        .expect("save upload");
    assert!(stored.starts_with(&desk.config().upload_dir));

    desk.attach_file(created.id, "employment letter.pdf", &stored.to_string_lossy())
        .expect("attach");

    let detail = desk
        .get_request(&created.request_no)
        .expect("get")
        .expect("present");
    assert_eq!(detail.attachments.len(), 1);
    assert_eq!(detail.attachments[0].filename, "employment letter.pdf");
    assert_eq!(detail.attachments[0].stored_path, stored.to_string_lossy());
}

#[test]
fn settings_override_moves_the_active_store() {
    let dir = TempDir::new().expect("create temp dir");
    let bootstrap = dir.path().join("desk.db");
    let mut desk = DeskService::open(&bootstrap).expect("open desk");
    assert_eq!(desk.active_store_location(), bootstrap);

    let live = dir.path().join("data").join("live.db");
    desk.update_settings(&SettingsRecord {
        company_name: "Absher Services".to_string(),
        company_db_path: live.to_string_lossy().to_string(),
        upload_folder: String::new(),
    })
    .expect("update settings");

    assert_eq!(desk.active_store_location(), live);
    assert_eq!(desk.config().company_name, "Absher Services");

    let created = desk.create_request(&submission("الدعم التقني")).expect("create");
    assert_eq!(created.request_no, "1");

    // The row landed in the override store, not the bootstrap one
    let raw = Connection::open(&live).expect("open raw store");
    let count: i64 = raw
        .query_row("SELECT COUNT(*) FROM requests", [], |row| row.get(0))
        .expect("count");
    assert_eq!(count, 1);

    let raw_bootstrap = Connection::open(&bootstrap).expect("open raw store");
    let count: i64 = raw_bootstrap
        .query_row("SELECT COUNT(*) FROM requests", [], |row| row.get(0))
        .expect("count");
    assert_eq!(count, 0);

    // Settings read back the stored values
    let settings = desk.settings().expect("settings");
    assert_eq!(settings.company_name, "Absher Services");
}

#[test]
fn dashboard_summarizes_volumes() {
    let dir = TempDir::new().expect("create temp dir");
    let desk = desk_in(&dir);

    desk.create_request(&submission("الدعم التقني")).expect("create");
    desk.create_request(&submission("الدعم التقني")).expect("create");
    let third = desk.create_request(&submission("mystery")).expect("create");
    desk.update_status(&third.request_no, RequestStatus::Completed, "Closer")
        .expect("update");

    let dashboard = desk.dashboard().expect("dashboard");
    assert_eq!(dashboard.total, 3);

    let submitted = dashboard
        .by_status
        .iter()
        .find(|c| c.status == RequestStatus::Submitted)
        .expect("submitted bucket");
    assert_eq!(submitted.count, 2);
    let rejected = dashboard
        .by_status
        .iter()
        .find(|c| c.status == RequestStatus::Rejected)
        .expect("rejected bucket");
    assert_eq!(rejected.count, 0);

    assert_eq!(dashboard.by_category[0].category, "الدعم التقني");
    assert_eq!(dashboard.by_category[0].count, 2);
    assert_eq!(dashboard.recent.len(), 3);
}
