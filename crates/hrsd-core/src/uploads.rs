//! Upload acceptance rules and file placement.
//!
//! Attachment bytes land in the configured upload directory under a name
//! derived from the request number and a sanitized copy of the submitted
//! filename. Acceptance is by extension only; content inspection is not
//! this layer's job.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File extensions accepted for attachments.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "png", "jpg", "jpeg", "doc", "docx", "xlsx", "xls", "zip",
];

/// Whether `filename` carries an accepted extension.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Reduce `filename` to a safe single path component.
///
/// Directory parts are dropped, whitespace runs become one underscore, and
/// anything outside `A-Za-z0-9._-` is removed. Leading dots and
/// underscores are stripped so the result never hides as a dotfile. May
/// return an empty string when nothing safe remains.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or("");
    let mut out = String::with_capacity(base.len());
    let mut pending_separator = false;
    for c in base.chars() {
        if c.is_whitespace() {
            pending_separator = !out.is_empty();
            continue;
        }
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            if pending_separator {
                out.push('_');
                pending_separator = false;
            }
            out.push(c);
        }
    }
    out.trim_start_matches(|c| c == '.' || c == '_').to_string()
}

/// Persist upload bytes for `request_no`, returning the stored path.
///
/// The original filename must pass [`allowed_file`]; the stored name is
/// `<request_no>_<sanitized filename>` inside `upload_dir`.
pub fn store_upload(
    upload_dir: &Path,
    request_no: &str,
    filename: &str,
    bytes: &[u8],
) -> crate::Result<PathBuf> {
    if !allowed_file(filename) {
        return Err(crate::Error::upload(format!(
            "File type not allowed: {}",
            filename
        )));
    }

    let mut safe = sanitize_filename(filename);
    if safe.is_empty() {
        safe = "file".to_string();
    }
    let mut prefix = sanitize_filename(request_no);
    if prefix.is_empty() {
        prefix = "req".to_string();
    }

    fs::create_dir_all(upload_dir)?;
    let path = upload_dir.join(format!("{}_{}", prefix, safe));
    let mut file = fs::File::create(&path)?;
    file.write_all(bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn extension_filter() {
        assert!(allowed_file("contract.pdf"));
        assert!(allowed_file("SCAN.JPG"));
        assert!(allowed_file("archive.tar.zip"));
        assert!(!allowed_file("script.sh"));
        assert!(!allowed_file("noextension"));
        assert!(!allowed_file("trailing."));
    }

    #[test]
    fn sanitization_drops_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("form.pdf"), "form.pdf");
        assert_eq!(sanitize_filename("my scan (1).png"), "my_scan_1.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        // Non-Latin names keep only the extension
        assert_eq!(sanitize_filename("عقد العمل.pdf"), "pdf");
    }

    #[test]
    fn stored_name_combines_request_no_and_filename() {
        let dir = TempDir::new().expect("create temp dir");
        let path = store_upload(dir.path(), "42-1", "offer letter.pdf", b"%PDF-1.4")
            .expect("store upload");
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("42-1_offer_letter.pdf")
        );
        assert_eq!(fs::read(&path).expect("read back"), b"%PDF-1.4");
    }

    #[test]
    fn disallowed_type_is_rejected() {
        let dir = TempDir::new().expect("create temp dir");
        let err = store_upload(dir.path(), "1", "malware.exe", b"MZ").expect_err("reject");
        assert!(matches!(err, crate::Error::Upload { .. }));
    }
}
