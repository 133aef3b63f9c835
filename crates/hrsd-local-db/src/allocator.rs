//! Request number allocation.
//!
//! External request numbers are plain decimal strings by default. A fresh
//! number comes from scanning what the store already holds rather than from
//! a counter table, so hand-entered and imported identifiers participate
//! naturally. The check-then-insert sequence is not atomic; the UNIQUE
//! constraint on the column stays the authoritative guard and callers retry
//! once when an insert trips it.

use crate::models::RequestStore;

/// Allocate a request number, honoring `suggestion` when possible.
///
/// An empty suggestion yields the smallest decimal number greater than every
/// stored leading digit run. A suggestion already in use gains the first
/// free `-1`, `-2`, ... suffix; an unused one is returned unchanged.
pub fn allocate_request_no(store: &RequestStore<'_>, suggestion: &str) -> crate::Result<String> {
    let suggestion = suggestion.trim();
    if suggestion.is_empty() {
        return next_numeric(store);
    }
    if !store.exists(suggestion)? {
        return Ok(suggestion.to_string());
    }
    let mut n: u64 = 1;
    loop {
        let candidate = format!("{}-{}", suggestion, n);
        if !store.exists(&candidate)? {
            return Ok(candidate);
        }
        n += 1;
    }
}

/// Returns true when `err` is the UNIQUE-constraint violation raised by a
/// duplicate request number racing past the pre-insert existence check.
pub fn is_unique_violation(err: &crate::Error) -> bool {
    matches!(
        err,
        crate::Error::Database(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn next_numeric(store: &RequestStore<'_>) -> crate::Result<String> {
    let mut max: u128 = 0;
    for number in store.request_nos()? {
        if let Some(value) = leading_number(&number) {
            max = max.max(value);
        }
    }
    Ok((max + 1).to_string())
}

/// Leading decimal digit run of `s`, if any. Identifiers that do not start
/// with a digit are ignored by the numeric scan.
fn leading_number(s: &str) -> Option<u128> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
