//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing and handle the dual datetime
//! format (`SQLite`'s `datetime('now')` vs Rust's RFC 3339).

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};

use crate::error::DatabaseError;

/// Format a timestamp for storage.
///
/// Fixed microsecond precision keeps stored values lexicographically sortable.
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time truncated to the precision that is stored.
#[must_use]
pub fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a `YYYY-MM-DD` TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` on a malformed date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all fc-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Parse a JSON array TEXT column into a list of tags.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the column is not a JSON string array.
pub fn parse_tags(s: &str) -> Result<Vec<String>, DatabaseError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(s).map_err(|e| DatabaseError::Query(format!("Invalid tags JSON: {e}")))
}

/// `LIMIT` value for an optional cap. `-1` means unbounded in `SQLite`.
#[must_use]
pub fn sql_limit(limit: Option<u32>) -> i64 {
    limit.map_or(-1, i64::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fc_core::enums::BugStatus;

    #[test]
    fn parses_both_datetime_formats() {
        let rfc = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let sqlite = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(rfc, sqlite);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn formatted_datetime_roundtrips() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 14, 9, 5, 0).unwrap();
        let stored = format_datetime(&dt);
        assert_eq!(stored, "2026-03-14T09:05:00.000000Z");
        assert_eq!(parse_datetime(&stored).unwrap(), dt);
    }

    #[test]
    fn parses_snake_case_enum() {
        let status: BugStatus = parse_enum("in_progress").unwrap();
        assert_eq!(status, BugStatus::InProgress);
        assert!(parse_enum::<BugStatus>("wontfix").is_err());
    }

    #[test]
    fn empty_tags_column_is_empty_list() {
        assert!(parse_tags("").unwrap().is_empty());
        assert_eq!(parse_tags(r#"["ci","deploy"]"#).unwrap(), vec!["ci", "deploy"]);
        assert!(parse_tags("ci,deploy").is_err());
    }

    #[test]
    fn unbounded_limit() {
        assert_eq!(sql_limit(None), -1);
        assert_eq!(sql_limit(Some(5)), 5);
    }
}
