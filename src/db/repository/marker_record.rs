use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

/// Insert or replace a marker record and its per-marker detail.
///
/// A report id already stored for a different user is refused, leaving that
/// user's record untouched.
pub fn upsert_marker_record(
    conn: &Connection,
    record: &MarkerRecord,
    parameters: &BTreeMap<String, ExtractedParameter>,
) -> Result<(), DatabaseError> {
    let markers_json = serde_json::to_string(&record.markers)?;
    let tx = conn.unchecked_transaction()?;

    let owner: Option<String> = tx
        .query_row(
            "SELECT user_id FROM marker_records WHERE report_id = ?1",
            params![record.report_id],
            |row| row.get(0),
        )
        .optional()?;
    if owner.is_some_and(|owner| owner != record.user_id) {
        return Err(DatabaseError::ReportOwnedByOtherUser {
            report_id: record.report_id.clone(),
        });
    }

    // A re-uploaded report replaces its previous record and detail rows.
    tx.execute(
        "DELETE FROM marker_values WHERE report_id = ?1",
        params![record.report_id],
    )?;
    tx.execute(
        "DELETE FROM marker_records WHERE report_id = ?1 AND user_id = ?2",
        params![record.report_id, record.user_id],
    )?;

    tx.execute(
        "INSERT INTO marker_records
         (report_id, user_id, markers_json, last_updated, source, report_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.report_id,
            record.user_id,
            markers_json,
            format_timestamp(&record.last_updated),
            record.source,
            record.report_date.to_string(),
        ],
    )?;

    for (key, p) in parameters {
        tx.execute(
            "INSERT INTO marker_values
             (report_id, analyte_key, value, unit, confidence, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.report_id,
                key,
                p.value,
                p.unit,
                f64::from(p.confidence),
                p.status.as_str(),
            ],
        )?;
    }

    tx.commit()?;
    Ok(())
}

pub fn get_marker_records_by_user(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<MarkerRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT report_id, user_id, markers_json, last_updated, source, report_date
         FROM marker_records WHERE user_id = ?1
         ORDER BY last_updated DESC, report_id DESC",
    )?;

    let rows = stmt.query_map(params![user_id], |row| Ok(record_row_from_rusqlite(row)))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(record_from_row(row??)?);
    }
    Ok(records)
}

pub fn get_latest_marker_record(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<MarkerRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT report_id, user_id, markers_json, last_updated, source, report_date
         FROM marker_records WHERE user_id = ?1
         ORDER BY last_updated DESC, report_id DESC LIMIT 1",
    )?;

    let mut rows = stmt.query_map(params![user_id], |row| Ok(record_row_from_rusqlite(row)))?;
    match rows.next() {
        Some(row) => Ok(Some(record_from_row(row??)?)),
        None => Ok(None),
    }
}

pub fn get_marker_values(
    conn: &Connection,
    report_id: &str,
) -> Result<Vec<StoredMarker>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT report_id, analyte_key, value, unit, confidence, status
         FROM marker_values WHERE report_id = ?1 ORDER BY analyte_key",
    )?;

    let rows = stmt.query_map(params![report_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, f64>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, f64>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut markers = Vec::new();
    for row in rows {
        let (report_id, analyte_key, value, unit, confidence, status) = row?;
        markers.push(StoredMarker {
            report_id,
            analyte_key,
            value,
            unit,
            confidence: confidence as f32,
            status: MarkerStatus::from_str(&status)?,
        });
    }
    Ok(markers)
}

/// Fixed-width RFC 3339 so text ordering matches time ordering.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// Internal row type for MarkerRecord mapping
struct RecordRow {
    report_id: String,
    user_id: String,
    markers_json: String,
    last_updated: String,
    source: String,
    report_date: String,
}

fn record_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<RecordRow, rusqlite::Error> {
    Ok(RecordRow {
        report_id: row.get(0)?,
        user_id: row.get(1)?,
        markers_json: row.get(2)?,
        last_updated: row.get(3)?,
        source: row.get(4)?,
        report_date: row.get(5)?,
    })
}

fn record_from_row(row: RecordRow) -> Result<MarkerRecord, DatabaseError> {
    Ok(MarkerRecord {
        markers: serde_json::from_str(&row.markers_json)?,
        last_updated: DateTime::parse_from_rfc3339(&row.last_updated)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?
            .with_timezone(&Utc),
        report_date: NaiveDate::parse_from_str(&row.report_date, "%Y-%m-%d")
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        report_id: row.report_id,
        user_id: row.user_id,
        source: row.source,
    })
}
