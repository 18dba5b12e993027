//! Marker store implementations: SQLite-backed and in-memory.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::traits::MarkerStore;
use crate::db::{self, DatabaseError};
use crate::models::{ExtractedParameter, MarkerRecord, StoredMarker};

/// SQLite-backed marker store. Owns its connection; writes serialize on the lock.
pub struct SqliteMarkerStore {
    conn: Mutex<Connection>,
}

impl SqliteMarkerStore {
    /// Open (or create) the database at `path`, running migrations.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "Marker store opened");
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(db::open_memory_database()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

impl MarkerStore for SqliteMarkerStore {
    fn save(
        &self,
        record: &MarkerRecord,
        parameters: &BTreeMap<String, ExtractedParameter>,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn()?;
        db::upsert_marker_record(&conn, record, parameters)
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<MarkerRecord>, DatabaseError> {
        let conn = self.conn()?;
        db::get_marker_records_by_user(&conn, user_id)
    }

    fn latest_for_user(&self, user_id: &str) -> Result<Option<MarkerRecord>, DatabaseError> {
        let conn = self.conn()?;
        db::get_latest_marker_record(&conn, user_id)
    }

    fn report_markers(&self, report_id: &str) -> Result<Vec<StoredMarker>, DatabaseError> {
        let conn = self.conn()?;
        db::get_marker_values(&conn, report_id)
    }
}

/// Process-local store. Used by tests and by the CLI when no database is wanted.
#[derive(Default)]
pub struct InMemoryMarkerStore {
    entries: Mutex<Vec<(MarkerRecord, Vec<StoredMarker>)>>,
}

impl InMemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, Vec<(MarkerRecord, Vec<StoredMarker>)>>, DatabaseError> {
        self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

impl MarkerStore for InMemoryMarkerStore {
    fn save(
        &self,
        record: &MarkerRecord,
        parameters: &BTreeMap<String, ExtractedParameter>,
    ) -> Result<(), DatabaseError> {
        let markers = parameters
            .iter()
            .map(|(key, p)| StoredMarker {
                report_id: record.report_id.clone(),
                analyte_key: key.clone(),
                value: p.value,
                unit: p.unit.clone(),
                confidence: p.confidence,
                status: p.status,
            })
            .collect();

        let mut entries = self.entries()?;
        let owned_elsewhere = entries
            .iter()
            .any(|(r, _)| r.report_id == record.report_id && r.user_id != record.user_id);
        if owned_elsewhere {
            return Err(DatabaseError::ReportOwnedByOtherUser {
                report_id: record.report_id.clone(),
            });
        }
        entries.retain(|(r, _)| r.report_id != record.report_id);
        entries.push((record.clone(), markers));
        Ok(())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<MarkerRecord>, DatabaseError> {
        let entries = self.entries()?;
        let mut records: Vec<MarkerRecord> = entries
            .iter()
            .filter(|(r, _)| r.user_id == user_id)
            .map(|(r, _)| r.clone())
            .collect();
        records.sort_by(|a, b| {
            b.last_updated
                .cmp(&a.last_updated)
                .then_with(|| b.report_id.cmp(&a.report_id))
        });
        Ok(records)
    }

    fn latest_for_user(&self, user_id: &str) -> Result<Option<MarkerRecord>, DatabaseError> {
        Ok(self.list_for_user(user_id)?.into_iter().next())
    }

    fn report_markers(&self, report_id: &str) -> Result<Vec<StoredMarker>, DatabaseError> {
        let entries = self.entries()?;
        Ok(entries
            .iter()
            .find(|(r, _)| r.report_id == report_id)
            .map(|(_, markers)| markers.clone())
            .unwrap_or_default())
    }
}
