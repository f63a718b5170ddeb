//! The repository is the only way the rest of the application touches the
//! store. It owns the connection, composes the per-statement helpers into the
//! record operations the UI needs and logs every mutation. Operations return
//! `StoreResult` and never panic; a missing row is reported as `Ok(false)` or
//! `Ok(None)` so callers can tell "nothing to do" apart from a failed statement.

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::config::BootstrapMode;
use crate::error::StoreResult;
use crate::models::{StudentName, StudentRecord};

use super::connection::{bootstrap, enable_wal, now_timestamp, open_connection};
use super::students::{
    delete_student, fetch_last_student, fetch_students, insert_student, update_student,
};

/// Owns the single SQLite connection and exposes the record operations. All
/// calls run sequentially on the caller's thread.
pub struct StudentRepository {
    conn: Connection,
}

impl StudentRepository {
    /// Open (or create) the database at `path` and bootstrap the table.
    pub fn open(path: impl AsRef<Path>, mode: BootstrapMode) -> StoreResult<Self> {
        let conn = open_connection(path.as_ref())?;
        Self::with_connection(conn, mode)
    }

    pub fn open_in_memory(mode: BootstrapMode) -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        enable_wal(&conn)?;
        Self::with_connection(conn, mode)
    }

    fn with_connection(conn: Connection, mode: BootstrapMode) -> StoreResult<Self> {
        bootstrap(&conn, mode)?;
        Ok(Self { conn })
    }

    pub fn list_all(&self) -> StoreResult<Vec<StudentRecord>> {
        let students = fetch_students(&self.conn)?;
        debug!(count = students.len(), "loaded students");
        Ok(students)
    }

    /// Insert a student stamped with the current time. Blank names are
    /// accepted here; validation is the form's job.
    pub fn create(&self, name: &StudentName) -> StoreResult<StudentRecord> {
        let record = insert_student(&self.conn, name, &now_timestamp())?;
        info!(id = record.id, name = %name, "student added");
        Ok(record)
    }

    /// Overwrite the name fields of `id`. `Ok(false)` means no such row and
    /// nothing changed.
    pub fn update_by_id(&self, id: i64, name: &StudentName) -> StoreResult<bool> {
        let updated = update_student(&self.conn, id, name)? > 0;
        if updated {
            info!(id, name = %name, "student updated");
        } else {
            warn!(id, "update skipped, no such student");
        }
        Ok(updated)
    }

    /// `Ok(false)` means no such row.
    pub fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        let deleted = delete_student(&self.conn, id)? > 0;
        if deleted {
            info!(id, "student deleted");
        } else {
            warn!(id, "delete skipped, no such student");
        }
        Ok(deleted)
    }

    /// The most recently added student (highest id).
    pub fn last_added(&self) -> StoreResult<Option<StudentRecord>> {
        fetch_last_student(&self.conn)
    }

    /// Rename the most recently added student to the fixed identity. Returns
    /// the renamed record, or `None` when the table is empty.
    pub fn replace_last_with_fixed_identity(&self) -> StoreResult<Option<StudentRecord>> {
        let Some(last) = self.last_added()? else {
            info!("no students found to update");
            return Ok(None);
        };

        let name = StudentName::fixed_identity();
        if !self.update_by_id(last.id, &name)? {
            return Ok(None);
        }

        Ok(Some(StudentRecord {
            last_name: name.last,
            first_name: name.first,
            middle_name: name.middle,
            ..last
        }))
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}
