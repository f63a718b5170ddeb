//! Queries against the `students` table. Each function wraps exactly one
//! parameterized statement and takes a borrowed connection, so the repository
//! decides ownership and logging while this file stays a thin, easily audited
//! mapping between SQL rows and `StudentRecord`.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::StoreResult;
use crate::models::{StudentName, StudentRecord};

const STUDENT_COLUMNS: &str = "id, lastName, firstName, middleName, addedTime";

/// Every student in id order, which is also insertion order.
pub fn fetch_students(conn: &Connection) -> StoreResult<Vec<StudentRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id"
    ))?;

    let students = stmt
        .query_map([], student_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(students)
}

/// The row with the highest id, if any.
pub fn fetch_last_student(conn: &Connection) -> StoreResult<Option<StudentRecord>> {
    let student = conn
        .query_row(
            &format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY id DESC LIMIT 1"),
            [],
            student_from_row,
        )
        .optional()?;
    Ok(student)
}

/// Insert a student and echo the hydrated record so callers see the id the
/// store assigned.
pub fn insert_student(
    conn: &Connection,
    name: &StudentName,
    added_time: &str,
) -> StoreResult<StudentRecord> {
    conn.execute(
        "INSERT INTO students (lastName, firstName, middleName, addedTime)
         VALUES (?1, ?2, ?3, ?4)",
        params![name.last, name.first, name.middle, added_time],
    )?;

    Ok(StudentRecord {
        id: conn.last_insert_rowid(),
        last_name: name.last.clone(),
        first_name: name.first.clone(),
        middle_name: name.middle.clone(),
        added_time: added_time.to_string(),
    })
}

/// Overwrite the three name fields. Returns the number of rows touched.
pub fn update_student(conn: &Connection, id: i64, name: &StudentName) -> StoreResult<usize> {
    let updated = conn.execute(
        "UPDATE students SET lastName = ?1, firstName = ?2, middleName = ?3 WHERE id = ?4",
        params![name.last, name.first, name.middle, id],
    )?;
    Ok(updated)
}

/// Returns the number of rows removed.
pub fn delete_student(conn: &Connection, id: i64) -> StoreResult<usize> {
    let deleted = conn.execute("DELETE FROM students WHERE id = ?1", params![id])?;
    Ok(deleted)
}

// The columns are nullable, so a NULL reads back as an empty string.
fn student_from_row(row: &Row<'_>) -> rusqlite::Result<StudentRecord> {
    Ok(StudentRecord {
        id: row.get(0)?,
        last_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        first_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        middle_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        added_time: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}
