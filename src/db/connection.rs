//! Connection setup and table bootstrap for the embedded SQLite database.
//! Everything that has to happen before the first query lives here: the data
//! directory is created, the journal switched to WAL and the `students` table
//! prepared according to the configured `BootstrapMode`. Keeping the seed rows
//! next to the schema makes it obvious what a fresh install starts with.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::config::BootstrapMode;
use crate::error::{StoreError, StoreResult};
use crate::models::StudentName;

use super::students::insert_student;

/// Rows inserted whenever the table is (re)created.
const SEED_STUDENTS: [(&str, &str, &str); 5] = [
    ("Иванов", "Иван", "Иванович"),
    ("Петров", "Петр", "Петрович"),
    ("Сидоров", "Сидор", "Сидорович"),
    ("Кузнецов", "Кузьма", "Кузьмич"),
    ("Смирнов", "Сергей", "Сергеевич"),
];

/// Open the database file, creating its directory first, and switch the
/// journal to WAL.
pub fn open_connection(path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let conn = Connection::open(path)?;
    enable_wal(&conn)?;
    info!(path = %path.display(), "database opened");
    Ok(conn)
}

/// Request WAL journaling and return the mode SQLite actually applied.
/// In-memory databases answer `memory`.
pub fn enable_wal(conn: &Connection) -> StoreResult<String> {
    let mode = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
        row.get::<_, String>(0)
    })?;
    debug!(%mode, "journal mode set");
    Ok(mode)
}

/// Prepare the `students` table according to `mode`. Returns `true` when the
/// seed rows were inserted.
pub fn bootstrap(conn: &Connection, mode: BootstrapMode) -> StoreResult<bool> {
    match mode {
        BootstrapMode::ResetOnLaunch => {
            conn.execute("DROP TABLE IF EXISTS students", [])?;
            create_students_table(conn)?;
            seed_students(conn)?;
            info!("students table reset and seeded");
            Ok(true)
        }
        BootstrapMode::SeedOnCreate => {
            if students_table_exists(conn)? {
                debug!("students table already present, skipping seed");
                return Ok(false);
            }
            create_students_table(conn)?;
            seed_students(conn)?;
            info!("students table created and seeded");
            Ok(true)
        }
    }
}

fn create_students_table(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            lastName TEXT,
            firstName TEXT,
            middleName TEXT,
            addedTime TEXT
        )",
        [],
    )?;
    Ok(())
}

fn students_table_exists(conn: &Connection) -> StoreResult<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'students'
        )",
        [],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

fn seed_students(conn: &Connection) -> StoreResult<()> {
    for (last, first, middle) in SEED_STUDENTS {
        insert_student(conn, &StudentName::new(last, first, middle), &now_timestamp())?;
    }
    Ok(())
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::db::students::fetch_students;

    #[test]
    fn in_memory_store_reports_memory_journal() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(enable_wal(&conn).unwrap(), "memory");
    }

    #[test]
    fn first_bootstrap_seeds_five_rows() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(bootstrap(&conn, BootstrapMode::SeedOnCreate).unwrap());

        let students = fetch_students(&conn).unwrap();
        let ids: Vec<i64> = students.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(students[0].last_name, "Иванов");
        assert_eq!(students[4].middle_name, "Сергеевич");
    }

    #[test]
    fn seed_on_create_leaves_existing_table_alone() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn, BootstrapMode::SeedOnCreate).unwrap();
        conn.execute("DELETE FROM students", []).unwrap();

        assert!(!bootstrap(&conn, BootstrapMode::SeedOnCreate).unwrap());
        assert!(fetch_students(&conn).unwrap().is_empty());
    }

    #[test]
    fn reset_discards_rows_and_restarts_ids() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn, BootstrapMode::SeedOnCreate).unwrap();
        insert_student(&conn, &StudentName::new("A", "B", "C"), &now_timestamp()).unwrap();
        assert_eq!(fetch_students(&conn).unwrap().len(), 6);

        assert!(bootstrap(&conn, BootstrapMode::ResetOnLaunch).unwrap());
        let ids: Vec<i64> = fetch_students(&conn)
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn timestamps_are_rfc3339_with_millis() {
        let stamp = now_timestamp();
        assert!(stamp.ends_with('Z'));
        assert_eq!(stamp.len(), "2024-05-01T12:00:00.000Z".len());
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
