use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{error, info};
use rusqlite::Connection;

use super::RecordStore;
use crate::error::{RecordResult, StorageContext};

/// Column names and order are shared with databases written by earlier
/// versions of the tool, so the table definition must stay as is.
const CREATE_STUDENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    age INTEGER,
    grade TEXT,
    email TEXT,
    phone TEXT,
    course TEXT
)";

impl RecordStore {
    /// Open (creating if needed) the database file at `path` and make sure
    /// the `students` table exists.
    pub fn open(path: &Path) -> RecordResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=db_open module=db status=start mode=file path={}",
            path.display()
        );

        let result = Self::open_file(path);
        match &result {
            Ok(_) => info!(
                "event=db_open module=db status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=db_open module=db status=error mode=file duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Private in-memory database with the same schema.
    pub fn open_in_memory() -> RecordResult<Self> {
        let conn = Connection::open_in_memory().storage_context("failed to open in-memory database")?;
        ensure_schema(&conn)?;
        info!("event=db_open module=db status=ok mode=memory");
        Ok(Self { conn })
    }

    /// Release the connection, surfacing any error SQLite reports while
    /// finalizing it.
    pub fn close(self) -> RecordResult<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .storage_context("failed to close database")?;
        info!("event=db_close module=db status=ok");
        Ok(())
    }

    fn open_file(path: &Path) -> RecordResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).storage_context("failed to create data directory")?;
            }
        }

        let conn = Connection::open(path).storage_context("failed to open SQLite database")?;
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn ensure_schema(conn: &Connection) -> RecordResult<()> {
    conn.execute(CREATE_STUDENTS_TABLE, [])
        .storage_context("failed to create students table")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_names(store: &RecordStore) -> Vec<String> {
        let mut stmt = store
            .conn
            .prepare("SELECT name FROM pragma_table_info('students') ORDER BY cid")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn schema_keeps_the_legacy_column_order() {
        let store = RecordStore::open_in_memory().unwrap();
        assert_eq!(
            column_names(&store),
            ["id", "name", "age", "grade", "email", "phone", "course"]
        );
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("students.db");

        let store = RecordStore::open(&path).unwrap();
        store.close().unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn open_fails_when_the_path_is_a_directory() {
        let dir = tempfile::tempdir().unwrap();

        let err = RecordStore::open(dir.path()).err().unwrap();

        assert!(err.is_fatal());
    }
}
