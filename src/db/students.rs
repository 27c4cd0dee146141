use log::{debug, info, warn};
use rusqlite::{params, Params, Row};

use super::RecordStore;
use crate::error::{RecordResult, StorageContext};
use crate::models::{StudentFields, StudentRecord};

/// Rows come back in insertion order; with `AUTOINCREMENT` that is id order.
const LIST_ALL: &str = "SELECT id, name, age, grade, email, phone, course
     FROM students
     ORDER BY id";

/// `instr` is a plain, case-sensitive substring test, so `%` and `_` in the
/// query match only themselves.
const SEARCH: &str = "SELECT id, name, age, grade, email, phone, course
     FROM students
     WHERE instr(COALESCE(name, ''), ?1) > 0
        OR instr(COALESCE(grade, ''), ?1) > 0
        OR instr(COALESCE(course, ''), ?1) > 0
        OR instr(COALESCE(email, ''), ?1) > 0
     ORDER BY id";

impl RecordStore {
    /// Insert a new student and return the id SQLite assigned to it.
    pub fn create(&self, fields: &StudentFields) -> RecordResult<i64> {
        self.conn
            .execute(
                "INSERT INTO students (name, age, grade, email, phone, course)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    fields.name,
                    fields.age,
                    fields.grade,
                    fields.email,
                    fields.phone,
                    fields.course
                ],
            )
            .storage_context("failed to insert student")?;

        let id = self.conn.last_insert_rowid();
        info!("event=student_create module=db status=ok id={id}");
        Ok(id)
    }

    /// Overwrite every mutable column of student `id`. Returns `false`, and
    /// changes nothing, when no such student exists.
    pub fn update(&self, id: i64, fields: &StudentFields) -> RecordResult<bool> {
        let updated = self
            .conn
            .execute(
                "UPDATE students
                 SET name = ?1, age = ?2, grade = ?3, email = ?4, phone = ?5, course = ?6
                 WHERE id = ?7",
                params![
                    fields.name,
                    fields.age,
                    fields.grade,
                    fields.email,
                    fields.phone,
                    fields.course,
                    id
                ],
            )
            .storage_context("failed to update student")?;

        if updated == 0 {
            warn!("event=student_update module=db status=noop id={id} reason=not_found");
        } else {
            info!("event=student_update module=db status=ok id={id}");
        }
        Ok(updated > 0)
    }

    /// Remove student `id`. Returns `false` when there was nothing to remove.
    pub fn delete(&self, id: i64) -> RecordResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1", params![id])
            .storage_context("failed to delete student")?;

        if deleted == 0 {
            warn!("event=student_delete module=db status=noop id={id} reason=not_found");
        } else {
            info!("event=student_delete module=db status=ok id={id}");
        }
        Ok(deleted > 0)
    }

    /// Every student in insertion order.
    pub fn list_all(&self) -> RecordResult<Vec<StudentRecord>> {
        self.query_students(LIST_ALL, [])
    }

    /// Students whose name, grade, course or email contains `query`. An
    /// empty query matches everyone.
    pub fn search(&self, query: &str) -> RecordResult<Vec<StudentRecord>> {
        if query.is_empty() {
            return self.list_all();
        }
        let students = self.query_students(SEARCH, params![query])?;
        debug!(
            "event=student_search module=db status=ok query_len={} matches={}",
            query.chars().count(),
            students.len()
        );
        Ok(students)
    }

    /// Run a student `SELECT` and map each row through [`student_from_row`].
    fn query_students<P: Params>(&self, sql: &str, params: P) -> RecordResult<Vec<StudentRecord>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .storage_context("failed to prepare student query")?;

        let students = stmt
            .query_map(params, student_from_row)
            .storage_context("failed to load students")?
            .collect::<Result<Vec<_>, _>>()
            .storage_context("failed to collect students")?;

        Ok(students)
    }
}

/// Databases written by older versions may hold NULLs in any column but the
/// id; they read back as empty text and age 0.
fn student_from_row(row: &Row<'_>) -> rusqlite::Result<StudentRecord> {
    Ok(StudentRecord {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        age: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
        grade: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        email: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        phone: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        course: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}
