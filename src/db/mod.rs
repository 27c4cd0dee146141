//! Persistence for student records, split into connection bootstrap and the
//! CRUD/search queries.

use rusqlite::Connection;

mod connection;
mod students;

/// Owned handle to the `students` table. There is exactly one per process;
/// the controller holds it for the whole session and [`RecordStore::close`]
/// releases it on shutdown.
pub struct RecordStore {
    conn: Connection,
}
