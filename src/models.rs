//! Domain models that mirror the `students` table. They stay plain data
//! holders so the store can focus on SQL and the UI on presentation.

use std::fmt;

/// Column headings of the record table, in schema order.
pub const COLUMN_TITLES: [&str; 7] = ["ID", "Name", "Age", "Grade", "Email", "Phone", "Course"];

/// Every mutable column of a student, i.e. a record without its id. This is
/// what validation produces and what create/update consume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFields {
    /// Display name, already trimmed and never empty.
    pub name: String,
    /// Whole years; validation only lets digit strings through so it is
    /// never negative.
    pub age: i64,
    /// Free text such as `A` or `B+`; may be empty.
    pub grade: String,
    /// Contact address in `local@domain.tld` shape.
    pub email: String,
    /// Free text; may be empty.
    pub phone: String,
    /// Free text; may be empty.
    pub course: String,
}

/// A persisted student row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    /// Primary key assigned by SQLite. Never reused after a delete.
    pub id: i64,
    /// Name shown in the table and in confirmation dialogs.
    pub name: String,
    /// Age in whole years. Rows written without an age read back as 0.
    pub age: i64,
    /// Grade text, searched together with name, course and email.
    pub grade: String,
    /// Email address, also searchable.
    pub email: String,
    /// Phone number. Not part of search.
    pub phone: String,
    /// Course name, searchable.
    pub course: String,
}

impl StudentRecord {
    /// Attach an id to a set of fields, typically right after an insert.
    pub fn from_fields(id: i64, fields: StudentFields) -> Self {
        let StudentFields {
            name,
            age,
            grade,
            email,
            phone,
            course,
        } = fields;
        Self {
            id,
            name,
            age,
            grade,
            email,
            phone,
            course,
        }
    }

    /// The record minus its id.
    pub fn fields(&self) -> StudentFields {
        StudentFields {
            name: self.name.clone(),
            age: self.age,
            grade: self.grade.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            course: self.course.clone(),
        }
    }

    /// Cell values in the same order as [`COLUMN_TITLES`].
    pub fn cells(&self) -> [String; 7] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.age.to_string(),
            self.grade.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.course.clone(),
        ]
    }
}

impl fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> StudentFields {
        StudentFields {
            name: "Ann".into(),
            age: 20,
            grade: "A".into(),
            email: "ann@x.com".into(),
            phone: "555".into(),
            course: "CS".into(),
        }
    }

    #[test]
    fn fields_drop_only_the_id() {
        let record = StudentRecord::from_fields(7, ann());
        assert_eq!(record.id, 7);
        assert_eq!(record.fields(), ann());
    }

    #[test]
    fn cells_follow_column_order() {
        let record = StudentRecord::from_fields(1, ann());
        assert_eq!(
            record.cells(),
            ["1", "Ann", "20", "A", "ann@x.com", "555", "CS"].map(String::from)
        );
        assert_eq!(COLUMN_TITLES.len(), record.cells().len());
    }

    #[test]
    fn display_names_the_student() {
        let record = StudentRecord::from_fields(3, ann());
        assert_eq!(record.to_string(), "Ann (#3)");
    }
}
