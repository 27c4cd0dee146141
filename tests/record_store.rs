use std::collections::HashSet;

use student_records::{RecordStore, StudentFields, StudentRecord};

fn fields(name: &str, age: i64, grade: &str, email: &str, phone: &str, course: &str) -> StudentFields {
    StudentFields {
        name: name.into(),
        age,
        grade: grade.into(),
        email: email.into(),
        phone: phone.into(),
        course: course.into(),
    }
}

fn roster() -> Vec<StudentFields> {
    vec![
        fields("Ann", 20, "A", "ann@x.com", "555", "CS"),
        fields("Bob", 22, "B", "bob@uni.edu", "", "Math"),
        fields("Cleo", 19, "A+", "cleo@x.com", "123", "Art History"),
        fields("Dmitri", 25, "", "dmitri@mail.ru", "", ""),
    ]
}

fn seeded() -> RecordStore {
    let store = RecordStore::open_in_memory().unwrap();
    for student in roster() {
        store.create(&student).unwrap();
    }
    store
}

fn ids(records: &[StudentRecord]) -> HashSet<i64> {
    records.iter().map(|record| record.id).collect()
}

#[test]
fn ann_lifecycle_scenario() {
    let store = RecordStore::open_in_memory().unwrap();
    let ann = fields("Ann", 20, "A", "ann@x.com", "555", "CS");

    let id = store.create(&ann).unwrap();
    assert_eq!(id, 1);
    assert_eq!(
        store.list_all().unwrap(),
        [StudentRecord::from_fields(1, ann.clone())]
    );

    let mut changed = ann;
    changed.course = "Math".into();
    store.update(1, &changed).unwrap();
    assert_eq!(store.list_all().unwrap()[0].course, "Math");

    store.delete(1).unwrap();
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn create_adds_exactly_one_matching_record() {
    let store = seeded();
    let before = store.list_all().unwrap();
    let new = fields("Eve", 30, "C", "eve@x.org", "9", "Law");

    let id = store.create(&new).unwrap();

    let after = store.list_all().unwrap();
    assert_eq!(after.len(), before.len() + 1);
    assert!(!ids(&before).contains(&id));
    assert_eq!(
        after.iter().filter(|record| record.id == id).collect::<Vec<_>>(),
        [&StudentRecord::from_fields(id, new)]
    );
}

#[test]
fn delete_removes_only_that_id() {
    let store = seeded();
    let before = store.list_all().unwrap();

    store.delete(2).unwrap();

    let after = store.list_all().unwrap();
    assert!(after.iter().all(|record| record.id != 2));
    assert_eq!(after.len(), before.len() - 1);

    store.delete(2).unwrap();
    assert_eq!(store.list_all().unwrap(), after);
}

#[test]
fn search_returns_exactly_the_matching_subset() {
    let store = seeded();
    let all = store.list_all().unwrap();

    assert_eq!(ids(&store.search("").unwrap()), ids(&all));

    for query in ["A", "x.com", "Math", "History", "dm", "555", "nobody", "a"] {
        let expected: Vec<StudentRecord> = all
            .iter()
            .filter(|record| {
                record.name.contains(query)
                    || record.grade.contains(query)
                    || record.course.contains(query)
                    || record.email.contains(query)
            })
            .cloned()
            .collect();
        assert_eq!(store.search(query).unwrap(), expected, "query {query:?}");
    }
}

#[test]
fn records_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.db");

    let store = RecordStore::open(&path).unwrap();
    store.create(&roster()[0]).unwrap();
    store.create(&roster()[1]).unwrap();
    store.delete(2).unwrap();
    store.close().unwrap();

    let store = RecordStore::open(&path).unwrap();
    let records = store.list_all().unwrap();
    assert_eq!(records, [StudentRecord::from_fields(1, roster()[0].clone())]);

    let id = store.create(&roster()[2]).unwrap();
    assert_eq!(id, 3);
}

#[test]
fn opens_databases_created_by_earlier_versions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT, age INTEGER, grade TEXT, email TEXT, phone TEXT, course TEXT
            );
            INSERT INTO students (name, age, grade, email, phone, course)
            VALUES ('Old Timer', 70, 'B', 'old@x.com', NULL, 'Latin');",
        )
        .unwrap();
    }

    let store = RecordStore::open(&path).unwrap();
    let records = store.list_all().unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Old Timer");
    assert_eq!(records[0].phone, "");
}
