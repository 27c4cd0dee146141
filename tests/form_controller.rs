use student_records::{
    FormController, RecordError, RecordStore, SelectionError, StagedFields, ValidationError,
};

fn controller() -> FormController {
    FormController::new(RecordStore::open_in_memory().unwrap()).unwrap()
}

fn staged(name: &str, age: &str, grade: &str, email: &str, phone: &str, course: &str) -> StagedFields {
    StagedFields {
        name: name.into(),
        age: age.into(),
        grade: grade.into(),
        email: email.into(),
        phone: phone.into(),
        course: course.into(),
    }
}

#[test]
fn add_update_delete_through_the_form() {
    let mut controller = controller();

    *controller.staged_mut() = staged(" Ann ", "20", "A", "ann@x.com", "555", "CS");
    let id = controller.add().unwrap();
    assert_eq!(id, 1);
    assert!(controller.staged().is_empty());

    let record = controller.displayed()[0].clone();
    assert_eq!(record.name, "Ann");
    controller.select(&record);
    assert_eq!(controller.staged().age, "20");

    controller.staged_mut().course = "Math".into();
    controller.update().unwrap();
    assert_eq!(controller.displayed()[0].course, "Math");

    let pending = controller.request_delete().unwrap();
    controller.confirm_delete(pending).unwrap();
    assert!(controller.displayed().is_empty());
    assert_eq!(controller.selected_id(), None);
}

#[test]
fn rejected_input_is_kept_for_correction() {
    let mut controller = controller();
    let cases = [
        (staged("", "20", "", "a@b.co", "", ""), ValidationError::NameRequired),
        (staged("Ann", "12a", "", "a@b.co", "", ""), ValidationError::AgeNotNumeric),
        (staged("Ann", "-5", "", "a@b.co", "", ""), ValidationError::AgeNotNumeric),
        (staged("Ann", "", "", "a@b.co", "", ""), ValidationError::AgeNotNumeric),
        (staged("Ann", "20", "", "bob", "", ""), ValidationError::InvalidEmail),
        (staged("Ann", "20", "", "bob@", "", ""), ValidationError::InvalidEmail),
        (staged("Ann", "20", "", "bob@x", "", ""), ValidationError::InvalidEmail),
    ];

    for (input, expected) in cases {
        *controller.staged_mut() = input.clone();
        match controller.add() {
            Err(RecordError::Validation(err)) => assert_eq!(err, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
        assert_eq!(controller.staged(), &input);
    }
    assert!(controller.displayed().is_empty());
}

#[test]
fn selection_errors_do_not_touch_the_store() {
    let mut controller = controller();
    *controller.staged_mut() = staged("Ann", "20", "", "ann@x.com", "", "");
    controller.add().unwrap();

    *controller.staged_mut() = staged("Bea", "21", "", "bea@x.com", "", "");
    assert!(matches!(
        controller.update(),
        Err(RecordError::Selection(SelectionError::NothingToUpdate))
    ));
    assert_eq!(controller.displayed()[0].name, "Ann");
}

#[test]
fn database_file_persists_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.db");

    let mut controller = FormController::new(RecordStore::open(&path).unwrap()).unwrap();
    *controller.staged_mut() = staged("Ann", "20", "A", "ann@x.com", "555", "CS");
    controller.add().unwrap();
    controller.into_store().close().unwrap();

    let controller = FormController::new(RecordStore::open(&path).unwrap()).unwrap();
    assert_eq!(controller.displayed().len(), 1);
    assert_eq!(controller.displayed()[0].email, "ann@x.com");
}
