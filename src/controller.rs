//! The form controller sits between the staged input fields and the record
//! store. The UI only ever calls the named operations here and renders what
//! they return.

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::db::RecordStore;
use crate::error::{RecordResult, SelectionError, ValidationError};
use crate::models::{StudentFields, StudentRecord};

/// `local@domain.tld`, anchored only at the start.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("valid email regex"));

/// One input of the student form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    Name,
    Age,
    Grade,
    Email,
    Phone,
    Course,
}

impl Field {
    /// Form order, also the tab order.
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Age,
        Field::Grade,
        Field::Email,
        Field::Phone,
        Field::Course,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Age => "Age",
            Field::Grade => "Grade",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Course => "Course",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Field::Name | Field::Age | Field::Email)
    }
}

/// Raw text currently typed into the form. Nothing here is persisted until
/// add or update succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedFields {
    pub name: String,
    pub age: String,
    pub grade: String,
    pub email: String,
    pub phone: String,
    pub course: String,
}

impl StagedFields {
    /// Prefill from a record; the id is never staged.
    pub fn from_record(record: &StudentRecord) -> Self {
        Self {
            name: record.name.clone(),
            age: record.age.to_string(),
            grade: record.grade.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            course: record.course.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Age => &self.age,
            Field::Grade => &self.grade,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Course => &self.course,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Age => &mut self.age,
            Field::Grade => &mut self.grade,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Course => &mut self.course,
        }
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}

/// Check the staged input and turn it into typed, trimmed fields.
///
/// Name, age and email are checked in that order and the first failure wins.
/// Age must consist of ASCII digits only, so signs and surrounding spaces are
/// rejected.
pub fn validate(staged: &StagedFields) -> Result<StudentFields, ValidationError> {
    let name = staged.name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }

    if staged.age.is_empty() || !staged.age.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::AgeNotNumeric);
    }
    let age = staged
        .age
        .parse::<i64>()
        .map_err(|_| ValidationError::AgeOutOfRange)?;

    if !EMAIL_RE.is_match(&staged.email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(StudentFields {
        name: name.to_string(),
        age,
        grade: staged.grade.trim().to_string(),
        email: staged.email.trim().to_string(),
        phone: staged.phone.trim().to_string(),
        course: staged.course.trim().to_string(),
    })
}

/// A delete waiting for the user to confirm it. Dropping the value cancels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    record: StudentRecord,
}

impl PendingDelete {
    pub fn record(&self) -> &StudentRecord {
        &self.record
    }
}

pub struct FormController {
    store: RecordStore,
    staged: StagedFields,
    /// Always the id of a record present in `displayed`.
    selected: Option<i64>,
    query: String,
    displayed: Vec<StudentRecord>,
}

impl FormController {
    /// Take ownership of the store and load the full list.
    pub fn new(store: RecordStore) -> RecordResult<Self> {
        let displayed = store.list_all()?;
        Ok(Self {
            store,
            staged: StagedFields::default(),
            selected: None,
            query: String::new(),
            displayed,
        })
    }

    pub fn staged(&self) -> &StagedFields {
        &self.staged
    }

    pub fn staged_mut(&mut self) -> &mut StagedFields {
        &mut self.staged
    }

    pub fn displayed(&self) -> &[StudentRecord] {
        &self.displayed
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected
    }

    /// Position of the selected record in the displayed list.
    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.displayed.iter().position(|record| record.id == id)
    }

    pub fn selected(&self) -> Option<&StudentRecord> {
        self.selected_index().map(|idx| &self.displayed[idx])
    }

    pub fn validate(&self) -> Result<StudentFields, ValidationError> {
        validate(&self.staged).inspect_err(|err| {
            debug!("event=form_validate module=controller status=rejected reason=\"{err}\"");
        })
    }

    /// Validate, insert, clear the form and return the new id.
    pub fn add(&mut self) -> RecordResult<i64> {
        let fields = self.validate()?;
        let id = self.store.create(&fields)?;
        self.staged = StagedFields::default();
        self.selected = None;
        self.refresh()?;
        info!("event=form_add module=controller status=ok id={id}");
        Ok(id)
    }

    /// Write the staged fields over the selected record and return its id.
    /// The record stays selected while it remains in the displayed list.
    pub fn update(&mut self) -> RecordResult<i64> {
        let id = self.selected.ok_or_else(|| {
            debug!("event=form_update module=controller status=rejected reason=no_selection");
            SelectionError::NothingToUpdate
        })?;
        let fields = self.validate()?;
        self.store.update(id, &fields)?;
        self.refresh()?;
        info!("event=form_update module=controller status=ok id={id}");
        Ok(id)
    }

    /// First half of delete: capture the selected record so the UI can ask
    /// for confirmation.
    pub fn request_delete(&self) -> RecordResult<PendingDelete> {
        let record = self.selected().cloned().ok_or_else(|| {
            debug!("event=form_delete module=controller status=rejected reason=no_selection");
            SelectionError::NothingToDelete
        })?;
        Ok(PendingDelete { record })
    }

    /// Second half of delete, called once the user confirmed.
    pub fn confirm_delete(&mut self, pending: PendingDelete) -> RecordResult<StudentRecord> {
        self.store.delete(pending.record.id)?;
        if self.selected == Some(pending.record.id) {
            self.selected = None;
        }
        self.staged = StagedFields::default();
        self.refresh()?;
        info!(
            "event=form_delete module=controller status=ok id={}",
            pending.record.id
        );
        Ok(pending.record)
    }

    /// Replace the displayed list with the students matching `query`.
    pub fn search(&mut self, query: &str) -> RecordResult<()> {
        self.query = query.to_string();
        self.refresh()
    }

    pub fn clear_search(&mut self) -> RecordResult<()> {
        self.search("")
    }

    /// Prefill the form from `record` and remember it as the selection.
    pub fn select(&mut self, record: &StudentRecord) {
        self.staged = StagedFields::from_record(record);
        self.selected = Some(record.id);
    }

    /// Empty the form. The store and the selection are left alone.
    pub fn clear(&mut self) {
        self.staged = StagedFields::default();
    }

    /// Re-run the current query against the store.
    pub fn refresh(&mut self) -> RecordResult<()> {
        self.displayed = self.store.search(&self.query)?;
        if self.selected_index().is_none() {
            self.selected = None;
        }
        Ok(())
    }

    /// Hand the store back for an orderly shutdown.
    pub fn into_store(self) -> RecordStore {
        self.store
    }
}
