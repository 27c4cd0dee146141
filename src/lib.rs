//! Core library surface for the student records manager.
//!
//! The record store and the form controller hold all of the data logic; the
//! `ui` module is a thin terminal shell on top of them.
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence handle over the `students` table.
pub use db::RecordStore;

/// Form state, validation and the user-facing operations.
pub use controller::{validate, Field, FormController, PendingDelete, StagedFields};

pub use error::{RecordError, RecordResult, SelectionError, ValidationError};
pub use models::{StudentFields, StudentRecord};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
