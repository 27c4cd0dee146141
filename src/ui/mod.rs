//! Ratatui front-end: a two-column student form, a live search box, the
//! record table and a status footer. All data work goes through
//! [`crate::controller::FormController`].

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
