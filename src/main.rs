//! Binary entry point: resolve the data directory, start logging, open the
//! student database and run the terminal UI until the user quits.
use log::error;
use student_records::config::{default_log_level, AppPaths};
use student_records::logging::init_logging;
use student_records::{run_app, App, FormController, RecordStore};

/// Storage failures during the session end the event loop and are reported
/// here after the terminal has been restored.
fn main() -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    init_logging(default_log_level(), &paths.log_dir())?;

    let store = RecordStore::open(&paths.database())?;
    let controller = FormController::new(store)?;

    let mut app = App::new(controller);
    let result = run_app(&mut app);
    if let Err(err) = &result {
        error!("event=app_exit module=main status=error error={err:#}");
    }

    let closed = app.into_controller().into_store().close();
    result?;
    closed?;
    Ok(())
}
