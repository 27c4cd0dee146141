//! Error types shared by the record store and the form controller.
//!
//! Validation and selection problems are recoverable and only ever reach the
//! footer of the UI. Anything coming out of SQLite or the filesystem is
//! treated as fatal and ends the event loop.

use std::error::Error as StdError;

use thiserror::Error;

pub type RecordResult<T> = Result<T, RecordError>;

/// A staged field failed its check. The messages double as the text shown in
/// the status footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,
    #[error("age must be numeric")]
    AgeNotNumeric,
    #[error("age is too large")]
    AgeOutOfRange,
    #[error("invalid email")]
    InvalidEmail,
}

/// Update or delete was requested while no record was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please select a student to update")]
    NothingToUpdate,
    #[error("Please select a student to delete")]
    NothingToDelete,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("storage unavailable: {context}")]
    StorageUnavailable {
        context: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
}

impl RecordError {
    pub fn storage<E>(context: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self::StorageUnavailable {
            context,
            source: source.into(),
        }
    }

    /// Storage failures cannot be recovered from; everything else is a
    /// message for the user.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}

/// `anyhow::Context`-style helper that tags a low-level failure as
/// `StorageUnavailable`.
pub(crate) trait StorageContext<T> {
    fn storage_context(self, context: &'static str) -> RecordResult<T>;
}

impl<T, E> StorageContext<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn storage_context(self, context: &'static str) -> RecordResult<T> {
        self.map_err(|err| RecordError::storage(context, err))
    }
}
