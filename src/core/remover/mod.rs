//! # Remover Module
//!
//! Deletes every file in a duplicate group except the keeper.
//!
//! Deletion is idempotent and failure-tolerant: a file that is already
//! gone counts as deleted, and a failed deletion is recorded without
//! stopping the rest of the batch. There is no rollback; callers get the
//! full list of failures to report.

use crate::core::collection::DoublesReport;
use crate::error::DeleteError;
use std::io::ErrorKind;

/// What a deletion pass accomplished.
#[derive(Debug, Default)]
pub struct DeleteOutcome {
    /// Files removed (or already absent)
    pub deleted: usize,
    /// Deletions that failed; the files remain on disk
    pub errors: Vec<DeleteError>,
}

impl DeleteOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Delete all but the first file of every group.
///
/// The keeper is whichever file finished hashing first for that digest;
/// see the collection module for the ordering guarantee.
pub fn delete_except_first(report: &DoublesReport) -> DeleteOutcome {
    let mut outcome = DeleteOutcome::default();

    for group in report.iter() {
        for path in group.extras() {
            match std::fs::remove_file(path) {
                Ok(()) => outcome.deleted += 1,
                // Already gone: the goal state is reached either way.
                Err(e) if e.kind() == ErrorKind::NotFound => outcome.deleted += 1,
                Err(e) => outcome.errors.push(DeleteError::RemoveFailed {
                    path: path.clone(),
                    source: e,
                }),
            }
        }
    }

    outcome
}
