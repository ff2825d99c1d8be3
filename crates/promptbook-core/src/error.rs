use promptbook_db::StoreError;
use thiserror::Error;

use crate::mutation::MutationOutcome;

/// Failure of a board action.
///
/// `Store` means the mutation itself did not happen. `RefreshFailed` means
/// it was committed and only the follow-up query failed, so the request must
/// not be submitted again.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Change saved, but the listing could not be refreshed: {source}")]
    RefreshFailed {
        outcome: MutationOutcome,
        source: StoreError,
    },
}

impl BoardError {
    /// The committed outcome, if the store call succeeded.
    pub fn committed(&self) -> Option<&MutationOutcome> {
        match self {
            BoardError::Store(_) => None,
            BoardError::RefreshFailed { outcome, .. } => Some(outcome),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            BoardError::Store(err) => err.user_message(),
            BoardError::RefreshFailed { .. } => {
                "The change was saved, but the prompt list could not be reloaded.".to_string()
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BoardError::Store(err) => err.kind(),
            BoardError::RefreshFailed { .. } => "refresh_failed",
        }
    }
}
