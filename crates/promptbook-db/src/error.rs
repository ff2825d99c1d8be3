use thiserror::Error;

/// A prompt's title or body was blank.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Prompt body must not be empty")]
    EmptyBody,

    #[error("Title and prompt body must not be empty")]
    EmptyTitleAndBody,
}

impl ValidationError {
    /// Check a title/body pair. Whitespace-only text counts as empty.
    pub fn check(title: &str, body: &str) -> Result<(), ValidationError> {
        match (title.trim().is_empty(), body.trim().is_empty()) {
            (false, false) => Ok(()),
            (true, false) => Err(ValidationError::EmptyTitle),
            (false, true) => Err(ValidationError::EmptyBody),
            (true, true) => Err(ValidationError::EmptyTitleAndBody),
        }
    }

    pub fn title_failed(&self) -> bool {
        matches!(self, Self::EmptyTitle | Self::EmptyTitleAndBody)
    }

    pub fn body_failed(&self) -> bool {
        matches!(self, Self::EmptyBody | Self::EmptyTitleAndBody)
    }
}

/// Errors returned by the prompt store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Prompt {0} not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl StoreError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Validation(err) => err.to_string(),
            StoreError::NotFound(id) => {
                format!("Prompt {} no longer exists. Refresh the list and try again.", id)
            }
            StoreError::Storage(_) => "The prompt database could not complete the request.".to_string(),
        }
    }

    /// Stable category name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "validation",
            StoreError::NotFound(_) => "not_found",
            StoreError::Storage(_) => "storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reports_failed_fields() {
        assert_eq!(ValidationError::check("Intro", "Say hello"), Ok(()));
        assert_eq!(
            ValidationError::check("  ", "Say hello"),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            ValidationError::check("Intro", "\n\t"),
            Err(ValidationError::EmptyBody)
        );
        assert_eq!(
            ValidationError::check("", ""),
            Err(ValidationError::EmptyTitleAndBody)
        );
    }

    #[test]
    fn test_failed_field_flags() {
        assert!(ValidationError::EmptyTitle.title_failed());
        assert!(!ValidationError::EmptyTitle.body_failed());
        assert!(ValidationError::EmptyTitleAndBody.title_failed());
        assert!(ValidationError::EmptyTitleAndBody.body_failed());
    }

    #[test]
    fn test_error_kind_and_message() {
        let err = StoreError::NotFound(7);
        assert_eq!(err.kind(), "not_found");
        assert!(err.user_message().contains('7'));

        let err: StoreError = ValidationError::EmptyBody.into();
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.user_message(), "Prompt body must not be empty");
    }
}
