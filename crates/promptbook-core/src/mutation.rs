use promptbook_db::{Prompt, Prompts, StoreError};

/// A change to apply to the prompt store.
///
/// Editors produce `Create` and `Update`; list actions produce `Delete` and
/// `ToggleFavorite`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    Create {
        title: String,
        body: String,
        is_favorite: bool,
    },
    Update {
        id: i64,
        title: String,
        body: String,
        is_favorite: bool,
    },
    Delete {
        id: i64,
    },
    ToggleFavorite {
        id: i64,
    },
}

/// Result of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Saved { prompt: Prompt },
    Deleted { id: i64 },
}

impl MutationRequest {
    pub fn name(&self) -> &'static str {
        match self {
            MutationRequest::Create { .. } => "create",
            MutationRequest::Update { .. } => "update",
            MutationRequest::Delete { .. } => "delete",
            MutationRequest::ToggleFavorite { .. } => "toggle_favorite",
        }
    }

    /// Target prompt, if the request addresses an existing one.
    pub fn target(&self) -> Option<i64> {
        match self {
            MutationRequest::Create { .. } => None,
            MutationRequest::Update { id, .. }
            | MutationRequest::Delete { id }
            | MutationRequest::ToggleFavorite { id } => Some(*id),
        }
    }

    /// Run exactly one store call.
    pub fn apply(&self, store: &Prompts<'_>) -> Result<MutationOutcome, StoreError> {
        match self {
            MutationRequest::Create {
                title,
                body,
                is_favorite,
            } => store
                .create_with_favorite(title, body, *is_favorite)
                .map(|prompt| MutationOutcome::Saved { prompt }),
            MutationRequest::Update {
                id,
                title,
                body,
                is_favorite,
            } => store
                .update(*id, title, body, *is_favorite)
                .map(|prompt| MutationOutcome::Saved { prompt }),
            MutationRequest::Delete { id } => store
                .delete(*id)
                .map(|()| MutationOutcome::Deleted { id: *id }),
            MutationRequest::ToggleFavorite { id } => store
                .toggle_favorite(*id)
                .map(|prompt| MutationOutcome::Saved { prompt }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptbook_db::Database;

    #[test]
    fn test_apply_each_request() {
        let db = Database::open_in_memory().unwrap();
        let store = db.prompts();

        let created = MutationRequest::Create {
            title: "Intro".into(),
            body: "Say hello".into(),
            is_favorite: false,
        }
        .apply(&store)
        .unwrap();
        let MutationOutcome::Saved { prompt } = created else {
            panic!("expected a saved prompt");
        };

        let toggled = MutationRequest::ToggleFavorite { id: prompt.id }
            .apply(&store)
            .unwrap();
        assert!(matches!(toggled, MutationOutcome::Saved { ref prompt } if prompt.is_favorite));

        let deleted = MutationRequest::Delete { id: prompt.id }.apply(&store).unwrap();
        assert_eq!(deleted, MutationOutcome::Deleted { id: prompt.id });

        let err = MutationRequest::Update {
            id: prompt.id,
            title: "Intro".into(),
            body: "Say hello".into(),
            is_favorite: false,
        }
        .apply(&store)
        .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_name_and_target() {
        let request = MutationRequest::Delete { id: 3 };
        assert_eq!(request.name(), "delete");
        assert_eq!(request.target(), Some(3));

        let request = MutationRequest::Create {
            title: "t".into(),
            body: "b".into(),
            is_favorite: false,
        };
        assert_eq!(request.target(), None);
    }
}
