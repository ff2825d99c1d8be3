//! Create/edit form state.
//!
//! An editor holds an unpersisted [`Draft`] and turns it into a
//! [`MutationRequest`] once it validates. It never touches the database.

use promptbook_db::{Prompt, ValidationError};

use crate::mutation::MutationRequest;

/// In-progress field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub body: String,
    pub is_favorite: bool,
}

impl Draft {
    pub fn from_prompt(prompt: &Prompt) -> Self {
        Self {
            title: prompt.title.clone(),
            body: prompt.body.clone(),
            is_favorite: prompt.is_favorite,
        }
    }
}

/// Whether the editor creates a new prompt or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Editing,
    Submitted,
}

/// Form for creating or editing one prompt.
#[derive(Debug, Clone)]
pub struct PromptEditor {
    mode: EditorMode,
    draft: Draft,
    state: EditorState,
    error: Option<ValidationError>,
}

impl PromptEditor {
    /// Empty create form.
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            draft: Draft::default(),
            state: EditorState::Editing,
            error: None,
        }
    }

    /// Edit form seeded from a stored prompt.
    pub fn edit(prompt: &Prompt) -> Self {
        Self {
            mode: EditorMode::Edit(prompt.id),
            draft: Draft::from_prompt(prompt),
            state: EditorState::Editing,
            error: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// The constraint that failed on the last submit, if any.
    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.draft.title = title.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.draft.body = body.into();
        self
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.draft.is_favorite = is_favorite;
        self
    }

    /// Validate the draft and package it as a mutation request.
    ///
    /// On failure the draft is kept and the error is recorded for display.
    pub fn submit(&mut self) -> Result<MutationRequest, ValidationError> {
        if let Err(err) = ValidationError::check(&self.draft.title, &self.draft.body) {
            self.error = Some(err);
            self.state = EditorState::Editing;
            return Err(err);
        }

        self.error = None;
        self.state = EditorState::Submitted;

        let Draft {
            title,
            body,
            is_favorite,
        } = self.draft.clone();
        Ok(match self.mode {
            EditorMode::Create => MutationRequest::Create {
                title,
                body,
                is_favorite,
            },
            EditorMode::Edit(id) => MutationRequest::Update {
                id,
                title,
                body,
                is_favorite,
            },
        })
    }

    /// Return to editing with the current draft, e.g. after the store
    /// rejected a submitted request.
    pub fn reopen(&mut self) {
        self.state = EditorState::Editing;
    }

    /// Start over. A create form is cleared; an edit form keeps its draft,
    /// which now matches the stored record.
    pub fn reset(&mut self) {
        if self.mode == EditorMode::Create {
            self.draft = Draft::default();
        }
        self.state = EditorState::Editing;
        self.error = None;
    }
}

impl Default for PromptEditor {
    fn default() -> Self {
        Self::create()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptbook_db::Database;

    #[test]
    fn test_create_editor_defaults() {
        let editor = PromptEditor::create();
        assert_eq!(editor.mode(), EditorMode::Create);
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.draft(), &Draft::default());
        assert!(editor.error().is_none());
    }

    #[test]
    fn test_submit_create_request() {
        let mut editor = PromptEditor::create().with_title("Intro").with_body("Say hello");

        let request = editor.submit().unwrap();
        assert_eq!(
            request,
            MutationRequest::Create {
                title: "Intro".into(),
                body: "Say hello".into(),
                is_favorite: false,
            }
        );
        assert_eq!(editor.state(), EditorState::Submitted);
    }

    #[test]
    fn test_edit_editor_seeds_from_prompt() {
        let db = Database::open_in_memory().unwrap();
        let stored = db.prompts().create("Intro", "Say hello").unwrap();

        let mut editor = PromptEditor::edit(&stored);
        assert_eq!(editor.mode(), EditorMode::Edit(stored.id));
        assert_eq!(editor.draft().title, "Intro");

        editor.draft_mut().is_favorite = true;
        let request = editor.submit().unwrap();
        assert_eq!(
            request,
            MutationRequest::Update {
                id: stored.id,
                title: "Intro".into(),
                body: "Say hello".into(),
                is_favorite: true,
            }
        );
    }

    #[test]
    fn test_invalid_submit_keeps_draft() {
        let mut editor = PromptEditor::create().with_title("   ").with_body("Keep me");

        let err = editor.submit().unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
        assert_eq!(editor.error(), Some(ValidationError::EmptyTitle));
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.draft().body, "Keep me");

        // Fixing the field clears the error on the next submit.
        editor.draft_mut().title = "Fixed".into();
        editor.submit().unwrap();
        assert!(editor.error().is_none());
    }

    #[test]
    fn test_both_fields_blank() {
        let mut editor = PromptEditor::create();
        assert_eq!(editor.submit().unwrap_err(), ValidationError::EmptyTitleAndBody);
    }

    #[test]
    fn test_reset_clears_create_form_only() {
        let mut create = PromptEditor::create().with_title("Intro").with_body("Say hello");
        create.submit().unwrap();
        create.reset();
        assert_eq!(create.draft(), &Draft::default());
        assert_eq!(create.state(), EditorState::Editing);

        let db = Database::open_in_memory().unwrap();
        let stored = db.prompts().create("Intro", "Say hello").unwrap();
        let mut edit = PromptEditor::edit(&stored).with_title("Renamed");
        edit.submit().unwrap();
        edit.reset();
        assert_eq!(edit.draft().title, "Renamed");
    }
}
