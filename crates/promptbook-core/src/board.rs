//! The prompt list and the mutations applied to it.
//!
//! Every successful mutation is followed by a fresh query; the caller gets
//! both back as a [`Refresh`] and re-renders from it. Nothing is cached
//! between calls.

use promptbook_db::{Database, Prompt, PromptQuery, SortOrder, StoreError};
use tracing::{info, warn};

use crate::editor::{EditorMode, PromptEditor};
use crate::error::BoardError;
use crate::mutation::{MutationOutcome, MutationRequest};

/// A completed mutation and the listing re-queried right after it.
#[derive(Debug, Clone)]
pub struct Refresh {
    pub outcome: MutationOutcome,
    pub listing: Vec<Prompt>,
}

/// Current view parameters over the prompt store.
pub struct PromptBoard<'db> {
    db: &'db Database,
    view: PromptQuery,
}

impl<'db> PromptBoard<'db> {
    pub fn new(db: &'db Database, view: PromptQuery) -> Self {
        Self { db, view }
    }

    pub fn view(&self) -> &PromptQuery {
        &self.view
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.view.search = search;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.view.sort = sort;
    }

    /// Query the store with the current view.
    pub fn listing(&self) -> Result<Vec<Prompt>, StoreError> {
        self.db.prompts().query(&self.view)
    }

    /// A single stored prompt.
    pub fn get(&self, id: i64) -> Result<Prompt, StoreError> {
        self.db.prompts().get(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Edit form for a stored prompt.
    pub fn editor_for(&self, id: i64) -> Result<PromptEditor, StoreError> {
        Ok(PromptEditor::edit(&self.get(id)?))
    }

    /// Apply one mutation, then re-query.
    ///
    /// A rejected mutation leaves the store and view unchanged and comes back
    /// as [`BoardError::Store`]. If the mutation commits but the re-query
    /// fails, the outcome is returned inside [`BoardError::RefreshFailed`].
    pub fn apply(&self, request: &MutationRequest) -> Result<Refresh, BoardError> {
        let applied = {
            let store = self.db.prompts();
            request.apply(&store)
        };

        let outcome = match applied {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    action = request.name(),
                    prompt_id = ?request.target(),
                    kind = err.kind(),
                    error = %err,
                    "Mutation rejected"
                );
                return Err(BoardError::Store(err));
            }
        };

        info!(action = request.name(), prompt_id = ?request.target(), "Mutation applied");
        match self.listing() {
            Ok(listing) => Ok(Refresh { outcome, listing }),
            Err(source) => {
                warn!(
                    action = request.name(),
                    prompt_id = ?request.target(),
                    error = %source,
                    "Refresh after mutation failed"
                );
                Err(BoardError::RefreshFailed { outcome, source })
            }
        }
    }

    /// Submit an editor and apply its request.
    ///
    /// Validation failures leave the editor editing with its draft and error.
    /// Only a store rejection reopens the editor. Once the store has accepted
    /// the request a create form is cleared, even if the refresh failed; an
    /// edit form is left submitted for the caller to drop.
    pub fn submit(&self, editor: &mut PromptEditor) -> Result<Refresh, BoardError> {
        let request = editor.submit().map_err(|err| {
            warn!(error = %err, "Editor submission invalid");
            BoardError::Store(StoreError::Validation(err))
        })?;

        let result = self.apply(&request);
        match &result {
            Err(BoardError::Store(_)) => editor.reopen(),
            Ok(_) | Err(BoardError::RefreshFailed { .. }) => {
                if editor.mode() == EditorMode::Create {
                    editor.reset();
                }
            }
        }
        result
    }

    pub fn delete(&self, id: i64) -> Result<Refresh, BoardError> {
        self.apply(&MutationRequest::Delete { id })
    }

    pub fn toggle_favorite(&self, id: i64) -> Result<Refresh, BoardError> {
        self.apply(&MutationRequest::ToggleFavorite { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorState;
    use promptbook_db::ValidationError;

    fn titles(prompts: &[Prompt]) -> Vec<&str> {
        prompts.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_submit_create_refreshes_and_resets() {
        let db = Database::open_in_memory().unwrap();
        let board = PromptBoard::new(&db, PromptQuery::default());

        let mut editor = PromptEditor::create().with_title("Intro").with_body("Say hello");
        let refresh = board.submit(&mut editor).unwrap();

        assert_eq!(titles(&refresh.listing), vec!["Intro"]);
        assert!(matches!(refresh.outcome, MutationOutcome::Saved { .. }));
        assert_eq!(editor.state(), EditorState::Editing);
        assert!(editor.draft().title.is_empty());
    }

    #[test]
    fn test_invalid_submit_adds_no_row() {
        let db = Database::open_in_memory().unwrap();
        let board = PromptBoard::new(&db, PromptQuery::default());
        let before = board.listing().unwrap().len();

        let mut editor = PromptEditor::create().with_body("No title");
        let err = board.submit(&mut editor).unwrap_err();

        assert!(matches!(
            err,
            BoardError::Store(StoreError::Validation(ValidationError::EmptyTitle))
        ));
        assert_eq!(board.listing().unwrap().len(), before);
        assert_eq!(editor.draft().body, "No title");
        assert_eq!(editor.state(), EditorState::Editing);
    }

    #[test]
    fn test_edit_of_deleted_prompt_reopens_editor() {
        let db = Database::open_in_memory().unwrap();
        let board = PromptBoard::new(&db, PromptQuery::default());

        let mut create = PromptEditor::create().with_title("Intro").with_body("Say hello");
        let MutationOutcome::Saved { prompt } = board.submit(&mut create).unwrap().outcome else {
            panic!("expected a saved prompt");
        };

        let mut editor = board.editor_for(prompt.id).unwrap().with_title("Renamed");
        board.delete(prompt.id).unwrap();

        let err = board.submit(&mut editor).unwrap_err();
        assert!(matches!(err, BoardError::Store(StoreError::NotFound(id)) if id == prompt.id));
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.draft().title, "Renamed");
    }

    #[test]
    fn test_view_changes_apply_to_refresh() {
        let db = Database::open_in_memory().unwrap();
        let mut board = PromptBoard::new(&db, PromptQuery::default());

        let mut editor = PromptEditor::create().with_title("Intro").with_body("Say hello");
        board.submit(&mut editor).unwrap();

        board.set_search(Some("bye".into()));
        board.set_sort(SortOrder::OldestFirst);
        assert_eq!(board.view().sort, SortOrder::OldestFirst);

        let mut editor = PromptEditor::create().with_title("Outro").with_body("Say bye");
        let refresh = board.submit(&mut editor).unwrap();
        assert_eq!(titles(&refresh.listing), vec!["Outro"]);
    }

    #[test]
    fn test_editor_for_missing_prompt() {
        let db = Database::open_in_memory().unwrap();
        let board = PromptBoard::new(&db, PromptQuery::default());
        assert!(matches!(board.editor_for(9), Err(StoreError::NotFound(9))));
    }
}
