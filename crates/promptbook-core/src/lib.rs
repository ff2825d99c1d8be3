//! # promptbook-core
//!
//! Editing and list orchestration on top of the prompt store.
//!
//! ## Key Types
//!
//! - [`PromptEditor`] - Create/edit form that validates a [`Draft`]
//! - [`MutationRequest`] - A single create/update/delete/toggle action
//! - [`PromptBoard`] - Applies mutations and re-queries the listing
//! - [`BoardError`] - Tells a rejected mutation apart from a failed refresh

mod board;
mod editor;
mod error;
mod mutation;

pub use board::{PromptBoard, Refresh};
pub use editor::{Draft, EditorMode, EditorState, PromptEditor};
pub use error::BoardError;
pub use mutation::{MutationOutcome, MutationRequest};

pub use promptbook_db::{
    Database, Prompt, PromptQuery, SortOrder, StoreError, ValidationError,
};
