//! Prompts store for persistent prompt storage.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::MutexGuard;
use tracing::{debug, info};

use crate::clock::{format_timestamp, parse_timestamp, Clock};
use crate::error::{StoreError, ValidationError};

const PROMPT_COLUMNS: &str = "id, title, prompt, is_favorite, created_at, updated_at";

/// A stored prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing order by creation time. Equal timestamps fall back to ascending id.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "newest")]
    NewestFirst,
    #[serde(rename = "oldest")]
    OldestFirst,
}

impl SortOrder {
    fn sql_direction(self) -> &'static str {
        match self {
            SortOrder::NewestFirst => "DESC",
            SortOrder::OldestFirst => "ASC",
        }
    }
}

/// Search and sort options for listing prompts.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PromptQuery {
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl PromptQuery {
    pub fn new(search: Option<String>, sort: SortOrder) -> Self {
        Self { search, sort }
    }

    /// The search text, or `None` when absent or empty.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

/// Prompts store with a borrowed connection.
pub struct Prompts<'db> {
    conn: MutexGuard<'db, Connection>,
    clock: &'db Clock,
}

impl<'db> Prompts<'db> {
    pub(crate) fn new(conn: MutexGuard<'db, Connection>, clock: &'db Clock) -> Self {
        Self { conn, clock }
    }

    /// Create a prompt. New prompts are not favorites.
    pub fn create(&self, title: &str, body: &str) -> Result<Prompt, StoreError> {
        self.create_with_favorite(title, body, false)
    }

    /// Create a prompt with an explicit favorite flag, in a single insert.
    pub fn create_with_favorite(
        &self,
        title: &str,
        body: &str,
        is_favorite: bool,
    ) -> Result<Prompt, StoreError> {
        ValidationError::check(title, body)?;

        let now = self.clock.tick();
        let stamp = format_timestamp(&now);
        self.conn.execute(
            "INSERT INTO prompts (title, prompt, is_favorite, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            params![title, body, is_favorite, stamp],
        )?;
        let id = self.conn.last_insert_rowid();

        info!(id, "Created prompt");
        Ok(Prompt {
            id,
            title: title.to_string(),
            body: body.to_string(),
            is_favorite,
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrite every mutable field of an existing prompt.
    pub fn update(
        &self,
        id: i64,
        title: &str,
        body: &str,
        is_favorite: bool,
    ) -> Result<Prompt, StoreError> {
        ValidationError::check(title, body)?;

        let stamp = format_timestamp(&self.clock.tick());
        let sql = format!(
            "UPDATE prompts SET title = ?1, prompt = ?2, is_favorite = ?3, updated_at = ?4 WHERE id = ?5 RETURNING {}",
            PROMPT_COLUMNS
        );
        let updated = self
            .conn
            .query_row(&sql, params![title, body, is_favorite, stamp, id], Self::row_to_prompt)
            .optional()?
            .ok_or(StoreError::NotFound(id))?;

        info!(id, "Updated prompt");
        Ok(updated)
    }

    /// Delete a prompt by ID. Deleting a missing ID is an error.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM prompts WHERE id = ?1", params![id])?;
        if rows_affected == 0 {
            debug!(id, "Delete matched no prompt");
            return Err(StoreError::NotFound(id));
        }

        info!(id, "Deleted prompt");
        Ok(())
    }

    /// Flip the favorite flag.
    pub fn toggle_favorite(&self, id: i64) -> Result<Prompt, StoreError> {
        let stamp = format_timestamp(&self.clock.tick());
        let sql = format!(
            "UPDATE prompts SET is_favorite = NOT is_favorite, updated_at = ?1 WHERE id = ?2 RETURNING {}",
            PROMPT_COLUMNS
        );
        let toggled = self
            .conn
            .query_row(&sql, params![stamp, id], Self::row_to_prompt)
            .optional()?
            .ok_or(StoreError::NotFound(id))?;

        info!(id, is_favorite = toggled.is_favorite, "Toggled favorite");
        Ok(toggled)
    }

    /// Get a prompt by ID.
    pub fn get(&self, id: i64) -> Result<Option<Prompt>, StoreError> {
        let sql = format!("SELECT {} FROM prompts WHERE id = ?1", PROMPT_COLUMNS);
        let prompt = self
            .conn
            .query_row(&sql, params![id], Self::row_to_prompt)
            .optional()?;
        Ok(prompt)
    }

    /// List prompts matching the search, in the requested order.
    pub fn query(&self, query: &PromptQuery) -> Result<Vec<Prompt>, StoreError> {
        let mut sql = format!("SELECT {} FROM prompts", PROMPT_COLUMNS);
        let mut param_values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(search) = query.search_term() {
            sql.push_str(" WHERE (contains_ci(title, ?1) OR contains_ci(prompt, ?1))");
            param_values.push(Box::new(search.to_string()));
        }

        sql.push_str(&format!(
            " ORDER BY created_at {}, id ASC",
            query.sort.sql_direction()
        ));

        let params: Vec<&dyn rusqlite::ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params.as_slice(), Self::row_to_prompt)?;

        let mut prompts = Vec::new();
        for row in rows {
            prompts.push(row?);
        }

        debug!(count = prompts.len(), sort = ?query.sort, "Queried prompts");
        Ok(prompts)
    }

    /// Number of stored prompts.
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM prompts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_prompt(row: &rusqlite::Row) -> Result<Prompt, rusqlite::Error> {
        Ok(Prompt {
            id: row.get("id")?,
            title: row.get("title")?,
            body: row.get("prompt")?,
            is_favorite: row.get("is_favorite")?,
            created_at: Self::timestamp_column(row, "created_at")?,
            updated_at: Self::timestamp_column(row, "updated_at")?,
        })
    }

    fn timestamp_column(row: &rusqlite::Row, name: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
        let raw: String = row.get(name)?;
        parse_timestamp(&raw).map_err(|e| {
            let index = row.as_ref().column_index(name).unwrap_or_default();
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
        })
    }
}
