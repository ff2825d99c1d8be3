use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;

use promptbook_core::{
    Database, MutationOutcome, Prompt, PromptBoard, PromptEditor, PromptQuery, Refresh, SortOrder,
};

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortChoice {
    Newest,
    Oldest,
}

impl From<SortChoice> for SortOrder {
    fn from(choice: SortChoice) -> Self {
        match choice {
            SortChoice::Newest => SortOrder::NewestFirst,
            SortChoice::Oldest => SortOrder::OldestFirst,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum PromptsAction {
    /// List prompts
    List {
        /// Case-insensitive text to look for in titles and bodies
        #[arg(short, long)]
        search: Option<String>,

        /// Order by creation time
        #[arg(long, value_enum)]
        sort: Option<SortChoice>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single prompt
    Show {
        /// Prompt ID (launches interactive picker if omitted)
        id: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new prompt
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        body: String,

        /// Mark the new prompt as a favorite
        #[arg(long)]
        favorite: bool,
    },

    /// Edit an existing prompt; omitted fields keep their stored values
    Edit {
        /// Prompt ID (launches interactive picker if omitted)
        id: Option<i64>,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        body: Option<String>,

        /// Set the favorite flag (true or false)
        #[arg(long)]
        favorite: Option<bool>,
    },

    /// Delete a prompt
    Delete {
        /// Prompt ID (launches interactive picker if omitted)
        id: Option<i64>,
    },

    /// Toggle a prompt's favorite flag
    Fav {
        /// Prompt ID (launches interactive picker if omitted)
        id: Option<i64>,
    },
}

pub fn handle_prompts_command(db: &Database, action: PromptsAction, config: &AppConfig) -> Result<()> {
    let mut board = PromptBoard::new(db, PromptQuery::new(None, config.sort_order(None)));

    match action {
        PromptsAction::List { search, sort, json } => {
            board.set_search(search);
            board.set_sort(config.sort_order(sort.map(Into::into)));
            let listing = board.listing()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else if listing.is_empty() {
                println!("{}", "No prompts found.".dimmed());
            } else {
                print_prompts_table(&listing);
            }
        }
        PromptsAction::Show { id, json } => {
            let id = resolve_prompt_id(&board, id)?;
            let prompt = board.get(id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&prompt)?);
            } else {
                print_prompt_detail(&prompt);
            }
        }
        PromptsAction::Add {
            title,
            body,
            favorite,
        } => {
            let mut editor = PromptEditor::create()
                .with_title(title)
                .with_body(body)
                .with_favorite(favorite);
            let refresh = board.submit(&mut editor)?;
            print_refresh(&refresh);
        }
        PromptsAction::Edit {
            id,
            title,
            body,
            favorite,
        } => {
            let id = resolve_prompt_id(&board, id)?;
            let mut editor = board.editor_for(id)?;
            {
                let draft = editor.draft_mut();
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(body) = body {
                    draft.body = body;
                }
                if let Some(favorite) = favorite {
                    draft.is_favorite = favorite;
                }
            }
            let refresh = board.submit(&mut editor)?;
            print_refresh(&refresh);
        }
        PromptsAction::Delete { id } => {
            let id = resolve_prompt_id(&board, id)?;
            let refresh = board.delete(id)?;
            print_refresh(&refresh);
        }
        PromptsAction::Fav { id } => {
            let id = resolve_prompt_id(&board, id)?;
            let refresh = board.toggle_favorite(id)?;
            print_refresh(&refresh);
        }
    }

    Ok(())
}

fn resolve_prompt_id(board: &PromptBoard<'_>, id: Option<i64>) -> Result<i64> {
    if let Some(id) = id {
        return Ok(id);
    }

    // Interactive picker
    let listing = board.listing()?;
    if listing.is_empty() {
        anyhow::bail!("No prompts found.");
    }

    let items: Vec<String> = listing
        .iter()
        .map(|p| {
            let star = if p.is_favorite { "*" } else { " " };
            format!("{} {:>4} | {}", star, p.id, preview(&p.title, 60))
        })
        .collect();

    let selection = dialoguer::FuzzySelect::new()
        .with_prompt("Select a prompt")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(listing[selection].id)
}

fn print_refresh(refresh: &Refresh) {
    match &refresh.outcome {
        MutationOutcome::Saved { prompt } => {
            println!(
                "{} {} {}",
                "Saved".green().bold(),
                format!("#{}", prompt.id).bold(),
                prompt.title
            );
        }
        MutationOutcome::Deleted { id } => {
            println!("{} {}", "Deleted".yellow().bold(), format!("#{}", id).bold());
        }
    }
    println!();

    if refresh.listing.is_empty() {
        println!("{}", "No prompts found.".dimmed());
    } else {
        print_prompts_table(&refresh.listing);
    }
}

fn print_prompts_table(prompts: &[Prompt]) {
    println!(
        "{:<6} {:<2} {:<17} {:<30} {}",
        "ID".dimmed(),
        "".dimmed(),
        "CREATED".dimmed(),
        "TITLE".dimmed(),
        "PROMPT".dimmed(),
    );

    for p in prompts {
        let star = if p.is_favorite {
            "★".yellow().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{:<6} {:<2} {:<17} {:<30} {}",
            p.id,
            star,
            p.created_at.format("%Y-%m-%d %H:%M").to_string(),
            preview(&p.title, 30),
            preview(&p.body, 50).dimmed(),
        );
    }
}

fn print_prompt_detail(prompt: &Prompt) {
    let favorite = if prompt.is_favorite {
        " ★".yellow().to_string()
    } else {
        String::new()
    };
    println!("{}{}", prompt.title.bold(), favorite);
    println!(
        "{} #{}  {} {}  {} {}",
        "id".dimmed(),
        prompt.id,
        "created".dimmed(),
        prompt.created_at.format("%Y-%m-%d %H:%M:%S"),
        "updated".dimmed(),
        prompt.updated_at.format("%Y-%m-%d %H:%M:%S"),
    );
    println!();
    println!("{}", prompt.body);
}

/// First line of `text`, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else if line.len() < text.trim_end().len() {
        format!("{}...", line)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_by_chars() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("ääääääääää", 5), "ää...");
    }

    #[test]
    fn test_preview_marks_multiline() {
        assert_eq!(preview("first\nsecond", 20), "first...");
        assert_eq!(preview("only\n", 20), "only");
    }

    #[test]
    fn test_sort_choice_maps_to_order() {
        assert_eq!(SortOrder::from(SortChoice::Oldest), SortOrder::OldestFirst);
        assert_eq!(SortOrder::from(SortChoice::Newest), SortOrder::NewestFirst);
    }

    #[test]
    fn test_list_sort_flag_resolves_through_config() {
        let config = AppConfig {
            sort: Some(SortOrder::OldestFirst),
            ..Default::default()
        };
        let flag = Some(SortChoice::Newest);
        assert_eq!(config.sort_order(flag.map(Into::into)), SortOrder::NewestFirst);
        assert_eq!(config.sort_order(None::<SortChoice>.map(Into::into)), SortOrder::OldestFirst);
    }
}
