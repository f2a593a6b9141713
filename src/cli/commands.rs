// src/cli/commands.rs
use crate::application::{Action, Session, View};
use crate::cli::args::{Commands, ViewMode};
use crate::cli::display::{write_view, write_view_json};
use crate::cli::error::{CliError, CliResult};
use crate::domain::bookmark::BookmarkChanges;
use crate::util::helper::{confirm, parse_id_list};
use std::io::Write;
use std::path::PathBuf;
use termcolor::WriteColor;
use tracing::{debug, instrument};

/// Everything a document command needs: the session and where to print
pub struct CommandContext<'a, W: WriteColor> {
    pub session: &'a mut Session,
    pub out: &'a mut W,
    pub backup_dir: PathBuf,
    /// Skip confirmations (non-interactive use)
    pub assume_yes: bool,
}

/// Runs one command against the session and prints the re-rendered view.
///
/// `serve`, `shell` and `completion` are dispatched before a session exists.
#[instrument(skip(ctx), level = "debug")]
pub fn run<W: WriteColor>(ctx: &mut CommandContext<'_, W>, command: Commands) -> CliResult<()> {
    let action = match command {
        Commands::Show { is_json } => {
            let view = ctx.session.view();
            return if is_json {
                write_view_json(&mut *ctx.out, &view).map_err(CliError::from)
            } else {
                print_view(ctx, &view)
            };
        }
        Commands::Open { id } => return open_bookmark(ctx, id),
        Commands::Export { dir } => {
            let dir = dir.unwrap_or_else(|| ctx.backup_dir.clone());
            let path = ctx.session.export(&dir)?;
            writeln!(ctx.out, "Exported to {}", path.display())?;
            return Ok(());
        }
        Commands::AddCategory { name } => Action::AddCategory { name },
        Commands::RenameCategory { id, name } => Action::RenameCategory { id, name },
        Commands::DeleteCategory { id, yes } => {
            let count = ctx.session.document().bookmarks_in(id).count();
            let prompt = format!(
                "Delete category {} and its {} bookmark(s)?",
                id, count
            );
            ensure_confirmed(ctx.assume_yes || yes, &prompt)?;
            Action::DeleteCategory { id }
        }
        Commands::AddBookmark {
            category,
            name,
            url,
        } => Action::AddBookmark {
            category_id: category,
            name,
            url,
        },
        Commands::EditBookmark {
            id,
            name,
            url,
            category,
        } => Action::EditBookmark {
            id,
            changes: BookmarkChanges {
                name,
                url,
                category_id: category,
            },
        },
        Commands::DeleteBookmark { id, yes } => {
            let name = ctx.session.bookmark(id)?.name.clone();
            ensure_confirmed(ctx.assume_yes || yes, &format!("Delete bookmark '{}'?", name))?;
            Action::DeleteBookmark { id }
        }
        Commands::MoveCategories { ids } => Action::ReorderCategories {
            order: get_ids(&ids)?,
        },
        Commands::MoveBookmarks { category, ids } => Action::ReorderBookmarks {
            category_id: category,
            order: get_ids(&ids)?,
        },
        Commands::Collapse { id } => Action::SetCollapsed { id, collapsed: true },
        Commands::Expand { id } => Action::SetCollapsed {
            id,
            collapsed: false,
        },
        Commands::Toggle { id } => Action::ToggleCollapsed { id },
        Commands::ExpandAll => Action::SetAllCollapsed { collapsed: false },
        Commands::CollapseAll => Action::SetAllCollapsed { collapsed: true },
        Commands::Select { target } => Action::Select { target },
        Commands::View { mode } => Action::SetSingleCategoryView {
            enabled: mode == ViewMode::Single,
        },
        Commands::AllowDrag { state } => Action::SetAllowDrag {
            enabled: state.enabled(),
        },
        Commands::Import { file, yes } => {
            ensure_confirmed(
                ctx.assume_yes || yes,
                "Replace all categories and bookmarks with the backup?",
            )?;
            Action::Import { path: file }
        }
        Commands::Serve { .. } | Commands::Shell | Commands::Completion { .. } => {
            return Err(CliError::InvalidInput(
                "command is not available here".to_string(),
            ));
        }
    };

    let view = ctx.session.apply(action)?;
    print_view(ctx, &view)
}

fn print_view<W: WriteColor>(ctx: &mut CommandContext<'_, W>, view: &View) -> CliResult<()> {
    write_view(&mut *ctx.out, view)?;
    Ok(())
}

fn open_bookmark<W: WriteColor>(ctx: &mut CommandContext<'_, W>, id: i64) -> CliResult<()> {
    let url = ctx.session.bookmark(id)?.url.clone();
    debug!("Opening {}", url);
    open::that(&url).map_err(|e| CliError::CommandFailed(format!("Cannot open {}: {}", url, e)))?;
    writeln!(ctx.out, "Opened {}", url)?;
    Ok(())
}

fn get_ids(ids: &[String]) -> CliResult<Vec<i64>> {
    parse_id_list(ids).ok_or_else(|| CliError::InvalidIdFormat(ids.join(" ")))
}

fn ensure_confirmed(skip: bool, prompt: &str) -> CliResult<()> {
    if skip || confirm(prompt) {
        Ok(())
    } else {
        Err(CliError::OperationAborted)
    }
}
