// src/application/session.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::save_queue::{SaveQueue, SaveStats};
use crate::application::transfer::{backup_file_name, parse_import};
use crate::application::view::{render, View};
use crate::domain::bookmark::{Bookmark, BookmarkChanges, BookmarkId};
use crate::domain::category::CategoryId;
use crate::domain::client_state::{ActiveCategory, ClientState};
use crate::domain::document::Document;
use crate::domain::error::DomainError;
use crate::domain::id_generator::IdGenerator;
use crate::domain::repositories::backup_repository::BackupRepository;
use crate::domain::repositories::client_state_repository::ClientStateRepository;
use crate::domain::repositories::document_repository::DocumentRepository;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// A user action, as triggered from the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddCategory {
        name: String,
    },
    RenameCategory {
        id: CategoryId,
        name: String,
    },
    DeleteCategory {
        id: CategoryId,
    },
    AddBookmark {
        category_id: CategoryId,
        name: String,
        url: String,
    },
    EditBookmark {
        id: BookmarkId,
        changes: BookmarkChanges,
    },
    DeleteBookmark {
        id: BookmarkId,
    },
    ReorderCategories {
        order: Vec<CategoryId>,
    },
    ReorderBookmarks {
        category_id: CategoryId,
        order: Vec<BookmarkId>,
    },
    SetCollapsed {
        id: CategoryId,
        collapsed: bool,
    },
    ToggleCollapsed {
        id: CategoryId,
    },
    SetAllCollapsed {
        collapsed: bool,
    },
    Select {
        target: ActiveCategory,
    },
    SetSingleCategoryView {
        enabled: bool,
    },
    SetAllowDrag {
        enabled: bool,
    },
    Import {
        path: PathBuf,
    },
}

impl Action {
    /// Whether the action changes the shared document (and so must be saved)
    pub fn mutates_document(&self) -> bool {
        !matches!(
            self,
            Action::Select { .. } | Action::SetSingleCategoryView { .. } | Action::SetAllowDrag { .. }
        )
    }
}

/// Client data store plus the save/render cycle.
///
/// Every action runs the same protocol: mutate the in-memory document, queue a
/// snapshot of the whole document for saving, re-render. A failed action
/// leaves both document and client state untouched and queues nothing.
///
/// A read-only session never queues a save, so stored data it could not parse
/// is never overwritten. Only an import lifts the restriction.
#[derive(Debug)]
pub struct Session {
    document: Document,
    client_state: ClientState,
    read_only: bool,
    ids: IdGenerator,
    saves: SaveQueue,
    client_state_repository: Arc<dyn ClientStateRepository>,
    backup_repository: Arc<dyn BackupRepository>,
}

impl Session {
    /// Loads the document wholesale. An unreachable backend or a document
    /// without `categories` and `bookmarks` is not an error: the session starts
    /// from the fallback document. A document that has both keys but does not
    /// parse opens an empty, read-only session.
    #[instrument(skip_all, level = "debug")]
    pub fn load(
        document_repository: Arc<dyn DocumentRepository>,
        client_state_repository: Arc<dyn ClientStateRepository>,
        backup_repository: Arc<dyn BackupRepository>,
    ) -> ApplicationResult<Self> {
        let (document, read_only) = load_document(document_repository.as_ref());

        let mut client_state = client_state_repository.load().unwrap_or_else(|e| {
            warn!("Failed to load client state, using defaults: {}", e);
            ClientState::default()
        });
        client_state.reconcile(&document);

        Ok(Self {
            document,
            client_state,
            read_only,
            ids: IdGenerator::new(),
            saves: SaveQueue::new(document_repository)?,
            client_state_repository,
            backup_repository,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn client_state(&self) -> &ClientState {
        &self.client_state
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn view(&self) -> View {
        render(&self.document, &self.client_state)
    }

    pub fn bookmark(&self, id: BookmarkId) -> ApplicationResult<&Bookmark> {
        self.document
            .bookmark(id)
            .ok_or_else(|| DomainError::BookmarkNotFound(id).into())
    }

    /// Runs one action through mutate → save → render
    #[instrument(skip(self), level = "debug")]
    pub fn apply(&mut self, action: Action) -> ApplicationResult<View> {
        let persist = action.mutates_document();
        if persist && self.read_only && !matches!(action, Action::Import { .. }) {
            return Err(ApplicationError::ReadOnly(
                "the stored document could not be parsed; fix it or import a backup".to_string(),
            ));
        }
        self.mutate(action)?;

        if persist {
            self.saves.submit(self.document.to_value()?);
        }
        if let Err(e) = self.client_state_repository.save(&self.client_state) {
            warn!("Failed to save client state: {}", e);
        }
        Ok(self.view())
    }

    fn mutate(&mut self, action: Action) -> ApplicationResult<()> {
        match action {
            Action::AddCategory { name } => {
                let id = self.next_id()?;
                self.document.add_category(id, &name)?;
                self.client_state.active_category = Some(ActiveCategory::Category(id));
                info!("Added category {} '{}'", id, name.trim());
            }
            Action::RenameCategory { id, name } => {
                self.document.rename_category(id, &name)?;
            }
            Action::DeleteCategory { id } => {
                let removed = self.document.delete_category(id)?;
                if self.client_state.active() == ActiveCategory::Category(id) {
                    self.client_state.active_category = Some(ActiveCategory::All);
                }
                info!("Deleted category {} with {} bookmarks", id, removed.len());
            }
            Action::AddBookmark {
                category_id,
                name,
                url,
            } => {
                let id = self.next_id()?;
                self.document.add_bookmark(id, category_id, &name, &url)?;
                info!("Added bookmark {} to category {}", id, category_id);
            }
            Action::EditBookmark { id, changes } => {
                if changes.is_empty() {
                    return Err(ApplicationError::Validation(
                        "Nothing to change: give a name, URL or category".to_string(),
                    ));
                }
                self.document.edit_bookmark(id, &changes)?;
            }
            Action::DeleteBookmark { id } => {
                self.document.delete_bookmark(id)?;
            }
            Action::ReorderCategories { order } => {
                if !self.client_state.allow_drag {
                    return Err(ApplicationError::Validation(
                        "Category dragging is disabled".to_string(),
                    ));
                }
                self.document.reorder_categories(&order)?;
            }
            Action::ReorderBookmarks { category_id, order } => {
                self.document.reorder_bookmarks(category_id, &order)?;
            }
            Action::SetCollapsed { id, collapsed } => {
                self.document.set_collapsed(id, collapsed)?;
            }
            Action::ToggleCollapsed { id } => {
                let collapsed = self.document.toggle_collapsed(id)?;
                debug!("Category {} collapsed: {}", id, collapsed);
            }
            Action::SetAllCollapsed { collapsed } => {
                self.document.set_all_collapsed(collapsed);
            }
            Action::Select { target } => {
                if let ActiveCategory::Category(id) = target {
                    if !self.document.contains_category(id) {
                        return Err(DomainError::CategoryNotFound(id).into());
                    }
                }
                self.client_state.active_category = Some(target);
            }
            Action::SetSingleCategoryView { enabled } => {
                self.client_state.single_category_view = enabled;
            }
            Action::SetAllowDrag { enabled } => {
                self.client_state.allow_drag = enabled;
            }
            Action::Import { path } => self.import(&path)?,
        }
        Ok(())
    }

    /// Replaces the whole document with a validated backup
    fn import(&mut self, path: &Path) -> ApplicationResult<()> {
        let value = self
            .backup_repository
            .read_backup(path)
            .map_err(|e| ApplicationError::Import(e.to_string()))?;
        let imported =
            parse_import(value).map_err(|e| e.context(path.display().to_string()))?;

        self.document = imported.document;
        self.read_only = false;
        self.client_state.reset_to_first(&self.document);
        if let Some(allow_drag) = imported.allow_dragging {
            self.client_state.allow_drag = allow_drag;
        }
        info!(
            "Imported {} categories and {} bookmarks from {}",
            self.document.categories.len(),
            self.document.bookmarks.len(),
            path.display()
        );
        Ok(())
    }

    /// Writes the in-memory document to a dated backup file in `dir`
    #[instrument(skip(self), level = "debug")]
    pub fn export(&self, dir: &Path) -> ApplicationResult<PathBuf> {
        if self.read_only {
            return Err(ApplicationError::ReadOnly(
                "nothing was loaded that could be exported".to_string(),
            ));
        }
        let file_name = backup_file_name(Local::now().date_naive());
        Ok(self
            .backup_repository
            .write_backup(dir, &file_name, &self.document)
            .map_err(|e| e.context(format!("Export to {}", dir.display())))?)
    }

    /// Waits for queued saves to be attempted
    pub fn flush(&self) -> SaveStats {
        self.saves.flush();
        self.saves.stats()
    }

    fn next_id(&self) -> ApplicationResult<i64> {
        Ok(self.ids.next_above(self.document.max_id())?)
    }
}

/// The loaded document and whether it must be kept read-only
fn load_document(repository: &dyn DocumentRepository) -> (Document, bool) {
    let value = match repository.fetch() {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to load data from backend, using default data: {}", e);
            return (Document::fallback(), false);
        }
    };
    if !Document::has_required_keys(&value) {
        warn!("Backend data is incomplete, using default data");
        return (Document::fallback(), false);
    }

    match Document::from_value(value) {
        Ok(mut document) => {
            let orphans = document.prune_orphans();
            if !orphans.is_empty() {
                warn!(
                    "Dropped {} bookmarks pointing at missing categories",
                    orphans.len()
                );
            }
            (document, false)
        }
        Err(e) => {
            error!("Stored data could not be parsed, opening read-only: {}", e);
            (Document::empty(), true)
        }
    }
}
