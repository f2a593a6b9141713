// src/application/view.rs
//! Full-rebuild rendering: the view is derived from scratch from the document
//! and the client-local state on every pass.

use crate::domain::bookmark::{Bookmark, BookmarkId};
use crate::domain::category::CategoryId;
use crate::domain::client_state::{ActiveCategory, ClientState};
use crate::domain::document::Document;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub sidebar: Vec<SidebarEntry>,
    pub content: Content,
    pub allow_drag: bool,
}

/// One line of the category list; the first entry is always `all`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarEntry {
    pub target: ActiveCategory,
    pub name: String,
    pub active: bool,
    pub bookmark_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "mode")]
pub enum Content {
    /// Every category that has bookmarks, each under a collapsible header
    Grouped { groups: Vec<Group> },
    /// Bookmarks of the active category only
    Flat {
        category_id: CategoryId,
        bookmarks: Vec<BookmarkItem>,
    },
    /// Active category without bookmarks
    Empty { category_id: CategoryId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub category_id: CategoryId,
    pub name: String,
    pub collapsed: bool,
    pub bookmarks: Vec<BookmarkItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkItem {
    pub id: BookmarkId,
    pub name: String,
    pub url: String,
    pub host: Option<String>,
}

impl From<&Bookmark> for BookmarkItem {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            id: bookmark.id,
            name: bookmark.name.clone(),
            url: bookmark.url.clone(),
            host: bookmark.host(),
        }
    }
}

pub fn render(doc: &Document, state: &ClientState) -> View {
    View {
        sidebar: render_sidebar(doc, state),
        content: render_content(doc, state),
        allow_drag: state.allow_drag,
    }
}

fn render_sidebar(doc: &Document, state: &ClientState) -> Vec<SidebarEntry> {
    let active = state.active();
    let all = SidebarEntry {
        target: ActiveCategory::All,
        name: "All".to_string(),
        active: active == ActiveCategory::All,
        bookmark_count: doc.bookmarks.len(),
    };

    std::iter::once(all)
        .chain(doc.categories.iter().map(|category| SidebarEntry {
            target: ActiveCategory::Category(category.id),
            name: category.name.clone(),
            active: active == ActiveCategory::Category(category.id),
            bookmark_count: doc.bookmarks_in(category.id).count(),
        }))
        .collect()
}

fn render_content(doc: &Document, state: &ClientState) -> Content {
    match state.active() {
        ActiveCategory::Category(category_id) if !state.shows_grouped() => {
            let bookmarks: Vec<BookmarkItem> =
                doc.bookmarks_in(category_id).map(BookmarkItem::from).collect();
            if bookmarks.is_empty() {
                Content::Empty { category_id }
            } else {
                Content::Flat {
                    category_id,
                    bookmarks,
                }
            }
        }
        _ => Content::Grouped {
            groups: doc
                .categories
                .iter()
                .filter_map(|category| {
                    let bookmarks: Vec<BookmarkItem> =
                        doc.bookmarks_in(category.id).map(BookmarkItem::from).collect();
                    (!bookmarks.is_empty()).then(|| Group {
                        category_id: category.id,
                        name: category.name.clone(),
                        collapsed: doc.is_collapsed(category.id),
                        bookmarks,
                    })
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(active: ActiveCategory, single_category_view: bool) -> ClientState {
        ClientState {
            active_category: Some(active),
            allow_drag: false,
            single_category_view,
        }
    }

    fn group_ids(content: &Content) -> Vec<CategoryId> {
        match content {
            Content::Grouped { groups } => groups.iter().map(|g| g.category_id).collect(),
            other => panic!("expected grouped content, got {:?}", other),
        }
    }

    #[test]
    fn given_all_selected_when_render_then_grouped_in_category_order() {
        let doc = Document::fallback();
        let view = render(&doc, &state(ActiveCategory::All, true));

        assert_eq!(group_ids(&view.content), vec![1, 2]);
        assert!(view.sidebar[0].active);
        assert_eq!(view.sidebar[0].bookmark_count, 3);
        assert_eq!(view.sidebar[1].bookmark_count, 2);
    }

    #[test]
    fn given_category_without_bookmarks_when_grouped_then_no_group_for_it() {
        let mut doc = Document::fallback();
        doc.add_category(3, "Empty").unwrap();

        let view = render(&doc, &state(ActiveCategory::All, true));

        assert_eq!(group_ids(&view.content), vec![1, 2]);
        assert_eq!(view.sidebar.len(), 4);
    }

    #[test]
    fn given_category_selected_and_single_view_when_render_then_flat() {
        let doc = Document::fallback();
        let view = render(&doc, &state(ActiveCategory::Category(1), true));

        match view.content {
            Content::Flat {
                category_id,
                bookmarks,
            } => {
                assert_eq!(category_id, 1);
                let ids: Vec<BookmarkId> = bookmarks.iter().map(|b| b.id).collect();
                assert_eq!(ids, vec![1, 2]);
                assert_eq!(bookmarks[0].host.as_deref(), Some("www.google.com"));
            }
            other => panic!("expected flat content, got {:?}", other),
        }
        assert!(view.sidebar[1].active);
        assert!(!view.sidebar[0].active);
    }

    #[test]
    fn given_category_selected_and_single_view_off_when_render_then_grouped() {
        let doc = Document::fallback();
        let view = render(&doc, &state(ActiveCategory::Category(1), false));
        assert_eq!(group_ids(&view.content), vec![1, 2]);
    }

    #[test]
    fn given_empty_category_selected_when_render_then_empty_marker() {
        let mut doc = Document::fallback();
        doc.add_category(3, "Empty").unwrap();

        let view = render(&doc, &state(ActiveCategory::Category(3), true));

        assert_eq!(view.content, Content::Empty { category_id: 3 });
    }

    #[test]
    fn given_collapsed_category_when_render_then_group_flagged() {
        let mut doc = Document::fallback();
        doc.set_collapsed(2, true).unwrap();

        let view = render(&doc, &state(ActiveCategory::All, true));

        match view.content {
            Content::Grouped { groups } => {
                assert!(!groups[0].collapsed);
                assert!(groups[1].collapsed);
            }
            other => panic!("expected grouped content, got {:?}", other),
        }
    }

    #[test]
    fn given_view_when_serialized_then_mode_tagged() {
        let view = render(&Document::empty(), &ClientState::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["content"]["mode"], "grouped");
        assert_eq!(json["sidebar"][0]["target"], "all");
    }
}
