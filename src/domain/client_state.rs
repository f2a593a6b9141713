// src/domain/client_state.rs
use crate::domain::category::CategoryId;
use crate::domain::document::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category selected for focused viewing, or the `all` pseudo-category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ActiveRepr", into = "ActiveRepr")]
pub enum ActiveCategory {
    All,
    Category(CategoryId),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ActiveRepr {
    Id(CategoryId),
    Keyword(String),
}

impl TryFrom<ActiveRepr> for ActiveCategory {
    type Error = String;

    fn try_from(repr: ActiveRepr) -> Result<Self, Self::Error> {
        match repr {
            ActiveRepr::Id(id) => Ok(ActiveCategory::Category(id)),
            ActiveRepr::Keyword(s) => s.parse(),
        }
    }
}

impl From<ActiveCategory> for ActiveRepr {
    fn from(active: ActiveCategory) -> Self {
        match active {
            ActiveCategory::All => ActiveRepr::Keyword("all".to_string()),
            ActiveCategory::Category(id) => ActiveRepr::Id(id),
        }
    }
}

impl FromStr for ActiveCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(ActiveCategory::All);
        }
        s.parse::<CategoryId>()
            .map(ActiveCategory::Category)
            .map_err(|_| format!("expected 'all' or a category id, got '{}'", s))
    }
}

impl fmt::Display for ActiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveCategory::All => write!(f, "all"),
            ActiveCategory::Category(id) => write!(f, "{}", id),
        }
    }
}

/// Client-local settings. Never part of the shared document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientState {
    pub active_category: Option<ActiveCategory>,
    pub allow_drag: bool,
    pub single_category_view: bool,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            active_category: None,
            allow_drag: false,
            single_category_view: true,
        }
    }
}

impl ClientState {
    pub fn active(&self) -> ActiveCategory {
        self.active_category.unwrap_or(ActiveCategory::All)
    }

    /// Makes the selection valid for `doc`: a vanished or unset category falls
    /// back to the first category, or `all` for a document without categories.
    pub fn reconcile(&mut self, doc: &Document) {
        let valid = match self.active_category {
            Some(ActiveCategory::All) => true,
            Some(ActiveCategory::Category(id)) => doc.contains_category(id),
            None => false,
        };
        if !valid {
            self.active_category = Some(first_or_all(doc));
        }
    }

    /// Selection after the whole document was replaced
    pub fn reset_to_first(&mut self, doc: &Document) {
        self.active_category = Some(first_or_all(doc));
    }

    /// Grouped (all categories with headers) unless a single category is in focus
    pub fn shows_grouped(&self) -> bool {
        self.active() == ActiveCategory::All || !self.single_category_view
    }
}

fn first_or_all(doc: &Document) -> ActiveCategory {
    doc.categories
        .first()
        .map(|c| ActiveCategory::Category(c.id))
        .unwrap_or(ActiveCategory::All)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("all", Ok(ActiveCategory::All))]
    #[case("ALL", Ok(ActiveCategory::All))]
    #[case("42", Ok(ActiveCategory::Category(42)))]
    fn given_text_when_parse_active_then_matches(
        #[case] input: &str,
        #[case] expected: Result<ActiveCategory, String>,
    ) {
        assert_eq!(input.parse::<ActiveCategory>(), expected);
    }

    #[test]
    fn given_garbage_when_parse_active_then_error() {
        assert!("abc".parse::<ActiveCategory>().is_err());
    }

    #[test]
    fn given_state_when_serialized_then_all_is_a_keyword_and_ids_are_numbers() {
        let state = ClientState {
            active_category: Some(ActiveCategory::All),
            ..Default::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["activeCategory"], "all");

        let state = ClientState {
            active_category: Some(ActiveCategory::Category(7)),
            ..Default::default()
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: ClientState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn given_vanished_category_when_reconcile_then_first_category() {
        let doc = Document::fallback();
        let mut state = ClientState {
            active_category: Some(ActiveCategory::Category(99)),
            ..Default::default()
        };
        state.reconcile(&doc);
        assert_eq!(state.active(), ActiveCategory::Category(1));
    }

    #[test]
    fn given_empty_document_when_reconcile_then_all() {
        let mut state = ClientState::default();
        state.reconcile(&Document::empty());
        assert_eq!(state.active_category, Some(ActiveCategory::All));
    }

    #[test]
    fn given_all_selected_when_reconcile_then_kept() {
        let mut state = ClientState {
            active_category: Some(ActiveCategory::All),
            ..Default::default()
        };
        state.reconcile(&Document::fallback());
        assert_eq!(state.active(), ActiveCategory::All);
    }

    #[rstest]
    #[case(ActiveCategory::All, true, true)]
    #[case(ActiveCategory::Category(1), true, false)]
    #[case(ActiveCategory::Category(1), false, true)]
    fn given_selection_and_toggle_when_shows_grouped_then_expected(
        #[case] active: ActiveCategory,
        #[case] single_category_view: bool,
        #[case] grouped: bool,
    ) {
        let state = ClientState {
            active_category: Some(active),
            allow_drag: false,
            single_category_view,
        };
        assert_eq!(state.shows_grouped(), grouped);
    }
}
