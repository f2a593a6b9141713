// src/domain/bookmark.rs
use crate::domain::category::{validate_name, CategoryId};
use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub type BookmarkId = i64;

/// Represents a bookmark: a named URL belonging to exactly one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: BookmarkId,
    pub category_id: CategoryId,
    pub name: String,
    pub url: String,
}

/// Field changes applied by an edit; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkChanges {
    pub name: Option<String>,
    pub url: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl BookmarkChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.category_id.is_none()
    }
}

impl Bookmark {
    pub fn new<S: AsRef<str>>(
        id: BookmarkId,
        category_id: CategoryId,
        name: S,
        url: S,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            category_id,
            name: validate_name(name)?,
            url: validate_url(url)?,
        })
    }

    /// Applies the changes after validating all of them, so a failed edit leaves the bookmark as is
    pub fn apply(&mut self, changes: &BookmarkChanges) -> DomainResult<()> {
        let name = changes.name.as_ref().map(validate_name).transpose()?;
        let url = changes.url.as_ref().map(validate_url).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        Ok(())
    }

    /// Host part of the URL, used for display
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} <{}>", self.id, self.name, self.url)
    }
}

fn validate_url<S: AsRef<str>>(url: S) -> DomainResult<String> {
    let url = url.as_ref().trim();
    if url.is_empty() {
        return Err(DomainError::InvalidUrl("URL cannot be empty".to_string()));
    }
    Url::parse(url).map_err(|e| DomainError::InvalidUrl(format!("{}: {}", url, e)))?;
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_bookmark_when_serialized_then_uses_camel_case_keys() {
        let bookmark = Bookmark::new(10, 1, "X", "http://x").unwrap();
        let json = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 10, "categoryId": 1, "name": "X", "url": "http://x"})
        );
    }

    #[rstest]
    #[case("")]
    #[case("not a url")]
    #[case("www.example.com")]
    fn given_invalid_url_when_new_then_rejects(#[case] url: &str) {
        assert!(matches!(
            Bookmark::new(1, 1, "name", url),
            Err(DomainError::InvalidUrl(_))
        ));
    }

    #[test]
    fn given_invalid_url_change_when_apply_then_nothing_changes() {
        let mut bookmark = Bookmark::new(1, 1, "GitHub", "https://github.com").unwrap();
        let changes = BookmarkChanges {
            name: Some("Hub".to_string()),
            url: Some("::".to_string()),
            category_id: Some(2),
        };

        assert!(bookmark.apply(&changes).is_err());
        assert_eq!(bookmark.name, "GitHub");
        assert_eq!(bookmark.category_id, 1);
    }

    #[test]
    fn given_partial_changes_when_apply_then_only_given_fields_change() {
        let mut bookmark = Bookmark::new(1, 1, "GitHub", "https://github.com").unwrap();
        let changes = BookmarkChanges {
            category_id: Some(2),
            ..Default::default()
        };

        bookmark.apply(&changes).unwrap();
        assert_eq!(bookmark.name, "GitHub");
        assert_eq!(bookmark.url, "https://github.com");
        assert_eq!(bookmark.category_id, 2);
    }

    #[rstest]
    #[case("https://www.github.com/rust-lang", Some("www.github.com"))]
    #[case("http://x", Some("x"))]
    #[case("mailto:someone@example.com", None)]
    fn given_url_when_host_then_returns_hostname(#[case] url: &str, #[case] host: Option<&str>) {
        let bookmark = Bookmark::new(1, 1, "b", url).unwrap();
        assert_eq!(bookmark.host().as_deref(), host);
    }
}
