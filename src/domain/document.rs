// src/domain/document.rs
use crate::domain::bookmark::{Bookmark, BookmarkChanges, BookmarkId};
use crate::domain::category::{Category, CategoryId};
use crate::domain::error::{DomainError, DomainResult};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

/// The single persisted unit of application state.
///
/// Order of `categories` and `bookmarks` is meaningful: it is the display order
/// and is changed only by explicit reorder operations. Every mutating method
/// validates first and mutates last, so an `Err` leaves the document untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub categories: Vec<Category>,
    pub bookmarks: Vec<Bookmark>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub collapsed_categories: BTreeMap<CategoryId, bool>,
}

/// `"collapsedCategories": null` reads as no collapsed categories
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<CategoryId, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<CategoryId, bool>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    /// `{categories: [], bookmarks: [], collapsedCategories: {}}`
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starter content used when the backend cannot provide a usable document
    pub fn fallback() -> Self {
        let category = |id, name: &str| Category {
            id,
            name: name.to_string(),
        };
        let bookmark = |id, category_id, name: &str, url: &str| Bookmark {
            id,
            category_id,
            name: name.to_string(),
            url: url.to_string(),
        };
        Self {
            categories: vec![category(1, "Frequent Sites"), category(2, "Dev Tools")],
            bookmarks: vec![
                bookmark(1, 1, "Google", "https://www.google.com"),
                bookmark(2, 1, "Bilibili", "https://www.bilibili.com"),
                bookmark(3, 2, "GitHub", "https://www.github.com"),
            ],
            collapsed_categories: BTreeMap::new(),
        }
    }

    /// Whether `value` is an object carrying both `categories` and `bookmarks`
    pub fn has_required_keys(value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|o| o.contains_key("categories") && o.contains_key("bookmarks"))
    }

    /// Parses a raw JSON value. Both `categories` and `bookmarks` must be present;
    /// a missing or null `collapsedCategories` becomes an empty map.
    pub fn from_value(value: Value) -> DomainResult<Self> {
        if !Self::has_required_keys(&value) {
            return Err(DomainError::SerializationError(
                "Document must be an object with 'categories' and 'bookmarks'".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> DomainResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn bookmark(&self, id: BookmarkId) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    pub fn contains_category(&self, id: CategoryId) -> bool {
        self.category(id).is_some()
    }

    /// Bookmarks of one category, in document order
    pub fn bookmarks_in(&self, category_id: CategoryId) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks
            .iter()
            .filter(move |b| b.category_id == category_id)
    }

    /// Largest id in use, 0 for an empty document
    pub fn max_id(&self) -> i64 {
        self.categories
            .iter()
            .map(|c| c.id)
            .chain(self.bookmarks.iter().map(|b| b.id))
            .max()
            .unwrap_or(0)
    }

    #[instrument(skip(self), level = "debug")]
    pub fn add_category(&mut self, id: CategoryId, name: &str) -> DomainResult<&Category> {
        let category = Category::new(id, name)?;
        self.categories.push(category);
        Ok(&self.categories[self.categories.len() - 1])
    }

    #[instrument(skip(self), level = "debug")]
    pub fn rename_category(&mut self, id: CategoryId, name: &str) -> DomainResult<()> {
        self.categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DomainError::CategoryNotFound(id))?
            .rename(name)
    }

    /// Removes the category together with all its bookmarks and its collapsed flag.
    /// Returns the removed bookmarks.
    #[instrument(skip(self), level = "debug")]
    pub fn delete_category(&mut self, id: CategoryId) -> DomainResult<Vec<Bookmark>> {
        if !self.contains_category(id) {
            return Err(DomainError::CategoryNotFound(id));
        }
        self.categories.retain(|c| c.id != id);
        self.collapsed_categories.remove(&id);

        let (removed, kept): (Vec<Bookmark>, Vec<Bookmark>) = std::mem::take(&mut self.bookmarks)
            .into_iter()
            .partition(|b| b.category_id == id);
        self.bookmarks = kept;

        debug!("Deleted category {} and {} bookmarks", id, removed.len());
        Ok(removed)
    }

    #[instrument(skip(self), level = "debug")]
    pub fn add_bookmark(
        &mut self,
        id: BookmarkId,
        category_id: CategoryId,
        name: &str,
        url: &str,
    ) -> DomainResult<&Bookmark> {
        if !self.contains_category(category_id) {
            return Err(DomainError::CategoryNotFound(category_id));
        }
        let bookmark = Bookmark::new(id, category_id, name, url)?;
        self.bookmarks.push(bookmark);
        Ok(&self.bookmarks[self.bookmarks.len() - 1])
    }

    /// Edits the bookmark in place; its position in the list is kept
    #[instrument(skip(self), level = "debug")]
    pub fn edit_bookmark(&mut self, id: BookmarkId, changes: &BookmarkChanges) -> DomainResult<()> {
        if let Some(category_id) = changes.category_id {
            if !self.contains_category(category_id) {
                return Err(DomainError::CategoryNotFound(category_id));
            }
        }
        self.bookmarks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(DomainError::BookmarkNotFound(id))?
            .apply(changes)
    }

    #[instrument(skip(self), level = "debug")]
    pub fn delete_bookmark(&mut self, id: BookmarkId) -> DomainResult<Bookmark> {
        let index = self
            .bookmarks
            .iter()
            .position(|b| b.id == id)
            .ok_or(DomainError::BookmarkNotFound(id))?;
        Ok(self.bookmarks.remove(index))
    }

    /// Replaces the category order. `order` must be a permutation of all category ids.
    #[instrument(skip(self), level = "debug")]
    pub fn reorder_categories(&mut self, order: &[CategoryId]) -> DomainResult<()> {
        let current: Vec<CategoryId> = self.categories.iter().map(|c| c.id).collect();
        ensure_permutation(&current, order, "categories")?;

        let mut remaining = std::mem::take(&mut self.categories);
        for id in order {
            // present by the permutation check
            if let Some(index) = remaining.iter().position(|c| c.id == *id) {
                self.categories.push(remaining.remove(index));
            }
        }
        Ok(())
    }

    /// Reorders the bookmarks of one category.
    ///
    /// The group keeps the list slots it already occupies; bookmarks of other
    /// categories do not move. `order` must be a permutation of the group's ids.
    #[instrument(skip(self), level = "debug")]
    pub fn reorder_bookmarks(
        &mut self,
        category_id: CategoryId,
        order: &[BookmarkId],
    ) -> DomainResult<()> {
        if !self.contains_category(category_id) {
            return Err(DomainError::CategoryNotFound(category_id));
        }
        let slots: Vec<usize> = self
            .bookmarks
            .iter()
            .positions(|b| b.category_id == category_id)
            .collect();
        let current: Vec<BookmarkId> = slots.iter().map(|&i| self.bookmarks[i].id).collect();
        ensure_permutation(&current, order, "bookmarks")?;

        let mut group: Vec<Bookmark> = slots.iter().map(|&i| self.bookmarks[i].clone()).collect();
        for (slot, id) in slots.iter().zip(order) {
            if let Some(index) = group.iter().position(|b| b.id == *id) {
                self.bookmarks[*slot] = group.remove(index);
            }
        }
        Ok(())
    }

    pub fn is_collapsed(&self, id: CategoryId) -> bool {
        self.collapsed_categories.get(&id).copied().unwrap_or(false)
    }

    pub fn set_collapsed(&mut self, id: CategoryId, collapsed: bool) -> DomainResult<()> {
        if !self.contains_category(id) {
            return Err(DomainError::CategoryNotFound(id));
        }
        self.collapsed_categories.insert(id, collapsed);
        Ok(())
    }

    /// Flips the collapsed flag and returns the new state
    pub fn toggle_collapsed(&mut self, id: CategoryId) -> DomainResult<bool> {
        let collapsed = !self.is_collapsed(id);
        self.set_collapsed(id, collapsed)?;
        Ok(collapsed)
    }

    /// Expand all / collapse all
    pub fn set_all_collapsed(&mut self, collapsed: bool) {
        for category in &self.categories {
            self.collapsed_categories.insert(category.id, collapsed);
        }
    }

    /// Checks that every bookmark references an existing category
    pub fn validate(&self) -> DomainResult<()> {
        let known: HashSet<CategoryId> = self.categories.iter().map(|c| c.id).collect();
        match self
            .bookmarks
            .iter()
            .find(|b| !known.contains(&b.category_id))
        {
            Some(orphan) => Err(DomainError::DanglingReference {
                bookmark: orphan.id,
                category: orphan.category_id,
            }),
            None => Ok(()),
        }
    }

    /// Drops bookmarks whose category does not exist and returns them
    pub fn prune_orphans(&mut self) -> Vec<Bookmark> {
        let known: HashSet<CategoryId> = self.categories.iter().map(|c| c.id).collect();
        let (kept, orphans): (Vec<Bookmark>, Vec<Bookmark>) = std::mem::take(&mut self.bookmarks)
            .into_iter()
            .partition(|b| known.contains(&b.category_id));
        self.bookmarks = kept;
        orphans
    }
}

fn ensure_permutation(current: &[i64], order: &[i64], what: &str) -> DomainResult<()> {
    let expected: Vec<&i64> = current.iter().sorted().collect();
    let given: Vec<&i64> = order.iter().sorted().collect();
    if expected != given {
        return Err(DomainError::InvalidOrder(format!(
            "new order of {} must contain exactly [{}], got [{}]",
            what,
            current.iter().join(", "),
            order.iter().join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(bookmarks: &[Bookmark]) -> Vec<BookmarkId> {
        bookmarks.iter().map(|b| b.id).collect()
    }

    /// Interleaved bookmarks of two categories: A=1, B=2
    fn interleaved() -> Document {
        serde_json::from_value(json!({
            "categories": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}],
            "bookmarks": [
                {"id": 10, "categoryId": 1, "name": "a1", "url": "http://a1"},
                {"id": 20, "categoryId": 2, "name": "b1", "url": "http://b1"},
                {"id": 11, "categoryId": 1, "name": "a2", "url": "http://a2"},
                {"id": 21, "categoryId": 2, "name": "b2", "url": "http://b2"},
                {"id": 12, "categoryId": 1, "name": "a3", "url": "http://a3"}
            ],
            "collapsedCategories": {"2": true}
        }))
        .unwrap()
    }

    #[test]
    fn given_single_category_when_deleted_then_document_is_empty() {
        let mut doc: Document = serde_json::from_value(json!({
            "categories": [{"id": 1, "name": "A"}],
            "bookmarks": [{"id": 10, "categoryId": 1, "name": "X", "url": "http://x"}]
        }))
        .unwrap();

        doc.delete_category(1).unwrap();

        assert_eq!(
            doc.to_value().unwrap(),
            json!({"categories": [], "bookmarks": [], "collapsedCategories": {}})
        );
    }

    #[test]
    fn given_two_categories_when_delete_one_then_only_its_bookmarks_go() {
        let mut doc = interleaved();

        let removed = doc.delete_category(2).unwrap();

        assert_eq!(ids(&removed), vec![20, 21]);
        assert_eq!(ids(&doc.bookmarks), vec![10, 11, 12]);
        assert!(!doc.collapsed_categories.contains_key(&2));
    }

    #[test]
    fn given_unknown_category_when_delete_then_error_and_unchanged() {
        let mut doc = interleaved();
        let before = doc.clone();
        assert!(matches!(
            doc.delete_category(99),
            Err(DomainError::CategoryNotFound(99))
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn given_group_order_when_reorder_bookmarks_then_other_bookmarks_keep_slots() {
        let mut doc = interleaved();

        doc.reorder_bookmarks(1, &[12, 10, 11]).unwrap();

        assert_eq!(ids(&doc.bookmarks), vec![12, 20, 10, 21, 11]);
    }

    #[test]
    fn given_order_with_foreign_id_when_reorder_bookmarks_then_rejected() {
        let mut doc = interleaved();
        let before = doc.clone();

        let result = doc.reorder_bookmarks(1, &[12, 10, 20]);

        assert!(matches!(result, Err(DomainError::InvalidOrder(_))));
        assert_eq!(doc, before);
    }

    #[test]
    fn given_order_with_missing_id_when_reorder_bookmarks_then_rejected() {
        let mut doc = interleaved();
        assert!(doc.reorder_bookmarks(1, &[12, 10]).is_err());
        assert!(doc.reorder_bookmarks(1, &[12, 10, 10]).is_err());
    }

    #[test]
    fn given_permutation_when_reorder_categories_then_order_replaced() {
        let mut doc = interleaved();
        doc.reorder_categories(&[2, 1]).unwrap();
        let order: Vec<CategoryId> = doc.categories.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![2, 1]);
        // bookmarks untouched
        assert_eq!(ids(&doc.bookmarks), vec![10, 20, 11, 21, 12]);
    }

    #[test]
    fn given_partial_order_when_reorder_categories_then_rejected() {
        let mut doc = interleaved();
        assert!(doc.reorder_categories(&[2]).is_err());
        assert_eq!(doc.categories[0].id, 1);
    }

    #[test]
    fn given_unknown_category_when_add_bookmark_then_rejected() {
        let mut doc = interleaved();
        assert!(matches!(
            doc.add_bookmark(30, 7, "c", "http://c"),
            Err(DomainError::CategoryNotFound(7))
        ));
        assert_eq!(doc.bookmarks.len(), 5);
    }

    #[test]
    fn given_move_to_other_category_when_edit_bookmark_then_position_kept() {
        let mut doc = interleaved();
        let changes = BookmarkChanges {
            category_id: Some(2),
            ..Default::default()
        };

        doc.edit_bookmark(11, &changes).unwrap();

        assert_eq!(doc.bookmarks[2].id, 11);
        assert_eq!(doc.bookmarks[2].category_id, 2);
        assert_eq!(ids(&doc.bookmarks_in(2).cloned().collect::<Vec<_>>()), vec![20, 11, 21]);
    }

    #[test]
    fn given_move_to_missing_category_when_edit_bookmark_then_rejected() {
        let mut doc = interleaved();
        let changes = BookmarkChanges {
            category_id: Some(5),
            ..Default::default()
        };
        assert!(doc.edit_bookmark(11, &changes).is_err());
        assert_eq!(doc.bookmark(11).unwrap().category_id, 1);
    }

    #[test]
    fn given_collapse_all_then_expand_all_when_queried_then_flags_follow() {
        let mut doc = interleaved();
        doc.set_all_collapsed(true);
        assert!(doc.is_collapsed(1) && doc.is_collapsed(2));
        doc.set_all_collapsed(false);
        assert!(!doc.is_collapsed(1) && !doc.is_collapsed(2));
    }

    #[test]
    fn given_collapsed_flag_when_toggled_then_flips() {
        let mut doc = interleaved();
        assert!(!doc.toggle_collapsed(2).unwrap());
        assert!(doc.toggle_collapsed(2).unwrap());
        assert!(doc.toggle_collapsed(42).is_err());
    }

    #[test]
    fn given_value_without_bookmarks_key_when_from_value_then_rejected() {
        let result = Document::from_value(json!({"categories": []}));
        assert!(matches!(result, Err(DomainError::SerializationError(_))));
    }

    #[test]
    fn given_value_without_collapsed_key_when_from_value_then_defaults_to_empty() {
        let doc = Document::from_value(json!({"categories": [], "bookmarks": []})).unwrap();
        assert_eq!(doc, Document::empty());
    }

    #[test]
    fn given_null_collapsed_when_from_value_then_empty_map() {
        let doc = Document::from_value(json!({
            "categories": [{"id": 1, "name": "A"}],
            "bookmarks": [],
            "collapsedCategories": null
        }))
        .unwrap();
        assert_eq!(doc.categories.len(), 1);
        assert!(doc.collapsed_categories.is_empty());
    }

    #[test]
    fn given_non_object_when_has_required_keys_then_false() {
        assert!(!Document::has_required_keys(&json!([1, 2])));
        assert!(!Document::has_required_keys(&json!({"bookmarks": []})));
        assert!(Document::has_required_keys(&json!({"categories": 1, "bookmarks": 2})));
    }

    #[test]
    fn given_orphan_bookmark_when_validate_then_dangling_reference() {
        let mut doc = interleaved();
        doc.bookmarks.push(Bookmark {
            id: 99,
            category_id: 5,
            name: "orphan".to_string(),
            url: "http://o".to_string(),
        });

        assert!(matches!(
            doc.validate(),
            Err(DomainError::DanglingReference {
                bookmark: 99,
                category: 5
            })
        ));
        let orphans = doc.prune_orphans();
        assert_eq!(ids(&orphans), vec![99]);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn given_fallback_document_when_validate_then_consistent() {
        let doc = Document::fallback();
        assert!(doc.validate().is_ok());
        assert_eq!(doc.max_id(), 3);
    }
}
