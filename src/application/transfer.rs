// src/application/transfer.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::document::Document;
use chrono::NaiveDate;
use serde_json::Value;

/// Key of the drag toggle older backups carry alongside the document
const ALLOW_DRAGGING_KEY: &str = "allowDraggingCategories";

/// A backup that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDocument {
    pub document: Document,
    pub allow_dragging: Option<bool>,
}

/// `navigator_backup_YYYYMMDD.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("navigator_backup_{}.json", date.format("%Y%m%d"))
}

/// Validates raw backup content.
///
/// Requires a JSON object with both `categories` and `bookmarks`, entries of
/// the right shape, and no bookmark pointing at a missing category.
pub fn parse_import(value: Value) -> ApplicationResult<ImportedDocument> {
    let allow_dragging = value.get(ALLOW_DRAGGING_KEY).and_then(Value::as_bool);
    let document =
        Document::from_value(value).map_err(|e| ApplicationError::Import(e.to_string()))?;
    document
        .validate()
        .map_err(|e| ApplicationError::Import(e.to_string()))?;
    Ok(ImportedDocument {
        document,
        allow_dragging,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn given_date_when_backup_file_name_then_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(backup_file_name(date), "navigator_backup_20260307.json");
    }

    #[rstest]
    #[case(json!({"categories": []}))]
    #[case(json!({"bookmarks": []}))]
    #[case(json!([]))]
    #[case(json!("categories bookmarks"))]
    #[case(json!({"categories": [{"id": "x", "name": "A"}], "bookmarks": []}))]
    #[case(json!({"categories": [], "bookmarks": [{"id": 1, "categoryId": 9, "name": "o", "url": "http://o"}]}))]
    fn given_malformed_backup_when_parse_then_import_rejected(#[case] value: Value) {
        assert!(matches!(
            parse_import(value),
            Err(ApplicationError::Import(_))
        ));
    }

    #[test]
    fn given_backup_with_drag_toggle_when_parse_then_toggle_surfaced() {
        let imported = parse_import(json!({
            "categories": [{"id": 1, "name": "A"}],
            "bookmarks": [{"id": 2, "categoryId": 1, "name": "b", "url": "http://b"}],
            "allowDraggingCategories": true
        }))
        .unwrap();

        assert_eq!(imported.allow_dragging, Some(true));
        assert_eq!(imported.document.categories.len(), 1);
        assert!(imported.document.collapsed_categories.is_empty());
    }

    #[test]
    fn given_exported_document_when_parsed_back_then_identical() {
        let mut doc = Document::fallback();
        doc.set_collapsed(2, true).unwrap();
        let exported = serde_json::to_string_pretty(&doc).unwrap();

        let imported = parse_import(serde_json::from_str(&exported).unwrap()).unwrap();

        assert_eq!(imported.document, doc);
        assert_eq!(imported.allow_dragging, None);
    }
}
