//! Wire model for the identifiers endpoint
//!
//! Success bodies look like:
//!
//! ```json
//! { "items": [{"id": "client-1"}, {"id": "client-2"}], "links": {"next": "opaque"} }
//! ```
//!
//! `links` and `links.next` may be absent or null; an absent next cursor is
//! the authoritative end-of-pagination signal.

use crate::types::{Cursor, Identifier};
use serde::Deserialize;

/// One server response: an ordered batch of identifiers plus an optional
/// continuation cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Identifiers in server-return order; may be empty
    pub items: Vec<Identifier>,
    /// Cursor for the next page; `None` means no further pages
    pub next: Option<Cursor>,
}

impl Page {
    /// Whether this is the final page of the collection
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Raw response body for a page of identifiers
#[derive(Debug, Deserialize)]
pub(crate) struct IdentifierList {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub links: Option<Links>,
}

/// One entry in the `items` array; extra fields are ignored
#[derive(Debug, Deserialize)]
pub(crate) struct Item {
    pub id: String,
}

/// Pagination links block
#[derive(Debug, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub next: Option<String>,
}

impl From<IdentifierList> for Page {
    fn from(list: IdentifierList) -> Self {
        Self {
            items: list.items.into_iter().map(|item| item.id).collect(),
            next: list.links.and_then(|links| links.next),
        }
    }
}

#[cfg(test)]
mod wire_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_page_with_cursor() {
        let body = r#"{"items":[{"id":"client-1"},{"id":"client-2"}],"links":{"next":"c0urs0r"}}"#;
        let list: IdentifierList = serde_json::from_str(body).unwrap();
        let page = Page::from(list);

        assert_eq!(page.items, vec!["client-1", "client-2"]);
        assert_eq!(page.next.as_deref(), Some("c0urs0r"));
        assert!(!page.is_last());
    }

    #[test]
    fn test_parse_last_page_without_links() {
        let body = r#"{"items":[{"id":"client-ݰ"}]}"#;
        let list: IdentifierList = serde_json::from_str(body).unwrap();
        let page = Page::from(list);

        assert_eq!(page.items, vec!["client-ݰ"]);
        assert!(page.is_last());
    }

    #[test]
    fn test_parse_null_next_is_last_page() {
        let body = r#"{"items":[{"id":"a"}],"links":{"next":null}}"#;
        let list: IdentifierList = serde_json::from_str(body).unwrap();
        let page = Page::from(list);

        assert!(page.is_last());
    }

    #[test]
    fn test_parse_empty_collection() {
        let body = r#"{"items":[]}"#;
        let list: IdentifierList = serde_json::from_str(body).unwrap();
        let page = Page::from(list);

        assert!(page.items.is_empty());
        assert!(page.is_last());
    }

    #[test]
    fn test_extra_item_fields_are_ignored() {
        let body = r#"{"items":[{"id":"a","connected":true}],"links":{"next":"n"}}"#;
        let list: IdentifierList = serde_json::from_str(body).unwrap();
        let page = Page::from(list);

        assert_eq!(page.items, vec!["a"]);
    }
}
