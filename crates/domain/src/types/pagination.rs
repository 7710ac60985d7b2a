//! Paged list wire types
//!
//! Every list endpoint answers with `{"items": [...], "_links": {...}}`. The
//! absence of `_links.next` marks the last page.

use serde::{Deserialize, Serialize};

/// A navigation pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// Named navigation pointers of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
}

/// One page of a list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl<T> PagedResult<T> {
    /// A page with no navigation links.
    pub fn new(items: Vec<T>) -> Self {
        Self { items, links: None }
    }

    /// Href of the following page, if any.
    pub fn next_href(&self) -> Option<&str> {
        self.links.as_ref()?.next.as_ref().map(|link| link.href.as_str())
    }

    /// Href of the preceding page, if any.
    pub fn previous_href(&self) -> Option<&str> {
        self.links.as_ref()?.previous.as_ref().map(|link| link.href.as_str())
    }

    pub fn has_next(&self) -> bool {
        self.next_href().is_some()
    }
}
