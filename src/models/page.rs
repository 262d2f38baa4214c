use serde::{Deserialize, Serialize};

/// Pagination envelope returned by every list endpoint.
///
/// `pages` can be missing or `null` when the collection is empty; that is
/// treated as a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl<T> Page<T> {
    /// Total number of pages, never less than one.
    pub fn page_count(&self) -> u32 {
        self.pages.unwrap_or(1).max(1)
    }
}
