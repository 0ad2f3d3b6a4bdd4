//! Catalog site addressing.
//!
//! Checks address the catalog two ways: a bib record by its opaque id
//! (`{root}/b2498067`) and a search by its raw query string
//! (`{root}?f[format][]=Archives/Manuscripts&q=yoken`). `CatalogSite` builds
//! both from a root URL so the same fixture table can run against a local
//! Blacklight, a staging host, or production.

use std::fmt;

/// A catalog deployment that checks can navigate to.
pub trait CatalogSite: Send + Sync {
    /// Returns the catalog root (e.g., `<https://search.library.brown.edu/catalog>`).
    fn base_url(&self) -> &str;

    /// Joins a path onto the root with exactly one slash between them.
    fn url(&self, path: &str) -> String {
        let base = self.base_url().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// URL of a bib record page.
    ///
    /// `limit_all` appends `?limit=false`, which asks Blacklight to render
    /// every item row instead of the first page of holdings.
    fn record_url(&self, bib: &str, limit_all: bool) -> String {
        let url = self.url(bib);
        if limit_all {
            format!("{url}?limit=false")
        } else {
            url
        }
    }

    /// URL of a search-results page for a raw query string.
    fn search_url(&self, query: &str) -> String {
        let base = self.base_url().trim_end_matches('/');
        let query = query.trim_start_matches('?').replace(' ', "%20");
        format!("{base}?{query}")
    }
}

impl fmt::Debug for dyn CatalogSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogSite")
            .field("base_url", &self.base_url())
            .finish()
    }
}

/// A catalog at a fixed root URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCatalog {
    base_url: String,
}

impl StaticCatalog {
    /// Creates a catalog rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl CatalogSite for StaticCatalog {
    fn base_url(&self) -> &str {
        &self.base_url
    }
}
