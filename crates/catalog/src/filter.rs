//! Store-side filtering by category and search term.

use std::collections::BTreeSet;

use crate::error::CatalogError;
use crate::record::AppRecord;
use crate::source::CatalogSource;

/// Category value that disables category filtering.
const ALL_CATEGORIES: &str = "all";

/// Category plus free-text search, as selected in the store UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// `None` shows every category.
    pub category: Option<String>,
    /// Lowercased search term; empty matches everything.
    pub search: String,
}

impl CatalogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to `category`. `"all"` clears the restriction.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = (category != ALL_CATEGORIES).then(|| category.to_string());
        self
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.trim().to_lowercase();
        self
    }

    /// Category must match exactly; the search term must appear in the
    /// name or the description, ignoring case.
    pub fn matches(&self, app: &AppRecord) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| app.category == category);

        let search_ok = self.search.is_empty()
            || app.name.to_lowercase().contains(&self.search)
            || app.description.to_lowercase().contains(&self.search);

        category_ok && search_ok
    }

    pub fn apply<'a>(&self, apps: &'a [AppRecord]) -> Vec<&'a AppRecord> {
        apps.iter().filter(|app| self.matches(app)).collect()
    }
}

/// A loaded set of app records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    apps: Vec<AppRecord>,
}

impl Catalog {
    pub fn new(apps: Vec<AppRecord>) -> Self {
        Self { apps }
    }

    /// Loads the catalog from `source`.
    pub async fn load(source: &dyn CatalogSource) -> Result<Self, CatalogError> {
        Ok(Self::new(source.load().await?))
    }

    pub fn apps(&self) -> &[AppRecord] {
        &self.apps
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&AppRecord> {
        filter.apply(&self.apps)
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.apps
            .iter()
            .map(|app| app.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn find_by_filename(&self, filename: &str) -> Option<&AppRecord> {
        self.apps.iter().find(|app| app.filename == filename)
    }
}
