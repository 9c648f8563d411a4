//! Module Catalog
//!
//! Static table mapping module names to the page bundle that implements them.

use std::collections::HashMap;

// == Module Catalog ==
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    pages: HashMap<String, String>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the fitness application's lazily loaded pages.
    pub fn fitness() -> Self {
        [
            ("workout", "Workout"),
            ("nutrition", "Nutrition"),
            ("sleep", "Sleep"),
            ("coach", "Coach"),
            ("dashboard", "Dashboard"),
            ("settings", "Settings"),
            ("profile", "Profile"),
            ("onboarding", "Onboarding"),
            ("achievements", "Achievements"),
        ]
        .into_iter()
        .fold(Self::new(), |catalog, (name, page)| catalog.with(name, page))
    }

    /// Adds or replaces a module entry.
    pub fn with(mut self, name: impl Into<String>, page: impl Into<String>) -> Self {
        self.pages.insert(name.into(), page.into());
        self
    }

    /// Page bundle for `name`, if cataloged.
    pub fn page(&self, name: &str) -> Option<&str> {
        self.pages.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }
}
