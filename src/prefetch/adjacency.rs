//! Adjacency Map
//!
//! Static table of which locations usually follow the current one.

use std::collections::HashMap;

use crate::error::{NavCacheError, Result};

// == Adjacency Map ==
/// Location -> related locations, in prefetch priority order.
///
/// Related lists behave as ordered sets: the first insertion of a location
/// fixes its position and repeats are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyMap {
    edges: HashMap<String, Vec<String>>,
}

impl AdjacencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigation flow of the fitness application.
    pub fn fitness() -> Self {
        Self::new()
            .with("workout", ["nutrition", "coach"])
            .with("nutrition", ["workout", "sleep"])
            .with("sleep", ["nutrition", "dashboard"])
            .with("coach", ["workout", "nutrition"])
            .with("dashboard", ["workout", "nutrition"])
    }

    /// Appends `related` to the list of `location`.
    pub fn with<I, S>(mut self, location: impl Into<String>, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = self.edges.entry(location.into()).or_default();
        for next in related {
            let next = next.into();
            if !list.contains(&next) {
                list.push(next);
            }
        }
        self
    }

    // == Parse ==
    /// Parses `"workout=nutrition,coach;sleep=nutrition,dashboard"`.
    ///
    /// Whitespace around names is ignored, as are empty groups.
    pub fn parse(text: &str) -> Result<Self> {
        let mut map = Self::new();
        for group in text.split(';').map(str::trim).filter(|g| !g.is_empty()) {
            let (location, related) = group.split_once('=').ok_or_else(|| {
                NavCacheError::InvalidRequest(format!(
                    "adjacency group '{}' is missing '='",
                    group
                ))
            })?;

            let location = location.trim();
            if location.is_empty() {
                return Err(NavCacheError::InvalidRequest(format!(
                    "adjacency group '{}' has an empty location",
                    group
                )));
            }

            let related = related.split(',').map(str::trim).filter(|r| !r.is_empty());
            map = map.with(location, related);
        }
        Ok(map)
    }

    /// Related locations of `location`, empty when it has none.
    pub fn related(&self, location: &str) -> &[String] {
        self.edges.get(location).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
