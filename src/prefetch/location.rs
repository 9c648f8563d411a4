//! Location helpers.

/// Derives the location identifier from a URL path: its first non-empty
/// segment, ignoring any query string or fragment.
///
/// ```
/// use nav_cache::prefetch::location_from_path;
///
/// assert_eq!(location_from_path("/workout/today"), Some("workout"));
/// assert_eq!(location_from_path("/"), None);
/// ```
pub fn location_from_path(path: &str) -> Option<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').find(|segment| !segment.is_empty())
}
