//! Preload Tiers
//!
//! Startup preload plan: modules grouped by how soon they are likely to be
//! needed.

use std::time::Duration;

/// Offset of the medium tier from the end of the high tier.
pub const DEFAULT_MEDIUM_DELAY: Duration = Duration::from_secs(1);
/// Offset of the low tier from the end of the high tier.
pub const DEFAULT_LOW_DELAY: Duration = Duration::from_secs(5);

// == Preload Tiers ==
/// The high tier is loaded first and awaited. The medium and low tiers
/// start `medium_delay` and `low_delay` after it finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct PreloadTiers {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
    pub medium_delay: Duration,
    pub low_delay: Duration,
}

impl PreloadTiers {
    /// Number of modules across all tiers.
    pub fn total(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }
}

impl Default for PreloadTiers {
    /// Most used pages first, occasional ones last.
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            high: names(&["workout", "nutrition"]),
            medium: names(&["sleep", "coach", "dashboard"]),
            low: names(&["settings", "profile", "achievements"]),
            medium_delay: DEFAULT_MEDIUM_DELAY,
            low_delay: DEFAULT_LOW_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let tiers = PreloadTiers::default();
        assert_eq!(tiers.high, vec!["workout", "nutrition"]);
        assert_eq!(tiers.medium, vec!["sleep", "coach", "dashboard"]);
        assert_eq!(tiers.low, vec!["settings", "profile", "achievements"]);
        assert_eq!(tiers.total(), 8);
        assert!(tiers.medium_delay < tiers.low_delay);
    }
}
