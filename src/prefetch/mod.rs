//! Prefetch Module
//!
//! Adjacency-driven speculative preloading of UI code modules.
//!
//! A location change looks up the related locations in the [`AdjacencyMap`]
//! and schedules a delayed, detached preload for every related module not
//! yet loaded. Each preload goes through the module registry (so it happens
//! at most once) and through the retry executor.

mod adjacency;
mod location;
mod scheduler;
mod tiers;

pub use adjacency::AdjacencyMap;
pub use location::location_from_path;
pub use scheduler::{ErrorReporter, PrefetchScheduler, PreloadSummary, DEFAULT_PREFETCH_DELAY};
pub use tiers::{PreloadTiers, DEFAULT_LOW_DELAY, DEFAULT_MEDIUM_DELAY};
