//! Configuration Module
//!
//! Loads the service configuration from environment variables and turns it
//! into the plain values the core components take.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::prefetch::{AdjacencyMap, PreloadTiers};
use crate::retry::RetryPolicy;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in milliseconds for cache writes that do not specify one
    pub default_ttl_ms: u64,
    /// Cache capacity bound, 0 = unbounded
    pub cache_max_entries: usize,
    /// Attempts per fetch or module load, including the first
    pub retry_max_attempts: u32,
    /// Wait before the first retry in milliseconds
    pub retry_initial_delay_ms: u64,
    /// Multiplier applied to the wait after each retry
    pub retry_backoff_factor: f64,
    /// Delay between a navigation and the preloads it triggers
    pub prefetch_delay_ms: u64,
    /// Delay before the startup warm-up starts
    pub warmup_delay_ms: u64,
    /// Modules loaded first and awaited during warm-up
    pub preload_high: Vec<String>,
    /// Modules loaded after the medium delay
    pub preload_medium: Vec<String>,
    /// Modules loaded after the low delay
    pub preload_low: Vec<String>,
    /// Medium tier offset from the end of the high tier, in milliseconds
    pub preload_medium_delay_ms: u64,
    /// Low tier offset from the end of the high tier, in milliseconds
    pub preload_low_delay_ms: u64,
    /// Directory holding the page bundles
    pub asset_dir: PathBuf,
    /// Adjacency map in `loc=a,b;loc2=c` form, fitness flow when unset
    pub adjacency_map: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL_MS` - Default cache TTL (default: 300000)
    /// - `CACHE_MAX_ENTRIES` - Cache capacity, 0 for unbounded (default: 0)
    /// - `RETRY_MAX_ATTEMPTS` - Attempts per operation (default: 4)
    /// - `RETRY_INITIAL_DELAY_MS` - First retry delay (default: 300)
    /// - `RETRY_BACKOFF_FACTOR` - Delay multiplier (default: 2.0)
    /// - `PREFETCH_DELAY_MS` - Adjacent preload delay (default: 1000)
    /// - `WARMUP_DELAY_MS` - Startup warm-up delay (default: 2000)
    /// - `PRELOAD_HIGH` - High priority modules (default: workout,nutrition)
    /// - `PRELOAD_MEDIUM` - Medium priority modules (default: sleep,coach,dashboard)
    /// - `PRELOAD_LOW` - Low priority modules (default: settings,profile,achievements)
    /// - `PRELOAD_MEDIUM_DELAY_MS` - Medium tier delay (default: 1000)
    /// - `PRELOAD_LOW_DELAY_MS` - Low tier delay (default: 5000)
    /// - `ASSET_DIR` - Page bundle directory (default: ./dist/pages)
    /// - `ADJACENCY_MAP` - Custom adjacency map (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            default_ttl_ms: parse_var("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.cache_max_entries),
            retry_max_attempts: parse_var("RETRY_MAX_ATTEMPTS")
                .unwrap_or(defaults.retry_max_attempts),
            retry_initial_delay_ms: parse_var("RETRY_INITIAL_DELAY_MS")
                .unwrap_or(defaults.retry_initial_delay_ms),
            retry_backoff_factor: parse_var("RETRY_BACKOFF_FACTOR")
                .unwrap_or(defaults.retry_backoff_factor),
            prefetch_delay_ms: parse_var("PREFETCH_DELAY_MS").unwrap_or(defaults.prefetch_delay_ms),
            warmup_delay_ms: parse_var("WARMUP_DELAY_MS").unwrap_or(defaults.warmup_delay_ms),
            preload_high: list_var("PRELOAD_HIGH").unwrap_or(defaults.preload_high),
            preload_medium: list_var("PRELOAD_MEDIUM").unwrap_or(defaults.preload_medium),
            preload_low: list_var("PRELOAD_LOW").unwrap_or(defaults.preload_low),
            preload_medium_delay_ms: parse_var("PRELOAD_MEDIUM_DELAY_MS")
                .unwrap_or(defaults.preload_medium_delay_ms),
            preload_low_delay_ms: parse_var("PRELOAD_LOW_DELAY_MS")
                .unwrap_or(defaults.preload_low_delay_ms),
            asset_dir: env::var("ASSET_DIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.asset_dir),
            adjacency_map: env::var("ADJACENCY_MAP").ok().filter(|v| !v.trim().is_empty()),
        }
    }

    /// Validated retry policy built from the retry settings.
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_initial_delay_ms),
            self.retry_backoff_factor,
        )
    }

    /// Adjacency map from `adjacency_map`, or the fitness flow.
    pub fn adjacency(&self) -> Result<AdjacencyMap> {
        match &self.adjacency_map {
            Some(text) => AdjacencyMap::parse(text),
            None => Ok(AdjacencyMap::fitness()),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn prefetch_delay(&self) -> Duration {
        Duration::from_millis(self.prefetch_delay_ms)
    }

    pub fn warmup_delay(&self) -> Duration {
        Duration::from_millis(self.warmup_delay_ms)
    }

    /// Warm-up plan from the `preload_*` settings.
    pub fn preload_tiers(&self) -> PreloadTiers {
        PreloadTiers {
            high: self.preload_high.clone(),
            medium: self.preload_medium.clone(),
            low: self.preload_low.clone(),
            medium_delay: Duration::from_millis(self.preload_medium_delay_ms),
            low_delay: Duration::from_millis(self.preload_low_delay_ms),
        }
    }

    /// Capacity bound for the cache, `None` when unbounded.
    pub fn cache_capacity(&self) -> Option<usize> {
        (self.cache_max_entries > 0).then_some(self.cache_max_entries)
    }
}

impl Default for Config {
    fn default() -> Self {
        let tiers = PreloadTiers::default();
        Self {
            server_port: 3000,
            default_ttl_ms: 5 * 60 * 1000,
            cache_max_entries: 0,
            retry_max_attempts: 4,
            retry_initial_delay_ms: 300,
            retry_backoff_factor: 2.0,
            prefetch_delay_ms: 1000,
            warmup_delay_ms: 2000,
            preload_high: tiers.high,
            preload_medium: tiers.medium,
            preload_low: tiers.low,
            preload_medium_delay_ms: tiers.medium_delay.as_millis() as u64,
            preload_low_delay_ms: tiers.low_delay.as_millis() as u64,
            asset_dir: PathBuf::from("./dist/pages"),
            adjacency_map: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn list_var(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|v| split_list(&v))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
