//! Prefetch Scheduler
//!
//! Speculatively loads the modules a user is likely to visit next.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{NavCacheError, Result};
use crate::modules::{ModuleCatalog, ModuleRegistry, ModuleSource};
use crate::prefetch::{AdjacencyMap, PreloadTiers};
use crate::retry::{self, RetryPolicy};
use crate::tasks::spawn_delayed;

/// Wait between a location change and the preloads it triggers, leaving the
/// current page's own load uncontended.
pub const DEFAULT_PREFETCH_DELAY: Duration = Duration::from_secs(1);

/// Receives failures of fire-and-forget preloads: module name and the final
/// error after retries.
pub type ErrorReporter = Arc<dyn Fn(&str, &NavCacheError) + Send + Sync>;

// == Preload Summary ==
/// Outcome of an eager preload, module names in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreloadSummary {
    pub loaded: Vec<String>,
    /// Already loaded before the call
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

impl PreloadSummary {
    /// Appends another summary's names after this one's.
    pub fn absorb(&mut self, other: PreloadSummary) {
        self.loaded.extend(other.loaded);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }
}

// == Prefetch Scheduler ==
/// Ties the adjacency map, the module registry and a module source
/// together. Cloning is cheap and clones share all state.
///
/// Only names in the catalog ever reach the registry or the source.
#[derive(Clone)]
pub struct PrefetchScheduler {
    registry: Arc<ModuleRegistry>,
    source: Arc<dyn ModuleSource>,
    catalog: Arc<ModuleCatalog>,
    adjacency: Arc<AdjacencyMap>,
    policy: RetryPolicy,
    delay: Duration,
    reporter: ErrorReporter,
}

impl PrefetchScheduler {
    // == Constructor ==
    /// Creates a scheduler with [`DEFAULT_PREFETCH_DELAY`] whose background
    /// failures are logged.
    pub fn new(
        registry: Arc<ModuleRegistry>,
        source: Arc<dyn ModuleSource>,
        catalog: ModuleCatalog,
        adjacency: AdjacencyMap,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            registry,
            source,
            catalog: Arc::new(catalog),
            adjacency: Arc::new(adjacency),
            policy,
            delay: DEFAULT_PREFETCH_DELAY,
            reporter: Arc::new(log_preload_failure),
        }
    }

    /// Sets the prefetch delay.
    ///
    /// # Errors
    /// `InvalidPolicy` for a zero delay.
    pub fn with_delay(mut self, delay: Duration) -> Result<Self> {
        if delay.is_zero() {
            return Err(NavCacheError::InvalidPolicy(
                "prefetch delay must be non-zero".to_string(),
            ));
        }
        self.delay = delay;
        Ok(self)
    }

    /// Replaces the default logging of background preload failures.
    pub fn with_error_reporter<R>(mut self, reporter: R) -> Self
    where
        R: Fn(&str, &NavCacheError) + Send + Sync + 'static,
    {
        self.reporter = Arc::new(reporter);
        self
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    pub fn adjacency(&self) -> &AdjacencyMap {
        &self.adjacency
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    // == On Location Change ==
    /// Schedules background preloads of the locations related to `location`
    /// and returns immediately.
    ///
    /// Related modules already loaded or not cataloged are skipped. Each
    /// scheduled preload runs after the prefetch delay; its failures go to
    /// the error reporter and never back to this call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_location_change(&self, location: &str) -> Vec<String> {
        let mut scheduled = Vec::new();

        for next in self.adjacency.related(location) {
            if !self.catalog.contains(next) {
                debug!(module = %next, "adjacent location has no module");
                continue;
            }
            if self.registry.is_loaded(next) {
                debug!(module = %next, "adjacent module already loaded");
                continue;
            }

            let scheduler = self.clone();
            let name = next.clone();
            spawn_delayed(self.delay, async move {
                scheduler.preload_in_background(&name).await;
            });
            scheduled.push(next.clone());
        }

        if !scheduled.is_empty() {
            info!(location, modules = ?scheduled, "adjacent modules scheduled for preload");
        }
        scheduled
    }

    // == Preload Priority ==
    /// Eagerly loads `names` one after another, in order.
    ///
    /// Failures are reported and recorded in the summary; they never stop
    /// the remaining preloads.
    pub async fn preload_priority<S: AsRef<str>>(&self, names: &[S]) -> PreloadSummary {
        let mut summary = PreloadSummary::default();

        for name in names.iter().map(AsRef::as_ref) {
            if self.registry.is_loaded(name) {
                summary.skipped.push(name.to_string());
                continue;
            }

            match self.load_now(name).await {
                Ok(()) => summary.loaded.push(name.to_string()),
                Err(error) => {
                    (self.reporter)(name, &error);
                    summary.failed.push(name.to_string());
                }
            }
        }

        summary
    }

    // == Preload Tiered ==
    /// Loads the high tier in order, then the medium and low tiers after
    /// their delays. Both delays count from the end of the high tier.
    ///
    /// Resolves once every tier has run.
    pub async fn preload_tiered(&self, tiers: &PreloadTiers) -> PreloadSummary {
        let mut summary = self.preload_priority(tiers.high.as_slice()).await;
        info!(
            loaded = summary.loaded.len(),
            failed = summary.failed.len(),
            "high priority modules preloaded"
        );

        let (medium, low) = tokio::join!(
            self.preload_after(tiers.medium_delay, &tiers.medium, "medium"),
            self.preload_after(tiers.low_delay, &tiers.low, "low"),
        );
        summary.absorb(medium);
        summary.absorb(low);
        summary
    }

    async fn preload_after(
        &self,
        delay: Duration,
        names: &[String],
        tier: &str,
    ) -> PreloadSummary {
        if names.is_empty() {
            return PreloadSummary::default();
        }
        tokio::time::sleep(delay).await;
        let summary = self.preload_priority(names).await;
        info!(
            tier,
            loaded = summary.loaded.len(),
            failed = summary.failed.len(),
            "tier preloaded"
        );
        summary
    }

    // == Load Now ==
    /// Loads `name` on demand, retrying per policy, and returns the final
    /// error to the caller.
    ///
    /// # Errors
    /// `UnknownModule` at once, without touching the registry, for names
    /// missing from the catalog.
    pub async fn load_now(&self, name: &str) -> Result<()> {
        if !self.catalog.contains(name) {
            return Err(NavCacheError::UnknownModule(name.to_string()));
        }

        let source = &self.source;
        let policy = &self.policy;
        self.registry
            .ensure_loaded(name, || retry::execute(policy, || source.load(name)))
            .await
    }

    async fn preload_in_background(&self, name: &str) {
        if let Err(error) = self.load_now(name).await {
            (self.reporter)(name, &error);
        }
    }
}

impl fmt::Debug for PrefetchScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefetchScheduler")
            .field("adjacency", &self.adjacency)
            .field("policy", &self.policy)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

fn log_preload_failure(name: &str, error: &NavCacheError) {
    warn!(module = name, error = %error, "preload abandoned");
}
