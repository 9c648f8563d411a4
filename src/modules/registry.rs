//! Module Registry
//!
//! Process-wide record of which named code modules are loaded, with
//! idempotent loading and de-duplication of concurrent loads.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::modules::{ModuleRecord, ModuleState};

/// Outcome of an in-flight load: `None` while running, then success flag.
type Settled = Option<bool>;

#[derive(Debug, Default)]
struct RegistryInner {
    records: HashMap<String, ModuleRecord>,
    in_flight: HashMap<String, watch::Receiver<Settled>>,
}

enum Claim {
    AlreadyLoaded,
    Wait(watch::Receiver<Settled>),
    Load(watch::Sender<Settled>),
}

// == Module Registry ==
/// Tracks module load state by name.
///
/// Each operation touches a single name and holds the internal lock only for
/// a read-then-write with no await point inside, so operations are atomic
/// per name.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    inner: Mutex<RegistryInner>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Ensure Loaded ==
    /// Makes sure `name` is loaded, invoking `loader` at most once per call.
    ///
    /// - Already loaded: returns `Ok(())` without calling `loader`.
    /// - Load in flight elsewhere: waits for it. If it succeeded returns
    ///   `Ok(())`; if it failed, starts a fresh load with this `loader`.
    /// - Otherwise runs `loader`; success marks the module loaded, failure
    ///   resets it and returns the loader's error unchanged.
    pub async fn ensure_loaded<F, Fut, E>(&self, name: &str, loader: F) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        loop {
            match self.claim(name) {
                Claim::AlreadyLoaded => {
                    debug!(module = name, "module already loaded");
                    return Ok(());
                }
                Claim::Wait(mut settled) => {
                    debug!(module = name, "waiting for in-flight load");
                    // An error means the loading task went away; its guard has
                    // already reset the record, so re-check from the top.
                    let _ = settled.wait_for(Option::is_some).await;
                }
                Claim::Load(sender) => return self.run_load(name, sender, loader).await,
            }
        }
    }

    // == Queries ==
    pub fn is_loaded(&self, name: &str) -> bool {
        self.state(name) == ModuleState::Loaded
    }

    /// Current state; names never referenced report `NotLoaded`.
    pub fn state(&self, name: &str) -> ModuleState {
        self.lock()
            .records
            .get(name)
            .map(|record| record.state)
            .unwrap_or(ModuleState::NotLoaded)
    }

    pub fn record(&self, name: &str) -> Option<ModuleRecord> {
        self.lock().records.get(name).cloned()
    }

    /// Every known record, sorted by name.
    pub fn snapshot(&self) -> Vec<ModuleRecord> {
        let mut records: Vec<ModuleRecord> = self.lock().records.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    pub fn loaded_count(&self) -> usize {
        self.count_in(ModuleState::Loaded)
    }

    /// Number of loads currently in flight.
    pub fn pending_count(&self) -> usize {
        self.count_in(ModuleState::Loading)
    }

    fn count_in(&self, state: ModuleState) -> usize {
        self.lock()
            .records
            .values()
            .filter(|record| record.state == state)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(&self, name: &str) -> Claim {
        let mut inner = self.lock();
        let inner = &mut *inner;
        let record = inner
            .records
            .entry(name.to_string())
            .or_insert_with(|| ModuleRecord::new(name));

        if record.state == ModuleState::Loaded {
            return Claim::AlreadyLoaded;
        }
        if record.state == ModuleState::Loading {
            if let Some(receiver) = inner.in_flight.get(name) {
                return Claim::Wait(receiver.clone());
            }
        }

        record.state = ModuleState::Loading;
        record.load_attempts += 1;
        let (sender, receiver) = watch::channel(None);
        inner.in_flight.insert(name.to_string(), receiver);
        Claim::Load(sender)
    }

    async fn run_load<F, Fut, E>(
        &self,
        name: &str,
        sender: watch::Sender<Settled>,
        loader: F,
    ) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let mut guard = LoadGuard {
            registry: self,
            name,
            sender: Some(sender),
        };
        let started = Instant::now();

        let result = loader().await;
        let load_time_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(()) => {
                guard.settle(Some(load_time_ms));
                info!(module = name, load_time_ms, "module loaded");
            }
            Err(error) => {
                guard.settle(None);
                warn!(module = name, error = %error, "module load failed");
            }
        }
        result
    }

    fn finish(&self, name: &str, load_time_ms: Option<u64>) {
        let mut inner = self.lock();
        inner.in_flight.remove(name);
        if let Some(record) = inner.records.get_mut(name) {
            match load_time_ms {
                Some(ms) => {
                    record.state = ModuleState::Loaded;
                    record.load_time_ms = Some(ms);
                    record.loaded_at = Some(Utc::now());
                }
                None => record.state = ModuleState::NotLoaded,
            }
        }
    }
}

/// Settles an in-flight load exactly once, resetting the module if the
/// loading future is dropped before it completes.
struct LoadGuard<'a> {
    registry: &'a ModuleRegistry,
    name: &'a str,
    sender: Option<watch::Sender<Settled>>,
}

impl LoadGuard<'_> {
    fn settle(&mut self, load_time_ms: Option<u64>) {
        if let Some(sender) = self.sender.take() {
            self.registry.finish(self.name, load_time_ms);
            sender.send_replace(Some(load_time_ms.is_some()));
        }
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.sender.is_some() {
            debug!(module = self.name, "load abandoned before completion");
            self.settle(None);
        }
    }
}
