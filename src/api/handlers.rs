//! API Handlers
//!
//! HTTP request handlers exposing the navigation cache to a frontend.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use crate::cache::{shared_cache, SharedCache};
use crate::config::Config;
use crate::error::{NavCacheError, Result};
use crate::models::{
    GetResponse, HealthResponse, InvalidateResponse, ModulesResponse, NavigateRequest,
    NavigateResponse, PreloadRequest, SetRequest, SetResponse, StatsResponse,
};
use crate::modules::{FsModuleSource, ModuleCatalog, ModuleRecord, ModuleRegistry};
use crate::prefetch::{location_from_path, PrefetchScheduler, PreloadSummary};

/// Application state shared across all handlers.
///
/// The cache and the scheduler (with its module registry) are created once
/// and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache<Value>,
    pub scheduler: PrefetchScheduler,
    /// TTL applied to writes that do not carry one
    pub default_ttl: Duration,
}

impl AppState {
    pub fn new(cache: SharedCache<Value>, scheduler: PrefetchScheduler, default_ttl: Duration) -> Self {
        Self {
            cache,
            scheduler,
            default_ttl,
        }
    }

    /// Builds the cache, module registry and scheduler described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = ModuleCatalog::fitness();
        let source = FsModuleSource::new(config.asset_dir.clone(), catalog.clone());
        let scheduler = PrefetchScheduler::new(
            Arc::new(ModuleRegistry::new()),
            Arc::new(source),
            catalog,
            config.adjacency()?,
            config.retry_policy()?,
        )
        .with_delay(config.prefetch_delay())?;

        Ok(Self::new(
            shared_cache(config.cache_capacity()),
            scheduler,
            config.default_ttl(),
        ))
    }

    pub fn registry(&self) -> &ModuleRegistry {
        self.scheduler.registry()
    }
}

/// Handler for PUT /cache
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(NavCacheError::InvalidRequest(error_msg));
    }

    let ttl = req
        .ttl_ms
        .map(Duration::from_millis)
        .unwrap_or(state.default_ttl);
    state.cache.write().await.set(req.key.clone(), req.value, ttl);

    Ok(Json(SetResponse::new(req.key, ttl.as_millis() as u64)))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: a stale read evicts
    let found = state.cache.write().await.get_with_ttl(&key);
    let (value, remaining) = found.ok_or_else(|| NavCacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse {
        key,
        value,
        ttl_remaining_ms: remaining.as_millis() as u64,
    }))
}

/// Handler for DELETE /cache/:key
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.cache.write().await.invalidate(&key);
    Json(InvalidateResponse { key, removed })
}

/// Handler for POST /navigate
///
/// Records the navigation in the cache under `nav_<path>` and schedules
/// preloads of the adjacent modules. Responds before any preload runs.
pub async fn navigate_handler(
    State(state): State<AppState>,
    Json(req): Json<NavigateRequest>,
) -> Result<(StatusCode, Json<NavigateResponse>)> {
    if req.path.is_empty() {
        return Err(NavCacheError::InvalidRequest("Path cannot be empty".to_string()));
    }

    let record = json!({
        "timestamp": Utc::now().timestamp_millis(),
        "from": req.from,
    });
    state
        .cache
        .write()
        .await
        .set(format!("nav_{}", req.path), record, state.default_ttl);

    let location = location_from_path(&req.path).map(str::to_string);
    let scheduled = match &location {
        Some(location) => {
            debug!(location = %location, "navigation");
            state.scheduler.on_location_change(location)
        }
        None => Vec::new(),
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(NavigateResponse {
            location,
            scheduled,
        }),
    ))
}

/// Handler for POST /preload
pub async fn preload_handler(
    State(state): State<AppState>,
    Json(req): Json<PreloadRequest>,
) -> Json<PreloadSummary> {
    Json(state.scheduler.preload_priority(req.modules.as_slice()).await)
}

/// Handler for GET /modules
pub async fn modules_handler(State(state): State<AppState>) -> Json<ModulesResponse> {
    let registry = state.registry();
    Json(ModulesResponse {
        loaded_count: registry.loaded_count(),
        pending_count: registry.pending_count(),
        modules: registry.snapshot(),
    })
}

/// Handler for GET /modules/:name
pub async fn module_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<ModuleRecord> {
    let record = state
        .registry()
        .record(&name)
        .unwrap_or_else(|| ModuleRecord::new(name));
    Json(record)
}

/// Handler for POST /modules/:name/load
///
/// On-demand load: blocks until the module is loaded or every attempt failed.
pub async fn load_module_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ModuleRecord>> {
    state.scheduler.load_now(&name).await?;

    let record = state
        .registry()
        .record(&name)
        .ok_or_else(|| NavCacheError::Internal(format!("no record for loaded module {}", name)))?;
    Ok(Json(record))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await.stats();
    let registry = state.registry();

    Json(StatsResponse::new(
        cache,
        registry.loaded_count(),
        registry.pending_count(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
