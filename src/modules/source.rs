//! Module Sources
//!
//! The collaborator that actually performs a module load.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{NavCacheError, Result};
use crate::modules::ModuleCatalog;

// == Module Source ==
/// Loads a named code module. A load may fail and is safe to retry.
#[async_trait]
pub trait ModuleSource: Send + Sync {
    async fn load(&self, name: &str) -> Result<()>;
}

// == Filesystem Source ==
/// Loads page bundles from disk: `<root>/<Page>.js`, where `Page` comes from
/// the catalog.
#[derive(Debug, Clone)]
pub struct FsModuleSource {
    root: PathBuf,
    catalog: ModuleCatalog,
}

impl FsModuleSource {
    pub fn new(root: impl Into<PathBuf>, catalog: ModuleCatalog) -> Self {
        Self {
            root: root.into(),
            catalog,
        }
    }

    /// Path of the bundle backing `name`.
    pub fn bundle_path(&self, name: &str) -> Result<PathBuf> {
        let page = self
            .catalog
            .page(name)
            .ok_or_else(|| NavCacheError::UnknownModule(name.to_string()))?;
        Ok(self.root.join(format!("{}.js", page)))
    }
}

#[async_trait]
impl ModuleSource for FsModuleSource {
    async fn load(&self, name: &str) -> Result<()> {
        let path = self.bundle_path(name)?;
        let bundle = tokio::fs::read(&path)
            .await
            .map_err(|e| NavCacheError::load_failed(name, format!("{}: {}", path.display(), e)))?;
        debug!(module = name, bytes = bundle.len(), "bundle read");
        Ok(())
    }
}
