//! Modules Module
//!
//! Load-state tracking for named UI code modules and the sources that load
//! them.

mod catalog;
mod record;
mod registry;
mod source;

pub use catalog::ModuleCatalog;
pub use record::{ModuleRecord, ModuleState};
pub use registry::ModuleRegistry;
pub use source::{FsModuleSource, ModuleSource};
