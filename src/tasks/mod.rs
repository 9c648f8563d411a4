//! Background Tasks Module
//!
//! Detached timers used by the prefetch scheduler and the startup warm-up.

mod preload;

pub use preload::{spawn_delayed, spawn_warmup_task};
