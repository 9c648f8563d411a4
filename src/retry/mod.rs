//! Retry Module
//!
//! Exponential-backoff retry for fallible async operations such as data
//! fetches and module loads.

mod executor;
mod policy;

pub use executor::{execute, execute_observed, FailedAttempt};
pub use policy::{RetryPolicy, DEFAULT_BACKOFF_FACTOR, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_ATTEMPTS};
