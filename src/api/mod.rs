//! API Module
//!
//! HTTP handlers and routing through which a frontend drives the
//! navigation cache. See [`create_router`] for the endpoint list.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
