//! Request and Response models for the navigation cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{NavigateRequest, PreloadRequest, SetRequest, MAX_KEY_LENGTH};
pub use responses::{
    GetResponse, HealthResponse, InvalidateResponse, ModulesResponse, NavigateResponse,
    SetResponse, StatsResponse,
};
