//! Response models for the operational endpoints
//!
//! DTOs serialized as JSON by the health and stats handlers.

pub mod responses;

pub use responses::{HealthResponse, StatsResponse};
