//! service-core: Shared infrastructure for the signing workspace services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod response;
