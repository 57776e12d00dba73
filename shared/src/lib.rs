//! Shared types and models for the Bakery Management Platform
//!
//! This crate contains the pure domain rules shared between the backend and the
//! frontend (via WASM): purchase-unit normalization, sequential identifiers,
//! stock arithmetic and input validation.

pub mod conversion;
pub mod ids;
pub mod models;
pub mod types;
pub mod validation;

pub use conversion::*;
pub use ids::*;
pub use models::*;
pub use types::*;
pub use validation::*;
