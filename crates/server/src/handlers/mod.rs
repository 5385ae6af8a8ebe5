//! # API Route Handlers
//!
//! All Axum route handlers for `noterag-server`, split by concern.

pub mod general;
pub mod rag;

// Re-export all handlers so the router can reach them under `handlers::`.
pub use general::*;
pub use rag::*;

use super::{errors::AppError, state::AppState};
