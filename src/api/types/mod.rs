//! HTTP request and response types

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse};
pub use json::{Json, Query};
