//! AltText.ai REST API client.
//!
//! [`AltTextClient`] exposes one method per upstream endpoint. Every method
//! returns either the decoded record or an [`ApiError`] classified as an HTTP
//! error (status >= 400) or a connection error (status 0).

pub mod client;
pub mod error;
pub mod pagination;
pub mod retry;
pub mod types;

pub use client::{AltTextClient, DEFAULT_BASE_URL};
pub use error::{ApiError, CONNECTION_ERROR_CODE, FieldErrors};
pub use pagination::{Page, Pagination};
pub use types::*;
