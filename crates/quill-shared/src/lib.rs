//! # Quill Shared
//!
//! Wire types of the blog API: request payloads, loosely typed query
//! parameters, response shapes and the response envelope.
//! Kept free of server dependencies so clients can reuse it.

pub mod dto;
pub mod query;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, PageMeta};
