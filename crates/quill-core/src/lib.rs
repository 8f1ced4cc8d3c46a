//! # Quill Core
//!
//! The domain layer of the Quill blog service.
//! Posts, categories, tags, translations and media attachments, the typed
//! listing parameters used to query them, and the ports infrastructure must
//! implement. No database or HTTP dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
