//! Utility functions and helpers.

pub mod format;
pub mod http;
pub mod json;
pub mod url;

pub use self::url::{Endpoints, validate_identifier};
