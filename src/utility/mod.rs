//! Utilities: option handling, `.env` writing and the http get for reading cluster endpoints.
//!
mod utility;

pub use utility::*;
