//! Core types and utilities

pub mod error;
pub mod logging;
pub mod types;

pub use error::Error;
pub use types::*;
