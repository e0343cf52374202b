//! # ITL Common Library
//!
//! Shared code for the ITL tools including:
//! - Error and result types
//! - TOML configuration loading
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
