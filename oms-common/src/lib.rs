//! # Online Movie Store Common Library
//!
//! Shared code for the movie store server and its tooling:
//! - Database schema initialization and queries
//! - Account, Watchlist and Movie records
//! - Free-text canonicalization
//! - Configuration loading

pub mod canonical;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
