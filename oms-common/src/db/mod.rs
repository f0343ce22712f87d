//! Database models and queries

pub mod accounts;
pub mod init;
pub mod models;
pub mod movies;
pub mod watchlists;

pub use accounts::*;
pub use init::*;
pub use models::*;
pub use movies::*;
pub use watchlists::*;
