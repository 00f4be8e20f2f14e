//! # E-Players Common Library
//!
//! Shared code for the E-Players roster service including:
//! - Team and player records
//! - The semicolon-delimited row codec
//! - The file-backed record store
//! - Configuration and root folder resolution

pub mod config;
pub mod error;
pub mod models;
pub mod row;
pub mod store;

pub use error::{Error, Result};
pub use models::{Player, Record, Team};
pub use store::RecordStore;
