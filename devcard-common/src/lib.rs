//! # devcard Common Library
//!
//! Shared code for the development card tool:
//! - Error type
//! - Configuration loading and root folder resolution
//! - Score slots and pupil models
//! - Pupil record store (SQLite)
//! - Date helpers

pub mod config;
pub mod db;
pub mod error;
pub mod scores;
pub mod time;

pub use error::{Error, Result};
pub use scores::{Score, ScoreMap, Slot};
