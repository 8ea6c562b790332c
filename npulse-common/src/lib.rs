//! # NeuralPulse Common Library
//!
//! Shared code for the NeuralPulse learning-path service including:
//! - Flat record model and lesson attachment classification
//! - Hierarchy assembly (tracks → courses → modules → lessons)
//! - Reading time estimation
//! - Database initialization and table fetching
//! - Configuration loading
//! - Utility functions

pub mod config;
pub mod db;
pub mod error;
pub mod hierarchy;
pub mod reading_time;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use hierarchy::{assemble, LessonAttachment, Record, TrackNode};
