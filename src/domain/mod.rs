//! # Domain Layer
//!
//! Core definitions, types, and traits that define the business domain of the bot.
//! Independent of the feed provider and the rendering backend.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
