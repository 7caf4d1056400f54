//! # Strings Module
//!
//! Centralizes user-facing reply texts and the fixed log lines of the bot.

pub mod logs;
pub mod messages;
