//! # Application Layer
//!
//! The reply pipeline and its steps: trigger classification, paged search,
//! frequency aggregation, reply composition, plus logging setup.

pub mod frequency;
pub mod handler;
pub mod logging;
pub mod reply;
pub mod search;
pub mod trigger;
