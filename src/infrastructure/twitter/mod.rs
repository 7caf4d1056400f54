//! # Twitter Transport
//!
//! OAuth 1.0a signed REST calls and the filter stream listener.

pub mod client;
pub mod oauth;
pub mod stream;

pub use client::TwitterClient;
pub use stream::listen;
