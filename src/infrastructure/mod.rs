//! # Infrastructure Layer
//!
//! Implementations of the domain traits: the Twitter transport
//! (`FeedClient`), the morphological analyzer (`Tokenizer`) and the
//! word cloud rasterizer (`Renderer`).

pub mod morph;
pub mod twitter;
pub mod wordcloud;
