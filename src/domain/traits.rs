//! # Domain Traits
//!
//! Abstract interfaces for the collaborators around the reply pipeline
//! (feed transport, morphological analysis, image rendering).
//! Implementations live in the Infrastructure layer and are injected as `Arc<dyn _>`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::error::{FeedError, RenderError};
use crate::domain::types::{
    FrequencyMap, OutboundReply, SearchPage, SearchRequest, StyleOptions, TokenStream,
};

/// Authenticated handle on the social feed. Read-only after construction,
/// safe to share between tasks.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Verify the credentials and return the account's own handle.
    async fn own_handle(&self) -> Result<String, FeedError>;

    /// Fetch a single page of search results.
    async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage, FeedError>;

    /// Post a reply, optionally with an image attached.
    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), FeedError>;
}

/// Turns raw text into (surface, part of speech, base form) tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize<'a>(&'a self, text: &'a str) -> TokenStream<'a>;
}

/// Renders a frequency map into an image file.
pub trait Renderer: Send + Sync {
    fn render(
        &self,
        frequencies: &FrequencyMap,
        style: &StyleOptions,
        output: &Path,
    ) -> Result<PathBuf, RenderError>;
}
