//! # Domain Types
//!
//! Common data structures and enums used across the reply pipeline.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::error::FeedError;

/// Identifier of a status on the feed.
pub type MessageId = u64;

/// Weighted term -> score map that drives the word cloud.
pub type FrequencyMap = HashMap<String, u64>;

/// A status delivered by the feed listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub id: MessageId,
    pub author_handle: String,
    pub body_text: String,
    pub in_reply_to_handle: Option<String>,
}

/// Events produced by the feed listener, handled by a single dispatcher.
#[derive(Debug)]
pub enum FeedEvent {
    Status(IncomingMessage),
    Error(FeedError),
}

/// Search text extracted from an addressed message. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into().trim().to_string();
        if text.is_empty() { None } else { Some(Self(text)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Adjective,
    Verb,
    Noun,
    Adverb,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub surface: String,
    pub part_of_speech: PartOfSpeech,
    pub base_form: String,
}

impl Token {
    pub fn new(
        surface: impl Into<String>,
        part_of_speech: PartOfSpeech,
        base_form: impl Into<String>,
    ) -> Self {
        Self {
            surface: surface.into(),
            part_of_speech,
            base_form: base_form.into(),
        }
    }

    /// A token whose base form is its surface (nouns, symbols, particles).
    pub fn plain(surface: impl Into<String>, part_of_speech: PartOfSpeech) -> Self {
        let surface = surface.into();
        Self {
            base_form: surface.clone(),
            surface,
            part_of_speech,
        }
    }
}

/// Lazy token sequence returned by a tokenizer.
pub type TokenStream<'a> = Box<dyn Iterator<Item = Token> + Send + 'a>;

/// One page request against the feed's search capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub language: String,
    pub count: usize,
    pub max_id: Option<MessageId>,
}

/// One page of search results, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub bodies: Vec<String>,
    /// `max_id` for the next (older) page, `None` when this page was empty.
    pub next_max_id: Option<MessageId>,
}

/// A reply ready to be handed to the send collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub in_reply_to: MessageId,
    pub text: String,
    pub image: Option<PathBuf>,
}

/// Visual options passed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOptions {
    pub background: String,
    pub width: u32,
    pub height: u32,
    pub min_font_size: u32,
    pub max_font_size: Option<u32>,
    pub max_words: usize,
    pub font_path: PathBuf,
}

/// Result of one pipeline run; exactly one per accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Success { text: String, image: PathBuf },
    NoResults { text: String },
    Failure { text: String },
}

impl ReplyOutcome {
    pub fn text(&self) -> &str {
        match self {
            ReplyOutcome::Success { text, .. }
            | ReplyOutcome::NoResults { text }
            | ReplyOutcome::Failure { text } => text,
        }
    }

    pub fn image(&self) -> Option<&Path> {
        match self {
            ReplyOutcome::Success { image, .. } => Some(image),
            _ => None,
        }
    }

    pub fn to_reply(&self, in_reply_to: MessageId) -> OutboundReply {
        OutboundReply {
            in_reply_to,
            text: self.text().to_string(),
            image: self.image().map(Path::to_path_buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims_and_rejects_blank() {
        assert_eq!(Query::new("  ramen ").unwrap().as_str(), "ramen");
        assert!(Query::new("   ").is_none());
        assert!(Query::new("").is_none());
    }

    #[test]
    fn test_outcome_to_reply() {
        let outcome = ReplyOutcome::Success {
            text: "hi".to_string(),
            image: PathBuf::from("/tmp/1.png"),
        };
        let reply = outcome.to_reply(7);
        assert_eq!(reply.in_reply_to, 7);
        assert_eq!(reply.image.as_deref(), Some(Path::new("/tmp/1.png")));

        let reply = ReplyOutcome::Failure { text: "x".to_string() }.to_reply(7);
        assert!(reply.image.is_none());
    }
}
