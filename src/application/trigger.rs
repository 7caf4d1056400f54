//! # Trigger Classification
//!
//! Decides whether an incoming status is a request addressed to the bot and,
//! if so, extracts the search query that follows the mentions.

use crate::domain::types::{IncomingMessage, Query};

const RETWEET_MARKER: &str = "RT ";
const ADDRESS_MARKER: char = '@';

/// Returns the query carried by `message`, or `None` when the message must be ignored.
pub fn classify(message: &IncomingMessage, own_handle: &str) -> Option<Query> {
    let body = message.body_text.as_str();
    tracing::info!("@{}: \"{}\"", message.author_handle, body);

    if body.contains(RETWEET_MARKER) {
        tracing::info!("-> Skipped (a retweet).");
        return None;
    }

    let Some(target) = message.in_reply_to_handle.as_deref() else {
        tracing::info!("-> Skipped (neither a mention nor a reply).");
        return None;
    };
    if !body.contains(ADDRESS_MARKER) || !body.contains(char::is_whitespace) {
        tracing::info!("-> Skipped (neither a mention nor a reply).");
        return None;
    }

    if !target.eq_ignore_ascii_case(own_handle) {
        tracing::info!("-> Skipped (neither a mention nor a reply to me).");
        return None;
    }

    let query = Query::new(extract_query(body));
    if query.is_none() {
        tracing::info!("-> Skipped (no search keywords after the mentions).");
    }
    query
}

/// Splits on whitespace once per address marker and keeps the remainder,
/// so bodies with several leading mentions still isolate the trailing text.
fn extract_query(body: &str) -> &str {
    let splits = body.matches(ADDRESS_MARKER).count();
    body.trim_start()
        .splitn(splits + 1, char::is_whitespace)
        .last()
        .unwrap_or_default()
        .trim()
}
