//! # Messages
//!
//! User-facing reply texts. Every reply is addressed to the requester with a
//! leading `@handle`, following the feed's reply convention.

pub fn search_results(handle: &str, query: &str, count: usize) -> String {
    format!("@{handle} Search results for \"{query}\" (about {count} tweets)")
}

pub fn no_results(handle: &str, query: &str) -> String {
    format!("@{handle} Your search - {query} - did not match any tweets. Try different keywords.")
}

pub fn internal_error(handle: &str) -> String {
    format!("@{handle} 500 Internal Server Error. Sorry, something went wrong.")
}
