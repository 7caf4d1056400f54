//! # Reply Composer
//!
//! Builds the single outcome of a pipeline run. Pure: sending is the
//! orchestrator's job.

use std::path::PathBuf;

use crate::domain::types::{Query, ReplyOutcome};
use crate::strings::messages;

pub struct ReplyComposer<'a> {
    requester: &'a str,
}

impl<'a> ReplyComposer<'a> {
    pub fn new(requester: &'a str) -> Self {
        Self { requester }
    }

    pub fn success(&self, query: &Query, result_count: usize, image: PathBuf) -> ReplyOutcome {
        ReplyOutcome::Success {
            text: messages::search_results(self.requester, query.as_str(), result_count),
            image,
        }
    }

    pub fn no_results(&self, query: &Query) -> ReplyOutcome {
        ReplyOutcome::NoResults {
            text: messages::no_results(self.requester, query.as_str()),
        }
    }

    pub fn failure(&self) -> ReplyOutcome {
        ReplyOutcome::Failure {
            text: messages::internal_error(self.requester),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_text() {
        let query = Query::new("ラーメン").unwrap();
        let outcome = ReplyComposer::new("alice").success(&query, 42, PathBuf::from("/tmp/1.png"));
        assert_eq!(outcome.text(), "@alice Search results for \"ラーメン\" (about 42 tweets)");
        assert_eq!(outcome.image(), Some(std::path::Path::new("/tmp/1.png")));
    }

    #[test]
    fn test_no_results_text() {
        let query = Query::new("ramen").unwrap();
        let outcome = ReplyComposer::new("alice").no_results(&query);
        assert_eq!(
            outcome,
            ReplyOutcome::NoResults {
                text: "@alice Your search - ramen - did not match any tweets. Try different keywords."
                    .to_string()
            }
        );
    }

    #[test]
    fn test_failure_text_is_addressed() {
        let outcome = ReplyComposer::new("alice").failure();
        assert!(outcome.text().starts_with("@alice "));
        assert!(outcome.image().is_none());
    }
}
