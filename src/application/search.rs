//! # Search Retriever
//!
//! Pages through the feed's search results for a query. Rate limiting is never
//! surfaced: the identical page request is re-issued after a fixed backoff until
//! it goes through. Every other failure is returned immediately.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::config::SearchConfig;
use crate::domain::error::FeedError;
use crate::domain::traits::FeedClient;
use crate::domain::types::{Query, SearchPage, SearchRequest};

/// Upper bound on results accepted from configuration.
pub const MAX_RESULTS_LIMIT: usize = 1000;

pub struct SearchRetriever {
    client: Arc<dyn FeedClient>,
    language: String,
    page_size: usize,
    backoff: Duration,
}

impl SearchRetriever {
    pub fn new(client: Arc<dyn FeedClient>, language: impl Into<String>, page_size: usize, backoff: Duration) -> Self {
        Self {
            client,
            language: language.into(),
            page_size: page_size.max(1),
            backoff,
        }
    }

    pub fn from_config(client: Arc<dyn FeedClient>, config: &SearchConfig) -> Self {
        Self::new(
            client,
            config.language.clone(),
            config.page_size,
            Duration::from_secs(config.rate_limit_backoff_secs),
        )
    }

    /// Collect up to `max_results` message bodies matching `query`, newest first.
    /// An empty vector means nothing matched.
    pub async fn search(&self, query: &Query, max_results: usize) -> Result<Vec<String>, FeedError> {
        let max_results = max_results.min(MAX_RESULTS_LIMIT);
        tracing::info!("Searching \"{}\"...", query);

        let mut bodies = Vec::new();
        let mut max_id = None;

        while bodies.len() < max_results {
            let request = SearchRequest {
                query: query.as_str().to_string(),
                language: self.language.clone(),
                count: self.page_size.min(max_results - bodies.len()),
                max_id,
            };

            let page = self.fetch_page(&request).await?;
            if page.bodies.is_empty() {
                break;
            }
            bodies.extend(page.bodies);

            match page.next_max_id {
                Some(next) => max_id = Some(next),
                None => break,
            }
        }

        bodies.truncate(max_results);
        tracing::info!("-> {} tweets were found.", bodies.len());
        Ok(bodies)
    }

    async fn fetch_page(&self, request: &SearchRequest) -> Result<SearchPage, FeedError> {
        let mut attempt = 1u32;
        loop {
            match self.client.search_page(request).await {
                Ok(page) => {
                    if attempt > 1 {
                        tracing::info!("Search request succeeded on attempt {}", attempt);
                    }
                    return Ok(page);
                }
                Err(err) if err.is_rate_limited() => {
                    tracing::warn!(
                        "429 Too Many Requests (attempt {}). Waiting {}s...",
                        attempt,
                        self.backoff.as_secs()
                    );
                    sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!("Search failed for \"{}\": {}", request.query, err);
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use crate::testing::ScriptedFeed;

    fn page(bodies: &[&str], next: Option<u64>) -> SearchPage {
        SearchPage {
            bodies: bodies.iter().map(|b| b.to_string()).collect(),
            next_max_id: next,
        }
    }

    fn query(text: &str) -> Query {
        Query::new(text).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_pauses_then_succeeds() {
        let feed = Arc::new(ScriptedFeed::new(vec![
            Err(FeedError::from_status(429, "")),
            Err(FeedError::from_status(429, "")),
            Ok(page(&["猫がかわいい"], None)),
        ]));
        let retriever = SearchRetriever::new(feed.clone(), "ja", 100, Duration::from_secs(60));

        let started = tokio::time::Instant::now();
        let result = retriever.search(&query("猫"), 500).await.unwrap();

        assert_eq!(result, vec!["猫がかわいい".to_string()]);
        assert_eq!(feed.search_requests().len(), 3);
        assert!(started.elapsed() >= Duration::from_secs(120));
        // The retried request is identical.
        let requests = feed.search_requests();
        assert_eq!(requests[0], requests[2]);
    }

    #[tokio::test]
    async fn test_other_errors_fail_fast() {
        let feed = Arc::new(ScriptedFeed::new(vec![
            Err(FeedError::new(ErrorKind::Transport, "connection reset")),
            Ok(page(&["never reached"], None)),
        ]));
        let retriever = SearchRetriever::new(feed.clone(), "ja", 100, Duration::from_secs(60));

        let err = retriever.search(&query("ramen"), 500).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(feed.search_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_no_matches_is_empty_not_error() {
        let feed = Arc::new(ScriptedFeed::new(vec![Ok(SearchPage::default())]));
        let retriever = SearchRetriever::new(feed, "ja", 100, Duration::from_secs(60));

        let result = retriever.search(&query("zzzz"), 500).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_pages_until_max_results() {
        let feed = Arc::new(ScriptedFeed::new(vec![
            Ok(page(&["a", "b"], Some(90))),
            Ok(page(&["c", "d"], Some(80))),
            Ok(page(&["e", "f"], Some(70))),
        ]));
        let retriever = SearchRetriever::new(feed.clone(), "ja", 2, Duration::from_secs(60));

        let result = retriever.search(&query("x"), 3).await.unwrap();
        assert_eq!(result, vec!["a", "b", "c"]);

        let requests = feed.search_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].max_id, None);
        assert_eq!(requests[1].max_id, Some(90));
        assert_eq!(requests[1].count, 1);
        assert_eq!(requests[0].language, "ja");
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let feed = Arc::new(ScriptedFeed::new(vec![
            Ok(page(&["a"], Some(10))),
            Ok(SearchPage::default()),
        ]));
        let retriever = SearchRetriever::new(feed.clone(), "ja", 100, Duration::from_secs(60));

        let result = retriever.search(&query("x"), 500).await.unwrap();
        assert_eq!(result, vec!["a"]);
        assert_eq!(feed.search_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_max_results_is_capped() {
        let feed = Arc::new(ScriptedFeed::new(vec![Ok(SearchPage::default())]));
        let retriever = SearchRetriever::new(feed.clone(), "ja", 5000, Duration::from_secs(60));

        retriever.search(&query("x"), 5000).await.unwrap();
        assert_eq!(feed.search_requests()[0].count, MAX_RESULTS_LIMIT);
    }
}
