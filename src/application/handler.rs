//! # Status Handler
//!
//! Runs the reply pipeline for each feed event:
//! classify → search → analyze → render → reply.
//! Failures of any step after classification are contained here and turn into
//! a single failure reply; nothing propagates back to the listener.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::application::frequency::{FrequencyAggregator, StopWordSet};
use crate::application::reply::ReplyComposer;
use crate::application::search::SearchRetriever;
use crate::application::trigger;
use crate::domain::config::AppConfig;
use crate::domain::error::{FeedError, RenderError};
use crate::domain::traits::{FeedClient, Renderer, Tokenizer};
use crate::domain::types::{FeedEvent, FrequencyMap, IncomingMessage, Query, ReplyOutcome, StyleOptions};
use crate::strings::logs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Analysis,
    Rendering,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("search failed: {0}")]
    Search(#[from] FeedError),
    #[error("analysis failed: {0}")]
    Analysis(String),
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Search(_) => Stage::Search,
            PipelineError::Analysis(_) => Stage::Analysis,
            PipelineError::Render(_) => Stage::Rendering,
        }
    }
}

struct PipelineSettings {
    max_results: usize,
    extra_stop_words: Vec<String>,
    style: StyleOptions,
    output_dir: PathBuf,
}

pub struct StatusHandler {
    client: Arc<dyn FeedClient>,
    own_handle: String,
    retriever: SearchRetriever,
    aggregator: Arc<FrequencyAggregator>,
    renderer: Arc<dyn Renderer>,
    settings: PipelineSettings,
}

impl StatusHandler {
    pub fn new(
        config: &AppConfig,
        client: Arc<dyn FeedClient>,
        own_handle: String,
        tokenizer: Arc<dyn Tokenizer>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            retriever: SearchRetriever::from_config(client.clone(), &config.search),
            client,
            own_handle,
            aggregator: Arc::new(FrequencyAggregator::new(tokenizer)),
            renderer,
            settings: PipelineSettings {
                max_results: config.search.max_results,
                extra_stop_words: config.analysis.extra_stop_words.clone(),
                style: config.wordcloud.style(),
                output_dir: config.wordcloud.output_dir(),
            },
        }
    }

    /// Single entry point for everything the feed listener produces.
    pub async fn dispatch(&self, event: FeedEvent) {
        match event {
            FeedEvent::Status(message) => {
                self.handle(&message).await;
            }
            FeedEvent::Error(err) => {
                tracing::error!("Feed error ({:?}): {}", err.kind(), err);
            }
        }
    }

    /// Process one status. Returns `None` when it was not a request for the bot,
    /// otherwise the outcome that was sent back.
    pub async fn handle(&self, message: &IncomingMessage) -> Option<ReplyOutcome> {
        let query = trigger::classify(message, &self.own_handle)?;
        let composer = ReplyComposer::new(&message.author_handle);

        let outcome = match self.run(message, &query, &composer).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(
                    message_id = message.id,
                    stage = ?err.stage(),
                    "Pipeline failed for \"{}\": {}",
                    query,
                    err
                );
                composer.failure()
            }
        };

        self.deliver(message, &outcome).await;

        if let Some(image) = outcome.image()
            && let Err(e) = tokio::fs::remove_file(image).await
        {
            tracing::debug!("Could not remove {}: {}", image.display(), e);
        }

        Some(outcome)
    }

    async fn run(
        &self,
        message: &IncomingMessage,
        query: &Query,
        composer: &ReplyComposer<'_>,
    ) -> Result<ReplyOutcome, PipelineError> {
        let bodies = self.retriever.search(query, self.settings.max_results).await?;
        if bodies.is_empty() {
            return Ok(composer.no_results(query));
        }

        let result_count = bodies.len();
        let frequencies = self.analyze(query, bodies).await?;
        if frequencies.is_empty() {
            tracing::info!("-> Only stop words left for \"{}\".", query);
            return Ok(composer.no_results(query));
        }

        let output = self.settings.output_dir.join(format!("{}.png", message.id));
        let image = self.render(frequencies, output).await?;
        Ok(composer.success(query, result_count, image))
    }

    async fn analyze(&self, query: &Query, bodies: Vec<String>) -> Result<FrequencyMap, PipelineError> {
        let aggregator = self.aggregator.clone();
        let query = query.clone();
        let extra = self.settings.extra_stop_words.clone();

        tokio::task::spawn_blocking(move || {
            let stop_words = StopWordSet::for_query(&query, aggregator.tokenizer(), &extra);
            aggregator.aggregate(&bodies, &stop_words)
        })
        .await
        .map_err(|e| PipelineError::Analysis(e.to_string()))
    }

    async fn render(&self, frequencies: FrequencyMap, output: PathBuf) -> Result<PathBuf, PipelineError> {
        let renderer = self.renderer.clone();
        let style = self.settings.style.clone();
        tracing::info!("Generating a wordcloud image...");

        let image = tokio::task::spawn_blocking(move || renderer.render(&frequencies, &style, &output))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;

        tracing::info!("{}", logs::image_saved(&image.display().to_string()));
        Ok(image)
    }

    /// One attempt, never retried.
    async fn deliver(&self, message: &IncomingMessage, outcome: &ReplyOutcome) {
        let reply = outcome.to_reply(message.id);
        match self.client.send_reply(&reply).await {
            Ok(()) => tracing::info!("{}", logs::tweeted(&reply.text)),
            Err(e) => tracing::error!("{}", logs::reply_failed(message.id, &e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use crate::infrastructure::morph::MorphTokenizer;
    use crate::testing::{ScriptedFeed, StubRenderer};
    use tempfile::TempDir;

    struct Fixture {
        feed: Arc<ScriptedFeed>,
        renderer: Arc<StubRenderer>,
        handler: StatusHandler,
        _dir: TempDir,
    }

    fn fixture(feed: ScriptedFeed, renderer: StubRenderer) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.wordcloud.output_dir = Some(dir.path().to_path_buf());

        let feed = Arc::new(feed);
        let renderer = Arc::new(renderer);
        let handler = StatusHandler::new(
            &config,
            feed.clone(),
            "bot".to_string(),
            Arc::new(MorphTokenizer::new()),
            renderer.clone(),
        );
        Fixture {
            feed,
            renderer,
            handler,
            _dir: dir,
        }
    }

    fn mention(body: &str) -> IncomingMessage {
        IncomingMessage {
            id: 42,
            author_handle: "alice".to_string(),
            body_text: body.to_string(),
            in_reply_to_handle: Some("bot".to_string()),
        }
    }

    #[tokio::test]
    async fn test_zero_results_replies_no_results() {
        let fx = fixture(ScriptedFeed::with_bodies(&[]), StubRenderer::default());

        let outcome = fx.handler.handle(&mention("@bot find ramen")).await.unwrap();

        assert!(matches!(outcome, ReplyOutcome::NoResults { .. }));
        assert!(outcome.text().contains("ramen"));
        assert_eq!(fx.renderer.calls(), 0);
        let sent = fx.feed.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].in_reply_to, 42);
        assert!(sent[0].image.is_none());
    }

    #[tokio::test]
    async fn test_rendering_failure_replies_failure_once() {
        let fx = fixture(
            ScriptedFeed::with_bodies(&["ラーメンはおいしい"]),
            StubRenderer::failing(),
        );

        let outcome = fx.handler.handle(&mention("@bot ramen")).await.unwrap();

        assert!(matches!(outcome, ReplyOutcome::Failure { .. }));
        assert_eq!(fx.renderer.calls(), 1);
        let sent = fx.feed.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.starts_with("@alice 500 Internal Server Error"));
        assert!(sent[0].image.is_none());
    }

    #[tokio::test]
    async fn test_success_sends_image_and_cleans_up() {
        let fx = fixture(
            ScriptedFeed::with_bodies(&["ラーメンはおいしい", "ラーメンを食べた"]),
            StubRenderer::default(),
        );

        let outcome = fx.handler.handle(&mention("@bot ラーメン")).await.unwrap();

        let ReplyOutcome::Success { text, image } = &outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(text, "@alice Search results for \"ラーメン\" (about 2 tweets)");
        assert!(image.ends_with("42.png"));
        assert!(!image.exists());

        let words = fx.renderer.last_words().unwrap();
        assert!(!words.contains_key("ラーメン"));
        assert_eq!(words.get("おいしい"), Some(&100));
        assert_eq!(words.get("食べる"), Some(&1));

        let sent = fx.feed.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].image.as_deref(), Some(image.as_path()));
    }

    #[tokio::test]
    async fn test_rejected_message_sends_nothing() {
        let fx = fixture(ScriptedFeed::with_bodies(&["x"]), StubRenderer::default());

        assert!(fx.handler.handle(&mention("RT @bot ramen")).await.is_none());

        let mut foreign = mention("@carol ramen");
        foreign.in_reply_to_handle = Some("carol".to_string());
        assert!(fx.handler.handle(&foreign).await.is_none());

        assert!(fx.feed.sent().is_empty());
        assert!(fx.feed.search_requests().is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_replies_failure() {
        let feed = ScriptedFeed::new(vec![Err(FeedError::new(ErrorKind::Api, "HTTP 500"))]);
        let fx = fixture(feed, StubRenderer::default());

        let outcome = fx.handler.handle(&mention("@bot ramen")).await.unwrap();

        assert!(matches!(outcome, ReplyOutcome::Failure { .. }));
        assert_eq!(fx.feed.sent().len(), 1);
        assert_eq!(fx.renderer.calls(), 0);
    }

    #[tokio::test]
    async fn test_send_failure_is_not_retried() {
        let fx = fixture(ScriptedFeed::with_bodies(&[]).failing_sends(), StubRenderer::default());

        let outcome = fx.handler.handle(&mention("@bot ramen")).await;

        assert!(matches!(outcome, Some(ReplyOutcome::NoResults { .. })));
        assert_eq!(fx.feed.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_only_stop_words_skips_renderer() {
        let fx = fixture(ScriptedFeed::with_bodies(&["ramen", "RT ramen"]), StubRenderer::default());

        let outcome = fx.handler.handle(&mention("@bot ramen")).await.unwrap();

        assert!(matches!(outcome, ReplyOutcome::NoResults { .. }));
        assert_eq!(fx.renderer.calls(), 0);
        assert_eq!(fx.feed.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_error_event_is_only_logged() {
        let fx = fixture(ScriptedFeed::with_bodies(&["x"]), StubRenderer::default());

        fx.handler
            .dispatch(FeedEvent::Error(FeedError::new(ErrorKind::Transport, "stream closed")))
            .await;

        assert!(fx.feed.sent().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_status_runs_pipeline() {
        let fx = fixture(ScriptedFeed::with_bodies(&[]), StubRenderer::default());

        fx.handler.dispatch(FeedEvent::Status(mention("@bot ramen"))).await;

        assert_eq!(fx.feed.sent().len(), 1);
    }
}
