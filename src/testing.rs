//! Test doubles for the pipeline collaborators.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::error::{ErrorKind, FeedError, RenderError};
use crate::domain::traits::{FeedClient, Renderer};
use crate::domain::types::{FrequencyMap, OutboundReply, SearchPage, SearchRequest, StyleOptions};

/// Feed client that replays scripted search results and records every call.
pub struct ScriptedFeed {
    handle: String,
    pages: Mutex<VecDeque<Result<SearchPage, FeedError>>>,
    requests: Mutex<Vec<SearchRequest>>,
    sent: Mutex<Vec<OutboundReply>>,
    fail_sends: bool,
}

impl ScriptedFeed {
    pub fn new(pages: Vec<Result<SearchPage, FeedError>>) -> Self {
        Self {
            handle: "bot".to_string(),
            pages: Mutex::new(pages.into()),
            requests: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            fail_sends: false,
        }
    }

    pub fn with_bodies(bodies: &[&str]) -> Self {
        Self::new(vec![Ok(SearchPage {
            bodies: bodies.iter().map(|b| b.to_string()).collect(),
            next_max_id: None,
        })])
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn search_requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<OutboundReply> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedClient for ScriptedFeed {
    async fn own_handle(&self) -> Result<String, FeedError> {
        Ok(self.handle.clone())
    }

    async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage, FeedError> {
        self.requests.lock().unwrap().push(request.clone());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchPage::default()))
    }

    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), FeedError> {
        self.sent.lock().unwrap().push(reply.clone());
        if self.fail_sends {
            return Err(FeedError::new(ErrorKind::Api, "HTTP 403: duplicate status"));
        }
        Ok(())
    }
}

/// Renderer that writes a placeholder file, or fails on demand.
#[derive(Default)]
pub struct StubRenderer {
    fail: bool,
    calls: AtomicUsize,
    last_words: Mutex<Option<FrequencyMap>>,
}

impl StubRenderer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_words(&self) -> Option<FrequencyMap> {
        self.last_words.lock().unwrap().clone()
    }
}

impl Renderer for StubRenderer {
    fn render(
        &self,
        frequencies: &FrequencyMap,
        _style: &StyleOptions,
        output: &Path,
    ) -> Result<PathBuf, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_words.lock().unwrap() = Some(frequencies.clone());
        if self.fail {
            return Err(RenderError::Style("stub failure".to_string()));
        }
        std::fs::write(output, b"png").map_err(|e| RenderError::Task(e.to_string()))?;
        Ok(output.to_path_buf())
    }
}
