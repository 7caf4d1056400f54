//! REST transport for the feed: credential check, search, media upload and
//! status updates against the v1.1 API.

use async_trait::async_trait;
use reqwest::{Client, Response, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

use super::oauth::{OAuthSigner, encode_pairs};
use crate::domain::config::{Credentials, TwitterConfig};
use crate::domain::error::{ErrorKind, FeedError};
use crate::domain::traits::FeedClient;
use crate::domain::types::{IncomingMessage, MessageId, OutboundReply, SearchPage, SearchRequest};

/// Upper bound the search endpoint accepts for `count`.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct RawUser {
    screen_name: String,
}

#[derive(Debug, Deserialize)]
struct RawExtendedTweet {
    full_text: String,
}

/// A status as delivered by search and by the filter stream.
#[derive(Debug, Deserialize)]
pub struct RawStatus {
    id: MessageId,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    extended_tweet: Option<RawExtendedTweet>,
    user: RawUser,
    #[serde(default)]
    in_reply_to_screen_name: Option<String>,
}

impl RawStatus {
    /// Longest available body: `full_text`, then the stream's
    /// `extended_tweet`, then the legacy truncated `text`.
    pub fn body(&self) -> &str {
        self.full_text
            .as_deref()
            .or(self.extended_tweet.as_ref().map(|e| e.full_text.as_str()))
            .or(self.text.as_deref())
            .unwrap_or_default()
    }

    pub fn into_message(self) -> IncomingMessage {
        let body_text = self.body().to_string();
        IncomingMessage {
            id: self.id,
            author_handle: self.user.screen_name,
            body_text,
            in_reply_to_handle: self.in_reply_to_screen_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    statuses: Vec<RawStatus>,
}

#[derive(Debug, Deserialize)]
struct MediaResponse {
    media_id_string: String,
}

impl SearchResponse {
    fn into_page(self) -> SearchPage {
        // Results are newest first; the next page starts below the oldest id.
        let next_max_id = self
            .statuses
            .iter()
            .map(|s| s.id)
            .min()
            .map(|oldest| oldest.saturating_sub(1));
        SearchPage {
            bodies: self.statuses.iter().map(|s| s.body().to_string()).collect(),
            next_max_id,
        }
    }
}

pub struct TwitterClient {
    http: Client,
    stream_http: Client,
    signer: OAuthSigner,
    endpoints: TwitterConfig,
}

impl TwitterClient {
    pub fn new(credentials: Credentials, config: &TwitterConfig) -> Result<Self, FeedError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = Client::builder().timeout(timeout).build()?;
        // The filter stream stays open indefinitely; only the connect is bounded.
        let stream_http = Client::builder().connect_timeout(timeout).build()?;

        Ok(Self {
            http,
            stream_http,
            signer: OAuthSigner::new(credentials),
            endpoints: config.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T, FeedError> {
        let authorization = self.signer.authorization("GET", url, params)?;
        let response = self
            .http
            .get(with_query(url, params))
            .header("Authorization", authorization)
            .send()
            .await?;
        read_json(response).await
    }

    async fn post_form<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T, FeedError> {
        let authorization = self.signer.authorization("POST", url, params)?;
        let response = self
            .http
            .post(url)
            .header("Authorization", authorization)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encode_pairs(params))
            .send()
            .await?;
        read_json(response).await
    }

    async fn upload_media(&self, path: &Path) -> Result<String, FeedError> {
        let url = format!("{}/media/upload.json", self.endpoints.upload_base);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FeedError::new(ErrorKind::Transport, format!("cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "wordcloud.png".to_string());
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/png")?;
        let form = multipart::Form::new().part("media", part);

        let authorization = self.signer.authorization("POST", &url, &[])?;
        let response = self
            .http
            .post(&url)
            .header("Authorization", authorization)
            .multipart(form)
            .send()
            .await?;
        let media: MediaResponse = read_json(response).await?;
        Ok(media.media_id_string)
    }

    /// Opens the filter stream tracking `track`. The caller decodes the body.
    pub async fn open_stream(&self, track: &str) -> Result<Response, FeedError> {
        let url = format!("{}/statuses/filter.json", self.endpoints.stream_base);
        let params = [("track", track.to_string())];
        let authorization = self.signer.authorization("POST", &url, &params)?;
        let response = self
            .stream_http
            .post(&url)
            .header("Authorization", authorization)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encode_pairs(&params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::from_status(status.as_u16(), &body));
        }
        Ok(response)
    }
}

#[async_trait]
impl FeedClient for TwitterClient {
    async fn own_handle(&self) -> Result<String, FeedError> {
        let url = format!("{}/account/verify_credentials.json", self.endpoints.api_base);
        let user: RawUser = self.get_json(&url, &[]).await?;
        Ok(user.screen_name)
    }

    async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage, FeedError> {
        let url = format!("{}/search/tweets.json", self.endpoints.api_base);
        let response: SearchResponse = self.get_json(&url, &search_params(request)).await?;
        Ok(response.into_page())
    }

    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), FeedError> {
        let mut params = vec![
            ("status", reply.text.clone()),
            ("in_reply_to_status_id", reply.in_reply_to.to_string()),
        ];
        if let Some(image) = &reply.image {
            params.push(("media_ids", self.upload_media(image).await?));
        }

        let url = format!("{}/statuses/update.json", self.endpoints.api_base);
        let _: serde_json::Value = self.post_form(&url, &params).await?;
        Ok(())
    }
}

fn search_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", request.query.clone()),
        ("lang", request.language.clone()),
        ("count", request.count.clamp(1, MAX_PAGE_SIZE).to_string()),
        ("tweet_mode", "extended".to_string()),
    ];
    if let Some(max_id) = request.max_id {
        params.push(("max_id", max_id.to_string()));
    }
    params
}

fn with_query(url: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        url.to_string()
    } else {
        format!("{url}?{}", encode_pairs(params))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FeedError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(FeedError::from_status(status.as_u16(), &body));
    }
    Ok(serde_json::from_str(&body)?)
}
