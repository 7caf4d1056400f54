//! OAuth 1.0a request signing (HMAC-SHA1).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distr::Alphanumeric;
use sha1::Sha1;

use crate::domain::config::Credentials;
use crate::domain::error::{ErrorKind, FeedError};

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

/// RFC 3986 percent-encoding: only `A-Z a-z 0-9 - . _ ~` pass through.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// `k=v&k=v` with both sides percent-encoded, in the given order.
pub fn encode_pairs(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_pair((key, value): &(&str, String)) -> (String, String) {
    (percent_encode(key), percent_encode(value))
}

pub struct OAuthSigner {
    credentials: Credentials,
}

impl OAuthSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// `Authorization` header value for one request. `params` are the query
    /// or form parameters that travel with it; multipart bodies are not signed.
    pub fn authorization(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<String, FeedError> {
        let nonce: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_with(method, url, params, &nonce, &timestamp)
    }

    fn authorization_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, FeedError> {
        let mut oauth = vec![
            ("oauth_consumer_key", self.credentials.consumer_key.clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.credentials.access_token.clone()),
            ("oauth_version", VERSION.to_string()),
        ];

        let signature = self.signature(method, url, params, &oauth)?;
        oauth.push(("oauth_signature", signature));
        oauth.sort_by(|a, b| a.0.cmp(b.0));

        let fields = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        oauth: &[(&str, String)],
    ) -> Result<String, FeedError> {
        let mut encoded: Vec<(String, String)> = params.iter().map(encode_pair).collect();
        encoded.extend(oauth.iter().map(encode_pair));
        encoded.sort();
        let parameter_string = encoded
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base = format!(
            "{}&{}&{}",
            method.to_ascii_uppercase(),
            percent_encode(url),
            percent_encode(&parameter_string)
        );
        let key = format!(
            "{}&{}",
            percent_encode(&self.credentials.consumer_secret),
            percent_encode(&self.credentials.access_token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| FeedError::new(ErrorKind::Unauthorized, format!("invalid signing key: {e}")))?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}
