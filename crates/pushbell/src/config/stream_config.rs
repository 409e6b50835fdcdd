use crate::config::{default_api_url, default_stream_url};

use serde::{Deserialize, Serialize};

/// Push service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Personal access token. Empty disables the stream.
    #[serde(default)]
    pub access_token: String,

    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Realtime websocket base URL; the token is appended as a path segment.
    #[serde(default = "default_stream_url")]
    pub stream_url: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_url: default_api_url(),
            stream_url: default_stream_url(),
        }
    }
}

impl StreamConfig {
    /// Whether an access token is configured.
    pub fn has_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    /// Full websocket URL including the token.
    pub fn websocket_url(&self) -> String {
        format!(
            "{}/{}",
            self.stream_url.trim_end_matches('/'),
            self.access_token.trim()
        )
    }
}
