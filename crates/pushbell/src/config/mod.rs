mod notifications_config;
#[allow(clippy::module_inception)]
mod config;
mod stream_config;

pub(crate) use {
    config::Config, notifications_config::NotificationsConfig, stream_config::StreamConfig,
};

pub(crate) const DEFAULT_API_URL: &str = "https://api.pushbullet.com/v2";
pub(crate) const DEFAULT_STREAM_URL: &str = "wss://stream.pushbullet.com/websocket";
pub(crate) const DEFAULT_MAX_PER_SECOND: f64 = pushbell_core::throttle::DEFAULT_RATE_PER_SECOND;
pub(crate) const DEFAULT_MAX_RECENT: usize = pushbell_core::pipeline::DEFAULT_MAX_RECENT;

pub(crate) fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

pub(crate) fn default_stream_url() -> String {
    DEFAULT_STREAM_URL.to_string()
}

pub(crate) fn default_max_per_second() -> f64 {
    DEFAULT_MAX_PER_SECOND
}

pub(crate) fn default_max_recent() -> usize {
    DEFAULT_MAX_RECENT
}
