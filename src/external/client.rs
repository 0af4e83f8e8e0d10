use std::time::Duration;

use crate::config::settings::HttpConfig;
use crate::error::{AppError, AppResult};

/// Build the HTTP client shared by every stage and channel of a run.
///
/// One client per run keeps connection pooling across the quote, translation
/// and chat requests. Building it performs no network I/O.
///
/// # Features
/// - **Compression**: gzip, deflate, brotli and zstd responses
/// - **Timeouts**: request and connect timeouts from `[http]`
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
pub fn build_http_client(config: &HttpConfig) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| AppError::Configuration {
            key: "http".to_string(),
            source: e.into(),
        })
}
