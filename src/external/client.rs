use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Build an HTTP client for one upstream service.
///
/// Each upstream gets its own client so the request timeout and
/// `User-Agent` follow that service's configuration.
///
/// # Features
/// - **Timeouts**: request timeout from configuration, 10s connect timeout
/// - **Connection pooling**: idle connections are kept for 90s
/// - **Compression**: gzip, deflate, brotli, and zstd
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
pub fn build_http_client(timeout: Duration, user_agent: &str) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        // Enable compression (gzip, deflate, brotli, zstd)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(user_agent)
        .build()
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::new(e).context("Failed to build HTTP client"),
        })
}
