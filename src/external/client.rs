use std::sync::LazyLock;
use std::time::Duration;

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Global HTTP client instance
///
/// Initialized lazily on first access and reused for every message of a run,
/// so all sends share one connection pool.
///
/// # Features
/// - **Timeouts**: 30s request timeout, 10s connect timeout
/// - **Compression**: gzip
/// - **Security**: Rustls for TLS
///
/// # Example
/// ```ignore
/// use secret_santa::external::client::HTTP_CLIENT;
///
/// async fn fetch_data() -> Result<String, reqwest::Error> {
///     HTTP_CLIENT
///         .get("https://api.twilio.com/2010-04-01.json")
///         .send()
///         .await?
///         .text()
///         .await
/// }
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_initialization() {
        // Access the client to ensure it initializes without panicking
        let _ = &*HTTP_CLIENT;
    }

    #[test]
    fn test_user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("secret-santa/"));
    }
}
