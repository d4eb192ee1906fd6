//! Test server harness for E2E testing
//!
//! Provides `TestVoiceModeServer` for spawning real VoiceMode server instances
//! in tests, bound to a random local port.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use voicemode_service::config::Config;
use voicemode_service::routes::{self, AppState};

/// Signing secret used by every test server.
pub const TEST_JWT_SECRET: &str = "vm-test-signing-secret";

/// Default LiveKit URL configured on test servers.
pub const TEST_LIVEKIT_URL: &str = "wss://livekit.test.local";

/// Builder for `TestVoiceModeServer`.
pub struct TestServerBuilder {
    vars: HashMap<String, String>,
}

impl TestServerBuilder {
    fn new() -> Self {
        let vars = HashMap::from([
            ("AUTH_JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("LIVEKIT_URL".to_string(), TEST_LIVEKIT_URL.to_string()),
            // Nothing listens on the discard port unless a test overrides this
            (
                "VOICEMODE_TOKEN_SERVER_URL".to_string(),
                "http://127.0.0.1:9/token".to_string(),
            ),
        ]);
        Self { vars }
    }

    /// Set the VoiceMode feature flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.vars
            .insert("VOICEMODE_ENABLED".to_string(), enabled.to_string());
        self
    }

    /// Point the service at a token server (typically a wiremock URI).
    pub fn token_server_url(mut self, url: impl Into<String>) -> Self {
        self.vars
            .insert("VOICEMODE_TOKEN_SERVER_URL".to_string(), url.into());
        self
    }

    /// Override the default LiveKit URL.
    pub fn livekit_url(mut self, url: impl Into<String>) -> Self {
        self.vars.insert("LIVEKIT_URL".to_string(), url.into());
        self
    }

    /// Override the token server timeout.
    pub fn token_timeout_seconds(mut self, seconds: u64) -> Self {
        self.vars.insert(
            "VOICEMODE_TOKEN_TIMEOUT_SECONDS".to_string(),
            seconds.to_string(),
        );
        self
    }

    /// Spawn the server.
    pub async fn spawn(self) -> Result<TestVoiceModeServer, anyhow::Error> {
        let config = Config::from_vars(&self.vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let state = Arc::new(
            AppState::new(config.clone())
                .map_err(|e| anyhow::anyhow!("Failed to create state: {}", e))?,
        );

        // Standalone recorder handle: no global recorder is installed in tests
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();
        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(TestVoiceModeServer {
            addr,
            config,
            _handle: handle,
        })
    }
}

/// Test harness for spawning the VoiceMode server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// let server = TestVoiceModeServer::builder()
///     .enabled(true)
///     .token_server_url(format!("{}/token", mock.uri()))
///     .spawn()
///     .await?;
/// ```
pub struct TestVoiceModeServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestVoiceModeServer {
    /// Start building a test server.
    pub fn builder() -> TestServerBuilder {
        TestServerBuilder::new()
    }

    /// Spawn a server with VoiceMode disabled and default settings.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::builder().spawn().await
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestVoiceModeServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_spawns_successfully() -> Result<(), anyhow::Error> {
        let server = TestVoiceModeServer::spawn().await?;

        assert!(server.url().starts_with("http://127.0.0.1:"));

        let response = reqwest::get(format!("{}/health", server.url())).await?;
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await?, "OK");

        Ok(())
    }

    #[tokio::test]
    async fn test_builder_applies_overrides() -> Result<(), anyhow::Error> {
        let server = TestVoiceModeServer::builder()
            .enabled(true)
            .livekit_url("wss://override.example")
            .token_timeout_seconds(2)
            .spawn()
            .await?;

        let config = server.config();
        assert!(config.voicemode_enabled);
        assert_eq!(config.livekit_url, "wss://override.example");
        assert_eq!(config.token_timeout_seconds, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_servers_different_ports() -> Result<(), anyhow::Error> {
        let server1 = TestVoiceModeServer::spawn().await?;
        let server2 = TestVoiceModeServer::spawn().await?;

        assert_ne!(server1.addr(), server2.addr());
        assert!(server1.addr().ip().is_loopback());

        Ok(())
    }
}
