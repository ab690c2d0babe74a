//! Test server harness for E2E testing
//!
//! Provides `TestStatusServer` for spawning real Status Service instances in
//! tests, wired to mock sources and a manual clock.

use common::clock::ManualClock;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use status_service::auth::TokenService;
use status_service::config::Config;
use status_service::routes::{self, init_metrics_recorder, AppState};
use status_service::services::mock::{MockMetadataSource, MockRevisionSource};
use status_service::services::ConfigCache;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

/// Revision reported by the default mock revision source.
pub const TEST_REVISION: &str = "abc123";

/// Description in the default mock metadata.
pub const TEST_DESCRIPTION: &str = "build status test application";

/// Version in the default mock metadata.
pub const TEST_VERSION: &str = "1.0";

/// Global metrics handle for test servers
static TEST_METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn test_metrics_handle() -> PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            init_metrics_recorder()
                .unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle())
        })
        .clone()
}

/// Builder for [`TestStatusServer`].
#[derive(Default)]
pub struct TestStatusServerBuilder {
    vars: HashMap<String, String>,
    metadata: Option<MockMetadataSource>,
    revision: Option<MockRevisionSource>,
}

impl TestStatusServerBuilder {
    /// Set `BUILD_NUMBER`. Unset means the service default.
    pub fn build_number(mut self, build_number: &str) -> Self {
        self.vars
            .insert("BUILD_NUMBER".to_string(), build_number.to_string());
        self
    }

    /// Set any other environment variable understood by `Config`.
    pub fn var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Use `metadata` instead of the default mock metadata.
    pub fn metadata(mut self, metadata: MockMetadataSource) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Use `revision` instead of the default mock revision.
    pub fn revision(mut self, revision: MockRevisionSource) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Spawn the server.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    pub async fn spawn(self) -> Result<TestStatusServer, anyhow::Error> {
        let mut vars = self.vars;
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string());

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let metadata = Arc::new(
            self.metadata
                .unwrap_or_else(|| MockMetadataSource::with_fields(TEST_DESCRIPTION, TEST_VERSION)),
        );
        let revision = Arc::new(
            self.revision
                .unwrap_or_else(|| MockRevisionSource::with_revision(TEST_REVISION)),
        );
        let clock = Arc::new(ManualClock::starting_now());

        let token_service = Arc::new(
            TokenService::new(config.token_lifetime, clock.clone())
                .map_err(|e| anyhow::anyhow!("Failed to create token service: {}", e))?,
        );
        let config_cache = Arc::new(ConfigCache::new(
            metadata.clone(),
            revision.clone(),
            clock.clone(),
            config.config_cache_ttl,
        ));

        let state = Arc::new(AppState {
            config: config.clone(),
            token_service: token_service.clone(),
            config_cache: config_cache.clone(),
        });

        // Build routes using the service's real route builder
        let app = routes::build_routes(state, test_metrics_handle());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(TestStatusServer {
            addr,
            config,
            clock,
            metadata,
            revision,
            token_service,
            config_cache,
            _handle: handle,
        })
    }
}

/// Test harness for spawning the Status Service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health_e2e() -> Result<(), anyhow::Error> {
///     let server = TestStatusServer::spawn().await?;
///
///     let response = reqwest::get(format!("{}/health", server.url())).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestStatusServer {
    addr: SocketAddr,
    config: Config,
    clock: Arc<ManualClock>,
    metadata: Arc<MockMetadataSource>,
    revision: Arc<MockRevisionSource>,
    token_service: Arc<TokenService>,
    config_cache: Arc<ConfigCache>,
    _handle: JoinHandle<()>,
}

impl TestStatusServer {
    /// Start configuring a test server.
    pub fn builder() -> TestStatusServerBuilder {
        TestStatusServerBuilder::default()
    }

    /// Spawn a test server with default mocks and configuration.
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

    /// Clock shared by the token service and the configuration cache.
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Metadata source behind the configuration cache.
    pub fn metadata_source(&self) -> &MockMetadataSource {
        &self.metadata
    }

    /// Revision source behind the configuration cache.
    pub fn revision_source(&self) -> &MockRevisionSource {
        &self.revision
    }

    pub fn token_service(&self) -> &TokenService {
        &self.token_service
    }

    pub fn config_cache(&self) -> &ConfigCache {
        &self.config_cache
    }

    /// POST /login and return the issued token.
    pub async fn login(&self) -> Result<String, anyhow::Error> {
        let response = reqwest::Client::new()
            .post(format!("{}/login", self.url()))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("login failed with status {}", response.status());
        }

        let body: serde_json::Value = response.json().await?;
        body.get("token")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("login response has no token: {}", body))
    }
}

impl Drop for TestStatusServer {
    fn drop(&mut self) {
        // Abort the HTTP server task so the port is released when the test ends
        self._handle.abort();
    }
}
