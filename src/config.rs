//! Configuration for bzquery
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

/// Default BZFS query port
pub const DEFAULT_PORT: u16 = 5154;

/// Default receive timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a query session
#[derive(Debug, Clone)]
pub struct QueryConfig {
    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// Server hostname or IP address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Receive timeout shared by all deadline-bounded reads.
    /// `None` blocks indefinitely.
    pub timeout: Option<Duration>,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Protocol versions accepted during the handshake.
    /// The protocol identifier changed across server generations, so the
    /// allow-list is configurable rather than a single literal.
    pub accepted_versions: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            timeout: Some(DEFAULT_TIMEOUT),
            accepted_versions: vec!["0026".to_string()],
        }
    }
}

impl QueryConfig {
    /// Create a new config builder
    pub fn builder() -> QueryConfigBuilder {
        QueryConfigBuilder::default()
    }
}

/// Builder for QueryConfig
#[derive(Default)]
pub struct QueryConfigBuilder {
    config: QueryConfig,
}

impl QueryConfigBuilder {
    /// Set the server hostname
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the receive timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Block indefinitely on reads (no deadline)
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Replace the accepted protocol version list
    pub fn accepted_versions(mut self, versions: Vec<String>) -> Self {
        self.config.accepted_versions = versions;
        self
    }

    /// Add a protocol version to the accepted list
    pub fn accept_version(mut self, version: impl Into<String>) -> Self {
        self.config.accepted_versions.push(version.into());
        self
    }

    pub fn build(self) -> QueryConfig {
        self.config
    }
}
