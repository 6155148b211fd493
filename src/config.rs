//! Configuration for wirekv
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a wirekv server instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:4242".to_string(),
            max_connections: 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds, 0 = none)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds, 0 = none)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
