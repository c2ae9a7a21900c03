use orbit_core::{HeartbeatIntervals, OrbitError, RelayBuilder, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RELAY_URL: &str = "https://oliver-butler-oasis-builder.trycloudflare.com";
pub const DEFAULT_FEE_COLLECTOR_ADDRESS: &str = "ORB.3C0738F00DE16991DDD5B506";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub intervals: IntervalsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_relay_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_fee_collector_address")]
    pub fee_collector_address: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: default_relay_url(),
            timeout_secs: default_timeout_secs(),
            fee_collector_address: default_fee_collector_address(),
        }
    }
}

fn default_relay_url() -> String {
    DEFAULT_RELAY_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_fee_collector_address() -> String {
    DEFAULT_FEE_COLLECTOR_ADDRESS.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_bind_host")]
    pub bind_host: String,
    #[serde(default = "default_port_range_start")]
    pub port_range_start: u16,
    #[serde(default = "default_port_range_end")]
    pub port_range_end: u16,
    /// Overridden by the positional CLI argument when one is given.
    #[serde(default)]
    pub tunnel_url: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind_host: default_bind_host(),
            port_range_start: default_port_range_start(),
            port_range_end: default_port_range_end(),
            tunnel_url: None,
        }
    }
}

impl NodeConfig {
    pub fn port_range(&self) -> RangeInclusive<u16> {
        self.port_range_start..=self.port_range_end
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("node_data")
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port_range_start() -> u16 {
    5000
}

fn default_port_range_end() -> u16 {
    5999
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalsConfig {
    #[serde(default = "default_sync_secs")]
    pub sync_secs: u64,
    #[serde(default = "default_rebroadcast_secs")]
    pub rebroadcast_secs: u64,
    #[serde(default = "default_proof_secs")]
    pub proof_secs: u64,
    #[serde(default = "default_proof_empty_backoff_secs")]
    pub proof_empty_backoff_secs: u64,
    #[serde(default = "default_stats_secs")]
    pub stats_secs: u64,
}

impl Default for IntervalsConfig {
    fn default() -> Self {
        Self {
            sync_secs: default_sync_secs(),
            rebroadcast_secs: default_rebroadcast_secs(),
            proof_secs: default_proof_secs(),
            proof_empty_backoff_secs: default_proof_empty_backoff_secs(),
            stats_secs: default_stats_secs(),
        }
    }
}

impl IntervalsConfig {
    pub fn sync(&self) -> Duration {
        Duration::from_secs(self.sync_secs)
    }

    pub fn stats(&self) -> Duration {
        Duration::from_secs(self.stats_secs)
    }

    pub fn heartbeat(&self) -> HeartbeatIntervals {
        HeartbeatIntervals {
            rebroadcast: Duration::from_secs(self.rebroadcast_secs),
            proof: Duration::from_secs(self.proof_secs),
            proof_empty_backoff: Duration::from_secs(self.proof_empty_backoff_secs),
        }
    }
}

fn default_sync_secs() -> u64 {
    15
}

fn default_rebroadcast_secs() -> u64 {
    30
}

fn default_proof_secs() -> u64 {
    30
}

fn default_proof_empty_backoff_secs() -> u64 {
    20
}

fn default_stats_secs() -> u64 {
    10
}

impl Config {
    /// Loads the optional file at `path`, then applies `ORBIT_*` environment
    /// overrides (`ORBIT_RELAY__URL`, `ORBIT_NODE__DATA_DIR`, ...).
    pub fn from_file(path: Option<&str>) -> Result<Self> {
        Self::load(path, Self::environment())
    }

    fn environment() -> ::config::Environment {
        ::config::Environment::with_prefix("ORBIT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load(path: Option<&str>, environment: ::config::Environment) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(environment)
            .build()
            .map_err(|e| OrbitError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| OrbitError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.relay.url.trim();
        if url.is_empty() {
            return Err(OrbitError::Config("relay.url cannot be empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(OrbitError::Config(format!(
                "relay.url must be an http(s) URL: {}",
                url
            )));
        }
        if self.relay.timeout_secs == 0 {
            return Err(OrbitError::Config(
                "relay.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.node.port_range_start > self.node.port_range_end {
            return Err(OrbitError::Config(format!(
                "node port range is empty: {}-{}",
                self.node.port_range_start, self.node.port_range_end
            )));
        }

        let intervals = [
            ("intervals.sync_secs", self.intervals.sync_secs),
            ("intervals.rebroadcast_secs", self.intervals.rebroadcast_secs),
            ("intervals.proof_secs", self.intervals.proof_secs),
            (
                "intervals.proof_empty_backoff_secs",
                self.intervals.proof_empty_backoff_secs,
            ),
            ("intervals.stats_secs", self.intervals.stats_secs),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(OrbitError::Config(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn relay_builder(&self) -> RelayBuilder {
        RelayBuilder::new()
            .base_url(self.relay.url.clone())
            .timeout(Duration::from_secs(self.relay.timeout_secs))
    }
}
