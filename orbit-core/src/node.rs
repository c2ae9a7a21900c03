use crate::error::{OrbitError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::net::TcpListener;
use std::ops::RangeInclusive;
use std::sync::RwLock;

pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// Registry entry describing one participant. Self-reported fields are
/// overwritten wholesale on every heartbeat publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRecord {
    pub id: String,
    pub address: String,
    pub user: String,
    pub host: String,
    pub port: u16,
    pub uptime: f64,
    pub trust: f64,
    pub last_seen: i64,
    pub nodefeebalance: f64,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            address: String::new(),
            user: String::new(),
            host: LOOPBACK_HOST.to_string(),
            port: 0,
            uptime: 0.0,
            trust: 0.0,
            last_seen: 0,
            nodefeebalance: 0.0,
        }
    }
}

/// Who this process is on the network.
///
/// `user` is the operator-supplied address from the command line; `address`
/// is the ledger address handed out by the relay and stays empty until
/// assignment succeeds.
#[derive(Debug)]
pub struct NodeIdentity {
    node_id: String,
    user: String,
    port: u16,
    tunnel_url: Option<String>,
    address: RwLock<String>,
}

impl NodeIdentity {
    pub fn new(
        node_id: impl Into<String>,
        user: impl Into<String>,
        port: u16,
        tunnel_url: Option<String>,
    ) -> Self {
        let tunnel_url = tunnel_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Self {
            node_id: node_id.into(),
            user: user.into(),
            port,
            tunnel_url,
            address: RwLock::new(String::new()),
        }
    }

    /// Builds an identity with a freshly generated node id.
    pub fn generate(user: impl Into<String>, port: u16, tunnel_url: Option<String>) -> Self {
        Self::new(generate_node_id(), user, port, tunnel_url)
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn tunnel_url(&self) -> Option<&str> {
        self.tunnel_url.as_deref()
    }

    /// Advertised host: the tunnel endpoint when configured, loopback otherwise.
    pub fn host(&self) -> &str {
        self.tunnel_url.as_deref().unwrap_or(LOOPBACK_HOST)
    }

    /// Stable identifier sent to the relay for address assignment.
    pub fn uid(&self) -> String {
        let payload = format!(
            "{}|{}|{}|{}",
            self.node_id,
            self.user,
            self.port,
            self.tunnel_url.as_deref().unwrap_or_default()
        );
        hex::encode(Sha256::digest(payload.as_bytes()))
    }

    pub fn address(&self) -> String {
        match self.address.read() {
            Ok(address) => address.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_address(&self, address: impl Into<String>) {
        let address = address.into();
        match self.address.write() {
            Ok(mut slot) => *slot = address,
            Err(poisoned) => *poisoned.into_inner() = address,
        }
    }
}

/// `Node` plus a zero-padded random four digit suffix, e.g. `Node0042`.
pub fn generate_node_id() -> String {
    format!("Node{:04}", rand::thread_rng().gen_range(0..10_000))
}

/// Picks a random port in `range` that can currently be bound.
pub fn pick_free_port(range: RangeInclusive<u16>) -> Result<u16> {
    if range.is_empty() {
        return Err(OrbitError::Config(format!(
            "empty port range {}-{}",
            range.start(),
            range.end()
        )));
    }

    let span = usize::from(*range.end() - *range.start()) + 1;
    let mut rng = rand::thread_rng();
    for _ in 0..span.saturating_mul(2) {
        let port = rng.gen_range(range.clone());
        if TcpListener::bind(("0.0.0.0", port)).is_ok() {
            return Ok(port);
        }
    }

    Err(OrbitError::Config(format!(
        "no free port found in range {}-{}",
        range.start(),
        range.end()
    )))
}
