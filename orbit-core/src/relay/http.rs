use super::{ActiveNodes, Balance, NodeProof, Relay};
use crate::block::Chain;
use crate::error::{OrbitError, Result};
use crate::node::NodeRecord;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct AssignAddressRequest<'a> {
    uid: &'a str,
}

#[derive(Debug, Deserialize)]
struct AssignAddressResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    address: Option<String>,
}

/// `reqwest` transport for the relay. Every call carries the client-wide
/// timeout; a timed out call surfaces as [`OrbitError::Http`].
#[derive(Clone)]
pub struct HttpRelay {
    client: Client,
    base_url: String,
}

impl HttpRelay {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| OrbitError::Config(format!("failed to build HTTP client: {}", error)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn ensure_success(response: Response, what: &str) -> Result<Response> {
        if !response.status().is_success() {
            return Err(OrbitError::Http(format!(
                "{} failed: status={}",
                what,
                response.status()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn fetch_chain(&self) -> Result<Chain> {
        let response = self.client.get(self.url("/api/chain")).send().await?;
        let response = Self::ensure_success(response, "chain fetch")?;

        let chain: Chain = response.json().await.map_err(|error| {
            OrbitError::Http(format!("invalid chain JSON from relay: {}", error))
        })?;
        Ok(chain)
    }

    async fn ping(&self, record: &NodeRecord) -> Result<()> {
        let response = self
            .client
            .post(self.url("/node_ping"))
            .json(record)
            .send()
            .await?;
        Self::ensure_success(response, "node ping")?;
        Ok(())
    }

    async fn active_nodes(&self) -> Result<ActiveNodes> {
        let response = self.client.get(self.url("/active_nodes")).send().await?;
        let response = Self::ensure_success(response, "active nodes query")?;

        let active: ActiveNodes = response.json().await.map_err(|error| {
            OrbitError::Http(format!("invalid active_nodes JSON from relay: {}", error))
        })?;
        Ok(active)
    }

    async fn balance(&self, address: &str) -> Result<Balance> {
        let url = self.url(&format!("/api/balance/{}", address));
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response, "balance lookup")?;

        let balance: Balance = response.json().await.map_err(|error| {
            OrbitError::Http(format!("invalid balance JSON from relay: {}", error))
        })?;
        Ok(balance)
    }

    async fn assign_address(&self, uid: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url("/api/get_orbit_address"))
            .json(&AssignAddressRequest { uid })
            .send()
            .await?;
        let response = Self::ensure_success(response, "address assignment")?;

        let payload: AssignAddressResponse = response.json().await.map_err(|error| {
            OrbitError::Http(format!("invalid address assignment JSON: {}", error))
        })?;

        if payload.status != "success" {
            return Err(OrbitError::Relay(format!(
                "address assignment refused: status={}",
                payload.status
            )));
        }

        payload
            .address
            .filter(|address| !address.trim().is_empty())
            .ok_or_else(|| OrbitError::Relay("address assignment returned no address".to_string()))
    }

    async fn submit_proof(&self, proof: &NodeProof) -> Result<()> {
        let response = self
            .client
            .post(self.url("/node_proof"))
            .json(proof)
            .send()
            .await?;
        Self::ensure_success(response, "proof submission")?;
        Ok(())
    }
}
