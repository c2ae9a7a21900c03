use super::{HttpRelay, Relay};
use crate::{OrbitError, Result};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct RelayBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl RelayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn resolve_base_url(&self) -> Result<String> {
        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or_default()
            .trim()
            .trim_end_matches('/')
            .to_string();

        if base_url.is_empty() {
            return Err(OrbitError::Config("relay url cannot be empty".to_string()));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(OrbitError::Config(format!(
                "unsupported relay url '{}': expected http:// or https://",
                base_url
            )));
        }

        Ok(base_url)
    }

    fn resolve_timeout(&self) -> Result<Duration> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(5));
        if timeout.is_zero() {
            return Err(OrbitError::Config(
                "relay timeout must be greater than zero".to_string(),
            ));
        }
        Ok(timeout)
    }

    pub fn build(&self) -> Result<Arc<dyn Relay>> {
        let base_url = self.resolve_base_url()?;
        let timeout = self.resolve_timeout()?;

        let relay = HttpRelay::new(base_url, timeout)?;
        Ok(Arc::new(relay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_bad_urls() {
        assert!(matches!(
            RelayBuilder::new().build(),
            Err(OrbitError::Config(_))
        ));
        assert!(matches!(
            RelayBuilder::new().base_url("   ").build(),
            Err(OrbitError::Config(_))
        ));
        assert!(matches!(
            RelayBuilder::new().base_url("ftp://relay").build(),
            Err(OrbitError::Config(_))
        ));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = RelayBuilder::new()
            .base_url("http://127.0.0.1:8080")
            .timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(OrbitError::Config(_))));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let builder = RelayBuilder::new().base_url(" https://relay.example/ ");
        assert_eq!(builder.resolve_base_url().unwrap(), "https://relay.example");
        assert!(builder.build().is_ok());
    }
}
