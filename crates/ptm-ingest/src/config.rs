//! UniProt source configuration

use ptm_common::{PtmError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::retry::RetryPolicy;

// ============================================================================
// Defaults
// ============================================================================

/// UniProt REST API root
pub const DEFAULT_BASE_URL: &str = "https://rest.uniprot.org";

/// Organism for single-protein lookups (human)
pub const DEFAULT_REFERENCE_ORGANISM: &str = "9606";

/// Records per page of a proteome scan
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the UniProt REST source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniProtConfig {
    /// REST API root, without trailing slash
    pub base_url: String,
    /// Organism id used by gene lookups
    pub reference_organism: String,
    pub page_size: usize,
    pub timeout_secs: u64,
    /// Restrict gene lookups to reviewed (Swiss-Prot) entries
    pub reviewed_only: bool,
    pub retry: RetryPolicy,
}

impl Default for UniProtConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            reference_organism: DEFAULT_REFERENCE_ORGANISM.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            reviewed_only: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl UniProtConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `PTM_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PTM_UNIPROT_URL") {
            config.base_url = url;
        }
        if let Ok(organism) = std::env::var("PTM_ORGANISM") {
            config.reference_organism = organism;
        }
        if let Some(size) = env_parse::<usize>("PTM_PAGE_SIZE")? {
            config.page_size = size;
        }
        if let Some(secs) = env_parse::<u64>("PTM_TIMEOUT_SECS")? {
            config.timeout_secs = secs;
        }
        if let Some(retries) = env_parse::<u32>("PTM_MAX_RETRIES")? {
            config.retry.max_retries = retries;
        }
        if let Some(delay) = env_parse::<u64>("PTM_RETRY_DELAY_MS")? {
            config.retry.delay_ms = delay;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(PtmError::Config("page size must be positive".to_string()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| PtmError::Config(format!("invalid base URL {}: {}", self.base_url, e)))?;
        Ok(())
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_reference_organism(mut self, organism: impl Into<String>) -> Self {
        self.reference_organism = organism.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_reviewed_only(mut self, reviewed_only: bool) -> Self {
        self.reviewed_only = reviewed_only;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the UniProtKB search endpoint
    pub fn search_url(&self) -> String {
        format!("{}/uniprotkb/search", self.base_url.trim_end_matches('/'))
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| PtmError::Config(format!("{}={}: {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UniProtConfig::default();
        assert_eq!(config.base_url, "https://rest.uniprot.org");
        assert_eq!(config.reference_organism, "9606");
        assert_eq!(config.page_size, 500);
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.delay(), Duration::from_millis(1000));
        assert!(config.reviewed_only);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = UniProtConfig::new()
            .with_base_url("http://127.0.0.1:9000/")
            .with_page_size(25)
            .with_reviewed_only(false)
            .with_retry(RetryPolicy::none());

        assert_eq!(config.search_url(), "http://127.0.0.1:9000/uniprotkb/search");
        assert_eq!(config.page_size, 25);
        assert!(!config.reviewed_only);
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let config = UniProtConfig::new().with_page_size(0);
        assert!(matches!(config.validate(), Err(PtmError::Config(_))));
    }
}
