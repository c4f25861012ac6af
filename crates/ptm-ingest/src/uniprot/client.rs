//! HTTP client for the UniProtKB search endpoint

use async_trait::async_trait;
use ptm_common::{Protein, PtmError, Result};
use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::models::{SearchResponse, SEARCH_FIELDS};
use crate::config::UniProtConfig;
use crate::source::{PageRequest, ProteinPage, ProteinSource};

/// Header carrying the total number of matching entries
pub const TOTAL_RESULTS_HEADER: &str = "x-total-results";

/// UniProt REST source
pub struct UniProtClient {
    client: Client,
    config: UniProtConfig,
    next_link: Regex,
}

impl UniProtClient {
    pub fn new(config: UniProtConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("ptm-ingest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PtmError::Config(format!("failed to build HTTP client: {}", e)))?;

        let next_link = Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#)
            .map_err(|e| PtmError::Config(e.to_string()))?;

        Ok(Self {
            client,
            config,
            next_link,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(UniProtConfig::from_env()?)
    }

    pub fn config(&self) -> &UniProtConfig {
        &self.config
    }

    /// Query used for a single gene lookup in the reference organism
    pub fn gene_query(&self, gene: &str) -> String {
        let mut query = format!(
            "gene_exact:{} AND organism_id:{}",
            gene, self.config.reference_organism
        );
        if self.config.reviewed_only {
            query.push_str(" AND reviewed:true");
        }
        query
    }

    async fn search(
        &self,
        query: &str,
        size: usize,
        cursor: Option<&str>,
    ) -> Result<(SearchResponse, HeaderMap)> {
        let size = size.to_string();
        let mut params = vec![
            ("query", query),
            ("format", "json"),
            ("fields", SEARCH_FIELDS),
            ("size", size.as_str()),
        ];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }

        let url = self.config.search_url();
        debug!(url = %url, query, cursor = ?cursor, "UniProt search");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(&url, status));
        }

        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| request_error(&url, e))?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| PtmError::MalformedPage(format!("{}: {}", url, e)))?;

        Ok((parsed, headers))
    }

    /// `cursor` parameter of the `rel="next"` link, if any
    pub fn next_cursor(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(reqwest::header::LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|link| {
                let captures = self.next_link.captures(link)?;
                let next = Url::parse(captures.get(1)?.as_str()).ok()?;
                next.query_pairs()
                    .find(|(key, _)| key == "cursor")
                    .map(|(_, value)| value.into_owned())
            })
    }
}

fn total_results(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(TOTAL_RESULTS_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn request_error(url: &str, e: reqwest::Error) -> PtmError {
    if e.is_decode() {
        PtmError::MalformedPage(format!("{}: {}", url, e))
    } else {
        PtmError::transient(format!("{}: {}", url, e))
    }
}

fn status_error(url: &str, status: StatusCode) -> PtmError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        PtmError::transient(format!("{} returned {}", url, status))
    } else {
        PtmError::MalformedPage(format!("{} returned {}", url, status))
    }
}

#[async_trait]
impl ProteinSource for UniProtClient {
    fn name(&self) -> &str {
        "uniprot"
    }

    async fn fetch_one(&self, gene: &str) -> Result<Protein> {
        let query = self.gene_query(gene);
        let (response, _) = self.search(&query, 1, None).await?;

        response
            .results
            .into_iter()
            .next()
            .map(|entry| entry.into_protein())
            .ok_or_else(|| {
                PtmError::not_found(format!(
                    "gene {} in organism {}",
                    gene, self.config.reference_organism
                ))
            })
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ProteinPage> {
        let query = format!("organism_id:{}", request.organism);
        let (response, headers) = self
            .search(&query, request.page_size, request.cursor.as_deref())
            .await?;

        Ok(ProteinPage {
            proteins: response
                .results
                .into_iter()
                .map(|entry| entry.into_protein())
                .collect(),
            total_hint: total_results(&headers),
            next_cursor: self.next_cursor(&headers),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, LINK};

    fn client() -> UniProtClient {
        UniProtClient::new(UniProtConfig::default()).unwrap()
    }

    #[test]
    fn test_gene_query() {
        assert_eq!(
            client().gene_query("INS"),
            "gene_exact:INS AND organism_id:9606 AND reviewed:true"
        );

        let unreviewed =
            UniProtClient::new(UniProtConfig::default().with_reviewed_only(false)).unwrap();
        assert_eq!(unreviewed.gene_query("INS"), "gene_exact:INS AND organism_id:9606");
    }

    #[test]
    fn test_next_cursor_from_link_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                "<https://rest.uniprot.org/uniprotkb/search?query=organism_id%3A9606&cursor=1mkadjx2&size=500>; rel=\"next\"",
            ),
        );
        assert_eq!(client().next_cursor(&headers).as_deref(), Some("1mkadjx2"));
        assert_eq!(client().next_cursor(&HeaderMap::new()), None);
    }

    #[test]
    fn test_total_results_header() {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_RESULTS_HEADER, HeaderValue::from_static("20421"));
        assert_eq!(total_results(&headers), Some(20421));

        headers.insert(TOTAL_RESULTS_HEADER, HeaderValue::from_static("many"));
        assert_eq!(total_results(&headers), None);
    }

    #[test]
    fn test_status_classification() {
        assert!(status_error("u", StatusCode::SERVICE_UNAVAILABLE).is_transient());
        assert!(status_error("u", StatusCode::TOO_MANY_REQUESTS).is_transient());
        assert!(!status_error("u", StatusCode::BAD_REQUEST).is_transient());
    }
}
