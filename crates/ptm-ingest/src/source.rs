//! Protein source interface
//!
//! A source decodes proteins from some external database. The pipeline only sees
//! decoded [`Protein`] records and the three outcomes it must tell apart:
//!
//! - `Ok(..)`: records (possibly none for a page)
//! - `Err(PtmError::NotFound)`: a single lookup matched nothing; never retried
//! - `Err(PtmError::TransientSource)`: the fetch itself failed; retried
//!
//! Timeouts are the source's business and surface as transient errors.

use async_trait::async_trait;
use ptm_common::{Protein, Result};

/// One page request of a paginated organism scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Organism identifier understood by the source (e.g. NCBI taxon "9606")
    pub organism: String,
    pub page_size: usize,
    /// Continuation token from the previous page; `None` for the first page
    pub cursor: Option<String>,
}

impl PageRequest {
    pub fn first(organism: impl Into<String>, page_size: usize) -> Self {
        Self {
            organism: organism.into(),
            page_size,
            cursor: None,
        }
    }

    /// Request for the page after `page`
    pub fn next(&self, page: &ProteinPage) -> Option<Self> {
        page.next_cursor.as_ref().map(|cursor| Self {
            organism: self.organism.clone(),
            page_size: self.page_size,
            cursor: Some(cursor.clone()),
        })
    }
}

/// One page of decoded proteins
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProteinPage {
    pub proteins: Vec<Protein>,
    /// Total number of matching records, when the source knows it
    pub total_hint: Option<u64>,
    /// Token for the following page; `None` marks the end of results
    pub next_cursor: Option<String>,
}

impl ProteinPage {
    /// Whether another page should be requested after this one
    pub fn has_more(&self, page_size: usize) -> bool {
        self.next_cursor.is_some() && self.proteins.len() >= page_size
    }
}

/// An external protein database
#[async_trait]
pub trait ProteinSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Look up one protein of the reference organism by gene symbol
    async fn fetch_one(&self, gene: &str) -> Result<Protein>;

    /// Fetch one page of proteins of an organism
    async fn fetch_page(&self, request: &PageRequest) -> Result<ProteinPage>;
}
