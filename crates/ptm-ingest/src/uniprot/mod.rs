//! UniProt REST source
//!
//! Single gene lookups and paginated organism scans against the UniProtKB search
//! endpoint. Pagination follows the `Link: <...>; rel="next"` header.

pub mod client;
pub mod models;

pub use client::UniProtClient;
pub use models::{SearchResponse, UniProtEntry};
