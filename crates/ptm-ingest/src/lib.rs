//! PTM Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Feeds proteins from external sources through the analysis engine.
//!
//! # Sources
//!
//! - **UniProt**: REST search API, single gene lookups and paginated proteome scans
//! - **FASTA**: local sequence files, sites predicted from sequence motifs
//!
//! # Example
//!
//! ```no_run
//! use ptm_common::CalibrationParameters;
//! use ptm_ingest::{BatchPipeline, CsvReport, UniProtClient, UniProtConfig};
//! use std::path::Path;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = UniProtConfig::from_env()?;
//!     let client = UniProtClient::new(config.clone())?;
//!     let mut pipeline = BatchPipeline::new(client, CalibrationParameters::default())
//!         .with_page_size(config.page_size)
//!         .with_retry(config.retry);
//!
//!     let mut report = CsvReport::create(Path::new("human_sites.csv"))?;
//!     let outcome = pipeline.run("9606", &CancellationToken::new(), &mut report).await?;
//!     println!("{} sites", outcome.rows.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod fasta;
pub mod pipeline;
pub mod report;
pub mod retry;
pub mod source;
pub mod uniprot;

pub use config::UniProtConfig;
pub use fasta::{parse_fasta, read_fasta_file};
pub use pipeline::{BatchOutcome, BatchPipeline, BatchProgress, BatchStats, PipelineState};
pub use report::{CsvReport, ReportSink};
pub use retry::{fetch_one_with_retry, retry, RetryPolicy};
pub use source::{PageRequest, ProteinPage, ProteinSource};
pub use uniprot::UniProtClient;
