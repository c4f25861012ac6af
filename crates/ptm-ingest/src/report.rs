//! Delimited-text reports
//!
//! Two tables: one row per modification site for batch runs, and one row per residue
//! for a single-protein profile. Densities are written with four decimals.

use anyhow::{Context, Result};
use ptm_analysis::ProteinProfile;
use ptm_common::SiteAnnotation;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const SITE_HEADER: [&str; 6] = [
    "species",
    "gene",
    "type",
    "site",
    "in_uniprot_disulfide",
    "in_high_density_zone",
];

pub const PROFILE_HEADER: [&str; 8] = [
    "species",
    "position",
    "residue",
    "ss_density",
    "n_linked_density",
    "o_linked_density",
    "phospho_density",
    "in_zone",
];

/// Destination for analysis results
pub trait ReportSink {
    /// Batch table, one row per annotated site
    fn write_sites(&mut self, rows: &[SiteAnnotation]) -> Result<()>;

    /// Per-residue table of one protein
    fn write_profile(&mut self, profile: &ProteinProfile) -> Result<()>;
}

/// CSV (or other single-byte delimited) report writer
pub struct CsvReport<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvReport<W> {
    pub fn new(inner: W) -> Self {
        Self::with_delimiter(inner, b',')
    }

    pub fn with_delimiter(inner: W, delimiter: u8) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(inner),
        }
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush report: {}", e.error()))
    }
}

impl CsvReport<BufWriter<File>> {
    /// Create (or truncate) a report file
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

fn density(value: f64) -> String {
    format!("{:.4}", value)
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl<W: Write> ReportSink for CsvReport<W> {
    fn write_sites(&mut self, rows: &[SiteAnnotation]) -> Result<()> {
        self.writer.write_record(SITE_HEADER)?;
        for row in rows {
            self.writer.write_record([
                row.scientific_name.as_str(),
                row.gene.as_str(),
                row.site_type.label(),
                row.glycosite.as_str(),
                flag(row.in_uniprot_disulfide),
                flag(row.in_high_density_zone),
            ])?;
        }
        self.writer.flush().context("Failed to flush site report")?;
        Ok(())
    }

    fn write_profile(&mut self, profile: &ProteinProfile) -> Result<()> {
        self.writer.write_record(PROFILE_HEADER)?;
        for row in profile.rows() {
            self.writer.write_record([
                profile.species.clone(),
                row.position.to_string(),
                row.residue.to_string(),
                density(row.ss),
                density(row.n_linked),
                density(row.o_linked),
                density(row.phospho),
                flag(row.in_zone).to_string(),
            ])?;
        }
        self.writer.flush().context("Failed to flush profile report")?;
        Ok(())
    }
}
