//! PTM Ingest - co-localization analysis from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use ptm_analysis::{analyze, profile};
use ptm_common::logging::{init_logging, LogConfig, LogLevel};
use ptm_common::{CalibrationParameters, PtmError};
use ptm_ingest::{
    fetch_one_with_retry, read_fasta_file, BatchPipeline, CsvReport, ReportSink, UniProtClient,
    UniProtConfig,
};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "ptm-ingest")]
#[command(author, version, about = "PTM co-localization analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze every protein of an organism from UniProt
    Proteome {
        /// NCBI taxonomy id
        #[arg(long, env = "PTM_PROTEOME_ORGANISM", default_value = "9606")]
        organism: String,

        /// Site report (CSV)
        #[arg(short, long)]
        output: PathBuf,

        /// Calibration parameter file (JSON)
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Records per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Per-residue profile of one protein looked up by gene symbol
    Protein {
        #[arg(short, long)]
        gene: String,

        /// Per-residue report (CSV)
        #[arg(short, long)]
        output: PathBuf,

        /// Calibration parameter file (JSON)
        #[arg(short, long)]
        params: Option<PathBuf>,
    },

    /// Analyze a local FASTA file using sequence motifs
    Fasta {
        /// FASTA file, optionally gzipped
        #[arg(short, long)]
        input: PathBuf,

        /// Site report (CSV)
        #[arg(short, long)]
        output: PathBuf,

        /// Calibration parameter file (JSON)
        #[arg(short, long)]
        params: Option<PathBuf>,
    },

    /// Write the effective calibration parameters
    Params {
        /// Destination file (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Parameter file to start from instead of the defaults
        #[arg(long)]
        from: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over flags
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("ptm-ingest")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    match cli.command {
        Command::Proteome {
            organism,
            output,
            params,
            page_size,
        } => run_proteome(&organism, &output, params.as_deref(), page_size).await?,
        Command::Protein {
            gene,
            output,
            params,
        } => run_protein(&gene, &output, params.as_deref()).await?,
        Command::Fasta {
            input,
            output,
            params,
        } => run_fasta(&input, &output, params.as_deref())?,
        Command::Params { output, from } => {
            let params = load_params(from.as_deref())?;
            params
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(path = %output.display(), "Wrote calibration parameters");
        },
    }

    Ok(())
}

fn load_params(path: Option<&Path>) -> Result<CalibrationParameters> {
    match path {
        Some(path) => CalibrationParameters::load(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display())),
        None => Ok(CalibrationParameters::default()),
    }
}

fn progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}% {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

async fn run_proteome(
    organism: &str,
    output: &Path,
    params: Option<&Path>,
    page_size: Option<usize>,
) -> Result<()> {
    let params = load_params(params)?;
    let mut config = UniProtConfig::from_env()?;
    if let Some(size) = page_size {
        config = config.with_page_size(size);
    }

    let client = UniProtClient::new(config.clone())?;
    let pb = progress_bar()?;
    let bar = pb.clone();

    let mut pipeline = BatchPipeline::new(client, params)
        .with_page_size(config.page_size)
        .with_retry(config.retry)
        .with_progress(move |progress| {
            bar.set_position(progress.percent as u64);
            bar.set_message(format!(
                "page {} | {} proteins | {} sites",
                progress.pages, progress.processed, progress.rows
            ));
        });

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current page");
            on_signal.cancel();
        }
    });

    let mut report = CsvReport::create(output)?;
    let result = pipeline.run(organism, &cancel, &mut report).await;

    match result {
        Ok(outcome) => {
            pb.finish_with_message(format!("{} sites", outcome.rows.len()));
            info!(
                run_id = %outcome.stats.run_id,
                output = %output.display(),
                proteins = outcome.stats.proteins_processed,
                skipped = outcome.stats.proteins_skipped,
                sites = outcome.rows.len(),
                "Proteome analysis complete"
            );
            Ok(())
        },
        Err(e) => {
            pb.abandon();
            drop(report);
            // a failed run leaves no partial report behind
            if let Err(remove) = std::fs::remove_file(output) {
                warn!(path = %output.display(), error = %remove, "Failed to remove partial report");
            }
            Err(e)
        },
    }
}

async fn run_protein(gene: &str, output: &Path, params: Option<&Path>) -> Result<()> {
    let params = load_params(params)?;
    let config = UniProtConfig::from_env()?;
    let client = UniProtClient::new(config.clone())?;

    let protein = match fetch_one_with_retry(&client, gene, &config.retry).await {
        Ok(protein) => protein,
        Err(e @ PtmError::NotFound(_)) => {
            anyhow::bail!("No protein found for gene {}: {}", gene, e)
        },
        Err(e) => return Err(e.into()),
    };

    let profile = profile(&protein, &params)?;
    for region in &profile.regions {
        info!(accession = %profile.accession, region = %region, "High-density region");
    }

    let mut report = CsvReport::create(output)?;
    report.write_profile(&profile)?;

    info!(
        accession = %profile.accession,
        gene = %profile.gene,
        residues = profile.len(),
        regions = profile.regions.len(),
        output = %output.display(),
        "Wrote per-residue profile"
    );
    Ok(())
}

fn run_fasta(input: &Path, output: &Path, params: Option<&Path>) -> Result<()> {
    let params = load_params(params)?;
    let proteins = read_fasta_file(input)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for protein in &proteins {
        match analyze(protein, &params) {
            Ok(mut annotations) => rows.append(&mut annotations),
            Err(PtmError::InvalidProtein { accession, reason }) => {
                skipped += 1;
                warn!(accession = %accession, reason = %reason, "Skipping invalid protein");
            },
            Err(e) => return Err(e.into()),
        }
    }

    let mut report = CsvReport::create(output)?;
    report.write_sites(&rows)?;

    info!(
        input = %input.display(),
        proteins = proteins.len(),
        skipped,
        sites = rows.len(),
        output = %output.display(),
        "FASTA analysis complete"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_proteome_organism_has_its_own_env_var() {
        let cli = Cli::command();
        let proteome = cli.find_subcommand("proteome").unwrap();
        let organism = proteome
            .get_arguments()
            .find(|arg| arg.get_id() == "organism")
            .unwrap();

        // PTM_ORGANISM is the reference organism for single-gene lookups
        assert_eq!(organism.get_env(), Some(OsStr::new("PTM_PROTEOME_ORGANISM")));
    }
}
