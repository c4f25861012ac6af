//! FASTA file reading and motif-based analysis
#![allow(clippy::unwrap_used, clippy::expect_used)]

use flate2::write::GzEncoder;
use flate2::Compression;
use ptm_analysis::analyze;
use ptm_common::{CalibrationParameters, WindowParams};
use ptm_ingest::read_fasta_file;
use std::io::Write;
use tempfile::TempDir;

const FASTA: &str = "\
>sp|P00001|TST1_HUMAN Test protein one OS=Homo sapiens OX=9606 GN=TST1 PE=1 SV=1
MCNSTCAANGTC
>sp|P00002|TST2_MOUSE Test protein two OS=Mus musculus OX=10090 PE=2 SV=1
AAAAANPSAA
";

#[test]
fn test_reads_plain_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("proteins.fasta");
    std::fs::write(&path, FASTA).unwrap();

    let proteins = read_fasta_file(&path).unwrap();

    assert_eq!(proteins.len(), 2);
    assert_eq!(proteins[0].id, "P00001");
    assert_eq!(proteins[0].gene, "TST1");
    assert_eq!(proteins[0].length, 12);
    assert_eq!(proteins[0].ss_bonds, vec![2, 6, 12]);
    assert_eq!(proteins[0].n_linked, vec![3, 9]);

    // no GN field, proline in the sequon
    assert_eq!(proteins[1].gene, "P00002");
    assert_eq!(proteins[1].scientific_name, "Mus musculus");
    assert!(proteins[1].n_linked.is_empty());
}

#[test]
fn test_reads_gzipped_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("proteins.fasta.gz");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(FASTA.as_bytes()).unwrap();
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();

    let proteins = read_fasta_file(&path).unwrap();
    assert_eq!(proteins.len(), 2);
    assert_eq!(proteins[0].sequence, "MCNSTCAANGTC");
}

#[test]
fn test_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.fasta");

    let err = read_fasta_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.fasta"));
}

#[test]
fn test_motif_proteins_feed_the_analyzer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("proteins.fasta");
    std::fs::write(&path, FASTA).unwrap();
    let proteins = read_fasta_file(&path).unwrap();

    let params =
        CalibrationParameters::new(WindowParams::new(2, 1.0, 0), WindowParams::new(2, 1.0, 0));
    let rows = analyze(&proteins[0], &params).unwrap();

    let labels: Vec<&str> = rows.iter().map(|row| row.glycosite.as_str()).collect();
    assert_eq!(labels, vec!["N3", "N9"]);
    // motif input has no known disulfide ranges
    assert!(rows.iter().all(|row| !row.in_uniprot_disulfide));
    // N3 sits next to C2, N9 has no cysteine within one residue
    assert!(rows[0].in_high_density_zone);
    assert!(!rows[1].in_high_density_zone);
}
