//! FASTA sequence-motif producer
//!
//! Builds proteins straight from sequence: N-linked sites from the N-X-[ST] sequon
//! and every cysteine as a disulfide candidate. Disulfide ranges, O-linked and
//! phosphorylation sites stay empty since sequence alone cannot place them.
//!
//! Handles `.gz` input based on file extension.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use ptm_common::Protein;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// 1-based positions of N-X-[ST] sequons where neither X nor the following residue is P.
///
/// A sequon ending at the last residue qualifies.
pub fn n_glyco_sites(sequence: &[u8]) -> Vec<i32> {
    let mut sites = Vec::new();
    for i in 0..sequence.len().saturating_sub(2) {
        if sequence[i] != b'N' || sequence[i + 1] == b'P' {
            continue;
        }
        if !matches!(sequence[i + 2], b'S' | b'T') {
            continue;
        }
        if sequence.get(i + 3) == Some(&b'P') {
            continue;
        }
        sites.push(position(i));
    }
    sites
}

/// 1-based positions of every cysteine
pub fn cysteines(sequence: &[u8]) -> Vec<i32> {
    sequence
        .iter()
        .enumerate()
        .filter(|(_, &residue)| residue == b'C')
        .map(|(i, _)| position(i))
        .collect()
}

fn position(index: usize) -> i32 {
    i32::try_from(index + 1).unwrap_or(i32::MAX)
}

/// Parser for FASTA protein files
pub struct FastaParser {
    header_key: Regex,
}

impl FastaParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            header_key: Regex::new(r"(?:^|\s)([A-Z]{2})=")?,
        })
    }

    /// Parse a FASTA file, gunzipping `.gz` files
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Protein>> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        let proteins = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
            self.parse_reader(GzDecoder::new(file))
        } else {
            self.parse_reader(file)
        }
        .with_context(|| format!("Failed to read FASTA file: {}", path.display()))?;

        debug!(path = %path.display(), proteins = proteins.len(), "Parsed FASTA file");
        Ok(proteins)
    }

    pub fn parse_str(&self, text: &str) -> Result<Vec<Protein>> {
        self.parse_reader(text.as_bytes())
    }

    fn parse_reader<R: Read>(&self, reader: R) -> Result<Vec<Protein>> {
        let mut proteins = Vec::new();
        let mut current: Option<RecordBuilder> = None;

        for line in BufReader::new(reader).lines() {
            let line = line.context("Failed to read line")?;
            let line = line.trim_end();

            if let Some(header) = line.strip_prefix('>') {
                if let Some(record) = current.take() {
                    proteins.push(record.build());
                }
                current = Some(self.parse_header(header));
            } else if let Some(record) = current.as_mut() {
                record.push_sequence(line);
            }
        }

        if let Some(record) = current {
            proteins.push(record.build());
        }

        Ok(proteins)
    }

    /// `>db|ACC|NAME description OS=... OX=... GN=...`, or a bare identifier
    fn parse_header(&self, header: &str) -> RecordBuilder {
        let header = header.trim();
        let (first, description) = header
            .split_once(char::is_whitespace)
            .unwrap_or((header, ""));

        let mut fields = first.split('|');
        let accession = match (fields.next(), fields.next()) {
            (Some(_db), Some(acc)) if !acc.is_empty() => acc.to_string(),
            _ => first.to_string(),
        };

        let mut record = RecordBuilder {
            accession,
            ..Default::default()
        };

        let keys: Vec<_> = self.header_key.captures_iter(description).collect();
        for (n, captures) in keys.iter().enumerate() {
            let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let value_end = keys
                .get(n + 1)
                .and_then(|next| next.get(0))
                .map_or(description.len(), |m| m.start());
            let value = description[whole.end()..value_end].trim().to_string();

            match key.as_str() {
                "OS" => record.organism = Some(value),
                "GN" => record.gene = Some(value),
                _ => {}
            }
        }

        record
    }
}

#[derive(Default)]
struct RecordBuilder {
    accession: String,
    gene: Option<String>,
    organism: Option<String>,
    sequence: String,
}

impl RecordBuilder {
    fn push_sequence(&mut self, line: &str) {
        self.sequence.extend(
            line.chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_ascii_uppercase()),
        );
    }

    fn build(self) -> Protein {
        let residues = self.sequence.as_bytes();
        Protein {
            gene: self.gene.unwrap_or_else(|| self.accession.clone()),
            id: self.accession,
            scientific_name: self.organism.unwrap_or_default(),
            length: i32::try_from(residues.len()).unwrap_or(i32::MAX),
            ss_bonds: cysteines(residues),
            n_linked: n_glyco_sites(residues),
            sequence: self.sequence,
            ..Default::default()
        }
    }
}

/// Parse FASTA text into proteins
pub fn parse_fasta(text: &str) -> Result<Vec<Protein>> {
    FastaParser::new()?.parse_str(text)
}

/// Read a FASTA file (plain or `.gz`) into proteins
pub fn read_fasta_file(path: &Path) -> Result<Vec<Protein>> {
    FastaParser::new()?.parse_file(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sequon_rules() {
        // N-G-S qualifies, N-P-S does not, N-A-T-P does not
        assert_eq!(n_glyco_sites(b"MNGSANPSANATPA"), vec![2]);
        // sequon ending at the last residue
        assert_eq!(n_glyco_sites(b"AANKT"), vec![3]);
        assert!(n_glyco_sites(b"NS").is_empty());
        assert!(n_glyco_sites(b"").is_empty());
    }

    #[test]
    fn test_cysteines() {
        assert_eq!(cysteines(b"CAACGC"), vec![1, 4, 6]);
    }

    #[test]
    fn test_uniprot_header() {
        let proteins = parse_fasta(
            ">sp|P01308|INS_HUMAN Insulin OS=Homo sapiens OX=9606 GN=INS PE=1 SV=1\n\
             MALWMRLLPL\n\
             LALLALWGPD\n",
        )
        .unwrap();

        assert_eq!(proteins.len(), 1);
        let insulin = &proteins[0];
        assert_eq!(insulin.id, "P01308");
        assert_eq!(insulin.gene, "INS");
        assert_eq!(insulin.scientific_name, "Homo sapiens");
        assert_eq!(insulin.length, 20);
        assert_eq!(insulin.sequence, "MALWMRLLPLLALLALWGPD");
        assert!(insulin.validate().is_ok());
    }

    #[test]
    fn test_bare_header_and_lowercase_sequence() {
        let proteins = parse_fasta(">seq1 some protein\nmcn sc\n>seq2\nAC\n").unwrap();

        assert_eq!(proteins.len(), 2);
        assert_eq!(proteins[0].id, "seq1");
        assert_eq!(proteins[0].gene, "seq1");
        assert!(proteins[0].scientific_name.is_empty());
        assert_eq!(proteins[0].sequence, "MCNSC");
        assert_eq!(proteins[0].ss_bonds, vec![2, 5]);
        assert!(proteins[0].n_linked.is_empty());
        assert_eq!(proteins[1].ss_bonds, vec![2]);
        assert!(proteins[1].ss_bond_ranges.is_empty());
        assert!(proteins[1].o_linked.is_empty());
    }
}
