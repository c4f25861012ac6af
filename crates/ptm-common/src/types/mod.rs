//! Common types used across the PTM zone workspace

use serde::{Deserialize, Serialize};

use crate::error::{PtmError, Result};

/// A known disulfide-bonded segment, 1-based inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisulfideRange {
    pub start: i32,
    pub end: i32,
}

impl DisulfideRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Whether `position` lies inside the segment, endpoints included
    pub fn contains(&self, position: i32) -> bool {
        self.start <= position && position <= self.end
    }
}

/// A protein record as delivered by a source (database decoder or motif scanner).
///
/// Records are built once and never mutated afterwards. Site positions are 1-based
/// and kept as signed integers so that out-of-range values coming from upstream data
/// survive decoding and can be reported instead of rejected.
///
/// # Examples
///
/// ```
/// use ptm_common::types::{DisulfideRange, Protein};
///
/// let protein = Protein {
///     id: "P01308".to_string(),
///     gene: "INS".to_string(),
///     length: 10,
///     n_linked: vec![3, 7],
///     ss_bonds: vec![2, 8],
///     ss_bond_ranges: vec![DisulfideRange::new(1, 4)],
///     ..Default::default()
/// };
/// assert!(protein.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protein {
    /// Primary accession (e.g., "P01308")
    pub id: String,
    /// Gene symbol (e.g., "INS")
    pub gene: String,
    /// Organism scientific name
    #[serde(default)]
    pub scientific_name: String,
    /// Declared residue count
    pub length: i32,
    /// Amino-acid sequence, empty for database-only records
    #[serde(default)]
    pub sequence: String,
    /// Positions of disulfide-bonded cysteines
    #[serde(default)]
    pub ss_bonds: Vec<i32>,
    /// Known disulfide-bonded segments; empty when unknown
    #[serde(default)]
    pub ss_bond_ranges: Vec<DisulfideRange>,
    #[serde(default)]
    pub n_linked: Vec<i32>,
    #[serde(default)]
    pub o_linked: Vec<i32>,
    #[serde(default)]
    pub phosphorylation: Vec<i32>,
}

impl Protein {
    /// Check structural consistency.
    ///
    /// Fails when the declared length is negative or when a present sequence
    /// disagrees with it. Site positions outside `[1, length]` are not an error here.
    pub fn validate(&self) -> Result<()> {
        if self.length < 0 {
            return Err(PtmError::invalid_protein(
                &self.id,
                format!("negative length {}", self.length),
            ));
        }

        if !self.sequence.is_empty() && self.sequence.len() != self.length as usize {
            return Err(PtmError::invalid_protein(
                &self.id,
                format!(
                    "sequence length {} does not match declared length {}",
                    self.sequence.len(),
                    self.length
                ),
            ));
        }

        Ok(())
    }

    /// Residue count as an index bound; zero for a negative declared length
    pub fn residue_count(&self) -> usize {
        usize::try_from(self.length).unwrap_or(0)
    }

    /// Residue letter at a 1-based position, if the sequence is known
    pub fn residue_at(&self, position: usize) -> Option<char> {
        if position == 0 {
            return None;
        }
        self.sequence
            .as_bytes()
            .get(position - 1)
            .map(|b| char::from(*b))
    }

    /// Positions of the given modification type
    pub fn sites(&self, site_type: SiteType) -> &[i32] {
        match site_type {
            SiteType::NLinked => &self.n_linked,
            SiteType::OLinked => &self.o_linked,
            SiteType::Phospho => &self.phosphorylation,
        }
    }
}

/// Modification type of an annotated site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteType {
    #[serde(rename = "N-Linked")]
    NLinked,
    #[serde(rename = "O-Linked")]
    OLinked,
    #[serde(rename = "Phospho")]
    Phospho,
}

impl SiteType {
    /// Report order: N-linked, then O-linked, then phosphorylation
    pub const ALL: [SiteType; 3] = [SiteType::NLinked, SiteType::OLinked, SiteType::Phospho];

    /// Single-letter prefix used in site labels
    pub fn code(self) -> char {
        match self {
            SiteType::NLinked => 'N',
            SiteType::OLinked => 'O',
            SiteType::Phospho => 'P',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SiteType::NLinked => "N-Linked",
            SiteType::OLinked => "O-Linked",
            SiteType::Phospho => "Phospho",
        }
    }

    /// Site label such as "N123"
    pub fn site_label(self, position: i32) -> String {
        format!("{}{}", self.code(), position)
    }
}

impl std::fmt::Display for SiteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One report row per modification site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnnotation {
    pub gene: String,
    pub accession: String,
    pub scientific_name: String,
    /// Type code plus position, e.g. "N123"
    pub glycosite: String,
    #[serde(rename = "type")]
    pub site_type: SiteType,
    pub position: i32,
    pub in_uniprot_disulfide: bool,
    pub in_high_density_zone: bool,
}

/// A maximal run of co-localization, 1-based inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of residues covered
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn protein(length: i32, sequence: &str) -> Protein {
        Protein {
            id: "Q9TEST".to_string(),
            gene: "TEST".to_string(),
            length,
            sequence: sequence.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_database_only_record() {
        assert!(protein(250, "").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_length() {
        let err = protein(-1, "").validate().unwrap_err();
        assert!(matches!(err, PtmError::InvalidProtein { .. }));
    }

    #[test]
    fn test_validate_rejects_sequence_mismatch() {
        let err = protein(4, "MKNCS").validate().unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_residue_at_is_one_based() {
        let p = protein(5, "MKNCS");
        assert_eq!(p.residue_at(1), Some('M'));
        assert_eq!(p.residue_at(5), Some('S'));
        assert_eq!(p.residue_at(0), None);
        assert_eq!(p.residue_at(6), None);
    }

    #[test]
    fn test_site_labels() {
        assert_eq!(SiteType::NLinked.site_label(123), "N123");
        assert_eq!(SiteType::Phospho.site_label(7), "P7");
        assert_eq!(SiteType::OLinked.to_string(), "O-Linked");
    }

    #[test]
    fn test_disulfide_range_is_inclusive() {
        let range = DisulfideRange::new(1, 4);
        assert!(range.contains(1));
        assert!(range.contains(4));
        assert!(!range.contains(5));
    }

    #[test]
    fn test_protein_json_uses_camel_case() {
        let json = r#"{"id":"P1","gene":"G","length":3,"ssBondRanges":[{"start":1,"end":2}],"nLinked":[2]}"#;
        let p: Protein = serde_json::from_str(json).unwrap();
        assert_eq!(p.ss_bond_ranges, vec![DisulfideRange::new(1, 2)]);
        assert_eq!(p.n_linked, vec![2]);
        assert!(p.o_linked.is_empty());
    }
}
