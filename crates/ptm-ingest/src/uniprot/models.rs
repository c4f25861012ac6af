//! UniProtKB REST JSON models
//!
//! Only the fields the analysis needs are decoded; everything else in the payload is
//! ignored.

use ptm_common::{DisulfideRange, Protein};
use serde::Deserialize;

pub const FEATURE_DISULFIDE: &str = "Disulfide bond";
pub const FEATURE_GLYCOSYLATION: &str = "Glycosylation";
pub const FEATURE_MODIFIED_RESIDUE: &str = "Modified residue";

/// Return fields requested from the search endpoint
pub const SEARCH_FIELDS: &str =
    "accession,gene_names,organism_name,length,sequence,ft_disulfid,ft_carbohyd,ft_mod_res";

/// Body of a `/uniprotkb/search` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<UniProtEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniProtEntry {
    pub primary_accession: String,
    #[serde(default)]
    pub organism: Option<Organism>,
    #[serde(default)]
    pub genes: Vec<Gene>,
    #[serde(default)]
    pub sequence: Option<Sequence>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organism {
    #[serde(default)]
    pub scientific_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
    #[serde(default)]
    pub gene_name: Option<ValueField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValueField {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sequence {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub length: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    #[serde(default)]
    pub description: String,
    pub location: Location,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

/// Feature endpoint; `value` is null for unknown positions
#[derive(Debug, Clone, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub value: Option<i32>,
}

impl Feature {
    fn start(&self) -> Option<i32> {
        self.location.start.value
    }

    fn end(&self) -> Option<i32> {
        self.location.end.value
    }
}

impl UniProtEntry {
    /// First gene name, falling back to the accession
    pub fn gene(&self) -> String {
        self.genes
            .iter()
            .find_map(|g| g.gene_name.as_ref())
            .map(|name| name.value.clone())
            .unwrap_or_else(|| self.primary_accession.clone())
    }

    /// Decode into the analysis model
    pub fn into_protein(self) -> Protein {
        let gene = self.gene();
        let (sequence, length) = match self.sequence {
            Some(seq) => {
                let length = seq
                    .length
                    .unwrap_or_else(|| i32::try_from(seq.value.len()).unwrap_or(i32::MAX));
                (seq.value, length)
            }
            None => (String::new(), 0),
        };

        let mut protein = Protein {
            id: self.primary_accession,
            gene,
            scientific_name: self
                .organism
                .map(|o| o.scientific_name)
                .unwrap_or_default(),
            length,
            sequence,
            ..Default::default()
        };

        for feature in &self.features {
            match feature.feature_type.as_str() {
                FEATURE_DISULFIDE => {
                    if let (Some(start), Some(end)) = (feature.start(), feature.end()) {
                        protein.ss_bonds.push(start);
                        protein.ss_bonds.push(end);
                        protein.ss_bond_ranges.push(DisulfideRange::new(start, end));
                    }
                }
                FEATURE_GLYCOSYLATION => {
                    if let Some(position) = feature.start() {
                        if feature.description.starts_with("N-linked") {
                            protein.n_linked.push(position);
                        } else if feature.description.starts_with("O-linked") {
                            protein.o_linked.push(position);
                        }
                    }
                }
                FEATURE_MODIFIED_RESIDUE => {
                    if let Some(position) = feature.start() {
                        if feature.description.starts_with("Phospho") {
                            protein.phosphorylation.push(position);
                        }
                    }
                }
                _ => {}
            }
        }

        protein.ss_bonds.sort_unstable();
        protein.ss_bonds.dedup();

        protein
    }
}
