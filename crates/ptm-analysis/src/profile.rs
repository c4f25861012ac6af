//! Per-residue profile of one protein, for single-protein export

use ptm_common::{CalibrationParameters, Protein, Region, Result};
use serde::Serialize;

use crate::analyzer::SiteCurves;
use crate::regions::extract_regions;
use crate::zones::ZoneMask;

/// Residue letter used when the record carries no sequence
pub const UNKNOWN_RESIDUE: char = 'X';

/// Densities, zone mask and regions of one protein under one parameter set
#[derive(Debug, Clone)]
pub struct ProteinProfile {
    pub accession: String,
    pub gene: String,
    pub species: String,
    protein: Protein,
    pub curves: SiteCurves,
    pub mask: ZoneMask,
    pub regions: Vec<Region>,
}

/// One line of the per-residue table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidueRow {
    pub position: usize,
    pub residue: char,
    pub ss: f64,
    pub n_linked: f64,
    pub o_linked: f64,
    pub phospho: f64,
    pub in_zone: bool,
}

impl ProteinProfile {
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Rows for positions 1..=length
    pub fn rows(&self) -> impl Iterator<Item = ResidueRow> + '_ {
        (0..self.len()).map(move |index| ResidueRow {
            position: index + 1,
            residue: self
                .protein
                .residue_at(index + 1)
                .unwrap_or(UNKNOWN_RESIDUE),
            ss: self.curves.ss.as_slice()[index],
            n_linked: self.curves.n_linked.as_slice()[index],
            o_linked: self.curves.o_linked.as_slice()[index],
            phospho: self.curves.phospho.as_slice()[index],
            in_zone: self.mask.as_slice()[index],
        })
    }
}

/// Build the full per-residue profile of `protein`
pub fn profile(protein: &Protein, params: &CalibrationParameters) -> Result<ProteinProfile> {
    protein.validate()?;

    let curves = SiteCurves::compute(protein, params);
    let mask = curves.zone_mask(params)?;
    let regions = extract_regions(&mask);

    Ok(ProteinProfile {
        accession: protein.id.clone(),
        gene: protein.gene.clone(),
        species: protein.scientific_name.clone(),
        protein: protein.clone(),
        curves,
        mask,
        regions,
    })
}
