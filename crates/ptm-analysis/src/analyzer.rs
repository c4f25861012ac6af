//! Per-protein site annotation

use ptm_common::{CalibrationParameters, Protein, Result, SiteAnnotation, SiteType};
use tracing::trace;

use crate::density::{density_with, DensityCurve};
use crate::zones::{in_disulfide_range, zone_mask, ZoneMask};

/// The four density signals of one protein
#[derive(Debug, Clone, PartialEq)]
pub struct SiteCurves {
    /// Disulfide cysteines, `ss` parameters
    pub ss: DensityCurve,
    /// N-linked glycosylation, `glyco` parameters
    pub n_linked: DensityCurve,
    /// O-linked glycosylation, `glyco` parameters; exported, never used for zones
    pub o_linked: DensityCurve,
    /// Phosphorylation, the glyco-aliased `phospho` parameters
    pub phospho: DensityCurve,
}

impl SiteCurves {
    pub fn compute(protein: &Protein, params: &CalibrationParameters) -> Self {
        let length = protein.residue_count();
        Self {
            ss: density_with(&protein.ss_bonds, length, &params.ss),
            n_linked: density_with(&protein.n_linked, length, &params.glyco),
            o_linked: density_with(&protein.o_linked, length, &params.glyco),
            phospho: density_with(&protein.phosphorylation, length, params.phospho()),
        }
    }

    /// Zones where disulfide and N-linked density are both elevated
    pub fn zone_mask(&self, params: &CalibrationParameters) -> Result<ZoneMask> {
        zone_mask(
            &self.ss,
            params.ss.threshold,
            &self.n_linked,
            params.glyco.threshold,
        )
    }
}

/// Annotate every modification site of `protein`.
///
/// Rows come out N-linked first, then O-linked, then phosphorylation, each group in
/// the protein's own list order. A site outside the sequence is reported outside any
/// zone rather than failing the protein.
pub fn analyze(protein: &Protein, params: &CalibrationParameters) -> Result<Vec<SiteAnnotation>> {
    protein.validate()?;

    let curves = SiteCurves::compute(protein, params);
    let mask = curves.zone_mask(params)?;

    let rows = annotate(protein, &mask);
    trace!(accession = %protein.id, rows = rows.len(), zone_residues = mask.count(), "Annotated protein");
    Ok(rows)
}

/// Site rows for `protein` against an already computed mask
pub fn annotate(protein: &Protein, mask: &ZoneMask) -> Vec<SiteAnnotation> {
    SiteType::ALL
        .iter()
        .flat_map(|&site_type| {
            protein
                .sites(site_type)
                .iter()
                .map(move |&position| SiteAnnotation {
                    gene: protein.gene.clone(),
                    accession: protein.id.clone(),
                    scientific_name: protein.scientific_name.clone(),
                    glycosite: site_type.site_label(position),
                    site_type,
                    position,
                    in_uniprot_disulfide: in_disulfide_range(position, &protein.ss_bond_ranges),
                    in_high_density_zone: mask.at_position(position),
                })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ptm_common::{PtmError, WindowParams};

    fn params(window: u32) -> CalibrationParameters {
        CalibrationParameters::new(
            WindowParams::new(window, 1.0, 0),
            WindowParams::new(window, 1.0, 0),
        )
    }

    #[test]
    fn test_rows_are_grouped_by_type_in_input_order() {
        let protein = Protein {
            id: "P1".into(),
            gene: "G".into(),
            length: 20,
            n_linked: vec![9, 2],
            o_linked: vec![15],
            phosphorylation: vec![4, 1],
            ..Default::default()
        };

        let labels: Vec<String> = analyze(&protein, &params(4))
            .unwrap()
            .into_iter()
            .map(|row| row.glycosite)
            .collect();

        assert_eq!(labels, vec!["N9", "N2", "O15", "P4", "P1"]);
    }

    #[test]
    fn test_zone_ignores_o_linked_and_phospho() {
        // Dense O-linked and phospho sites but no N-linked: no zone anywhere
        let protein = Protein {
            id: "P2".into(),
            gene: "G".into(),
            length: 10,
            ss_bonds: vec![4, 6],
            o_linked: vec![4, 5, 6],
            phosphorylation: vec![5],
            ..Default::default()
        };

        let rows = analyze(&protein, &params(4)).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| !row.in_high_density_zone));
    }

    #[test]
    fn test_out_of_range_site_is_not_in_zone() {
        let protein = Protein {
            id: "P3".into(),
            gene: "G".into(),
            length: 5,
            ss_bonds: vec![1, 2, 3, 4, 5],
            n_linked: vec![3, 12],
            ..Default::default()
        };

        let rows = analyze(&protein, &params(10)).unwrap();
        assert!(rows[0].in_high_density_zone);
        assert_eq!(rows[1].glycosite, "N12");
        assert!(!rows[1].in_high_density_zone);
    }

    #[test]
    fn test_invalid_protein_is_rejected() {
        let protein = Protein {
            id: "P4".into(),
            length: 3,
            sequence: "MKNC".into(),
            ..Default::default()
        };
        assert!(matches!(
            analyze(&protein, &params(4)),
            Err(PtmError::InvalidProtein { .. })
        ));
    }

    #[test]
    fn test_phospho_curve_follows_glyco_parameters() {
        let protein = Protein {
            id: "P5".into(),
            length: 9,
            phosphorylation: vec![5],
            ..Default::default()
        };
        let params = CalibrationParameters::new(
            WindowParams::new(0, 1.0, 0),
            WindowParams::new(4, 1.0, 0),
        );

        let curves = SiteCurves::compute(&protein, &params);
        // glyco window 4 spreads one site across five residues
        assert_eq!(curves.phospho.iter().filter(|&v| v > 0.0).count(), 5);
    }
}
