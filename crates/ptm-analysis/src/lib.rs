//! PTM Analysis Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Density, zone and region analysis of post-translational modification sites.
//!
//! # Pipeline
//!
//! 1. [`density`]: sliding-window site counts per residue, optionally smoothed
//! 2. [`zones`]: residues where disulfide and N-linked density are both elevated
//! 3. [`analyzer`]: one annotation row per modification site
//! 4. [`regions`]: maximal contiguous zones for reporting
//! 5. [`profile`]: the per-residue table of a single protein
//!
//! Every call takes the calibration parameters explicitly; nothing is cached between
//! calls, so changing a parameter means recomputing from the protein.
//!
//! # Example
//!
//! ```
//! use ptm_analysis::analyze;
//! use ptm_common::{CalibrationParameters, DisulfideRange, Protein, WindowParams};
//!
//! let protein = Protein {
//!     id: "P01308".to_string(),
//!     gene: "INS".to_string(),
//!     length: 10,
//!     ss_bonds: vec![2, 8],
//!     ss_bond_ranges: vec![DisulfideRange::new(1, 4)],
//!     n_linked: vec![3, 7],
//!     ..Default::default()
//! };
//! let params = CalibrationParameters::new(
//!     WindowParams::new(4, 1.0, 0),
//!     WindowParams::new(4, 1.0, 0),
//! );
//!
//! let rows = analyze(&protein, &params).unwrap();
//! assert_eq!(rows[0].glycosite, "N3");
//! assert!(rows[0].in_uniprot_disulfide);
//! ```

pub mod analyzer;
pub mod density;
pub mod profile;
pub mod regions;
pub mod zones;

pub use analyzer::{analyze, SiteCurves};
pub use density::{density, DensityCurve};
pub use profile::{profile, ProteinProfile, ResidueRow};
pub use regions::extract_regions;
pub use zones::{in_disulfide_range, zone_mask, ZoneMask};
