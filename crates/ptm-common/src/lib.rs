//! PTM Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, calibration parameters, logging, and error handling for the PTM
//! co-localization workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`PtmError`] and the [`Result`] alias
//! - **Types**: [`types::Protein`] input records and report row types
//! - **Calibration**: [`calibration::CalibrationParameters`] and their JSON transfer
//! - **Logging**: subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use ptm_common::calibration::CalibrationParameters;
//!
//! let mut params = CalibrationParameters::default();
//! params.import_json(r#"{"ss": {"windowSize": 12}}"#).unwrap();
//! assert_eq!(params.ss.window_size, 12);
//! ```

pub mod calibration;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use calibration::{CalibrationParameters, WindowParams};
pub use error::{PtmError, Result};
pub use types::{DisulfideRange, Protein, Region, SiteAnnotation, SiteType};
