//! Calibration parameters for density smoothing and zone thresholds
//!
//! Two independent groups exist. The `ss` group drives the disulfide density curve.
//! The `glyco` group drives the N-linked and O-linked curves and also the
//! phosphorylation curve; [`CalibrationParameters::phospho`] names that sharing.
//!
//! Parameters travel as JSON text:
//!
//! ```json
//! {
//!   "ss":    { "windowSize": 20, "threshold": 1.0, "smoothing": 0 },
//!   "glyco": { "windowSize": 20, "threshold": 1.0, "smoothing": 0 }
//! }
//! ```
//!
//! Importing a partial document only overwrites the fields it names.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{PtmError, Result};

/// Default window width in residues
pub const DEFAULT_WINDOW_SIZE: u32 = 20;

/// Default density threshold
pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Window, threshold and smoothing radius for one density signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowParams {
    /// Full window width; the half-width is `window_size / 2`
    pub window_size: u32,
    /// Minimum density for a residue to count as elevated
    pub threshold: f64,
    /// Moving-average radius applied after counting; 0 disables smoothing
    pub smoothing: u32,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            threshold: DEFAULT_THRESHOLD,
            smoothing: 0,
        }
    }
}

impl WindowParams {
    pub fn new(window_size: u32, threshold: f64, smoothing: u32) -> Self {
        Self {
            window_size,
            threshold,
            smoothing,
        }
    }

    fn apply(&mut self, patch: &WindowPatch) {
        if let Some(window_size) = patch.window_size {
            self.window_size = window_size;
        }
        if let Some(threshold) = patch.threshold {
            self.threshold = threshold;
        }
        if let Some(smoothing) = patch.smoothing {
            self.smoothing = smoothing;
        }
    }
}

/// The full calibration state threaded into every analysis call
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationParameters {
    /// Disulfide signal
    pub ss: WindowParams,
    /// Glycosylation signal, shared with phosphorylation
    pub glyco: WindowParams,
}

impl CalibrationParameters {
    pub fn new(ss: WindowParams, glyco: WindowParams) -> Self {
        Self { ss, glyco }
    }

    /// Parameters used for the phosphorylation curve.
    ///
    /// Phosphorylation is calibrated together with glycosylation, so this is the
    /// `glyco` group.
    pub fn phospho(&self) -> &WindowParams {
        &self.glyco
    }

    /// Reject values no density curve can be built from
    pub fn validate(&self) -> Result<()> {
        for (name, group) in [("ss", &self.ss), ("glyco", &self.glyco)] {
            if !group.threshold.is_finite() || group.threshold < 0.0 {
                return Err(PtmError::Config(format!(
                    "{} threshold must be a non-negative number, got {}",
                    name, group.threshold
                )));
            }
        }
        Ok(())
    }

    /// Serialize all six values as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Overlay a JSON document onto these parameters.
    ///
    /// Fields absent from `json` keep their current values.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let patch: CalibrationPatch = serde_json::from_str(json)?;

        let mut updated = *self;
        if let Some(ss) = &patch.ss {
            updated.ss.apply(ss);
        }
        if let Some(glyco) = &patch.glyco {
            updated.glyco.apply(glyco);
        }
        updated.validate()?;

        debug!(?updated, "Imported calibration parameters");
        *self = updated;
        Ok(())
    }

    /// Load a parameter file on top of the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut params = Self::default();
        params.import_json(&text)?;
        Ok(params)
    }

    /// Write the parameters to a file as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindowPatch {
    window_size: Option<u32>,
    threshold: Option<f64>,
    smoothing: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct CalibrationPatch {
    ss: Option<WindowPatch>,
    glyco: Option<WindowPatch>,
}
