use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

pub const DEFAULT_SCN_ITERATIONS: usize = 10;
pub const DEFAULT_SPECKLE_THRESHOLD: f64 = 10.0;
pub const DEFAULT_POOR_BIN_STDDEVS: f64 = 2.0;
pub const DEFAULT_SAVGOL_WINDOW: usize = 17;
pub const DEFAULT_SAVGOL_POLYORDER: usize = 5;
pub const DEFAULT_PICKER_THRESHOLD: f64 = 0.8;

fn default_scn_iterations() -> usize {
    DEFAULT_SCN_ITERATIONS
}

fn default_speckle_threshold() -> f64 {
    DEFAULT_SPECKLE_THRESHOLD
}

fn default_poor_bin_stddevs() -> f64 {
    DEFAULT_POOR_BIN_STDDEVS
}

fn default_savgol_window() -> usize {
    DEFAULT_SAVGOL_WINDOW
}

fn default_savgol_polyorder() -> usize {
    DEFAULT_SAVGOL_POLYORDER
}

fn default_picker_threshold() -> f64 {
    DEFAULT_PICKER_THRESHOLD
}

fn default_centered() -> bool {
    true
}

/// Constants driving the detrending pipeline.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DetrendConfig {
    /// Alternating row/column rescaling passes in the normalizer.
    #[serde(default = "default_scn_iterations")]
    pub scn_iterations: usize,
    /// Speckles are values above median + `speckle_threshold` * stddev of their diagonal.
    #[serde(default = "default_speckle_threshold")]
    pub speckle_threshold: f64,
    /// Poor bins have a column sum at or below median - `poor_bin_stddevs` * stddev.
    #[serde(default = "default_poor_bin_stddevs")]
    pub poor_bin_stddevs: f64,
    #[serde(default = "default_savgol_window")]
    pub savgol_window: usize,
    #[serde(default = "default_savgol_polyorder")]
    pub savgol_polyorder: usize,
}

impl Default for DetrendConfig {
    fn default() -> Self {
        DetrendConfig {
            scn_iterations: DEFAULT_SCN_ITERATIONS,
            speckle_threshold: DEFAULT_SPECKLE_THRESHOLD,
            poor_bin_stddevs: DEFAULT_POOR_BIN_STDDEVS,
            savgol_window: DEFAULT_SAVGOL_WINDOW,
            savgol_polyorder: DEFAULT_SAVGOL_POLYORDER,
        }
    }
}

impl DetrendConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scn_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if self.savgol_window % 2 == 0 {
            return Err(ConfigError::EvenWindow(self.savgol_window));
        }
        if self.savgol_window <= self.savgol_polyorder {
            return Err(ConfigError::WindowTooSmall {
                window: self.savgol_window,
                polyorder: self.savgol_polyorder,
            });
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PickerConfig {
    /// Pixels strictly above this probability are loop candidates.
    #[serde(default = "default_picker_threshold")]
    pub threshold: f64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        PickerConfig {
            threshold: DEFAULT_PICKER_THRESHOLD,
        }
    }
}

impl PickerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

///
/// Full configuration of a loop scan, as read from a TOML file:
///
/// ```toml
/// centered = true
///
/// [detrend]
/// savgol_window = 17
///
/// [picker]
/// threshold = 0.8
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScanConfig {
    #[serde(default)]
    pub detrend: DetrendConfig,
    #[serde(default)]
    pub picker: PickerConfig,
    /// Keep correlation maps at the size of the contact map.
    #[serde(default = "default_centered")]
    pub centered: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            detrend: DetrendConfig::default(),
            picker: PickerConfig::default(),
            centered: true,
        }
    }
}

impl ScanConfig {
    pub fn from_toml_str(toml_str: &str) -> ConfigResult<Self> {
        let config: ScanConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.detrend.validate()?;
        self.picker.validate()
    }
}

impl TryFrom<&Path> for ScanConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> ConfigResult<Self> {
        let toml_str = read_to_string(path)?;
        ScanConfig::from_toml_str(&toml_str)
    }
}
