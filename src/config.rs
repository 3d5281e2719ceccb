use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level pluvio configuration.
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluvioConfig {
    /// Base RNG seed; drawn at random when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Combinations run concurrently.
    #[serde(default = "default_n_workers")]
    pub n_workers: usize,

    /// Also run the observed-driven hindcast.
    #[serde(default)]
    pub hindcast: bool,

    /// Reference window the statistics are frozen on.
    pub reference: WindowToml,

    /// Window to synthesise.
    #[serde(default)]
    pub prediction: Option<WindowToml>,

    /// State thresholds.
    #[serde(default)]
    pub thresholds: ThresholdsToml,

    /// Analog search and scoring.
    #[serde(default)]
    pub bootstrap: BootstrapToml,

    /// Climate-model shift signal.
    #[serde(default)]
    pub shift: ShiftToml,

    /// Tail fitting.
    #[serde(default)]
    pub gpd: GpdToml,

    /// Input and output locations.
    pub io: IoToml,

    /// Climate-model runs to downscale.
    #[serde(default, rename = "combination")]
    pub combinations: Vec<CombinationToml>,
}

fn default_n_workers() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WindowToml {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdsToml {
    #[serde(default = "default_lower")]
    pub lower: f64,
    #[serde(default = "default_upper_percentile")]
    pub upper_percentile: f64,
}

impl Default for ThresholdsToml {
    fn default() -> Self {
        Self {
            lower: default_lower(),
            upper_percentile: default_upper_percentile(),
        }
    }
}

fn default_lower() -> f64 {
    1.0
}
fn default_upper_percentile() -> f64 {
    90.0
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapToml {
    #[serde(default = "default_narrow_radius")]
    pub narrow_radius: u16,
    #[serde(default = "default_wide_radius")]
    pub wide_radius: u16,
    #[serde(default = "default_scorer")]
    pub scorer: String,
    #[serde(default = "default_sampling")]
    pub sampling: String,
    #[serde(default)]
    pub k: Option<usize>,
    #[serde(default = "default_weight")]
    pub calendar_weight: f64,
    #[serde(default = "default_weight")]
    pub precip_weight: f64,
    /// Kernel bandwidth (days) for the `calendar` scorer.
    #[serde(default)]
    pub bandwidth: Option<f64>,
}

impl Default for BootstrapToml {
    fn default() -> Self {
        Self {
            narrow_radius: default_narrow_radius(),
            wide_radius: default_wide_radius(),
            scorer: default_scorer(),
            sampling: default_sampling(),
            k: None,
            calendar_weight: default_weight(),
            precip_weight: default_weight(),
            bandwidth: None,
        }
    }
}

fn default_narrow_radius() -> u16 {
    7
}
fn default_wide_radius() -> u16 {
    14
}
fn default_scorer() -> String {
    "knn".to_string()
}
fn default_sampling() -> String {
    "rank".to_string()
}
fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShiftToml {
    #[serde(default = "default_policy")]
    pub policy: String,
    #[serde(default = "default_half_window")]
    pub half_window: u16,
    #[serde(default = "default_pseudo_count")]
    pub pseudo_count: f64,
}

impl Default for ShiftToml {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            half_window: default_half_window(),
            pseudo_count: default_pseudo_count(),
        }
    }
}

fn default_policy() -> String {
    "multiplicative".to_string()
}
fn default_half_window() -> u16 {
    15
}
fn default_pseudo_count() -> f64 {
    0.5
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GpdToml {
    #[serde(default = "default_min_exceedances")]
    pub min_exceedances: usize,
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
}

impl Default for GpdToml {
    fn default() -> Self {
        Self {
            min_exceedances: default_min_exceedances(),
            max_iters: default_max_iters(),
        }
    }
}

fn default_min_exceedances() -> usize {
    10
}
fn default_max_iters() -> u64 {
    1000
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    /// Observed area-averaged series (mm/day).
    pub observed: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_observed_column")]
    pub precip_column: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}
fn default_date_column() -> String {
    "date".to_string()
}
fn default_observed_column() -> String {
    "precip".to_string()
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CombinationToml {
    pub model: String,
    pub experiment: String,
    pub historical: PathBuf,
    pub projected: PathBuf,
    /// Inputs are precipitation flux in kg m-2 s-1.
    #[serde(default)]
    pub flux_units: bool,
    #[serde(default = "default_model_column")]
    pub precip_column: String,
}

fn default_model_column() -> String {
    "pr".to_string()
}

/// Reads and parses a configuration file.
pub fn load(path: &Path) -> Result<PluvioConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config: {}", path.display()))
}
