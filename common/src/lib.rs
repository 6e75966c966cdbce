/*!
common/src/lib.rs

Shared configuration types and report input for the Morning Edition digest.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a default config file merged with an override file
- The report handed over by the summarization step (see [`report`])
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod report;

pub use report::{Report, Section, Supplement};

/// Default transport page budget (estimated characters per chat message).
pub const DEFAULT_TRANSPORT_BUDGET: usize = 2000;
/// Looser bound used when deciding whether the supplement joins the last page.
pub const DEFAULT_SUPPLEMENT_BOUND: usize = 3000;
/// Fixed per-section allowance for the block wrapper the transport requires.
pub const DEFAULT_SECTION_OVERHEAD: usize = 100;

/// Masthead text fields redrawn at the top of every document page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MastheadConfig {
    pub title: Option<String>,
    /// Left part of the metadata bar, e.g. "VOL. CXXIV ... No. 58,402"
    pub volume: Option<String>,
    /// Right part of the metadata bar
    pub edition: Option<String>,
}

/// Maps a report category onto a display title in the document.
///
/// A section is selected when its title contains `matches`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionMapping {
    pub matches: String,
    pub title: String,
}

/// Document (PDF newspaper) configuration. Lengths are in points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub page_width: Option<f32>,
    pub page_height: Option<f32>,
    pub margin_left: Option<f32>,
    pub margin_right: Option<f32>,
    pub margin_top: Option<f32>,
    pub margin_bottom: Option<f32>,
    /// Headline written under every section title, followed by the title itself.
    /// An empty string disables the headline.
    pub headline_prefix: Option<String>,
    pub page_numbers: Option<bool>,
    #[serde(default)]
    pub masthead: MastheadConfig,
    #[serde(default)]
    pub sections: Vec<SectionMapping>,
}

/// Chat transport configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportConfig {
    pub budget: Option<usize>,
    pub supplement_bound: Option<usize>,
    pub section_overhead: Option<usize>,
    /// Title shown in the header block of every page
    pub title: Option<String>,
    pub supplement_heading: Option<String>,
    /// Pause between two page sends
    pub send_interval_ms: Option<u64>,
}

impl TransportConfig {
    pub fn budget(&self) -> usize {
        self.budget.unwrap_or(DEFAULT_TRANSPORT_BUDGET)
    }

    pub fn supplement_bound(&self) -> usize {
        self.supplement_bound.unwrap_or(DEFAULT_SUPPLEMENT_BOUND)
    }

    pub fn section_overhead(&self) -> usize {
        self.section_overhead.unwrap_or(DEFAULT_SECTION_OVERHEAD)
    }
}

/// Where artifacts are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: Option<String>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    /// Missing files are skipped, so with neither present the built-in defaults apply.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let val: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
            merge_toml(&mut config_value, val);
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}
