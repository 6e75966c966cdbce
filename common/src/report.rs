//! Report handed over by the summarization step: one section per news
//! category plus an optional learning supplement.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One news category and its commentary, already in final prose form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Closing addendum ("concept of the day")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplement {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Full input of one pipeline run. `sections` order is presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub sections: Vec<Section>,
    pub supplement: Option<Supplement>,
}

impl Report {
    /// Load a report from a `.json` or `.toml` file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read report file: {}", path.display()))?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        let report = if is_toml {
            toml::from_str(&data).context("Failed to parse TOML report")?
        } else {
            serde_json::from_str(&data).context("Failed to parse JSON report")?
        };
        Ok(report)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.supplement.is_none()
    }
}
