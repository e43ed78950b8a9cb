//! Report rendering and persistence.

use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PathfindError, Result};
use crate::types::AnalysisReport;

/// How a report is rendered for output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Text,
}

impl FromStr for OutputFormat {
    type Err = PathfindError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            _ => Err(PathfindError::InvalidFormat(s.to_string())),
        }
    }
}

pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

/// Human-readable listing, one numbered block per path.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();

    if report.paths.is_empty() {
        out.push_str("\nNo attack paths found.\n");
        return out;
    }

    out.push_str("\nDiscovered & Scored Attack Paths:\n\n");
    for (idx, item) in report.paths.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}. {}", idx + 1, item.path);
        let _ = writeln!(out, "   Risk Score: {}", item.risk_score);
        for reason in &item.reasons {
            let _ = writeln!(out, "   - {reason}");
        }
        out.push('\n');
    }

    out
}

/// Persist a report as pretty JSON, creating parent directories.
pub fn write_report(path: impl AsRef<Path>, report: &AnalysisReport) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), paths = report.paths.len(), "Report written");
    Ok(())
}

/// Load a previously persisted report.
pub fn read_report(path: impl AsRef<Path>) -> Result<AnalysisReport> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
