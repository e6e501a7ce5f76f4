//! JSON export of a full analysis run.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::axis_names::SensorType;
use crate::config::AllanConfig;
use crate::data_analysis::channel_analysis::{ChannelAnalysis, ChannelOutcome};
use crate::error::Result;

/// Everything written to the `--json` file.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub tool_version: &'static str,
    pub source: &'a str,
    pub config: &'a AllanConfig,
    pub channels: Vec<ChannelEntry<'a>>,
}

/// One channel: either its analysis or the reason it failed.
#[derive(Debug, Serialize)]
pub struct ChannelEntry<'a> {
    pub name: &'a str,
    pub sensor: SensorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<&'a ChannelAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(source: &'a str, config: &'a AllanConfig, outcomes: &'a [ChannelOutcome]) -> Self {
        let channels = outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(analysis) => ChannelEntry {
                    name: &o.name,
                    sensor: o.sensor,
                    analysis: Some(analysis),
                    error: None,
                },
                Err(e) => ChannelEntry {
                    name: &o.name,
                    sensor: o.sensor,
                    analysis: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();
        Self {
            tool_version: crate::crate_version(),
            source,
            config,
            channels,
        }
    }
}

/// Serialize a report to a compact JSON string.
pub fn to_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}

/// Serialize a report to a pretty-printed JSON string.
pub fn to_json_pretty(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the pretty-printed report to `path`.
pub fn write_json_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    fs::write(path, to_json_pretty(report)?)?;
    Ok(())
}
