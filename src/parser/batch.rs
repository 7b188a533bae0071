// src/parser/batch.rs
//! Batch parsing of a report directory.

use std::fs;
use std::path::{Path, PathBuf};

use super::{parse_report_file, ParsedReport};
use crate::Result;

/// File extension of report documents.
pub const REPORT_EXTENSION: &str = "html";

/// Result of parsing one document: the parsed report, or an error message.
#[derive(Debug)]
pub struct ParseOutcome {
    pub file: String,
    pub result: std::result::Result<ParsedReport, String>,
}

/// Ordered per-file outcomes of one batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub outcomes: Vec<ParseOutcome>,
}

impl BatchOutcome {
    /// Successfully parsed reports with their file names, in batch order.
    pub fn successes(&self) -> impl Iterator<Item = (&str, &ParsedReport)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| (o.file.as_str(), r)))
    }

    /// Failed files with their error messages, in batch order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.file.as_str(), e.as_str())))
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }
}

/// Parse every report document in a directory.
///
/// Files are processed in name order. A failure in one document is recorded
/// as that file's outcome and does not stop the batch; only an unreadable
/// directory is an error.
pub fn parse_directory(dir: &Path) -> Result<BatchOutcome> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(REPORT_EXTENSION))
        .collect();
    files.sort();

    tracing::info!(count = files.len(), dir = %dir.display(), "found report documents");

    let mut outcomes = Vec::new();
    for path in files {
        let file = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        let result = match parse_report_file(&path) {
            Ok(report) => {
                tracing::info!(file = %file, teams = report.teams.len(), "parsed report");
                Ok(report)
            }
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "failed to parse report");
                Err(e.to_string())
            }
        };
        outcomes.push(ParseOutcome { file, result });
    }

    Ok(BatchOutcome { outcomes })
}
