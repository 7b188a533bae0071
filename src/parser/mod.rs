// src/parser/mod.rs
//! Tolerant structural parser for slide-deck status reports.
//!
//! Report decks are human-authored HTML: team boundaries, section boxes and
//! sub-headings are only weakly marked, sections go missing, and list markup
//! drifts between documents. The walkers here recover what they can and
//! yield empty collections instead of errors when structure is absent.

mod batch;
mod section;
mod slide;
mod ticket;

pub use batch::{parse_directory, BatchOutcome, ParseOutcome, REPORT_EXTENSION};
pub use section::{title_matches, DEFAULT_SECTION};
pub use ticket::{clean_description, extract_ticket_id};

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::entity::Severity;
use crate::Result;

/// A fully parsed report document, discarded after loading.
///
/// The serialized form (camelCase JSON) is also the ingestion contract: an
/// external parser that produces this shape can be loaded through the same
/// path as the deterministic one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedReport {
    pub period_end_date: NaiveDate,
    pub title: String,
    pub teams: Vec<ParsedTeam>,
}

/// One team's slide, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTeam {
    pub name: String,
    pub lead: String,
    #[serde(default)]
    pub accomplishments: Vec<ParsedItem>,
    #[serde(default)]
    pub goals: Vec<ParsedItem>,
    #[serde(default)]
    pub blockers: Vec<ParsedItem>,
    #[serde(default)]
    pub risks: Vec<ParsedItem>,
}

/// A single normalized bullet item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedItem {
    /// Nearest preceding sub-heading, or the fixed fallback for grouped
    /// sections.
    #[serde(default)]
    pub section: Option<String>,
    pub description: String,
    #[serde(default)]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub ticket_url: Option<String>,
    /// Only ever set by external ingestion; the structural parser cannot
    /// infer severity from text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// CSS selectors for the report deck structure, built once per parse.
pub(crate) struct Selectors {
    pub title: Selector,
    pub slide: Selector,
    pub team_name: Selector,
    pub team_lead: Selector,
    pub section_box: Selector,
    pub section_title: Selector,
    pub link: Selector,
    pub list_item: Selector,
    pub placeholder: Selector,
}

impl Selectors {
    pub(crate) fn new() -> Self {
        Self {
            title: selector("title"),
            slide: selector(".slide"),
            team_name: selector("h2"),
            team_lead: selector(".team-lead"),
            section_box: selector(".section-box"),
            section_title: selector(".section-title"),
            link: selector("a"),
            list_item: selector("li"),
            placeholder: selector(r#"p[style*="italic"]"#),
        }
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector is statically valid")
}

/// Concatenated, trimmed text content of an element.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn period_date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{2})\.(\d{2})\.(\d{4})").expect("pattern is statically valid"))
}

/// Extract the period-end date from a document title (`MM.DD.YYYY`).
pub fn extract_period_end_date(title: &str) -> Option<NaiveDate> {
    let caps = period_date_pattern().captures(title)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse one report document from raw markup.
///
/// Never fails: malformed structure yields fewer teams or items, and a title
/// without a recognizable date falls back to today's date with a warning.
pub fn parse_document(html: &str) -> ParsedReport {
    let sels = Selectors::new();
    let doc = Html::parse_document(html);

    let title = doc
        .select(&sels.title)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let period_end_date = match extract_period_end_date(&title) {
        Some(date) => date,
        None => {
            tracing::warn!(title = %title, "no period-end date in document title, using today");
            Local::now().date_naive()
        }
    };

    let mut teams = Vec::new();
    for slide_el in doc.select(&sels.slide) {
        if let Some(team) = slide::parse_slide(slide_el, &sels) {
            tracing::debug!(team = %team.name, "parsed team slide");
            teams.push(team);
        }
    }

    ParsedReport {
        period_end_date,
        title,
        teams,
    }
}

/// Read and parse a report document from disk.
pub fn parse_report_file(path: &Path) -> Result<ParsedReport> {
    let html = fs::read_to_string(path)?;
    Ok(parse_document(&html))
}
