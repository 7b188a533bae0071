// src/migrate/mod.rs
//! Migration pipeline: batch parse, resolve references, load, validate.
//!
//! The phases run strictly in sequence and the parse phase never touches the
//! store, so every document failure is known before the first write.

mod loader;
mod resolver;
mod validator;

pub use loader::{build_report_team, load_reports, LoadTotals};
pub use resolver::{slugify, ReferenceResolver};
pub use validator::{validate_counts, ValidationReport};

use std::path::Path;

use crate::parser::{self, ParsedReport};
use crate::store::ReportStore;
use crate::Result;

/// Summary of one migration run.
#[derive(Debug)]
pub struct MigrationSummary {
    pub parsed: usize,
    pub parse_failures: Vec<(String, String)>,
    pub teams_resolved: usize,
    pub leads_resolved: usize,
    pub totals: LoadTotals,
    pub validation: ValidationReport,
}

/// Run the full pipeline over a directory of report documents.
///
/// Per-document and per-team failures are recorded in the summary; only an
/// unreadable directory or a store-level failure is an error.
pub fn run(store: &mut ReportStore, reports_dir: &Path) -> Result<MigrationSummary> {
    let batch = parser::parse_directory(reports_dir)?;

    let successes: Vec<(&str, &ParsedReport)> = batch.successes().collect();
    let parse_failures: Vec<(String, String)> = batch
        .failures()
        .map(|(file, error)| (file.to_string(), error.to_string()))
        .collect();

    let reports: Vec<&ParsedReport> = successes.iter().map(|(_, report)| *report).collect();
    let resolver = ReferenceResolver::resolve(store, &reports)?;
    let totals = load_reports(store, &successes, &resolver);
    let validation = validate_counts(store, successes.len(), &totals)?;

    Ok(MigrationSummary {
        parsed: successes.len(),
        parse_failures,
        teams_resolved: resolver.team_count(),
        leads_resolved: resolver.lead_count(),
        totals,
        validation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_report(dir: &Path, name: &str, date: &str) {
        let html = format!(
            r#"<html><head><title>Scrum of Scrums - Week Ending {date}</title></head><body>
            <div class="slide title-slide"><h1>Weekly Status</h1></div>
            <div class="slide">
                <h2>Platform</h2>
                <div class="team-lead">Jordan Reyes</div>
                <div class="section-box">
                    <div class="section-title">Accomplishments Last Period</div>
                    <h3>Ready for UAT</h3>
                    <ul><li>Shipped billing export - <a href="https://dev.example.com/_workitems?text=89536">89536</a></li></ul>
                </div>
                <div class="section-box">
                    <div class="section-title">Goals This Period</div>
                    <ul><li>Migrate search cluster</li></ul>
                </div>
                <div class="section-box">
                    <div class="section-title">Blockers and Work Arounds</div>
                    <p style="font-style: italic;">No blockers for this period.</p>
                </div>
                <div class="section-box">
                    <div class="section-title">Critical Risks and Mitigations</div>
                    <ul><li>Migration may degrade latency</li></ul>
                </div>
            </div>
            <div class="slide">
                <h2>Ops/Infra</h2>
                <div class="team-lead"></div>
                <div class="section-box">
                    <div class="section-title">Blockers and Work Arounds</div>
                    <p>Waiting on vendor API keys</p>
                </div>
            </div>
            </body></html>"#
        );
        fs::write(dir.join(name), html).unwrap();
    }

    #[test]
    fn test_run_round_trip_counts() {
        let tmp = TempDir::new().unwrap();
        write_report(tmp.path(), "week-47.html", "11.24.2025");
        write_report(tmp.path(), "week-48.html", "12.01.2025");

        let mut store = ReportStore::open_in_memory().unwrap();
        let summary = run(&mut store, tmp.path()).unwrap();

        assert_eq!(summary.parsed, 2);
        assert!(summary.parse_failures.is_empty());
        assert_eq!(summary.teams_resolved, 2);
        // "Jordan Reyes" and the empty lead of Ops/Infra.
        assert_eq!(summary.leads_resolved, 2);
        assert_eq!(summary.totals.reports, 2);
        assert_eq!(summary.totals.report_teams, 4);
        assert_eq!(summary.totals.accomplishments, 2);
        assert_eq!(summary.totals.goals, 2);
        assert_eq!(summary.totals.blockers, 2);
        assert_eq!(summary.totals.risks, 2);
        assert!(summary.validation.passed());

        let counts = store.counts().unwrap();
        assert_eq!(counts.reports, 2);
        assert_eq!(counts.blockers, 2);
    }

    #[test]
    fn test_run_team_order_and_display_order() {
        let tmp = TempDir::new().unwrap();
        write_report(tmp.path(), "week-47.html", "11.24.2025");

        let mut store = ReportStore::open_in_memory().unwrap();
        run(&mut store, tmp.path()).unwrap();

        let report = store
            .get_report_by_date(chrono::NaiveDate::from_ymd_opt(2025, 11, 24).unwrap())
            .unwrap()
            .unwrap();
        let details = store.report_teams(report.id).unwrap();

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].team.name, "Platform");
        assert_eq!(details[0].display_order, 0);
        assert_eq!(details[1].team.name, "Ops/Infra");
        assert_eq!(details[1].display_order, 1);
        assert_eq!(details[1].team_lead.name, "");
        // The paragraph fallback made it into the store.
        assert_eq!(details[1].blockers[0].description, "Waiting on vendor API keys");
    }

    #[test]
    fn test_run_is_not_idempotent_across_reruns() {
        let tmp = TempDir::new().unwrap();
        write_report(tmp.path(), "week-47.html", "11.24.2025");

        let mut store = ReportStore::open_in_memory().unwrap();
        run(&mut store, tmp.path()).unwrap();
        let second = run(&mut store, tmp.path()).unwrap();

        // The duplicate date is rejected at the store layer, not silently
        // duplicated; the second run reports the failure and fails validation
        // (one report parsed, zero new rows created for it).
        assert_eq!(second.totals.reports, 0);
        assert_eq!(second.totals.reports_failed, 1);
        assert_eq!(store.counts().unwrap().reports, 1);
        assert!(!second.validation.passed());
    }

    #[test]
    fn test_run_missing_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut store = ReportStore::open_in_memory().unwrap();
        assert!(run(&mut store, &tmp.path().join("missing")).is_err());
    }
}
