// src/migrate/loader.rs
//! Report loading against the store.

use crate::parser::{ParsedItem, ParsedReport, ParsedTeam, DEFAULT_SECTION};
use crate::store::{NewBlocker, NewReportTeam, NewRisk, NewSectionItem, ReportStore};

use super::resolver::ReferenceResolver;

/// Running totals accumulated while loading, compared against store counts
/// by the validator afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadTotals {
    pub reports: usize,
    pub reports_failed: usize,
    pub report_teams: usize,
    pub teams_skipped: usize,
    pub accomplishments: usize,
    pub goals: usize,
    pub blockers: usize,
    pub risks: usize,
}

/// Load each parsed report into the store, in order.
///
/// A team whose references did not resolve is skipped with a warning; a
/// report the store rejects (e.g. a duplicate period-end date) is logged and
/// the loader continues with the next one. Neither path aborts the run.
pub fn load_reports(
    store: &mut ReportStore,
    parsed: &[(&str, &ParsedReport)],
    resolver: &ReferenceResolver,
) -> LoadTotals {
    let mut totals = LoadTotals::default();

    for (file, report) in parsed {
        tracing::info!(
            file = %file,
            date = %report.period_end_date,
            teams = report.teams.len(),
            "loading report"
        );

        let report_id = match store.insert_report(report.period_end_date, &report.title, true) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "failed to create report, skipping");
                totals.reports_failed += 1;
                continue;
            }
        };
        totals.reports += 1;

        for (index, team) in report.teams.iter().enumerate() {
            let (Some(team_id), Some(team_lead_id)) =
                (resolver.team_id(&team.name), resolver.lead_id(&team.lead))
            else {
                tracing::warn!(team = %team.name, "skipping team with unresolved references");
                totals.teams_skipped += 1;
                continue;
            };

            let new_team = build_report_team(team, team_id, team_lead_id, index as u32);
            match store.insert_report_team(report_id, &new_team) {
                Ok(_) => {
                    totals.report_teams += 1;
                    totals.accomplishments += team.accomplishments.len();
                    totals.goals += team.goals.len();
                    totals.blockers += team.blockers.len();
                    totals.risks += team.risks.len();
                }
                Err(e) => {
                    tracing::warn!(team = %team.name, error = %e, "failed to load team");
                    totals.teams_skipped += 1;
                }
            }
        }
    }

    totals
}

/// Map a parsed team onto a store payload.
pub fn build_report_team(
    team: &ParsedTeam,
    team_id: i64,
    team_lead_id: i64,
    display_order: u32,
) -> NewReportTeam {
    NewReportTeam {
        team_id,
        team_lead_id,
        display_order,
        accomplishments: team.accomplishments.iter().map(section_item).collect(),
        goals: team.goals.iter().map(section_item).collect(),
        blockers: team.blockers.iter().map(blocker_item).collect(),
        risks: team.risks.iter().map(risk_item).collect(),
    }
}

fn section_item(item: &ParsedItem) -> NewSectionItem {
    NewSectionItem {
        section_name: item
            .section
            .clone()
            .unwrap_or_else(|| DEFAULT_SECTION.to_string()),
        description: item.description.clone(),
        ticket_id: item.ticket_id.clone(),
        ticket_url: item.ticket_url.clone(),
    }
}

fn blocker_item(item: &ParsedItem) -> NewBlocker {
    NewBlocker {
        description: item.description.clone(),
        ticket_id: item.ticket_id.clone(),
        ticket_url: item.ticket_url.clone(),
        workaround: None,
    }
}

fn risk_item(item: &ParsedItem) -> NewRisk {
    NewRisk {
        description: item.description.clone(),
        severity: item.severity.unwrap_or_default(),
        mitigation: None,
    }
}
