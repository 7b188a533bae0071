// src/entity/report.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Accomplishment, Blocker, Goal, Risk, Team, TeamLead};

/// The persisted record for one reporting period, keyed by period-end date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub period_end_date: NaiveDate,
    pub title: String,
    pub published: bool,
}

/// One team's contribution to a report, with its nested collections.
///
/// Collections are ordered by `display_order`, which preserves the position
/// each entry had in the source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTeamDetail {
    pub team: Team,
    pub team_lead: TeamLead,
    pub display_order: u32,
    pub accomplishments: Vec<Accomplishment>,
    pub goals: Vec<Goal>,
    pub blockers: Vec<Blocker>,
    pub risks: Vec<Risk>,
}

/// A full report with every team's nested data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDetail {
    pub report: Report,
    pub teams: Vec<ReportTeamDetail>,
}
