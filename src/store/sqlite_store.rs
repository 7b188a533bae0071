// src/store/sqlite_store.rs
//! SQLite-backed relational store for reports and reference entities.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::entity::{
    Accomplishment, Blocker, Goal, Report, ReportTeamDetail, Risk, Severity, Team, TeamLead,
};
use crate::error::{Result, SitrepError};

/// Payload for creating one team's contribution to a report.
///
/// The join row and all four child collections are written in a single
/// transaction; `display_order` for children is their index in the vec.
#[derive(Debug, Clone, Default)]
pub struct NewReportTeam {
    pub team_id: i64,
    pub team_lead_id: i64,
    pub display_order: u32,
    pub accomplishments: Vec<NewSectionItem>,
    pub goals: Vec<NewSectionItem>,
    pub blockers: Vec<NewBlocker>,
    pub risks: Vec<NewRisk>,
}

#[derive(Debug, Clone)]
pub struct NewSectionItem {
    pub section_name: String,
    pub description: String,
    pub ticket_id: Option<String>,
    pub ticket_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBlocker {
    pub description: String,
    pub ticket_id: Option<String>,
    pub ticket_url: Option<String>,
    pub workaround: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRisk {
    pub description: String,
    pub severity: Severity,
    pub mitigation: Option<String>,
}

/// Total row counts per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub reports: usize,
    pub teams: usize,
    pub team_leads: usize,
    pub report_teams: usize,
    pub accomplishments: usize,
    pub goals: usize,
    pub blockers: usize,
    pub risks: usize,
}

/// Relational store enforcing the natural keys the pipeline relies on:
/// unique team name, unique lead name, unique report period-end date.
pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    /// Open or create the store database.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS teams (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS team_leads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                period_end_date TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                published INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS report_teams (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                report_id INTEGER NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
                team_id INTEGER NOT NULL REFERENCES teams(id),
                team_lead_id INTEGER NOT NULL REFERENCES team_leads(id),
                display_order INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS accomplishments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                report_team_id INTEGER NOT NULL REFERENCES report_teams(id) ON DELETE CASCADE,
                section_name TEXT NOT NULL,
                description TEXT NOT NULL,
                ticket_id TEXT,
                ticket_url TEXT,
                display_order INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS goals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                report_team_id INTEGER NOT NULL REFERENCES report_teams(id) ON DELETE CASCADE,
                section_name TEXT NOT NULL,
                description TEXT NOT NULL,
                ticket_id TEXT,
                ticket_url TEXT,
                display_order INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS blockers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                report_team_id INTEGER NOT NULL REFERENCES report_teams(id) ON DELETE CASCADE,
                description TEXT NOT NULL,
                ticket_id TEXT,
                ticket_url TEXT,
                workaround TEXT,
                display_order INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS risks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                report_team_id INTEGER NOT NULL REFERENCES report_teams(id) ON DELETE CASCADE,
                description TEXT NOT NULL,
                severity TEXT NOT NULL,
                mitigation TEXT,
                display_order INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_report_teams_report ON report_teams(report_id);
            CREATE INDEX IF NOT EXISTS idx_accomplishments_team ON accomplishments(report_team_id);
            CREATE INDEX IF NOT EXISTS idx_goals_team ON goals(report_team_id);
            CREATE INDEX IF NOT EXISTS idx_blockers_team ON blockers(report_team_id);
            CREATE INDEX IF NOT EXISTS idx_risks_team ON risks(report_team_id);
            ",
        )?;
        Ok(())
    }

    /// Create a team if absent (no-op update if present) and return its id.
    pub fn upsert_team(&self, name: &str, slug: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO teams (name, slug) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
            params![name, slug],
        )?;
        let id = self
            .conn
            .query_row("SELECT id FROM teams WHERE name = ?1", [name], |row| {
                row.get(0)
            })?;
        Ok(id)
    }

    /// Create a team lead if absent and return their id.
    pub fn upsert_team_lead(&self, name: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO team_leads (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            [name],
        )?;
        let id = self
            .conn
            .query_row("SELECT id FROM team_leads WHERE name = ?1", [name], |row| {
                row.get(0)
            })?;
        Ok(id)
    }

    /// Slugs already allocated to persisted teams.
    pub fn team_slugs(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT slug FROM teams")?;
        let slugs = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(slugs)
    }

    /// Create a report row. Fails on a duplicate period-end date.
    pub fn insert_report(&self, period_end_date: NaiveDate, title: &str, published: bool) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO reports (period_end_date, title, published) VALUES (?1, ?2, ?3)",
            params![period_end_date, title, published],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Create a report team and all four child collections atomically.
    pub fn insert_report_team(&mut self, report_id: i64, team: &NewReportTeam) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let report_team_id = Self::insert_report_team_tx(&tx, report_id, team)?;
        tx.commit()?;
        Ok(report_team_id)
    }

    /// Replace every report team (children cascade) of a report, atomically.
    ///
    /// This is the update path: the prior version's nested collections are
    /// fully removed before the new ones are created, never merged.
    pub fn replace_report_teams(&mut self, report_id: i64, teams: &[NewReportTeam]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM report_teams WHERE report_id = ?1", [report_id])?;
        for team in teams {
            Self::insert_report_team_tx(&tx, report_id, team)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_report_team_tx(
        tx: &Transaction<'_>,
        report_id: i64,
        team: &NewReportTeam,
    ) -> Result<i64> {
        tx.execute(
            "INSERT INTO report_teams (report_id, team_id, team_lead_id, display_order)
             VALUES (?1, ?2, ?3, ?4)",
            params![report_id, team.team_id, team.team_lead_id, team.display_order],
        )?;
        let report_team_id = tx.last_insert_rowid();

        for (idx, item) in team.accomplishments.iter().enumerate() {
            tx.execute(
                "INSERT INTO accomplishments
                 (report_team_id, section_name, description, ticket_id, ticket_url, display_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    report_team_id,
                    item.section_name,
                    item.description,
                    item.ticket_id,
                    item.ticket_url,
                    idx as u32,
                ],
            )?;
        }

        for (idx, item) in team.goals.iter().enumerate() {
            tx.execute(
                "INSERT INTO goals
                 (report_team_id, section_name, description, ticket_id, ticket_url, display_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    report_team_id,
                    item.section_name,
                    item.description,
                    item.ticket_id,
                    item.ticket_url,
                    idx as u32,
                ],
            )?;
        }

        for (idx, item) in team.blockers.iter().enumerate() {
            tx.execute(
                "INSERT INTO blockers
                 (report_team_id, description, ticket_id, ticket_url, workaround, display_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    report_team_id,
                    item.description,
                    item.ticket_id,
                    item.ticket_url,
                    item.workaround,
                    idx as u32,
                ],
            )?;
        }

        for (idx, item) in team.risks.iter().enumerate() {
            tx.execute(
                "INSERT INTO risks
                 (report_team_id, description, severity, mitigation, display_order)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    report_team_id,
                    item.description,
                    item.severity.to_string(),
                    item.mitigation,
                    idx as u32,
                ],
            )?;
        }

        Ok(report_team_id)
    }

    /// Fetch a report by its period-end date.
    pub fn get_report_by_date(&self, date: NaiveDate) -> Result<Option<Report>> {
        let report = self
            .conn
            .query_row(
                "SELECT id, period_end_date, title, published FROM reports
                 WHERE period_end_date = ?1",
                [date],
                Self::report_from_row,
            )
            .optional()?;
        Ok(report)
    }

    /// The report with the most recent period-end date, if any.
    pub fn latest_report(&self) -> Result<Option<Report>> {
        let report = self
            .conn
            .query_row(
                "SELECT id, period_end_date, title, published FROM reports
                 ORDER BY period_end_date DESC LIMIT 1",
                [],
                Self::report_from_row,
            )
            .optional()?;
        Ok(report)
    }

    /// All reports ordered by period-end date.
    pub fn list_reports(&self) -> Result<Vec<Report>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, period_end_date, title, published FROM reports
             ORDER BY period_end_date",
        )?;
        let reports = stmt
            .query_map([], Self::report_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(reports)
    }

    fn report_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Report> {
        Ok(Report {
            id: row.get(0)?,
            period_end_date: row.get(1)?,
            title: row.get(2)?,
            published: row.get(3)?,
        })
    }

    /// Every team contribution of a report with nested collections, all
    /// ordered by `display_order`.
    pub fn report_teams(&self, report_id: i64) -> Result<Vec<ReportTeamDetail>> {
        let mut stmt = self.conn.prepare(
            "SELECT rt.id, rt.display_order, t.id, t.name, t.slug, l.id, l.name
             FROM report_teams rt
             JOIN teams t ON t.id = rt.team_id
             JOIN team_leads l ON l.id = rt.team_lead_id
             WHERE rt.report_id = ?1
             ORDER BY rt.display_order",
        )?;
        let rows = stmt
            .query_map([report_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, u32>(1)?,
                    Team {
                        id: row.get(2)?,
                        name: row.get(3)?,
                        slug: row.get(4)?,
                    },
                    TeamLead {
                        id: row.get(5)?,
                        name: row.get(6)?,
                    },
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut details = Vec::with_capacity(rows.len());
        for (report_team_id, display_order, team, team_lead) in rows {
            details.push(ReportTeamDetail {
                team,
                team_lead,
                display_order,
                accomplishments: self.accomplishments_for(report_team_id)?,
                goals: self.goals_for(report_team_id)?,
                blockers: self.blockers_for(report_team_id)?,
                risks: self.risks_for(report_team_id)?,
            });
        }
        Ok(details)
    }

    fn accomplishments_for(&self, report_team_id: i64) -> Result<Vec<Accomplishment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, report_team_id, section_name, description, ticket_id, ticket_url, display_order
             FROM accomplishments WHERE report_team_id = ?1 ORDER BY display_order",
        )?;
        let items = stmt
            .query_map([report_team_id], |row| {
                Ok(Accomplishment {
                    id: row.get(0)?,
                    report_team_id: row.get(1)?,
                    section_name: row.get(2)?,
                    description: row.get(3)?,
                    ticket_id: row.get(4)?,
                    ticket_url: row.get(5)?,
                    display_order: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn goals_for(&self, report_team_id: i64) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, report_team_id, section_name, description, ticket_id, ticket_url, display_order
             FROM goals WHERE report_team_id = ?1 ORDER BY display_order",
        )?;
        let items = stmt
            .query_map([report_team_id], |row| {
                Ok(Goal {
                    id: row.get(0)?,
                    report_team_id: row.get(1)?,
                    section_name: row.get(2)?,
                    description: row.get(3)?,
                    ticket_id: row.get(4)?,
                    ticket_url: row.get(5)?,
                    display_order: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn blockers_for(&self, report_team_id: i64) -> Result<Vec<Blocker>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, report_team_id, description, ticket_id, ticket_url, workaround, display_order
             FROM blockers WHERE report_team_id = ?1 ORDER BY display_order",
        )?;
        let items = stmt
            .query_map([report_team_id], |row| {
                Ok(Blocker {
                    id: row.get(0)?,
                    report_team_id: row.get(1)?,
                    description: row.get(2)?,
                    ticket_id: row.get(3)?,
                    ticket_url: row.get(4)?,
                    workaround: row.get(5)?,
                    display_order: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn risks_for(&self, report_team_id: i64) -> Result<Vec<Risk>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, report_team_id, description, severity, mitigation, display_order
             FROM risks WHERE report_team_id = ?1 ORDER BY display_order",
        )?;
        let items = stmt
            .query_map([report_team_id], |row| {
                Ok(Risk {
                    id: row.get(0)?,
                    report_team_id: row.get(1)?,
                    description: row.get::<_, String>(2)?,
                    severity: row.get::<_, String>(3)?.parse().unwrap_or_default(),
                    mitigation: row.get(4)?,
                    display_order: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Recompute total row counts for every entity kind.
    pub fn counts(&self) -> Result<StoreCounts> {
        Ok(StoreCounts {
            reports: self.count("reports")?,
            teams: self.count("teams")?,
            team_leads: self.count("team_leads")?,
            report_teams: self.count("report_teams")?,
            accomplishments: self.count("accomplishments")?,
            goals: self.count("goals")?,
            blockers: self.count("blockers")?,
            risks: self.count("risks")?,
        })
    }

    fn count(&self, table: &str) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(n as usize)
    }
}

// Implement From for rusqlite::Error
impl From<rusqlite::Error> for SitrepError {
    fn from(e: rusqlite::Error) -> Self {
        SitrepError::Storage(format!("SQLite error: {}", e))
    }
}
