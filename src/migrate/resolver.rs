// src/migrate/resolver.rs
//! Shared reference resolution for teams and leads.
//!
//! Team and TeamLead rows are shared across reports and keyed by name. The
//! resolver upserts every distinct name once per batch run and hands the
//! loader explicit name-to-id maps, so no ReportTeam is ever created before
//! its references exist.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::parser::ParsedReport;
use crate::store::ReportStore;
use crate::Result;

/// Name-to-id maps for shared reference entities, built once per batch run.
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    teams: HashMap<String, i64>,
    leads: HashMap<String, i64>,
}

impl ReferenceResolver {
    /// Upsert every distinct team and lead name across the given reports.
    ///
    /// A name whose upsert fails is logged and left out of the map; teams
    /// referencing it are skipped later by the loader.
    pub fn resolve(store: &ReportStore, reports: &[&ParsedReport]) -> Result<Self> {
        let mut team_names = BTreeSet::new();
        let mut lead_names = BTreeSet::new();
        for report in reports {
            for team in &report.teams {
                team_names.insert(team.name.clone());
                lead_names.insert(team.lead.clone());
            }
        }
        tracing::info!(
            teams = team_names.len(),
            leads = lead_names.len(),
            "resolving shared references"
        );

        let mut resolver = Self::default();
        let mut used_slugs: HashSet<String> = store.team_slugs()?.into_iter().collect();

        for name in &team_names {
            let slug = allocate_slug(name, &mut used_slugs);
            match store.upsert_team(name, &slug) {
                Ok(id) => {
                    resolver.teams.insert(name.clone(), id);
                }
                Err(e) => tracing::warn!(team = %name, error = %e, "failed to upsert team"),
            }
        }

        for name in &lead_names {
            match store.upsert_team_lead(name) {
                Ok(id) => {
                    resolver.leads.insert(name.clone(), id);
                }
                Err(e) => tracing::warn!(lead = %name, error = %e, "failed to upsert team lead"),
            }
        }

        Ok(resolver)
    }

    pub fn team_id(&self, name: &str) -> Option<i64> {
        self.teams.get(name).copied()
    }

    pub fn lead_id(&self, name: &str) -> Option<i64> {
        self.leads.get(name).copied()
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn lead_count(&self) -> usize {
        self.leads.len()
    }
}

/// Derive a unique slug, appending a numeric suffix on collision.
fn allocate_slug(name: &str, used: &mut HashSet<String>) -> String {
    let base = slugify(name);
    let mut slug = base.clone();
    let mut counter = 1;
    while used.contains(&slug) {
        slug = format!("{}-{}", base, counter);
        counter += 1;
    }
    used.insert(slug.clone());
    slug
}

/// Convert a team name to a URL-safe slug.
///
/// - Converts to lowercase
/// - Collapses runs of non-alphanumeric chars to a single hyphen
/// - Trims leading/trailing hyphens
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // Start true to trim leading hyphens

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        slug = "team".to_string();
    }

    slug
}
