// src/parser/slide.rs
//! Per-team slide extraction.

use scraper::ElementRef;

use super::section::{collect_grouped, collect_simple};
use super::{element_text, ParsedTeam, Selectors};

pub(crate) const ACCOMPLISHMENTS_TITLE: &str = "Accomplishments Last Period";
pub(crate) const GOALS_TITLE: &str = "Goals This Period";
pub(crate) const BLOCKERS_TITLE: &str = "Blockers and Work Arounds";
pub(crate) const RISKS_TITLE: &str = "Critical Risks and Mitigations";

/// Extract one team's record from a slide container.
///
/// Returns `None` for cover slides and for slides without a team heading.
/// The lead marker is optional; a missing or empty one yields an empty lead
/// string, not a dropped team.
pub(crate) fn parse_slide(slide: ElementRef<'_>, sels: &Selectors) -> Option<ParsedTeam> {
    if slide.value().classes().any(|class| class == "title-slide") {
        return None;
    }

    let name = slide
        .select(&sels.team_name)
        .next()
        .map(element_text)
        .unwrap_or_default();
    if name.is_empty() {
        return None;
    }

    let lead = slide
        .select(&sels.team_lead)
        .next()
        .map(element_text)
        .unwrap_or_default();

    Some(ParsedTeam {
        name,
        lead,
        accomplishments: collect_grouped(slide, sels, ACCOMPLISHMENTS_TITLE),
        goals: collect_grouped(slide, sels, GOALS_TITLE),
        blockers: collect_simple(slide, sels, BLOCKERS_TITLE),
        risks: collect_simple(slide, sels, RISKS_TITLE),
    })
}
