// src/parser/section.rs
//! Item collection from section boxes.
//!
//! A slide carries one `.section-box` per category, titled by a
//! `.section-title`. Inside a box, items live in `ul` lists optionally
//! grouped under `h3` sub-headings; some boxes hold only a placeholder
//! paragraph ("No blockers for this period") or plain paragraphs instead of
//! lists.

use scraper::ElementRef;

use super::ticket::{clean_description, extract_ticket_id};
use super::{element_text, ParsedItem, Selectors};

/// Fallback section label for grouped categories with no sub-heading.
pub const DEFAULT_SECTION: &str = "General";

/// Placeholder fragments marking a deliberately empty section.
const EMPTY_MARKERS: [&str; 4] = ["No blockers", "no blockers", "No critical risks", "N/A"];

/// Tolerant match of a section-box title against a wanted fragment.
///
/// Box titles drift between documents ("Blockers" vs "Blockers and Work
/// Arounds"), so the fragment is truncated at the first ` and` / ` /`
/// separator before the substring check.
pub fn title_matches(container_title: &str, fragment: &str) -> bool {
    let truncated = fragment.split(" and").next().unwrap_or(fragment);
    let truncated = truncated.split(" /").next().unwrap_or(truncated).trim();
    container_title.contains(truncated)
}

/// Collect items from grouped section boxes (accomplishments, goals).
///
/// Every matching box contributes; the current sub-heading label carries
/// across boxes, and items seen before any sub-heading get the "General"
/// fallback label.
pub(crate) fn collect_grouped(
    slide: ElementRef<'_>,
    sels: &Selectors,
    fragment: &str,
) -> Vec<ParsedItem> {
    let mut items = Vec::new();
    let mut current_section: Option<String> = None;

    for section_box in slide.select(&sels.section_box) {
        if !box_matches(section_box, sels, fragment) {
            continue;
        }
        walk_lists(
            section_box,
            sels,
            &mut current_section,
            Some(DEFAULT_SECTION),
            &mut items,
        );
    }

    items
}

/// Collect items from simple section boxes (blockers, risks).
///
/// A box whose placeholder text marks it deliberately empty yields nothing.
/// When no list items exist at all, non-empty paragraph children are treated
/// as items with no section and no ticket information.
pub(crate) fn collect_simple(
    slide: ElementRef<'_>,
    sels: &Selectors,
    fragment: &str,
) -> Vec<ParsedItem> {
    let mut items = Vec::new();

    for section_box in slide.select(&sels.section_box) {
        if !box_matches(section_box, sels, fragment) {
            continue;
        }
        if has_empty_marker(section_box, sels) {
            continue;
        }

        let mut current_section: Option<String> = None;
        walk_lists(section_box, sels, &mut current_section, None, &mut items);

        if items.is_empty() {
            for child in section_box.children().filter_map(ElementRef::wrap) {
                if child.value().name() != "p" {
                    continue;
                }
                let text = element_text(child);
                if text.is_empty() || is_empty_marker(&text) {
                    continue;
                }
                items.push(ParsedItem {
                    description: text,
                    ..ParsedItem::default()
                });
            }
        }
    }

    items
}

/// Walk a box's direct children in document order, folding `h3` sub-headings
/// into the current section label and emitting one item per non-empty `li`.
fn walk_lists(
    section_box: ElementRef<'_>,
    sels: &Selectors,
    current_section: &mut Option<String>,
    default_section: Option<&str>,
    items: &mut Vec<ParsedItem>,
) {
    for child in section_box.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "h3" => {
                *current_section = Some(element_text(child));
            }
            "ul" => {
                for li in child.select(&sels.list_item) {
                    let text = element_text(li);
                    if text.is_empty() {
                        continue;
                    }

                    let ticket_url = li
                        .select(&sels.link)
                        .next()
                        .and_then(|a| a.value().attr("href"))
                        .map(str::to_string);
                    let ticket_id = ticket_url.as_deref().and_then(extract_ticket_id);
                    let description = clean_description(&text, ticket_id.as_deref());

                    let section = current_section
                        .clone()
                        .or_else(|| default_section.map(str::to_string));

                    items.push(ParsedItem {
                        section,
                        description,
                        ticket_id,
                        ticket_url,
                        severity: None,
                    });
                }
            }
            _ => {}
        }
    }
}

fn box_matches(section_box: ElementRef<'_>, sels: &Selectors, fragment: &str) -> bool {
    let title = section_box
        .select(&sels.section_title)
        .next()
        .map(element_text)
        .unwrap_or_default();
    title_matches(&title, fragment)
}

fn has_empty_marker(section_box: ElementRef<'_>, sels: &Selectors) -> bool {
    let placeholder_text: String = section_box
        .select(&sels.placeholder)
        .flat_map(|p| p.text())
        .collect();
    is_empty_marker(&placeholder_text)
}

fn is_empty_marker(text: &str) -> bool {
    EMPTY_MARKERS.iter().any(|marker| text.contains(marker))
}
