// src/parser/ticket.rs
//! Ticket reference extraction and description cleanup.

use std::sync::OnceLock;

use regex::Regex;

fn ticket_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"text=(\d+)").expect("pattern is statically valid"))
}

/// Pull a work-item id out of a ticket link.
///
/// Ticket links carry the id as a query fragment, e.g.
/// `.../_workitems?...&text=89536` yields `"89536"`. Returns `None` when the
/// URL carries no such fragment.
pub fn extract_ticket_id(url: &str) -> Option<String> {
    ticket_id_pattern()
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Normalize a list-item description.
///
/// Strips one trailing occurrence of the ticket id, tolerating the `- 12345`,
/// `(12345)`, `- (12345)` and bare `12345` forms authors use, then a leading
/// `- ` continuation marker.
pub fn clean_description(text: &str, ticket_id: Option<&str>) -> String {
    let mut description = text.trim();
    if let Some(id) = ticket_id {
        description = strip_ticket_suffix(description, id);
    }
    let description = description.trim();
    let description = description.strip_prefix("- ").unwrap_or(description);
    description.trim().to_string()
}

/// Remove a trailing ticket id and its surrounding punctuation, if present.
///
/// Only applies at the end of the string; a non-matching tail leaves the
/// input untouched.
fn strip_ticket_suffix<'a>(text: &'a str, id: &str) -> &'a str {
    let mut s = text.trim_end();

    let had_paren = match s.strip_suffix(')') {
        Some(rest) => {
            s = rest;
            true
        }
        None => false,
    };

    let Some(rest) = s.strip_suffix(id) else {
        return text;
    };
    s = rest.trim_end();

    if had_paren {
        s = s.strip_suffix('(').unwrap_or(s);
        s = s.trim_end();
    }

    s = s.strip_suffix('-').unwrap_or(s);
    s.trim_end()
}
