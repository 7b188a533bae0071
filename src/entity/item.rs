// src/entity/item.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(format!("Invalid severity: {}", s)),
        }
    }
}

/// A completed work item from the previous reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accomplishment {
    pub id: i64,
    pub report_team_id: i64,
    pub section_name: String,
    pub description: String,
    pub ticket_id: Option<String>,
    pub ticket_url: Option<String>,
    pub display_order: u32,
}

/// A planned work item for the current reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub report_team_id: i64,
    pub section_name: String,
    pub description: String,
    pub ticket_id: Option<String>,
    pub ticket_url: Option<String>,
    pub display_order: u32,
}

/// An issue blocking progress, with an optional workaround.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blocker {
    pub id: i64,
    pub report_team_id: i64,
    pub description: String,
    pub ticket_id: Option<String>,
    pub ticket_url: Option<String>,
    pub workaround: Option<String>,
    pub display_order: u32,
}

/// A potential problem, with severity and an optional mitigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Risk {
    pub id: i64,
    pub report_team_id: i64,
    pub description: String,
    pub severity: Severity,
    pub mitigation: Option<String>,
    pub display_order: u32,
}
