// src/entity/team.rs
use serde::{Deserialize, Serialize};

/// A team, shared across reports and keyed by its unique name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A team lead, shared across reports and keyed by their unique name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamLead {
    pub id: i64,
    pub name: String,
}
