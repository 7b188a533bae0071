mod sqlite_store;

pub use sqlite_store::{
    NewBlocker, NewReportTeam, NewRisk, NewSectionItem, ReportStore, StoreCounts,
};
