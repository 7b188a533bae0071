use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn sitrep_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sitrep"))
}

fn write_report(dir: &Path, name: &str, date: &str) {
    let html = format!(
        r#"<html><head><title>Scrum of Scrums - Week Ending {date}</title></head><body>
        <div class="slide title-slide"><h1>Weekly Status</h1></div>
        <div class="slide">
            <h2>Platform</h2>
            <div class="team-lead">Jordan Reyes</div>
            <div class="section-box">
                <div class="section-title">Accomplishments Last Period</div>
                <h3>Ready for UAT</h3>
                <ul><li>Shipped billing export - <a href="https://dev.example.com/_workitems?text=89536">89536</a></li></ul>
            </div>
            <div class="section-box">
                <div class="section-title">Goals This Period</div>
                <ul><li>Migrate search cluster</li></ul>
            </div>
            <div class="section-box">
                <div class="section-title">Blockers and Work Arounds</div>
                <p style="font-style: italic;">No blockers for this period.</p>
            </div>
            <div class="section-box">
                <div class="section-title">Critical Risks and Mitigations</div>
                <ul><li>Migration may degrade latency</li></ul>
            </div>
        </div>
        <div class="slide">
            <h2>Ops/Infra</h2>
            <div class="team-lead"></div>
            <div class="section-box">
                <div class="section-title">Blockers and Work Arounds</div>
                <p>Waiting on vendor API keys</p>
            </div>
        </div>
        </body></html>"#
    );
    fs::write(dir.join(name), html).unwrap();
}

fn setup_weeks(tmp: &TempDir) -> std::path::PathBuf {
    let weeks = tmp.path().join("weeks");
    fs::create_dir(&weeks).unwrap();
    write_report(&weeks, "week-47.html", "11.24.2025");
    write_report(&weeks, "week-48.html", "12.01.2025");
    weeks
}

#[test]
fn test_migrate_loads_and_validates() {
    let tmp = TempDir::new().unwrap();
    let weeks = setup_weeks(&tmp);
    let db = tmp.path().join("sitrep.db");

    let output = sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "migrate", weeks.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Migration complete"));
    assert!(stdout.contains("Reports loaded:  2"));
    assert!(stdout.contains("Teams:           2"));
    assert!(stdout.contains("Validation passed"));
}

#[test]
fn test_migrate_rerun_exits_zero_with_warning() {
    let tmp = TempDir::new().unwrap();
    let weeks = setup_weeks(&tmp);
    let db = tmp.path().join("sitrep.db");
    let args = ["--db", db.to_str().unwrap(), "migrate", weeks.to_str().unwrap()];

    sitrep_cmd().args(args).output().unwrap();
    let output = sitrep_cmd().args(args).output().unwrap();

    // Duplicate dates fail those reports at the store layer, but partial
    // failures never change the exit code.
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reports loaded:  0"));
    assert!(stdout.contains("Reports failed:  2"));
    assert!(stdout.contains("Validation warning"));
}

#[test]
fn test_migrate_missing_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("sitrep.db");

    let output = sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "migrate", "no-such-dir"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_parse_json_matches_contract() {
    let tmp = TempDir::new().unwrap();
    let weeks = setup_weeks(&tmp);

    let output = sitrep_cmd()
        .args(["parse", weeks.join("week-47.html").to_str().unwrap(), "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(parsed["periodEndDate"], "2025-11-24");
    let teams = parsed["teams"].as_array().unwrap();
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0]["name"], "Platform");
    assert_eq!(teams[0]["lead"], "Jordan Reyes");
    assert_eq!(teams[0]["accomplishments"][0]["ticketId"], "89536");
    assert_eq!(
        teams[0]["accomplishments"][0]["description"],
        "Shipped billing export"
    );
    assert_eq!(teams[0]["accomplishments"][0]["section"], "Ready for UAT");
    assert_eq!(teams[1]["name"], "Ops/Infra");
    assert_eq!(teams[1]["lead"], "");
    // The blockers placeholder yields an empty list for Platform.
    assert!(teams[0]["blockers"].as_array().unwrap().is_empty());
    assert_eq!(
        teams[1]["blockers"][0]["description"],
        "Waiting on vendor API keys"
    );
}

#[test]
fn test_show_returns_ordered_teams() {
    let tmp = TempDir::new().unwrap();
    let weeks = setup_weeks(&tmp);
    let db = tmp.path().join("sitrep.db");

    sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "migrate", weeks.to_str().unwrap()])
        .output()
        .unwrap();

    let output = sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "show", "2025-11-24", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let detail: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(detail["report"]["period_end_date"], "2025-11-24");
    let teams = detail["teams"].as_array().unwrap();
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0]["team"]["name"], "Platform");
    assert_eq!(teams[0]["display_order"], 0);
    assert_eq!(teams[1]["team"]["name"], "Ops/Infra");
    assert_eq!(teams[1]["display_order"], 1);
    assert_eq!(teams[0]["team"]["slug"], "platform");
    assert_eq!(teams[0]["risks"][0]["severity"], "medium");
}

#[test]
fn test_show_unknown_date_fails() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("sitrep.db");

    let output = sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "show", "2030-01-01"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Report not found"));
}

#[test]
fn test_show_rejects_malformed_date() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("sitrep.db");

    let output = sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "show", "11.24.2025"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid date"));
}

#[test]
fn test_ingest_rejects_duplicate_then_replaces() {
    let tmp = TempDir::new().unwrap();
    let weeks = setup_weeks(&tmp);
    let db = tmp.path().join("sitrep.db");

    sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "migrate", weeks.to_str().unwrap()])
        .output()
        .unwrap();

    let json = r#"{
        "periodEndDate": "2025-11-24",
        "title": "Revised Week 47",
        "teams": [
            {
                "name": "Platform",
                "lead": "Jordan Reyes",
                "goals": [{"section": "In QA", "description": "Harden retries"}],
                "risks": [{"description": "Schema drift", "severity": "high"}]
            }
        ]
    }"#;
    let json_path = tmp.path().join("revised.json");
    fs::write(&json_path, json).unwrap();

    // Without --replace the duplicate date is a hard error.
    let output = sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "ingest", json_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"));

    // With --replace the prior version's children are fully removed.
    let output = sitrep_cmd()
        .args([
            "--db",
            db.to_str().unwrap(),
            "ingest",
            json_path.to_str().unwrap(),
            "--replace",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "show", "2025-11-24", "--json"])
        .output()
        .unwrap();
    let detail: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    let teams = detail["teams"].as_array().unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0]["team"]["name"], "Platform");
    assert!(teams[0]["accomplishments"].as_array().unwrap().is_empty());
    assert_eq!(teams[0]["goals"][0]["description"], "Harden retries");
    assert_eq!(teams[0]["goals"][0]["section_name"], "In QA");
    assert_eq!(teams[0]["risks"][0]["severity"], "high");
}

#[test]
fn test_ingest_new_date_creates_report() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("sitrep.db");

    let json = r#"{
        "periodEndDate": "2026-01-05",
        "title": "Week 1",
        "teams": [
            {
                "name": "Data",
                "lead": "Priya Nair",
                "accomplishments": [{"section": "In Production", "description": "Backfill done"}]
            }
        ]
    }"#;
    let json_path = tmp.path().join("week1.json");
    fs::write(&json_path, json).unwrap();

    let output = sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "ingest", json_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loaded report 2026-01-05"));

    let output = sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "validate"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reports:         1"));
    assert!(stdout.contains("Accomplishments: 1"));
    assert!(stdout.contains("Latest report (2026-01-05)"));
}

#[test]
fn test_validate_on_empty_store() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("sitrep.db");

    let output = sitrep_cmd()
        .args(["--db", db.to_str().unwrap(), "validate"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reports:         0"));
    assert!(stdout.contains("All reports (0 total)"));
}
