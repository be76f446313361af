use crate::scripted_input::ScriptedInputPlayer;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tilecraft_sim::{Session, SessionConfig, SessionSummary};
use tilecraft_testkit::{write_json_report, EventRecord, JsonlSink};
use tracing::{info, warn};

pub struct HeadlessConfig {
    pub session: SessionConfig,
    pub scripted_input: Option<PathBuf>,
    pub max_ticks: Option<u64>,
    pub events: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

const DEFAULT_TICKS: u64 = 600;

/// Run a session without a window and return its final summary.
///
/// With a script and no tick limit the run lasts as long as the script.
pub fn run(cfg: HeadlessConfig) -> Result<SessionSummary> {
    let mut script = cfg
        .scripted_input
        .as_deref()
        .map(|path| {
            ScriptedInputPlayer::from_path(path)
                .with_context(|| format!("failed to load scripted input {}", path.display()))
        })
        .transpose()?;
    let ticks = cfg
        .max_ticks
        .or_else(|| script.as_ref().map(ScriptedInputPlayer::total_ticks))
        .unwrap_or(DEFAULT_TICKS);

    let mut sink = cfg
        .events
        .as_deref()
        .map(|path| {
            JsonlSink::create(path)
                .with_context(|| format!("failed to create event log {}", path.display()))
        })
        .transpose()?;

    let mut session = Session::generate(cfg.session)?;
    for _ in 0..ticks {
        let input = script
            .as_mut()
            .and_then(|player| player.advance(session.body().center()))
            .unwrap_or_default();
        let report = session.tick(&input);

        if let Some(sink) = sink.as_mut() {
            for event in &report.events {
                sink.write(&EventRecord {
                    tick: report.tick,
                    kind: event.kind(),
                    payload: event,
                })?;
            }
        }
    }

    if script.as_ref().is_some_and(|player| !player.is_finished()) {
        warn!(ticks, "tick limit reached before the script finished");
    }

    if let Some(mut sink) = sink {
        sink.flush()?;
        info!(events = sink.written(), "event log written");
    }

    let summary = session.summary();
    if let Some(path) = cfg.report.as_deref() {
        write_json_report(path, &summary)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }
    info!(
        ticks = summary.ticks,
        health = summary.health,
        solid_cells = summary.solid_cells,
        "headless run finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecraft_world::TerrainSettings;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join("tilecraft_headless_tests")
            .join(format!("{}_{name}", std::process::id()))
    }

    fn small_session() -> SessionConfig {
        let mut session = SessionConfig::default();
        session.world.terrain = TerrainSettings {
            width: 40,
            height: 30,
            surface_row: 15,
            snow_line: 10,
            sand_line: 20,
            ..TerrainSettings::default()
        };
        session
    }

    #[test]
    fn script_length_sets_the_run_length() {
        let dir = temp_dir("scripted");
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("script.json");
        std::fs::write(
            &script,
            r#"{"steps": [{"ticks": 30}, {"ticks": 1, "select_slot": 2}, {"ticks": 9}]}"#,
        )
        .unwrap();

        let summary = run(HeadlessConfig {
            session: small_session(),
            scripted_input: Some(script),
            max_ticks: None,
            events: Some(dir.join("events.jsonl")),
            report: Some(dir.join("report.json")),
        })
        .unwrap();
        assert_eq!(summary.ticks, 40);
        assert_eq!(summary.selected_slot, 2);

        let events = std::fs::read_to_string(dir.join("events.jsonl")).unwrap();
        assert!(events.lines().any(|line| line.contains("\"slot_selected\"")));
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("report.json")).unwrap())
                .unwrap();
        assert_eq!(report["ticks"], 40);
    }

    #[test]
    fn missing_script_is_an_error() {
        let result = run(HeadlessConfig {
            session: small_session(),
            scripted_input: Some(temp_dir("nope.json")),
            max_ticks: Some(5),
            events: None,
            report: None,
        });
        assert!(result.is_err());
    }
}
