use chrono::{SecondsFormat, Utc};
use clap::Parser;
use grid_pursuit::config::SessionConfig;
use grid_pursuit::constants::default_tick_limit;
use grid_pursuit::driver_utils::{
    default_run_id, emit_log, normalize_session_count, seed_from_clock, LogContext,
};
use grid_pursuit::engine::WorldState;
use grid_pursuit::types::{Outcome, RuntimeEvent, Snapshot};
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run seeded pursuit sessions headless")]
struct Cli {
    #[arg(long, default_value_t = 3)]
    sessions: u32,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    grid_size: Option<i32>,
    #[arg(long)]
    items: Option<usize>,
    #[arg(long)]
    obstacles: Option<usize>,
    #[arg(long)]
    max_ticks: Option<u64>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug)]
struct Scenario {
    name: String,
    config: SessionConfig,
    max_ticks: u64,
}

#[derive(Clone, Debug, Serialize)]
struct SessionResultLine {
    scenario: String,
    seed: u64,
    outcome: Outcome,
    stalled: bool,
    ticks: u64,
    score: u32,
    #[serde(rename = "itemsCollected")]
    items_collected: usize,
    #[serde(rename = "itemsRemaining")]
    items_remaining: usize,
    obstacles: usize,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct SessionRunResult {
    result: SessionResultLine,
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    #[serde(rename = "sessionCount")]
    session_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageTicks")]
    average_ticks: u64,
    #[serde(rename = "averageScore")]
    average_score: u32,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    sessions: Vec<SessionResultLine>,
}

fn main() {
    let cli = Cli::parse();
    let started_at = Utc::now();
    let base_config = match resolve_base_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            emit_log(
                "error",
                "config_load_failed",
                LogContext {
                    run_id: cli.run_id.as_deref().unwrap_or_default(),
                    ..LogContext::default()
                },
                json!({ "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    };
    let scenarios = resolve_scenarios(&cli, &base_config);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id("sim", base_config.seed, started_at.timestamp_millis()));
    let run_ctx = LogContext {
        run_id: &run_id,
        ..LogContext::default()
    };

    let mut has_anomaly = false;
    let mut session_results = Vec::new();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        let ctx = LogContext {
            scenario: Some(scenario.name.as_str()),
            seed: Some(scenario.config.seed),
            ..run_ctx
        };
        emit_log(
            "info",
            "session_started",
            ctx,
            json!({
                "gridSize": scenario.config.grid_size,
                "items": scenario.config.item_count,
                "obstacleDraws": scenario.config.obstacle_draws,
                "pursuers": scenario.config.pursuer_spawns.len(),
                "maxTicks": scenario.max_ticks,
            }),
        );

        let run = match run_session(&scenario) {
            Ok(run) => run,
            Err(error) => {
                emit_log(
                    "error",
                    "session_generation_failed",
                    ctx,
                    json!({ "error": error.to_string() }),
                );
                std::process::exit(2);
            }
        };

        for anomaly in &run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                LogContext {
                    tick: Some(anomaly.tick),
                    ..ctx
                },
                json!({ "message": anomaly.message }),
            );
        }
        if !run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += run.anomaly_records.len();
        *outcome_counts
            .entry(outcome_key(&run.result).to_string())
            .or_insert(0) += 1;

        emit_log(
            "info",
            "session_finished",
            LogContext {
                tick: Some(run.result.ticks),
                ..ctx
            },
            json!({
                "outcome": run.result.outcome,
                "stalled": run.result.stalled,
                "score": run.result.score,
                "anomalyCount": run.anomaly_records.len(),
            }),
        );

        match serde_json::to_string(&run.result) {
            Ok(line) => println!("{line}"),
            Err(error) => emit_log(
                "error",
                "result_serialize_failed",
                ctx,
                json!({ "error": error.to_string() }),
            ),
        }
        session_results.push(run.result);
    }

    let summary = build_run_summary(
        run_id.clone(),
        started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        session_results,
        outcome_counts,
        total_anomalies,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                run_ctx,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        run_ctx,
        json!({
            "sessionCount": summary.session_count,
            "anomalyCount": summary.anomaly_count,
            "averageTicks": summary.average_ticks,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn resolve_base_config(cli: &Cli) -> Result<SessionConfig, grid_pursuit::error::ConfigError> {
    let mut config = match cli.config.as_deref() {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };
    if let Some(size) = cli.grid_size {
        config.grid_size = size;
    }
    if let Some(items) = cli.items {
        config.item_count = items;
    }
    if let Some(obstacles) = cli.obstacles {
        config.obstacle_draws = obstacles;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    } else if cli.config.is_none() {
        config.seed = seed_from_clock();
    }
    Ok(config)
}

fn resolve_scenarios(cli: &Cli, base: &SessionConfig) -> Vec<Scenario> {
    let max_ticks = cli
        .max_ticks
        .unwrap_or_else(|| default_tick_limit(base.grid_size, base.item_count));
    (0..normalize_session_count(Some(cli.sessions)) as u64)
        .map(|offset| Scenario {
            name: format!("session-{}", offset + 1),
            config: base.clone().with_seed(base.seed.wrapping_add(offset)),
            max_ticks,
        })
        .collect()
}

fn run_session(
    scenario: &Scenario,
) -> Result<SessionRunResult, grid_pursuit::error::GenerationError> {
    let mut state = WorldState::new(scenario.config.clone())?;
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut collected = 0usize;

    while !state.is_ended() && state.tick() < scenario.max_ticks {
        state.step();
        let snapshot = state.build_snapshot(true);
        collected += snapshot
            .events
            .iter()
            .filter(|event| matches!(event, RuntimeEvent::ItemCollected { .. }))
            .count();
        for message in collect_snapshot_anomalies(&state, &snapshot, collected) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }
    }

    let summary = state.build_summary();
    Ok(SessionRunResult {
        result: SessionResultLine {
            scenario: scenario.name.clone(),
            seed: summary.seed,
            outcome: summary.outcome,
            stalled: !summary.outcome.is_terminal(),
            ticks: summary.ticks,
            score: summary.score,
            items_collected: summary.items_collected,
            items_remaining: summary.items_remaining,
            obstacles: state.grid().obstacles().len(),
            anomalies,
        },
        anomaly_records,
    })
}

fn collect_snapshot_anomalies(
    state: &WorldState,
    snapshot: &Snapshot,
    collected: usize,
) -> Vec<String> {
    let mut anomalies = Vec::new();
    let expected_score = state
        .config()
        .item_score
        .saturating_mul(u32::try_from(collected).unwrap_or(u32::MAX));
    if snapshot.seeker.score != expected_score {
        anomalies.push(format!(
            "score {} does not match {} collected items",
            snapshot.seeker.score, collected
        ));
    }

    let seeker = state.seeker().position();
    if !state.grid().is_walkable(seeker) {
        anomalies.push(format!(
            "seeker on blocked cell ({},{})",
            seeker.x, seeker.y
        ));
    }
    for pursuer in &snapshot.pursuers {
        if state.grid().is_blocked((pursuer.x, pursuer.y).into()) {
            anomalies.push(format!("pursuer {} on blocked cell", pursuer.id));
        }
    }

    if snapshot.outcome == Outcome::Win && !snapshot.items.is_empty() {
        anomalies.push("win declared with items remaining".to_string());
    }
    anomalies
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn outcome_key(result: &SessionResultLine) -> &'static str {
    if result.stalled {
        "stalled"
    } else {
        result.outcome.as_str()
    }
}

fn build_run_summary(
    run_id: String,
    started_at: String,
    finished_at: String,
    sessions: Vec<SessionResultLine>,
    outcome_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
) -> RunSummary {
    let session_count = sessions.len();
    let (average_ticks, average_score) = if session_count == 0 {
        (0, 0)
    } else {
        let total_ticks: u64 = sessions.iter().map(|s| s.ticks).sum();
        let total_score: u64 = sessions.iter().map(|s| s.score as u64).sum();
        (
            total_ticks / session_count as u64,
            (total_score / session_count as u64) as u32,
        )
    };
    RunSummary {
        run_id,
        started_at,
        finished_at,
        session_count,
        anomaly_count,
        average_ticks,
        average_score,
        outcome_counts,
        sessions,
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(outcome: Outcome, ticks: u64, score: u32) -> SessionResultLine {
        SessionResultLine {
            scenario: "test".to_string(),
            seed: 42,
            outcome,
            stalled: false,
            ticks,
            score,
            items_collected: (score / 10) as usize,
            items_remaining: 0,
            obstacles: 0,
            anomalies: Vec::new(),
        }
    }

    fn make_cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("simulate").chain(args.iter().copied()))
    }

    #[test]
    fn build_run_summary_calculates_averages() {
        let summary = build_run_summary(
            "sim-42-1".to_string(),
            "a".to_string(),
            "b".to_string(),
            vec![
                make_result(Outcome::Win, 100, 500),
                make_result(Outcome::Lose, 300, 100),
            ],
            BTreeMap::from([("win".to_string(), 1usize), ("lose".to_string(), 1usize)]),
            0,
        );
        assert_eq!(summary.average_ticks, 200);
        assert_eq!(summary.average_score, 300);
        assert_eq!(summary.session_count, 2);
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let target = std::env::temp_dir()
            .join(format!(
                "grid-pursuit-missing-{}",
                Utc::now().timestamp_millis()
            ))
            .join("summary.json");
        let summary = build_run_summary(
            "sim-1-1".to_string(),
            "a".to_string(),
            "b".to_string(),
            vec![make_result(Outcome::Win, 10, 10)],
            BTreeMap::new(),
            0,
        );
        assert!(write_summary(&target, &summary).is_err());
    }

    #[test]
    fn push_anomaly_keeps_records_and_deduplicates_summary_messages() {
        let mut anomalies = Vec::new();
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        push_anomaly(
            &mut anomalies,
            &mut records,
            &mut seen,
            10,
            "same".to_string(),
        );
        push_anomaly(
            &mut anomalies,
            &mut records,
            &mut seen,
            11,
            "same".to_string(),
        );
        assert_eq!(anomalies.len(), 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].tick, 11);
    }

    #[test]
    fn scenarios_use_consecutive_seeds_and_flag_overrides() {
        let cli = make_cli(&["--sessions", "3", "--seed", "40", "--items", "7"]);
        let base = resolve_base_config(&cli).expect("no config file");
        let scenarios = resolve_scenarios(&cli, &base);
        let seeds: Vec<u64> = scenarios.iter().map(|s| s.config.seed).collect();
        assert_eq!(seeds, vec![40, 41, 42]);
        assert!(scenarios.iter().all(|s| s.config.item_count == 7));
        assert_eq!(scenarios[0].name, "session-1");
    }

    #[test]
    fn open_board_session_runs_clean() {
        let cli = make_cli(&["--seed", "5", "--obstacles", "0", "--items", "10"]);
        let mut base = resolve_base_config(&cli).expect("no config file");
        base.pursuer_spawns.clear();
        let scenario = resolve_scenarios(&cli, &base).remove(0);
        let run = run_session(&scenario).expect("open board");
        assert_eq!(run.result.outcome, Outcome::Win);
        assert_eq!(run.result.score, 100);
        assert!(run.result.anomalies.is_empty());
        assert_eq!(outcome_key(&run.result), "win");
    }

    #[test]
    fn large_item_score_saturates_without_anomalies() {
        let cli = make_cli(&["--seed", "9", "--obstacles", "0", "--items", "2"]);
        let mut base = resolve_base_config(&cli).expect("no config file");
        base.pursuer_spawns.clear();
        base.item_score = 3_000_000_000;
        let scenario = resolve_scenarios(&cli, &base).remove(0);
        let run = run_session(&scenario).expect("open board");
        assert_eq!(run.result.outcome, Outcome::Win);
        assert_eq!(run.result.score, u32::MAX);
        assert!(run.result.anomalies.is_empty());
    }
}
