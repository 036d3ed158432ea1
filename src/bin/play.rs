use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use grid_pursuit::config::SessionConfig;
use grid_pursuit::constants::{default_tick_limit, TICK_MS};
use grid_pursuit::driver_utils::{
    default_run_id, emit_log, normalize_session_count, normalize_tick_ms, seed_from_clock,
    LogContext,
};
use grid_pursuit::engine::WorldState;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive pursuit sessions at a fixed tick rate")]
struct Cli {
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Sessions to play back to back; each one after the first is a replay.
    #[arg(long)]
    sessions: Option<u32>,
    #[arg(long)]
    tick_ms: Option<u64>,
    #[arg(long)]
    max_ticks: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut config = match cli.config.as_deref() {
        Some(path) => match SessionConfig::from_json_file(path) {
            Ok(config) => config,
            Err(error) => {
                emit_log(
                    "error",
                    "config_load_failed",
                    LogContext::default(),
                    json!({ "path": path.to_string_lossy(), "error": error.to_string() }),
                );
                std::process::exit(2);
            }
        },
        None => SessionConfig::default(),
    };
    config.seed = cli.seed.unwrap_or_else(seed_from_clock);

    let run_id = default_run_id("play", config.seed, chrono::Utc::now().timestamp_millis());
    let max_ticks = cli
        .max_ticks
        .unwrap_or_else(|| default_tick_limit(config.grid_size, config.item_count));
    let mut state = match WorldState::new(config) {
        Ok(state) => state,
        Err(error) => {
            emit_log(
                "error",
                "session_generation_failed",
                LogContext {
                    run_id: &run_id,
                    ..LogContext::default()
                },
                json!({ "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    };

    let sessions = normalize_session_count(cli.sessions);
    let tick_ms = normalize_tick_ms(cli.tick_ms, TICK_MS);
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));

    for index in 0..sessions {
        if index > 0 {
            if let Err(error) = state.reset() {
                emit_log(
                    "error",
                    "session_generation_failed",
                    LogContext {
                        run_id: &run_id,
                        ..LogContext::default()
                    },
                    json!({ "error": error.to_string() }),
                );
                std::process::exit(2);
            }
        }
        let ctx = LogContext {
            run_id: &run_id,
            seed: Some(state.seed()),
            ..LogContext::default()
        };
        emit_log(
            "info",
            "session_started",
            ctx,
            json!({ "session": index + 1, "tickMs": tick_ms }),
        );
        print_frame(&json!({ "type": "world", "world": state.get_world_init() }));

        loop {
            interval.tick().await;
            let (frame, finished) = tick_session(&mut state, max_ticks);
            print_frame(&frame);
            if finished {
                break;
            }
        }

        let summary = state.build_summary();
        emit_log(
            "info",
            "session_finished",
            LogContext {
                tick: Some(summary.ticks),
                ..ctx
            },
            json!({ "outcome": summary.outcome, "score": summary.score }),
        );
        print_frame(&json!({ "type": "summary", "summary": summary }));
    }
}

/// Advances one tick and returns the state frame plus whether the session is
/// over (decided, or out of ticks).
fn tick_session(state: &mut WorldState, max_ticks: u64) -> (Value, bool) {
    let outcome = state.step();
    let snapshot = state.build_snapshot(true);
    let finished = outcome.is_terminal() || state.tick() >= max_ticks;
    (json!({ "type": "state", "snapshot": snapshot }), finished)
}

fn print_frame(frame: &Value) {
    println!("{frame}");
}
