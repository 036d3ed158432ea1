use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Serialize)]
pub struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    pub timestamp_ms: i64,
    pub level: String,
    pub event: String,
    #[serde(rename = "runId")]
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick: Option<u64>,
    pub details: Value,
}

/// Context shared by every log line of one run.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogContext<'a> {
    pub run_id: &'a str,
    pub scenario: Option<&'a str>,
    pub seed: Option<u64>,
    pub tick: Option<u64>,
}

pub fn build_log_line(
    level: &str,
    event: &str,
    ctx: LogContext<'_>,
    details: Value,
) -> StructuredLogLine {
    StructuredLogLine {
        timestamp_ms: Utc::now().timestamp_millis(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: ctx.run_id.to_string(),
        scenario: ctx.scenario.map(|value| value.to_string()),
        seed: ctx.seed,
        tick: ctx.tick,
        details,
    }
}

/// Writes one JSON log line to stderr.
pub fn emit_log(level: &str, event: &str, ctx: LogContext<'_>, details: Value) {
    let line = build_log_line(level, event, ctx, details);
    if let Ok(text) = serde_json::to_string(&line) {
        eprintln!("{text}");
    }
}

pub fn normalize_session_count(value: Option<u32>) -> u32 {
    value.unwrap_or(1).clamp(1, 10_000)
}

pub fn normalize_tick_ms(value: Option<u64>, default_ms: u64) -> u64 {
    value.unwrap_or(default_ms).clamp(1, 5_000)
}

pub fn default_run_id(prefix: &str, seed: u64, timestamp_ms: i64) -> String {
    format!("{prefix}-{seed}-{timestamp_ms}")
}

pub fn seed_from_clock() -> u64 {
    Utc::now().timestamp_millis() as u64
}
