//! Timed command scripts.
//!
//! A script is a JSON array of steps, each a command stamped with the
//! milliseconds since the start of the session:
//!
//! ```json
//! [
//!   { "at_ms": 0,  "command": { "type": "drag_start", "id": "router" } },
//!   { "at_ms": 40, "command": { "type": "drag_move", "id": "router", "position": [240, 130] } }
//! ]
//! ```
//!
//! Timers that fall due between two steps run before the later step, in
//! deadline order, so a replay sees what an interactive session would.

use anyhow::{Context, Result};
use api::{execute_command, Command, CommandResult};
use containment::Editor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub at_ms: u64,
    pub command: Command,
}

/// Outcome of one replay.
#[derive(Debug, Default)]
pub struct Replay {
    pub executed: usize,
    pub failed: usize,
    pub timers: usize,
}

pub fn load(path: &Path) -> Result<Vec<Step>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid script: {}", path.display()))
}

pub fn parse(text: &str) -> Result<Vec<Step>> {
    let mut steps: Vec<Step> = serde_json::from_str(text)?;
    // Stable, so steps sharing a timestamp keep their order.
    steps.sort_by_key(|step| step.at_ms);
    Ok(steps)
}

/// Runs `steps` against `editor` with `start` as time zero. With `settle`
/// every timer still pending after the last step is run too.
pub fn replay(editor: &mut Editor, steps: Vec<Step>, start: Instant, settle: bool) -> Replay {
    let mut outcome = Replay::default();
    let mut now = start;

    for step in steps {
        let at = start + Duration::from_millis(step.at_ms);
        outcome.timers += run_timers_until(editor, at);
        now = at;

        log::debug!("t+{}ms {:?}", step.at_ms, step.command);
        match execute_command(editor, step.command, now) {
            CommandResult::Success { .. } => outcome.executed += 1,
            CommandResult::Error { message } => {
                log::warn!("t+{}ms rejected: {}", step.at_ms, message);
                outcome.failed += 1;
            }
        }
    }

    if settle {
        while let Some(deadline) = editor.next_deadline() {
            now = now.max(deadline);
            outcome.timers += editor.advance(now);
        }
    }
    outcome
}

fn run_timers_until(editor: &mut Editor, until: Instant) -> usize {
    let mut fired = 0;
    while let Some(deadline) = editor.next_deadline().filter(|d| *d <= until) {
        fired += editor.advance(deadline);
    }
    fired
}
