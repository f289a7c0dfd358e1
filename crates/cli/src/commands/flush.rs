// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{plural, Context};
use crate::error::Result;
use crate::sync::FlushOutcome;

pub async fn run(ctx: &Context) -> Result<()> {
    ctx.engine.load_state().await?;
    let outcome = ctx.engine.trigger_manual_sync().await?;
    let pending = ctx.engine.status().queue_length;
    println!("{}", describe(outcome, pending));

    if let Some(FlushOutcome::Halted { .. }) = outcome {
        if let Some(error) = ctx.engine.status().last_error {
            println!("  error: {error}");
        }
    }
    Ok(())
}

/// One-line summary of a manual sync. `None` means the sync was skipped offline.
pub(crate) fn describe(outcome: Option<FlushOutcome>, pending: usize) -> String {
    match outcome {
        None | Some(FlushOutcome::Offline { .. }) => {
            format!("Offline: {} waiting", plural(pending, "mutation"))
        }
        Some(FlushOutcome::AlreadySyncing) => "A sync is already running".to_string(),
        Some(FlushOutcome::Empty) => "Nothing to sync".to_string(),
        Some(FlushOutcome::Completed { replayed }) => {
            format!("Synced {}", plural(replayed, "mutation"))
        }
        Some(FlushOutcome::Halted { replayed, failed }) => format!(
            "Synced {}; stopped at mutation {failed}, {} still queued",
            plural(replayed, "mutation"),
            pending
        ),
    }
}

#[cfg(test)]
#[path = "flush_tests.rs"]
mod tests;
