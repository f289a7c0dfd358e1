// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use notesync_core::QueuedMutation;

use super::{plural, Context};
use crate::error::Result;

pub async fn run(ctx: &Context, json: bool) -> Result<()> {
    let pending = ctx.engine.pending_mutations().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&pending)?);
        return Ok(());
    }
    if pending.is_empty() {
        println!("No queued mutations");
        return Ok(());
    }
    println!("{} queued:", plural(pending.len(), "mutation"));
    for mutation in &pending {
        println!("{}", format_line(mutation));
    }
    Ok(())
}

pub(crate) fn format_line(mutation: &QueuedMutation) -> String {
    let mut line = format!(
        "  [{}] {} {}",
        mutation.id, mutation.method, mutation.url
    );
    if let Some(stamp) = &mutation.version_stamp {
        line.push_str(&format!(" (rev {stamp})"));
    }
    if mutation.attempts > 0 {
        line.push_str(&format!(
            "\n      {} failed",
            plural(mutation.attempts as usize, "attempt")
        ));
        if let Some(error) = &mutation.last_error {
            line.push_str(&format!(": {error}"));
        }
    }
    line
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
