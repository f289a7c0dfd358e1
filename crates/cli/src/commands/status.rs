// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{plural, Context};
use crate::error::Result;
use crate::status::StatusSnapshot;

pub async fn run(ctx: &Context, json: bool) -> Result<()> {
    let snapshot = ctx.engine.load_state().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render(&snapshot));
    }
    Ok(())
}

/// Human-readable status block.
pub(crate) fn render(snapshot: &StatusSnapshot) -> String {
    let mut out = String::new();
    let connection = if snapshot.is_online { "online" } else { "offline" };
    out.push_str(&format!("Connection: {connection}\n"));
    out.push_str(&format!(
        "Queue: {} pending\n",
        plural(snapshot.queue_length, "mutation")
    ));
    if snapshot.is_syncing {
        out.push_str("Syncing: yes\n");
    }
    match snapshot.last_synced_at {
        Some(at) => out.push_str(&format!(
            "Last synced: {}\n",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        None => out.push_str("Last synced: never\n"),
    }
    if let Some(error) = &snapshot.last_error {
        out.push_str(&format!("Last error: {error}\n"));
    }
    out
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
