// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{plural, Context};
use crate::error::Result;

pub async fn run(ctx: &Context) -> Result<()> {
    let dropped = ctx.engine.pending_mutations().await?.len();
    ctx.engine.reset_cache().await?;
    if dropped > 0 {
        println!("Cleared offline cache ({} discarded)", plural(dropped, "queued mutation"));
    } else {
        println!("Cleared offline cache");
    }
    Ok(())
}
