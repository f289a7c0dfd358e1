// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Listing of projected notebooks and notes.

use notesync_core::{DomainKind, DomainRecord};

use super::{plural, Context};
use crate::error::Result;

pub async fn run(ctx: &Context, kind: DomainKind, notebook: Option<&str>, json: bool) -> Result<()> {
    let records = filter(ctx.engine.domain_records(kind).await?, notebook);
    if json {
        let data: Vec<_> = records.iter().map(|r| &r.data).collect();
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No cached {}", kind.collection());
        return Ok(());
    }
    println!("{}", plural(records.len(), kind.as_str()));
    for record in &records {
        println!("{}", format_line(kind, record));
    }
    Ok(())
}

/// Keep only notes in `notebook`, if given.
pub(crate) fn filter(records: Vec<DomainRecord>, notebook: Option<&str>) -> Vec<DomainRecord> {
    match notebook {
        Some(id) => records
            .into_iter()
            .filter(|r| r.notebook_id.as_deref() == Some(id))
            .collect(),
        None => records,
    }
}

pub(crate) fn format_line(kind: DomainKind, record: &DomainRecord) -> String {
    let label_key = match kind {
        DomainKind::Notebook => "name",
        DomainKind::Note => "title",
    };
    let label = record
        .data
        .get(label_key)
        .and_then(|v| v.as_str())
        .unwrap_or("(untitled)");
    match &record.notebook_id {
        Some(notebook) => format!("  {}  {}  [{}]", record.id, label, notebook),
        None => format!("  {}  {}", record.id, label),
    }
}

#[cfg(test)]
#[path = "domain_tests.rs"]
mod tests;
