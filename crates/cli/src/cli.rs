// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

const QUICKSTART_HELP: &str = "\
Get started:
  notesync --offline request PUT /notes/n1 -d '{\"title\":\"Draft\"}'
  notesync queue                  List writes waiting for the network
  notesync flush                  Replay queued writes now
  notesync status                 Show sync health";

#[derive(Parser)]
#[command(name = "notesync")]
#[command(version)]
#[command(about = "Offline-first sync for notebooks and notes")]
#[command(
    long_about = "Offline-first sync for notebooks and notes.\n\n\
    Reads are cached and writes are queued while offline, then replayed in order \
    once the network is back."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Path to config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the offline database (overrides [storage] path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Treat the network as unavailable
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show sync status
    Status {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send a request through the offline gate
    #[command(arg_required_else_help = true)]
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,

        /// Absolute URL, or a path relative to api.base_url
        url: String,

        /// Request body; JSON if it parses, plain text otherwise
        #[arg(long, short)]
        data: Option<String>,

        /// Header as NAME:VALUE (repeatable)
        #[arg(long = "header", short = 'H')]
        headers: Vec<String>,

        /// Query parameter as KEY=VALUE (repeatable)
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,
    },

    /// Replay queued writes now
    Flush,

    /// List queued writes
    Queue {
        #[arg(long)]
        json: bool,
    },

    /// List cached notebooks
    Notebooks {
        #[arg(long)]
        json: bool,
    },

    /// List cached notes
    Notes {
        /// Only notes in this notebook
        #[arg(long)]
        notebook: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Delete all queued writes and cached data
    Reset,
}
