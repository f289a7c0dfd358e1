// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

//! Tests for argument parsing and the public `run()` function.

use crate::{run, Cli, Command};
use clap::Parser;
use tempfile::TempDir;

#[test]
fn test_parse_request_with_repeated_options() {
    let cli = Cli::try_parse_from([
        "notesync",
        "--offline",
        "request",
        "PUT",
        "/notes/n1",
        "-d",
        r#"{"title":"x"}"#,
        "-H",
        "If-Match: r1",
        "-H",
        "x-trace: t",
        "--param",
        "draft=1",
    ])
    .unwrap();

    assert!(cli.global.offline);
    match cli.command {
        Command::Request {
            method,
            url,
            data,
            headers,
            params,
        } => {
            assert_eq!(method, "PUT");
            assert_eq!(url, "/notes/n1");
            assert!(data.is_some());
            assert_eq!(headers.len(), 2);
            assert_eq!(params, vec!["draft=1"]);
        }
        _ => panic!("Expected Request command"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["notesync", "status", "--json", "--db", "/tmp/x.db"]).unwrap();
    assert_eq!(cli.global.db.unwrap().to_str(), Some("/tmp/x.db"));
    assert!(matches!(cli.command, Command::Status { json: true }));
}

#[test]
fn test_notes_notebook_filter() {
    let cli = Cli::try_parse_from(["notesync", "notes", "--notebook", "nb1"]).unwrap();
    match cli.command {
        Command::Notes { notebook, json } => {
            assert_eq!(notebook.as_deref(), Some("nb1"));
            assert!(!json);
        }
        _ => panic!("Expected Notes command"),
    }
}

#[test]
fn test_missing_subcommand_is_error() {
    assert!(Cli::try_parse_from(["notesync"]).is_err());
}

#[test]
fn test_run_queue_on_fresh_database() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "").unwrap();
    let cli = Cli::try_parse_from([
        "notesync",
        "--offline",
        "--config",
        config.to_str().unwrap(),
        "--db",
        temp.path().join("offline.db").to_str().unwrap(),
        "queue",
    ])
    .unwrap();

    run(cli).unwrap();
}

#[test]
fn test_run_with_missing_config_fails() {
    let temp = TempDir::new().unwrap();
    let cli = Cli::try_parse_from([
        "notesync",
        "--config",
        temp.path().join("missing.toml").to_str().unwrap(),
        "status",
    ])
    .unwrap();

    let err = run(cli).unwrap_err();
    assert!(matches!(err, crate::Error::Config(_)));
}
