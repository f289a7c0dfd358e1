// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    serialization = { Error::Serialization("binary body".into()), "binary body" },
    unsupported_method = { Error::UnsupportedMethod("GET".into()), "GET" },
    corrupted = { Error::CorruptedData("bad row".into()), "bad row" },
    unavailable = { Error::StoreUnavailable("poisoned".into()), "poisoned" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_invalid_url_display() {
    let err = Error::InvalidUrl {
        url: "::nope".into(),
        reason: "relative URL without a base".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("::nope"));
    assert!(msg.contains("relative URL"));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
