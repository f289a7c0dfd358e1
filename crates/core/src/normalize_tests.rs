// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

const BASE: &str = "https://api.test/v1";

fn no_params() -> BTreeMap<String, String> {
    BTreeMap::new()
}

#[parameterized(
    relative_with_slash = { "/notes", "https://api.test/v1/notes" },
    relative_without_slash = { "notes", "https://api.test/v1/notes" },
    absolute_kept = { "https://other.test/x", "https://other.test/x" },
    host_lowercased = { "https://API.Test/notes", "https://api.test/notes" },
    sorted_query = { "/notes?b=2&a=1", "https://api.test/v1/notes?a=1&b=2" },
    same_key_sorted_by_value = { "/notes?tag=z&tag=a", "https://api.test/v1/notes?tag=a&tag=z" },
    fragment_dropped = { "/notes#top", "https://api.test/v1/notes" },
)]
fn normalize(raw: &str, expected: &str) {
    assert_eq!(normalize_url(Some(BASE), raw, &no_params()).unwrap(), expected);
}

#[test]
fn params_merge_into_query() {
    let mut params = BTreeMap::new();
    params.insert("page".to_string(), "2".to_string());
    params.insert("notebook".to_string(), "n1".to_string());

    let url = normalize_url(Some(BASE), "/notes?sort=title", &params).unwrap();
    assert_eq!(url, "https://api.test/v1/notes?notebook=n1&page=2&sort=title");
}

#[test]
fn equivalent_spellings_share_a_key() {
    let mut params = BTreeMap::new();
    params.insert("a".to_string(), "1".to_string());

    let left = normalize_url(Some(BASE), "/notes?b=2", &params).unwrap();
    let right = normalize_url(Some(BASE), "notes?b=2&a=1", &no_params()).unwrap();
    assert_eq!(left, right);
}

#[test]
fn relative_without_base_fails() {
    let err = normalize_url(None, "/notes", &no_params()).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl { .. }));
}

#[parameterized(
    absolute = { "https://api.test/v1/notebooks/7/notes?x=1", &["v1", "notebooks", "7", "notes"] },
    trailing_slash = { "https://api.test/notes/", &["notes"] },
    relative = { "/notes/3#frag", &["notes", "3"] },
)]
fn segments(url: &str, expected: &[&str]) {
    assert_eq!(path_segments(url), expected);
}
