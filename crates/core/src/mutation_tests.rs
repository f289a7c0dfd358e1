// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use yare::parameterized;

fn headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[parameterized(
    get = { "get", Method::Get },
    post = { "POST", Method::Post },
    put = { "Put", Method::Put },
    patch = { "patch", Method::Patch },
    delete = { "DELETE", Method::Delete },
)]
fn method_from_str(input: &str, expected: Method) {
    assert_eq!(input.parse::<Method>().unwrap(), expected);
}

#[test]
fn method_from_str_rejects_unknown() {
    let err = "OPTIONS".parse::<Method>().unwrap_err();
    assert!(matches!(err, Error::UnsupportedMethod(_)));
}

#[test]
fn only_get_is_read() {
    assert!(Method::Get.is_read());
    assert!(!Method::Post.is_read());
    assert!(!Method::Delete.is_read());
}

#[test]
fn text_form_is_storable() {
    let body = RequestBody::Form(vec![
        FormField::text("title", "Groceries"),
        FormField::text("pinned", "true"),
    ]);
    assert!(body.ensure_storable().is_ok());
}

#[test]
fn form_with_file_is_rejected() {
    let body = RequestBody::Form(vec![
        FormField::text("title", "Scan"),
        FormField {
            name: "attachment".into(),
            value: FormValue::File {
                filename: "scan.png".into(),
                content_type: Some("image/png".into()),
                bytes: vec![0x89, 0x50],
            },
        },
    ]);
    let err = body.ensure_storable().unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
    assert!(err.to_string().contains("attachment"));
}

#[test]
fn binary_body_is_rejected() {
    let err = RequestBody::Binary(vec![1, 2, 3]).ensure_storable().unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}

#[test]
fn new_mutation_rejects_get() {
    let err = NewMutation::new(
        Method::Get,
        "https://api.test/notes",
        RequestBody::Empty,
        &BTreeMap::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedMethod(_)));
}

#[test]
fn new_mutation_lowercases_headers() {
    let mutation = NewMutation::new(
        Method::Post,
        "https://api.test/notes",
        RequestBody::Json(json!({"title": "A"})),
        &headers(&[("Authorization", "Bearer t"), ("X-Client", "desktop")]),
    )
    .unwrap();
    assert_eq!(mutation.headers.get("authorization").unwrap(), "Bearer t");
    assert_eq!(mutation.headers.get("x-client").unwrap(), "desktop");
}

#[test]
fn version_stamp_prefers_header() {
    let h = normalize_headers(&headers(&[("If-Match", "\"rev-9\"")]));
    let body = RequestBody::Json(json!({"revision": "rev-1", "updatedAt": "2026-01-01"}));
    assert_eq!(version_stamp(&h, &body).as_deref(), Some("\"rev-9\""));
}

#[test]
fn version_stamp_prefers_revision_over_updated_at() {
    let body = RequestBody::Json(json!({"revision": 7, "updatedAt": "2026-01-01T00:00:00Z"}));
    assert_eq!(version_stamp(&BTreeMap::new(), &body).as_deref(), Some("7"));
}

#[test]
fn version_stamp_falls_back_to_updated_at() {
    let body = RequestBody::Json(json!({"title": "A", "updatedAt": "2026-01-01T00:00:00Z"}));
    assert_eq!(
        version_stamp(&BTreeMap::new(), &body).as_deref(),
        Some("2026-01-01T00:00:00Z")
    );
}

#[test]
fn version_stamp_absent() {
    let body = RequestBody::Json(json!({"title": "A", "revision": null}));
    assert_eq!(version_stamp(&BTreeMap::new(), &body), None);
    assert_eq!(version_stamp(&BTreeMap::new(), &RequestBody::Text("hi".into())), None);
}

#[test]
fn failed_attempt_increments() {
    let now = Utc::now();
    let mutation = QueuedMutation {
        id: MutationId(3),
        method: Method::Put,
        url: "https://api.test/notes/1".into(),
        body: RequestBody::Empty,
        headers: BTreeMap::new(),
        version_stamp: None,
        attempts: 2,
        last_error: None,
        last_attempt_at: None,
        created_at: now,
    };
    let update = MutationUpdate::failed_attempt(&mutation, "timeout", now);
    assert_eq!(update.attempts, Some(3));
    assert_eq!(update.last_error.as_deref(), Some("timeout"));
    assert_eq!(update.last_attempt_at, Some(now));
}

#[test]
fn body_serializes_tagged() {
    let body = RequestBody::Json(json!({"title": "A"}));
    let text = serde_json::to_string(&body).unwrap();
    assert_eq!(text, r#"{"kind":"json","value":{"title":"A"}}"#);
    let back: RequestBody = serde_json::from_str(&text).unwrap();
    assert_eq!(back, body);
}
