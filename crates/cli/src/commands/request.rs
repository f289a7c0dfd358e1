// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::str::FromStr;

use notesync_core::{Method, RequestBody};
use serde_json::Value;

use super::Context;
use crate::error::{Error, Result};
use crate::sync::{ApiRequest, ApiResponse};

pub async fn run(
    ctx: &Context,
    method: String,
    url: String,
    data: Option<String>,
    headers: Vec<String>,
    params: Vec<String>,
) -> Result<()> {
    let request = build_request(&method, url, data, &headers, &params)?;

    // Online, this replays anything queued before the new request goes out.
    ctx.engine.initialize().await?;
    let response = ctx.engine.gate().dispatch(request).await?;

    print!("{}", render(&response)?);
    Ok(())
}

pub(crate) fn build_request(
    method: &str,
    url: String,
    data: Option<String>,
    headers: &[String],
    params: &[String],
) -> Result<ApiRequest> {
    let method = Method::from_str(method)?;
    let mut request = ApiRequest::new(method, url).with_body(parse_body(data));
    for header in headers {
        let (name, value) = parse_header(header)?;
        request = request.with_header(name, value);
    }
    for param in params {
        let (key, value) = parse_param(param)?;
        request = request.with_param(key, value);
    }
    Ok(request)
}

/// JSON if the text parses as JSON, plain text otherwise.
pub(crate) fn parse_body(data: Option<String>) -> RequestBody {
    match data {
        None => RequestBody::Empty,
        Some(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => RequestBody::Json(value),
            Err(_) => RequestBody::Text(text),
        },
    }
}

/// Parse `NAME:VALUE`.
pub(crate) fn parse_header(raw: &str) -> Result<(String, String)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(Error::InvalidRequest(format!(
            "header '{raw}' must look like NAME:VALUE"
        ))),
    }
}

/// Parse `KEY=VALUE`.
pub(crate) fn parse_param(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(Error::InvalidRequest(format!(
            "param '{raw}' must look like KEY=VALUE"
        ))),
    }
}

pub(crate) fn render(response: &ApiResponse) -> Result<String> {
    let mut out = format!("HTTP {}", response.status);
    if let Some(marker) = response.offline_marker() {
        out.push_str(&format!(" (offline: {marker})"));
    }
    out.push('\n');
    match &response.data {
        Value::Null => {}
        Value::String(text) => {
            out.push_str(text);
            out.push('\n');
        }
        other => {
            out.push_str(&serde_json::to_string_pretty(other)?);
            out.push('\n');
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
