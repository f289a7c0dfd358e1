// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! URL normalization for cache keys and queued mutations.
//!
//! Two requests for the same resource must produce the same key no matter
//! how the caller spelled the query string, so the normalized form is
//! scheme + host + path + query parameters sorted by key then value. The
//! fragment is dropped.

use std::collections::BTreeMap;

use url::{ParseError, Url};

use crate::error::{Error, Result};

/// Resolves `raw` against an optional API base and returns the normalized URL.
///
/// `params` are merged into the query string alongside any parameters
/// already present in `raw`. Relative URLs are appended to the base path
/// (not resolved RFC 3986 style) so `https://host/api` + `/notes` becomes
/// `https://host/api/notes`.
pub fn normalize_url(
    base: Option<&str>,
    raw: &str,
    params: &BTreeMap<String, String>,
) -> Result<String> {
    let mut url = resolve(base, raw)?;

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
    pairs.sort();

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.set_fragment(None);

    Ok(url.to_string())
}

/// Returns the non-empty path segments of a URL.
pub fn path_segments(url: &str) -> Vec<String> {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

fn resolve(base: Option<&str>, raw: &str) -> Result<Url> {
    let invalid = |url: &str, reason: String| Error::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| invalid(raw, "relative URL without a base".into()))?;
            let joined = format!(
                "{}/{}",
                base.trim_end_matches('/'),
                raw.trim_start_matches('/')
            );
            Url::parse(&joined).map_err(|e| invalid(&joined, e.to_string()))
        }
        Err(e) => Err(invalid(raw, e.to_string())),
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
