//! Recipe expansion, validators, and media URL handling.
//!
//! Everything here is pure; the executor owns the network side.

use serde_json::Value;
use url::Url;

use crate::config::{FollowUp, MediaPick, ProbeStep, UrlRewrite, Validator};

const CANARY: &str = "{canary}";

/// A recipe step with its canary placeholder resolved.
#[derive(Debug, Clone)]
pub struct Check<'a> {
    /// `step` or `step:canary`.
    pub name: String,
    pub path: String,
    pub step: &'a ProbeStep,
}

/// Expand `{canary}` steps once per canary stream; other steps pass through.
///
/// A step pinned to a canary index expands for that canary only, and is
/// dropped when fewer canaries are configured.
pub fn expand_steps<'a>(steps: &'a [ProbeStep], canaries: &[String]) -> Vec<Check<'a>> {
    let mut checks = Vec::new();
    for step in steps {
        if step.path.contains(CANARY) {
            let selected = match step.canary {
                Some(index) => canaries.get(index..=index).unwrap_or_default(),
                None => canaries,
            };
            for canary in selected {
                checks.push(Check {
                    name: format!("{}:{}", step.name, canary),
                    path: step.path.replace(CANARY, canary),
                    step,
                });
            }
        } else {
            checks.push(Check {
                name: step.name.clone(),
                path: step.path.clone(),
                step,
            });
        }
    }
    checks
}

/// Number of outcomes a set of checks produces (manifest plus follow-up).
pub fn outcome_count(checks: &[Check<'_>]) -> usize {
    checks
        .iter()
        .map(|c| if c.step.follow.is_some() { 2 } else { 1 })
        .sum()
}

/// Replace `{canary}` in a path.
pub fn with_canary(path: &str, canary: &str) -> String {
    path.replace(CANARY, canary)
}

/// Join a mirror base URL and a request path.
pub fn join_path(base: &str, path: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}{}", base.trim_end_matches('/'), path))
}

/// Apply a JSON validator to a parsed body.
pub fn validate_json(body: &Value, validator: &Validator) -> Result<(), String> {
    match validator {
        Validator::JsonField { pointer } => match body.pointer(pointer) {
            Some(Value::Null) | None => Err(format!("missing field {}", pointer)),
            Some(_) => Ok(()),
        },
        Validator::NonEmpty { pointer } => {
            let non_empty = match body.pointer(pointer) {
                Some(Value::Array(items)) => !items.is_empty(),
                Some(Value::String(s)) => !s.is_empty(),
                Some(Value::Object(map)) => !map.is_empty(),
                _ => false,
            };
            if non_empty {
                Ok(())
            } else {
                Err(format!("empty or missing {}", pointer))
            }
        }
        Validator::ContentType { .. } => Ok(()),
    }
}

/// Case-insensitive content-type prefix check.
pub fn content_type_matches(content_type: Option<&str>, prefix: &str) -> bool {
    content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with(&prefix.to_ascii_lowercase()))
        .unwrap_or(false)
}

/// Pick the media entry a follow-up fetches.
pub fn select_media_url(manifest: &Value, follow: &FollowUp) -> Option<String> {
    let entries = manifest.pointer(&follow.list_pointer)?.as_array()?;
    if follow.pick == MediaPick::First {
        return entries
            .iter()
            .find_map(|entry| entry.get(&follow.url_field)?.as_str())
            .map(str::to_string);
    }
    entries
        .iter()
        .filter(|entry| {
            entry
                .get(&follow.mime_field)
                .and_then(Value::as_str)
                .map(|mime| content_type_matches(Some(mime), &follow.media_prefix))
                .unwrap_or(false)
        })
        .filter_map(|entry| {
            let url = entry.get(&follow.url_field)?.as_str()?;
            let bitrate = entry
                .get(&follow.bitrate_field)
                .and_then(bitrate_value)
                .unwrap_or(f64::INFINITY);
            Some((bitrate, url))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, url)| url.to_string())
}

// Some APIs report bitrate as a string.
fn bitrate_value(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// Point a media URL at the host the mirror expects it to be fetched from.
pub fn rewrite_media_url(raw: &str, base: &str, rewrite: UrlRewrite) -> Option<Url> {
    let base = Url::parse(base).ok()?;
    let mut url = Url::parse(raw).or_else(|_| base.join(raw)).ok()?;

    match rewrite {
        UrlRewrite::Direct => {}
        UrlRewrite::Proxied => {
            url.set_scheme(base.scheme()).ok()?;
            url.set_host(base.host_str()).ok()?;
            url.set_port(base.port()).ok()?;
        }
        UrlRewrite::Deproxied => {
            let host = url
                .query_pairs()
                .find(|(key, _)| key == "host")
                .map(|(_, value)| value.into_owned())?;
            // The parameter may carry a port.
            let (host, port) = match host.rsplit_once(':') {
                Some((name, port)) => match port.parse::<u16>() {
                    Ok(port) => (name, Some(port)),
                    Err(_) => (host.as_str(), None),
                },
                None => (host.as_str(), None),
            };
            url.set_host(Some(host)).ok()?;
            url.set_port(port).ok()?;
        }
    }
    Some(url)
}
