//! HTTP probe execution.
//!
//! # Responsibilities
//! - Run each dialect recipe against a mirror, one outcome per sub-check
//! - Follow validated manifests to the media they reference
//! - Run the cross-dialect consistency probe
//! - Convert every failure into a zero-score outcome at the check boundary

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::{
    ConsistencyConfig, Dialect, DialectsConfig, FollowUp, ProbeConfig, RankerConfig, Validator,
};
use crate::observability::metrics;
use crate::probe::outcome::{FailureKind, PairOutcome, ProbeOutcome};
use crate::probe::recipe::{
    content_type_matches, expand_steps, join_path, outcome_count, rewrite_media_url,
    select_media_url, validate_json, with_canary, Check,
};

/// Errors raised inside a single check.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("malformed JSON body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("validator rejected response: {0}")]
    Rejected(String),

    #[error("content-type {found:?} does not start with '{expected}'")]
    ContentType {
        expected: String,
        found: Option<String>,
    },

    #[error("consistency mismatch: {0}")]
    Mismatch(String),

    #[error("cannot build request: {0}")]
    Gap(String),
}

impl ProbeError {
    /// Failure class reported for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            ProbeError::Request(e) if e.is_decode() => FailureKind::ProtocolMismatch,
            ProbeError::Request(_) => FailureKind::NetworkFailure,
            ProbeError::Status(_) | ProbeError::Body(_) | ProbeError::Rejected(_) => {
                FailureKind::ProtocolMismatch
            }
            ProbeError::ContentType { .. } | ProbeError::Mismatch(_) => {
                FailureKind::ContentValidationFailure
            }
            ProbeError::Gap(_) => FailureKind::ConfigurationGap,
        }
    }
}

/// Source of probe outcomes for the pipeline.
///
/// Implementations must never fail as a whole: every problem is reported as a
/// [`ProbeOutcome::Failure`] for the affected sub-check.
pub trait Prober: Send + Sync {
    /// Run every check of a dialect's recipe against one mirror.
    fn probe(&self, base_url: &str, dialect: Dialect) -> impl Future<Output = Vec<ProbeOutcome>> + Send;

    /// Check that a primary mirror and its secondary peer serve consistent data.
    fn cross_check(&self, primary: &str, secondary: &str) -> impl Future<Output = PairOutcome> + Send;
}

/// Prober backed by a shared `reqwest` client.
///
/// Timeouts are delegated entirely to the client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    probe: ProbeConfig,
    dialects: DialectsConfig,
    consistency: ConsistencyConfig,
}

impl HttpProber {
    pub fn new(config: &RankerConfig) -> Result<Self, ProbeError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_millis(config.probe.timeout_ms))
            .user_agent(config.probe.user_agent.clone());
        if !config.probe.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            probe: config.probe.clone(),
            dialects: config.dialects.clone(),
            consistency: config.consistency.clone(),
        })
    }

    async fn run_check(&self, base: &str, dialect: Dialect, check: &Check<'_>) -> Vec<ProbeOutcome> {
        let step = check.step;
        let mut outcomes = Vec::with_capacity(2);

        let started = Instant::now();
        let manifest = match self.request(base, &check.path, &step.validator).await {
            Ok(body) => {
                outcomes.push(self.passed(base, dialect, &check.name, started.elapsed(), step.weight));
                Ok(body)
            }
            Err(e) => {
                let kind = self.failed(base, dialect, &check.name, &e);
                outcomes.push(ProbeOutcome::failure(kind));
                Err(kind)
            }
        };

        if let Some(follow) = &step.follow {
            let name = format!("{}/{}", check.name, follow.name);
            let outcome = match manifest {
                Ok(Some(body)) => match self.follow_media(base, &body, follow).await {
                    Ok(elapsed) => self.passed(base, dialect, &name, elapsed, follow.weight),
                    Err(e) => ProbeOutcome::failure(self.failed(base, dialect, &name, &e)),
                },
                Ok(None) => {
                    let e = ProbeError::Gap("manifest validator does not produce JSON".into());
                    ProbeOutcome::failure(self.failed(base, dialect, &name, &e))
                }
                Err(kind) => {
                    tracing::debug!(instance = %base, %dialect, check = %name, "Skipped: manifest failed");
                    metrics::record_probe(dialect, "skipped");
                    ProbeOutcome::failure(kind)
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    /// GET a mirror path and validate the response. JSON validators return the body.
    async fn request(&self, base: &str, path: &str, validator: &Validator) -> Result<Option<Value>, ProbeError> {
        let url = join_path(base, path).map_err(|e| ProbeError::Gap(e.to_string()))?;
        self.fetch(url, validator).await
    }

    async fn fetch(&self, url: Url, validator: &Validator) -> Result<Option<Value>, ProbeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status));
        }

        match validator {
            Validator::ContentType { prefix } => {
                let found = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                if !content_type_matches(found.as_deref(), prefix) {
                    return Err(ProbeError::ContentType {
                        expected: prefix.clone(),
                        found,
                    });
                }
                // Latency covers the full payload.
                response.bytes().await?;
                Ok(None)
            }
            Validator::JsonField { .. } | Validator::NonEmpty { .. } => {
                let bytes = response.bytes().await?;
                let body: Value = serde_json::from_slice(&bytes)?;
                validate_json(&body, validator).map_err(ProbeError::Rejected)?;
                Ok(Some(body))
            }
        }
    }

    async fn follow_media(&self, base: &str, manifest: &Value, follow: &FollowUp) -> Result<Duration, ProbeError> {
        let raw = select_media_url(manifest, follow).ok_or_else(|| {
            ProbeError::Rejected(format!(
                "no {} entry under {}",
                follow.media_prefix, follow.list_pointer
            ))
        })?;
        let url = rewrite_media_url(&raw, base, follow.rewrite)
            .ok_or_else(|| ProbeError::Rejected(format!("unusable media URL {}", raw)))?;

        let started = Instant::now();
        self.fetch(
            url,
            &Validator::ContentType {
                prefix: follow.media_prefix.clone(),
            },
        )
        .await?;
        Ok(started.elapsed())
    }

    async fn field(&self, base: &str, path: &str, pointer: &str) -> Result<Value, ProbeError> {
        let validator = Validator::JsonField {
            pointer: pointer.to_string(),
        };
        let body = self.request(base, path, &validator).await?;
        body.as_ref()
            .and_then(|b| b.pointer(pointer))
            .cloned()
            .ok_or_else(|| ProbeError::Rejected(format!("missing field {}", pointer)))
    }

    fn passed(&self, base: &str, dialect: Dialect, check: &str, elapsed: Duration, weight: f64) -> ProbeOutcome {
        let outcome = ProbeOutcome::from_latency(elapsed, self.probe.score_constant, weight);
        tracing::info!(
            instance = %base,
            %dialect,
            check = %check,
            elapsed_ms = elapsed.as_millis() as u64,
            score = outcome.score(),
            "Check passed"
        );
        metrics::record_probe(dialect, outcome.label());
        outcome
    }

    fn failed(&self, base: &str, dialect: Dialect, check: &str, error: &ProbeError) -> FailureKind {
        let kind = error.kind();
        tracing::warn!(
            instance = %base,
            %dialect,
            check = %check,
            kind = kind.as_str(),
            error = %error,
            "Check failed"
        );
        metrics::record_probe(dialect, kind.as_str());
        kind
    }
}

impl Prober for HttpProber {
    async fn probe(&self, base_url: &str, dialect: Dialect) -> Vec<ProbeOutcome> {
        let checks = expand_steps(self.dialects.recipe(dialect), &self.probe.canary_streams);

        if let Err(e) = Url::parse(base_url) {
            tracing::warn!(instance = %base_url, %dialect, error = %e, "Unusable base URL");
            return vec![ProbeOutcome::failure(FailureKind::ConfigurationGap); outcome_count(&checks)];
        }

        // Checks for one mirror run in order; other mirrors are probed concurrently.
        let mut outcomes = Vec::with_capacity(outcome_count(&checks));
        for check in &checks {
            outcomes.extend(self.run_check(base_url, dialect, check).await);
        }
        outcomes
    }

    async fn cross_check(&self, primary: &str, secondary: &str) -> PairOutcome {
        let canary = self
            .consistency
            .canary
            .as_ref()
            .or_else(|| self.probe.canary_streams.first());
        let Some(canary) = canary else {
            tracing::warn!(primary = %primary, secondary = %secondary, "No canary for consistency probe");
            metrics::record_consistency(FailureKind::ConfigurationGap.as_str());
            return PairOutcome::new(ProbeOutcome::failure(FailureKind::ConfigurationGap));
        };

        let c = &self.consistency;
        let primary_path = with_canary(&c.primary_path, canary);
        let secondary_path = with_canary(&c.secondary_path, canary);

        let started = Instant::now();
        let (a, b) = tokio::join!(
            self.field(primary, &primary_path, &c.primary_pointer),
            self.field(secondary, &secondary_path, &c.secondary_pointer),
        );

        let unreachable = |r: &Result<Value, ProbeError>| {
            matches!(r, Err(e) if e.kind() == FailureKind::NetworkFailure)
        };
        let (primary_down, secondary_down) = (unreachable(&a), unreachable(&b));

        let result = match (a, b) {
            (Ok(a), Ok(b)) if a == b => Ok(started.elapsed()),
            (Ok(a), Ok(b)) => Err(ProbeError::Mismatch(format!("{} != {}", a, b))),
            (Err(e), _) | (_, Err(e)) => Err(e),
        };

        match result {
            Ok(elapsed) => {
                tracing::info!(primary = %primary, secondary = %secondary, "Consistency probe passed");
                metrics::record_consistency("success");
                PairOutcome::new(ProbeOutcome::from_latency(elapsed, self.probe.score_constant, 1.0))
            }
            Err(e) => {
                let kind = e.kind();
                tracing::warn!(
                    primary = %primary,
                    secondary = %secondary,
                    primary_down,
                    secondary_down,
                    kind = kind.as_str(),
                    error = %e,
                    "Consistency probe failed"
                );
                metrics::record_consistency(kind.as_str());
                PairOutcome {
                    outcome: ProbeOutcome::failure(kind),
                    primary_down,
                    secondary_down,
                }
            }
        }
    }
}
