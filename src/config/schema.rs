//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a ranking run.
//! All types derive Serde traits for deserialization from config files, and
//! every section has defaults so an absent config file still yields a
//! runnable setup.

use serde::{Deserialize, Serialize};

/// Root configuration for the mirror ranker.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RankerConfig {
    /// Fixed-name input and output files.
    pub files: FilesConfig,

    /// Probe timing and scoring constants.
    pub probe: ProbeConfig,

    /// Per-dialect probe recipes.
    pub dialects: DialectsConfig,

    /// Cross-dialect consistency probe.
    pub consistency: ConsistencyConfig,

    /// Degraded-status fallback policy.
    pub fallback: FallbackConfig,

    /// Git publish step.
    pub publish: PublishConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// API flavor a mirror speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Primary streaming API.
    Primary,
    /// Secondary streaming API.
    Secondary,
    /// Suggestion/music query API.
    Tertiary,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Primary, Dialect::Secondary, Dialect::Tertiary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Primary => "primary",
            Dialect::Secondary => "secondary",
            Dialect::Tertiary => "tertiary",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input and output file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Flat-text candidate records; rewritten in rank order each run.
    pub candidates: String,

    /// JSON association table (primary URL -> secondary URL).
    pub association: String,

    /// Published dynamic instance set.
    pub output: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            candidates: "unified_instances.txt".to_string(),
            association: "unified_instances.json".to_string(),
            output: "dynamic_instances.json".to_string(),
        }
    }
}

/// Probe timing and scoring.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-request timeout in milliseconds, enforced by the HTTP client.
    pub timeout_ms: u64,

    /// Score constant `k` in `weight * k / elapsed_ms`.
    pub score_constant: f64,

    /// Known-good media items used to exercise streaming paths.
    pub canary_streams: Vec<String>,

    /// User agent sent with every probe.
    pub user_agent: String,

    /// Honor proxy environment variables for probe requests.
    pub use_system_proxy: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            score_constant: 100_000.0,
            canary_streams: vec!["zJl2K7JRCKY".to_string(), "GFoGRSacNOs".to_string()],
            user_agent: "mirror-ranker".to_string(),
            use_system_proxy: true,
        }
    }
}

/// Probe recipes keyed by dialect.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DialectsConfig {
    pub primary: Vec<ProbeStep>,
    pub secondary: Vec<ProbeStep>,
    pub tertiary: Vec<ProbeStep>,
}

impl DialectsConfig {
    /// Recipe steps for a dialect.
    pub fn recipe(&self, dialect: Dialect) -> &[ProbeStep] {
        match dialect {
            Dialect::Primary => &self.primary,
            Dialect::Secondary => &self.secondary,
            Dialect::Tertiary => &self.tertiary,
        }
    }
}

impl Default for DialectsConfig {
    fn default() -> Self {
        Self {
            primary: vec![
                ProbeStep {
                    name: "suggestions".to_string(),
                    path: "/opensearch/suggestions?query=the".to_string(),
                    canary: None,
                    validator: Validator::NonEmpty { pointer: "/1".to_string() },
                    weight: 1.0,
                    follow: None,
                },
                ProbeStep {
                    name: "streams".to_string(),
                    path: "/streams/{canary}".to_string(),
                    canary: Some(0),
                    validator: Validator::JsonField { pointer: "/audioStreams".to_string() },
                    weight: 1.0,
                    follow: Some(FollowUp {
                        name: "audio".to_string(),
                        list_pointer: "/audioStreams".to_string(),
                        mime_field: "mimeType".to_string(),
                        ..FollowUp::default()
                    }),
                },
                // The second canary is fetched straight from the media host
                // named by the first listed stream.
                ProbeStep {
                    name: "streams".to_string(),
                    path: "/streams/{canary}".to_string(),
                    canary: Some(1),
                    validator: Validator::JsonField { pointer: "/audioStreams".to_string() },
                    weight: 1.0,
                    follow: Some(FollowUp {
                        name: "deproxied".to_string(),
                        list_pointer: "/audioStreams".to_string(),
                        mime_field: "mimeType".to_string(),
                        pick: MediaPick::First,
                        rewrite: UrlRewrite::Deproxied,
                        ..FollowUp::default()
                    }),
                },
            ],
            secondary: vec![
                ProbeStep {
                    name: "suggestions".to_string(),
                    path: "/api/v1/search/suggestions?q=the".to_string(),
                    canary: None,
                    validator: Validator::NonEmpty { pointer: "/suggestions".to_string() },
                    weight: 1.0,
                    follow: None,
                },
                ProbeStep {
                    name: "videos".to_string(),
                    path: "/api/v1/videos/{canary}".to_string(),
                    canary: Some(0),
                    validator: Validator::JsonField { pointer: "/adaptiveFormats".to_string() },
                    weight: 1.0,
                    follow: Some(FollowUp {
                        name: "audio".to_string(),
                        list_pointer: "/adaptiveFormats".to_string(),
                        mime_field: "type".to_string(),
                        ..FollowUp::default()
                    }),
                },
                ProbeStep {
                    name: "videos".to_string(),
                    path: "/api/v1/videos/{canary}".to_string(),
                    canary: Some(1),
                    validator: Validator::JsonField { pointer: "/adaptiveFormats".to_string() },
                    weight: 1.0,
                    follow: Some(FollowUp {
                        name: "direct".to_string(),
                        list_pointer: "/adaptiveFormats".to_string(),
                        mime_field: "type".to_string(),
                        rewrite: UrlRewrite::Direct,
                        ..FollowUp::default()
                    }),
                },
            ],
            tertiary: vec![ProbeStep {
                name: "artist".to_string(),
                path: "/channel/UC-9-kyTW8ZkZNDHQJ6FgpwQ".to_string(),
                canary: None,
                validator: Validator::JsonField { pointer: "/playlistId".to_string() },
                weight: 1.0,
                follow: None,
            }],
        }
    }
}

/// One declarative check in a dialect recipe.
///
/// A `{canary}` placeholder in `path` expands the step once per canary stream,
/// or only for the canary at index `canary` when that is set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeStep {
    /// Check name used in logs and metrics.
    pub name: String,

    /// Request path appended to the mirror base URL.
    pub path: String,

    /// Index into `probe.canary_streams` this step is limited to.
    #[serde(default)]
    pub canary: Option<usize>,

    /// Payload validator.
    pub validator: Validator,

    /// Multiplier applied to the latency score.
    #[serde(default = "default_weight")]
    pub weight: f64,

    /// Optional second request for media referenced by the manifest.
    #[serde(default)]
    pub follow: Option<FollowUp>,
}

fn default_weight() -> f64 {
    1.0
}

/// Response validators.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    /// JSON body has a non-null value at `pointer`.
    JsonField { pointer: String },
    /// JSON body has a non-empty array, string, or object at `pointer`.
    NonEmpty { pointer: String },
    /// `content-type` header starts with `prefix`.
    ContentType { prefix: String },
}

/// Media fetch that follows a validated manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FollowUp {
    /// Check name used in logs and metrics.
    pub name: String,

    /// Pointer to the media list inside the manifest.
    pub list_pointer: String,

    /// Field holding each entry's mime type.
    pub mime_field: String,

    /// Field holding each entry's URL.
    pub url_field: String,

    /// Field used to pick the lowest-bitrate entry.
    pub bitrate_field: String,

    /// Which media entry is fetched.
    pub pick: MediaPick,

    /// Required mime/content-type prefix.
    pub media_prefix: String,

    /// How the media URL is pointed back at a host.
    pub rewrite: UrlRewrite,

    /// Multiplier applied to the latency score.
    pub weight: f64,
}

impl Default for FollowUp {
    fn default() -> Self {
        Self {
            name: "media".to_string(),
            list_pointer: String::new(),
            mime_field: "mimeType".to_string(),
            url_field: "url".to_string(),
            bitrate_field: "bitrate".to_string(),
            pick: MediaPick::LowestBitrate,
            media_prefix: "audio".to_string(),
            rewrite: UrlRewrite::Proxied,
            weight: 1.0,
        }
    }
}

/// Media entry selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaPick {
    /// Lowest-bitrate entry whose mime type matches `media_prefix`.
    LowestBitrate,
    /// First listed entry, whatever its mime type.
    First,
}

/// Media URL rewriting strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlRewrite {
    /// Replace the URL origin with the mirror's own base.
    Proxied,
    /// Replace the URL host with its `host` query parameter.
    Deproxied,
    /// Fetch the URL as given.
    Direct,
}

/// Cross-dialect consistency probe settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsistencyConfig {
    /// Canary used for the comparison; first configured canary when unset.
    pub canary: Option<String>,

    /// Manifest path on the primary-dialect mirror.
    pub primary_path: String,

    /// Field compared on the primary side.
    pub primary_pointer: String,

    /// Manifest path on the secondary-dialect mirror.
    pub secondary_path: String,

    /// Field compared on the secondary side.
    pub secondary_pointer: String,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            canary: None,
            primary_path: "/streams/{canary}".to_string(),
            primary_pointer: "/title".to_string(),
            secondary_path: "/api/v1/videos/{canary}".to_string(),
            secondary_pointer: "/title".to_string(),
        }
    }
}

/// Degraded-status policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Status published when every category is confirmed.
    pub status_baseline: i32,

    /// Maximum substitutes for the primary category (all when unset).
    pub primary_limit: Option<usize>,

    /// Maximum substitutes for the secondary category (all when unset).
    pub secondary_limit: Option<usize>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            status_baseline: 1,
            primary_limit: None,
            secondary_limit: Some(1),
        }
    }
}

/// Git publish settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Run git add/commit/push after writing outputs.
    pub enabled: bool,

    /// Push after committing.
    pub push: bool,

    /// Commit author name.
    pub author_name: String,

    /// Commit author email.
    pub author_email: String,

    /// Commit message used when the ordering did not change.
    pub default_message: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            push: true,
            author_name: "github-actions".to_string(),
            author_email: "action@github.com".to_string(),
            default_message: "refresh instance set".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Write a Prometheus text snapshot here when the run ends.
    pub metrics_file: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_file: None,
        }
    }
}
