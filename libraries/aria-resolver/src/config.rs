//! Provider and resolver configuration.
//!
//! The provider list ships with bundled defaults and can be hot-replaced by
//! a remote JSON document. Remote documents are validated as a whole and
//! never partially applied.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ResolveError, Result};

/// How a provider expects request parameters laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlFormat {
    /// `base/type?source=..&songId=..&quality=..`
    #[default]
    Query,
    /// `base/type/source/id/quality`
    Path,
}

/// One remote provider endpoint.
///
/// Immutable once loaded; `active` flags whether it participates in
/// resolution at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Stable identifier, used for logging only
    pub id: u32,
    /// Base URL, no trailing slash required
    pub url: String,
    /// Request key sent as the `X-Request-Key` header
    #[serde(default)]
    pub key: String,
    /// Display name
    pub name: String,
    /// Whether the provider participates in resolution
    #[serde(default = "default_active")]
    pub active: bool,
    /// Request layout this provider expects
    #[serde(rename = "urlFormat", default)]
    pub url_format: UrlFormat,
    /// Script digest sent with liveness probes; providers without one are
    /// never probed
    #[serde(rename = "scriptMd5", default)]
    pub script_md5: String,
}

fn default_active() -> bool {
    true
}

impl ProviderConfig {
    /// Base URL with trailing slashes stripped.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Whether this provider can take part in resolution at all.
    pub fn is_usable(&self) -> bool {
        self.active && !self.url.trim().is_empty()
    }
}

/// A provider together with its measured probe latency.
///
/// `response_time` is `None` when the ranking cycle degraded to the
/// unranked full list.
#[derive(Debug, Clone)]
pub struct RankedProvider {
    /// The underlying provider
    pub config: ProviderConfig,
    /// Probe round-trip time, if this entry came from a successful probe
    pub response_time: Option<Duration>,
}

/// Resolver-wide settings.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Providers to rank and race
    pub providers: Vec<ProviderConfig>,
    /// Generic aggregator base URLs tried when every provider fails
    pub backup_apis: Vec<String>,
    /// Optional remote configuration document URL
    pub remote_config_url: Option<String>,
    /// Per-request deadline
    pub request_timeout: Duration,
    /// Liveness probe deadline
    pub probe_timeout: Duration,
    /// How often the ranking cycle re-runs
    pub rank_interval: Duration,
    /// Remote config fetch attempts
    pub remote_retry_attempts: u32,
    /// Delay between remote config fetch attempts
    pub remote_retry_delay: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            providers: bundled_providers(),
            backup_apis: bundled_backup_apis(),
            remote_config_url: None,
            request_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(5),
            rank_interval: Duration::from_secs(5 * 60),
            remote_retry_attempts: 3,
            remote_retry_delay: Duration::from_secs(2),
        }
    }
}

/// Bundled provider list used until a remote document replaces it.
pub fn bundled_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            id: 1,
            url: "http://103.217.184.26:9000".into(),
            key: String::new(),
            name: "ikun community".into(),
            active: true,
            url_format: UrlFormat::Query,
            script_md5: "d7ada446a9e88d178efd7e02dc5f9879".into(),
        },
        ProviderConfig {
            id: 2,
            url: "https://88.lxmusic.xn--fiqs8s".into(),
            key: "lxmusic".into(),
            name: "lx backup".into(),
            active: true,
            url_format: UrlFormat::Path,
            script_md5: "83b9ef5707ef3d8aadddc07749529594".into(),
        },
        ProviderConfig {
            id: 3,
            url: "https://m-api.ceseet.me".into(),
            key: String::new(),
            name: "fish_music".into(),
            active: true,
            url_format: UrlFormat::Path,
            script_md5: "5fe365644241ca1b6a0f7ae4e333cf52".into(),
        },
        ProviderConfig {
            id: 4,
            url: "https://api.v2.sukimon.me:19742".into(),
            key: "LXMusic_dmsowplaeq".into(),
            name: "music service api".into(),
            active: true,
            url_format: UrlFormat::Path,
            script_md5: "55cecf4289b2852322a81d7ed7fe4cd9".into(),
        },
    ]
}

/// Bundled aggregator fallback endpoints.
pub fn bundled_backup_apis() -> Vec<String> {
    vec![
        "https://music-api.gdstudio.xyz/api.php".into(),
        "https://music-dl.sayqz.com/api/".into(),
    ]
}

// =============================================================================
// Remote configuration
// =============================================================================

/// Remote configuration document.
///
/// `{ "apiSources": [...], "backupApis": [...], "version": "..." }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteConfigDoc {
    /// Replacement provider list
    #[serde(rename = "apiSources", default)]
    pub api_sources: Vec<ProviderConfig>,
    /// Replacement aggregator list
    #[serde(rename = "backupApis", default)]
    pub backup_apis: Vec<String>,
    /// Document version, echoed back in the update alert
    #[serde(default)]
    pub version: Option<String>,
}

impl RemoteConfigDoc {
    /// Validate the whole document.
    ///
    /// A document failing any check is rejected wholesale; nothing from it
    /// gets applied.
    pub fn validate(&self) -> Result<()> {
        for (index, source) in self.api_sources.iter().enumerate() {
            if source.url.trim().is_empty() || source.name.trim().is_empty() {
                return Err(ResolveError::Config(format!(
                    "apiSources[{index}] is missing a mandatory field (id, url, name)"
                )));
            }
        }
        for (index, api) in self.backup_apis.iter().enumerate() {
            if api.trim().is_empty() {
                return Err(ResolveError::Config(format!(
                    "backupApis[{index}] must be a non-empty URL"
                )));
            }
        }
        Ok(())
    }
}

/// Fetch and validate a remote configuration document, retrying on failure.
///
/// Returns the validated document; the caller decides when to apply it.
pub async fn fetch_remote_config(
    http: &Client,
    url: &str,
    attempts: u32,
    retry_delay: Duration,
) -> Result<RemoteConfigDoc> {
    let mut last_error: Option<ResolveError> = None;

    for attempt in 1..=attempts.max(1) {
        debug!(url = %url, attempt, "Fetching remote config");

        match try_fetch_remote_config(http, url).await {
            Ok(doc) => {
                info!(
                    url = %url,
                    sources = doc.api_sources.len(),
                    backups = doc.backup_apis.len(),
                    version = doc.version.as_deref().unwrap_or("unversioned"),
                    "Remote config fetched"
                );
                return Ok(doc);
            }
            Err(e) => {
                warn!(url = %url, attempt, error = %e, "Remote config fetch failed");
                last_error = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ResolveError::Config("no fetch attempts made".into())))
}

async fn try_fetch_remote_config(http: &Client, url: &str) -> Result<RemoteConfigDoc> {
    let response = http
        .get(url)
        .header("Cache-Control", "no-cache")
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(ResolveError::from_transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ResolveError::Config(format!(
            "config server returned HTTP {status}"
        )));
    }

    let doc: RemoteConfigDoc = response
        .json()
        .await
        .map_err(|e| ResolveError::Config(format!("document is not valid JSON: {e}")))?;

    doc.validate()?;
    Ok(doc)
}
