//! The resource resolver.
//!
//! Given a source, a song descriptor, a quality token and a resource kind,
//! produce the resolved value by racing the two fastest providers, falling
//! back sequentially through the rest, then fanning out to the generic
//! aggregator endpoints. Per-provider failures are logged and swallowed;
//! only total exhaustion surfaces.

use std::sync::Arc;
use std::time::Duration;

use aria_core::{MusicSource, Quality, ResourceKind, SongDescriptor};
use futures_util::future::{select, select_all, Either};
use futures_util::pin_mut;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{
    fetch_remote_config, ProviderConfig, RankedProvider, RemoteConfigDoc, ResolverConfig,
};
use crate::error::{ResolveError, Result};
use crate::ranking::{rank_providers, UpdateNotice};
use crate::request::{build_aggregator_url, build_provider_url};
use crate::response::{classify, extract_aggregator_payload, preprocess_lyric};

/// Multi-source resource resolver.
///
/// Holds one shared HTTP client and the prioritized-provider snapshot.
/// The snapshot is read-mostly shared state: each resolution clones the
/// current `Arc` at the start and works off that; ranking cycles replace
/// the list wholesale, never mutate it in place.
pub struct Resolver {
    http: Client,
    settings: ResolverConfig,
    providers: RwLock<Arc<Vec<ProviderConfig>>>,
    backup_apis: RwLock<Arc<Vec<String>>>,
    prioritized: RwLock<Arc<Vec<RankedProvider>>>,
}

impl Resolver {
    /// Create a resolver from the given configuration.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("aria-resolver/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ResolveError::Network(e.to_string()))?;

        let providers = Arc::new(config.providers.clone());
        let backup_apis = Arc::new(config.backup_apis.clone());

        Ok(Self {
            http,
            settings: config,
            providers: RwLock::new(providers),
            backup_apis: RwLock::new(backup_apis),
            prioritized: RwLock::new(Arc::new(Vec::new())),
        })
    }

    /// How often the ranking cycle should re-run.
    pub fn rank_interval(&self) -> Duration {
        self.settings.rank_interval
    }

    /// The current prioritized snapshot.
    pub async fn prioritized_snapshot(&self) -> Arc<Vec<RankedProvider>> {
        self.prioritized.read().await.clone()
    }

    /// Replace the prioritized set wholesale.
    ///
    /// Exposed so embedders can seed a ranking without waiting for a probe
    /// cycle.
    pub async fn replace_prioritized(&self, prioritized: Vec<RankedProvider>) {
        *self.prioritized.write().await = Arc::new(prioritized);
    }

    /// Run one ranking cycle and swap in the result.
    ///
    /// Returns the update notices providers attached to their probes.
    pub async fn refresh_ranking(&self) -> Vec<UpdateNotice> {
        let providers = self.providers.read().await.clone();
        let outcome = rank_providers(&self.http, &providers, self.settings.probe_timeout).await;

        info!(
            prioritized = outcome.prioritized.len(),
            notices = outcome.notices.len(),
            "Ranking cycle complete"
        );

        self.replace_prioritized(outcome.prioritized).await;
        outcome.notices
    }

    /// Fetch the remote configuration document and hot-replace the
    /// provider and aggregator lists.
    ///
    /// Returns the applied document version, or `None` when no remote URL
    /// is configured. Malformed documents are rejected wholesale and leave
    /// the current lists untouched.
    pub async fn sync_remote_config(&self) -> Result<Option<String>> {
        let Some(url) = self.settings.remote_config_url.as_deref() else {
            return Ok(None);
        };

        let doc = fetch_remote_config(
            &self.http,
            url,
            self.settings.remote_retry_attempts,
            self.settings.remote_retry_delay,
        )
        .await?;

        let version = self.apply_remote_config(doc).await;
        Ok(Some(version))
    }

    async fn apply_remote_config(&self, doc: RemoteConfigDoc) -> String {
        if !doc.api_sources.is_empty() {
            info!(sources = doc.api_sources.len(), "Applying remote provider list");
            *self.providers.write().await = Arc::new(doc.api_sources);
            // Stale ranking: force a lazy re-rank on the next resolution.
            self.replace_prioritized(Vec::new()).await;
        }
        if !doc.backup_apis.is_empty() {
            info!(backups = doc.backup_apis.len(), "Applying remote aggregator list");
            *self.backup_apis.write().await = Arc::new(doc.backup_apis);
        }
        doc.version.unwrap_or_else(|| "1.0.0".to_string())
    }

    /// Resolve a resource.
    ///
    /// Step 1 races the two fastest prioritized providers; step 2 walks the
    /// remaining prioritized providers in order; step 3 fans out to the
    /// aggregator endpoints, first success wins.
    pub async fn resolve(
        &self,
        source: MusicSource,
        song: &SongDescriptor,
        quality: &Quality,
        kind: ResourceKind,
    ) -> Result<String> {
        let song_id = song.resolved_id()?;
        let started = Instant::now();

        debug!(
            source = %source,
            song = %song.display_name(),
            id = %song_id,
            quality = %quality,
            kind = %kind,
            "Resolving resource"
        );

        let mut snapshot = self.prioritized_snapshot().await;
        if snapshot.is_empty() {
            debug!("Prioritized set empty, running a ranking cycle");
            self.refresh_ranking().await;
            snapshot = self.prioritized_snapshot().await;
        }

        let mut failures: Vec<(String, String)> = Vec::new();

        // Step 1: race the top two.
        let sequential_from = if snapshot.len() >= 2 {
            match self
                .race_pair(&snapshot[0], &snapshot[1], source, &song_id, quality, kind)
                .await
            {
                Ok(value) => {
                    info!(
                        source = %source,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Resolved by racing prioritized providers"
                    );
                    return Ok(value);
                }
                Err(pair_failures) => {
                    failures.extend(pair_failures);
                    2
                }
            }
        } else {
            0
        };

        // Step 2: remaining prioritized providers, strictly in order.
        for ranked in snapshot.iter().skip(sequential_from) {
            match self
                .attempt_provider(
                    &ranked.config,
                    source,
                    &song_id,
                    quality,
                    kind,
                    CancellationToken::new(),
                )
                .await
            {
                Ok(value) => {
                    info!(
                        source = %source,
                        provider = %ranked.config.name,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Resolved by prioritized provider"
                    );
                    return Ok(value);
                }
                Err(e) => {
                    warn!(provider = %ranked.config.name, error = %e, "Provider failed, moving on");
                    failures.push((ranked.config.name.clone(), e.to_string()));
                }
            }
        }

        // Step 3: aggregator fan-out, first success wins.
        match self
            .resolve_via_aggregators(source, &song_id, quality, kind, &mut failures)
            .await
        {
            Some(value) => {
                info!(
                    source = %source,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Resolved by aggregator fallback"
                );
                Ok(value)
            }
            None => Err(ResolveError::exhausted(&failures)),
        }
    }

    /// Race two providers; the first well-formed success cancels the other.
    ///
    /// Cancellation is race-free: cancelling a token whose request already
    /// settled is a no-op.
    async fn race_pair(
        &self,
        first: &RankedProvider,
        second: &RankedProvider,
        source: MusicSource,
        song_id: &str,
        quality: &Quality,
        kind: ResourceKind,
    ) -> std::result::Result<String, Vec<(String, String)>> {
        let first_token = CancellationToken::new();
        let second_token = CancellationToken::new();

        let first_attempt = self.attempt_provider(
            &first.config,
            source,
            song_id,
            quality,
            kind,
            first_token.clone(),
        );
        let second_attempt = self.attempt_provider(
            &second.config,
            source,
            song_id,
            quality,
            kind,
            second_token.clone(),
        );
        pin_mut!(first_attempt, second_attempt);

        match select(first_attempt, second_attempt).await {
            Either::Left((first_result, second_rest)) => match first_result {
                Ok(value) => {
                    second_token.cancel();
                    Ok(value)
                }
                Err(first_err) => {
                    warn!(provider = %first.config.name, error = %first_err, "Race leg failed");
                    match second_rest.await {
                        Ok(value) => Ok(value),
                        Err(second_err) => Err(vec![
                            (first.config.name.clone(), first_err.to_string()),
                            (second.config.name.clone(), second_err.to_string()),
                        ]),
                    }
                }
            },
            Either::Right((second_result, first_rest)) => match second_result {
                Ok(value) => {
                    first_token.cancel();
                    Ok(value)
                }
                Err(second_err) => {
                    warn!(provider = %second.config.name, error = %second_err, "Race leg failed");
                    match first_rest.await {
                        Ok(value) => Ok(value),
                        Err(first_err) => Err(vec![
                            (first.config.name.clone(), first_err.to_string()),
                            (second.config.name.clone(), second_err.to_string()),
                        ]),
                    }
                }
            },
        }
    }

    /// One request against one provider, classified.
    async fn attempt_provider(
        &self,
        provider: &ProviderConfig,
        source: MusicSource,
        song_id: &str,
        quality: &Quality,
        kind: ResourceKind,
        cancel: CancellationToken,
    ) -> Result<String> {
        let url = build_provider_url(provider, source, song_id, quality, kind)?;
        debug!(provider = %provider.name, url = %url, "Requesting resource");

        let attempt = async {
            let response = self
                .http
                .get(&url)
                .header("X-Request-Key", provider.key.as_str())
                .send()
                .await
                .map_err(ResolveError::from_transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(classify_http_status(&provider.name, status));
            }

            let body: Value = response.json().await.map_err(|e| ResolveError::InvalidBody {
                provider: provider.name.clone(),
                detail: format!("body is not JSON: {e}"),
            })?;

            let value = classify(&provider.name, &body, kind)?;
            Ok(finish_payload(value, kind))
        };

        tokio::select! {
            () = cancel.cancelled() => Err(ResolveError::Cancelled),
            result = attempt => result,
        }
    }

    /// Query all aggregator endpoints concurrently, taking the first
    /// success; failures are recorded and `None` returned when every
    /// endpoint fails.
    async fn resolve_via_aggregators(
        &self,
        source: MusicSource,
        song_id: &str,
        quality: &Quality,
        kind: ResourceKind,
        failures: &mut Vec<(String, String)>,
    ) -> Option<String> {
        let backups = self.backup_apis.read().await.clone();
        if backups.is_empty() {
            return None;
        }

        let mut in_flight: Vec<_> = backups
            .iter()
            .map(|base| {
                Box::pin(async move {
                    let result = self
                        .attempt_aggregator(base, source, song_id, quality, kind)
                        .await;
                    (base.clone(), result)
                })
            })
            .collect();

        while !in_flight.is_empty() {
            let ((base, result), _index, rest) = select_all(in_flight).await;
            match result {
                Ok(value) => return Some(value),
                Err(e) => {
                    warn!(aggregator = %base, error = %e, "Aggregator failed");
                    failures.push((base, e.to_string()));
                    in_flight = rest;
                }
            }
        }

        None
    }

    /// One request against one aggregator endpoint.
    async fn attempt_aggregator(
        &self,
        base: &str,
        source: MusicSource,
        song_id: &str,
        quality: &Quality,
        kind: ResourceKind,
    ) -> Result<String> {
        let url = build_aggregator_url(base, source, song_id, quality, kind)?;
        debug!(aggregator = %base, url = %url, "Requesting resource");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ResolveError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_http_status(base, status));
        }

        let body: Value = response.json().await.map_err(|e| ResolveError::InvalidBody {
            provider: base.to_string(),
            detail: format!("body is not JSON: {e}"),
        })?;

        let value = extract_aggregator_payload(base, &body, kind)?;
        Ok(finish_payload(value, kind))
    }
}

/// Map an HTTP-level failure status onto the taxonomy.
fn classify_http_status(provider: &str, status: StatusCode) -> ResolveError {
    match status.as_u16() {
        403 => ResolveError::AuthFailure {
            provider: provider.to_string(),
        },
        422 => ResolveError::BadRequest {
            provider: provider.to_string(),
        },
        429 => ResolveError::RateLimited {
            provider: provider.to_string(),
        },
        code => ResolveError::ProviderFailure {
            provider: provider.to_string(),
            code: i64::from(code),
            message: format!("HTTP {status}"),
        },
    }
}

/// Kind-specific post-processing of a resolved payload.
fn finish_payload(value: String, kind: ResourceKind) -> String {
    match kind {
        ResourceKind::Lyric => preprocess_lyric(value),
        ResourceKind::Url | ResourceKind::Pic => value,
    }
}
