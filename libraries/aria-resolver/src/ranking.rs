//! Provider ranking.
//!
//! Every cycle probes all probe-able providers concurrently, measures
//! round-trip time and picks the two fastest as the prioritized set. A
//! provider that fails a probe is skipped this cycle, never blacklisted.

use std::time::Duration;

use futures_util::future::join_all;
use reqwest::Client;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{ProviderConfig, RankedProvider};
use crate::request::build_probe_url;

/// Update notice a provider attached to its probe response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotice {
    /// Provider display name
    pub provider: String,
    /// Human-readable notice text
    pub message: String,
    /// Optional link, empty when absent
    pub update_url: String,
}

/// Result of one ranking cycle.
#[derive(Debug, Clone, Default)]
pub struct RankingOutcome {
    /// Providers to use, fastest first; unranked when degraded
    pub prioritized: Vec<RankedProvider>,
    /// Update notices collected along the way
    pub notices: Vec<UpdateNotice>,
}

struct ProbeResult {
    config: ProviderConfig,
    elapsed: Duration,
    notice: Option<UpdateNotice>,
}

/// Probe all usable providers and compute the prioritized set.
///
/// Probes run concurrently, each with its own deadline, so one hung
/// provider cannot stall the cycle. The set is computed only after every
/// probe has settled. Providers announcing an update are excluded from the
/// prioritized set; if fewer than two providers survive, the cycle degrades
/// to the full active list, unranked.
pub async fn rank_providers(
    http: &Client,
    providers: &[ProviderConfig],
    probe_timeout: Duration,
) -> RankingOutcome {
    let candidates: Vec<&ProviderConfig> = providers
        .iter()
        .filter(|p| p.is_usable() && !p.script_md5.is_empty())
        .collect();

    if candidates.is_empty() {
        debug!("No probe-able providers configured");
        return degrade(providers, Vec::new());
    }

    let probes = candidates
        .iter()
        .map(|provider| probe_provider(http, provider, probe_timeout));
    let mut successes: Vec<ProbeResult> = join_all(probes).await.into_iter().flatten().collect();

    successes.sort_by_key(|probe| probe.elapsed);

    let notices: Vec<UpdateNotice> = successes
        .iter()
        .filter_map(|probe| probe.notice.clone())
        .collect();

    // Providers carrying an update notice are stale; keep them out of the
    // prioritized set.
    let ranked: Vec<RankedProvider> = successes
        .into_iter()
        .filter(|probe| probe.notice.is_none())
        .map(|probe| RankedProvider {
            config: probe.config,
            response_time: Some(probe.elapsed),
        })
        .collect();

    if ranked.len() < 2 {
        return degrade(providers, notices);
    }

    debug!(
        fastest = %ranked[0].config.name,
        second = %ranked[1].config.name,
        "Prioritized providers updated"
    );

    RankingOutcome {
        prioritized: ranked.into_iter().take(2).collect(),
        notices,
    }
}

/// Fewer than two healthy providers: fall back to all active providers,
/// unranked, so resolution still has material to work with.
fn degrade(providers: &[ProviderConfig], notices: Vec<UpdateNotice>) -> RankingOutcome {
    let prioritized = providers
        .iter()
        .filter(|p| p.is_usable())
        .cloned()
        .map(|config| RankedProvider {
            config,
            response_time: None,
        })
        .collect();

    RankingOutcome {
        prioritized,
        notices,
    }
}

async fn probe_provider(
    http: &Client,
    provider: &ProviderConfig,
    timeout: Duration,
) -> Option<ProbeResult> {
    let url = build_probe_url(provider);
    let started = Instant::now();

    let response = match http.get(&url).timeout(timeout).send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(provider = %provider.name, error = %e, "Probe failed");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(provider = %provider.name, status = %response.status(), "Probe rejected");
        return None;
    }

    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            warn!(provider = %provider.name, error = %e, "Probe body unreadable");
            return None;
        }
    };

    let code = body.get("code").and_then(Value::as_i64);
    if !matches!(code, Some(0) | Some(200)) {
        warn!(provider = %provider.name, ?code, "Probe returned failure code");
        return None;
    }

    let elapsed = started.elapsed();
    debug!(provider = %provider.name, elapsed_ms = elapsed.as_millis() as u64, "Probe ok");

    let notice = body
        .get("data")
        .and_then(|data| data.get("updateMsg"))
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty())
        .map(|msg| UpdateNotice {
            provider: provider.name.clone(),
            message: msg.to_string(),
            update_url: body
                .get("data")
                .and_then(|data| data.get("updateUrl"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });

    Some(ProbeResult {
        config: provider.clone(),
        elapsed,
        notice,
    })
}
