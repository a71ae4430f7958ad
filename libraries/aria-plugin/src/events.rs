//! Host event payloads.
//!
//! Wire shapes follow the host protocol verbatim (`musicInfo`, `type`,
//! `openDevTools`, `updateUrl`, ...), hence the serde renames.

use std::collections::BTreeMap;

use aria_core::{CatalogEntry, Quality, SongDescriptor};
use aria_resolver::UpdateNotice;
use serde::{Deserialize, Serialize};

/// Inbound `request` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEvent {
    /// Source short code (`kw`, `wy`, ...)
    pub source: String,
    /// Host action name (`musicUrl`, `lyric`, `pic`)
    pub action: String,
    /// Request details
    pub info: RequestInfo,
}

/// The `info` block of a request event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Song identity
    #[serde(rename = "musicInfo")]
    pub music_info: SongDescriptor,
    /// Requested quality token; only meaningful for `musicUrl`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
}

/// Payload of the `inited` event sent once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitedPayload {
    /// Whether the host should open dev tools
    #[serde(rename = "openDevTools")]
    pub open_dev_tools: bool,
    /// Advertised source catalogue
    pub sources: BTreeMap<String, CatalogEntry>,
}

/// Payload of the `updateAlert` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAlert {
    /// Human-readable log line
    pub log: String,
    /// Optional link; empty when absent
    #[serde(rename = "updateUrl")]
    pub update_url: String,
}

/// An event the plugin sends to the host.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutboundEvent {
    /// Startup announcement with the source catalogue
    Inited(InitedPayload),
    /// Configuration or version-drift notice
    UpdateAlert(UpdateAlert),
}

impl OutboundEvent {
    /// The host event name this payload travels under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inited(_) => "inited",
            Self::UpdateAlert(_) => "updateAlert",
        }
    }
}

/// Fold provider update notices into a single alert.
///
/// The log lines are joined; the link comes from the first notice that has
/// one. Returns `None` when there is nothing to report.
pub fn combine_notices(notices: &[UpdateNotice]) -> Option<UpdateAlert> {
    if notices.is_empty() {
        return None;
    }

    let log = notices
        .iter()
        .map(|notice| format!("{}: {}", notice.provider, notice.message))
        .collect::<Vec<_>>()
        .join("\n");
    let update_url = notices
        .iter()
        .find(|notice| !notice.update_url.is_empty())
        .map(|notice| notice.update_url.clone())
        .unwrap_or_default();

    Some(UpdateAlert { log, update_url })
}
