//! Provider request construction.
//!
//! Two layouts exist, selected per provider, not per request:
//! `path` (`base/type/source/id/quality`) and `query`
//! (`base/type?source=..&songId=..&quality=..`). Construction is pure and
//! deterministic; invalid ids are rejected here, before any network call.

use aria_core::{CoreError, MusicSource, Quality, ResourceKind};
use url::{form_urlencoded, Url};

use crate::config::{ProviderConfig, UrlFormat};
use crate::error::Result;

/// Build the request URL for one provider.
pub fn build_provider_url(
    provider: &ProviderConfig,
    source: MusicSource,
    song_id: &str,
    quality: &Quality,
    kind: ResourceKind,
) -> Result<String> {
    if song_id.trim().is_empty() {
        return Err(CoreError::invalid_song_id("id must not be blank").into());
    }

    let base = provider.base_url();
    let url = match provider.url_format {
        // Segments are percent-encoded, so ids carrying reserved
        // characters cannot break the path.
        UrlFormat::Path => {
            let mut url = Url::parse(base).map_err(|e| {
                CoreError::invalid_input(format!("provider url `{base}` is not absolute: {e}"))
            })?;
            url.path_segments_mut()
                .map_err(|()| {
                    CoreError::invalid_input(format!("provider url `{base}` cannot carry a path"))
                })?
                .pop_if_empty()
                .extend([
                    kind.as_str(),
                    source.code(),
                    song_id,
                    quality.as_token(),
                ]);
            url.into()
        }
        UrlFormat::Query => {
            let mut query = form_urlencoded::Serializer::new(String::new());
            query.append_pair("source", source.code());
            query.append_pair("songId", song_id);
            // Quality only matters when resolving a playable URL.
            if kind == ResourceKind::Url {
                query.append_pair("quality", quality.as_token());
            }
            format!("{base}/{kind}?{query}", kind = kind.as_str(), query = query.finish())
        }
    };

    Ok(url)
}

/// Build the liveness probe URL for a provider.
pub fn build_probe_url(provider: &ProviderConfig) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("key", &provider.key);
    query.append_pair("checkUpdate", &provider.script_md5);
    format!("{}/script?{}", provider.base_url(), query.finish())
}

/// Build the request URL for a generic aggregator endpoint.
///
/// Aggregators share a single layout:
/// `base?types=..&source=..&id=..[&br=..]`, where `source` uses the long
/// platform name and `br` the aggregator bitrate vocabulary.
pub fn build_aggregator_url(
    base: &str,
    source: MusicSource,
    song_id: &str,
    quality: &Quality,
    kind: ResourceKind,
) -> Result<String> {
    if song_id.trim().is_empty() {
        return Err(CoreError::invalid_song_id("id must not be blank").into());
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("types", kind.as_str());
    query.append_pair("source", source.aggregator_name());
    query.append_pair("id", song_id);
    if kind == ResourceKind::Url {
        query.append_pair("br", quality.aggregator_bitrate());
    }

    Ok(format!(
        "{}?{}",
        base.trim_end_matches('/'),
        query.finish()
    ))
}
