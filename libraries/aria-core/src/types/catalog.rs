//! Advertised source catalogue
//!
//! Sent to the host once at startup so it knows which sources, actions and
//! qualities this resolver serves. Field spellings (`qualitys`) follow the
//! host wire format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::MusicSource;

/// One source's advertised capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Human-readable source name
    pub name: String,
    /// Catalogue entry type; always `music` here
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Host action names this source answers
    pub actions: Vec<String>,
    /// Supported quality tokens (host spelling of the field)
    pub qualitys: Vec<String>,
}

/// Build the default catalogue: every known source plus the `local`
/// pseudo-source the host expects.
pub fn default_catalog() -> BTreeMap<String, CatalogEntry> {
    let mut catalog = BTreeMap::new();

    for source in MusicSource::ALL {
        catalog.insert(
            source.code().to_string(),
            CatalogEntry {
                name: source.display_name().to_string(),
                entry_type: "music".to_string(),
                actions: vec!["musicUrl".to_string()],
                qualitys: source
                    .supported_qualities()
                    .iter()
                    .map(|q| q.as_token().to_string())
                    .collect(),
            },
        );
    }

    // Local files answer every action but carry no remote qualities.
    catalog.insert(
        "local".to_string(),
        CatalogEntry {
            name: "Local Music".to_string(),
            entry_type: "music".to_string(),
            actions: vec![
                "musicUrl".to_string(),
                "lyric".to_string(),
                "pic".to_string(),
            ],
            qualitys: Vec::new(),
        },
    );

    catalog
}
