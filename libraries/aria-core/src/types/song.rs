//! Song identity
//!
//! Hosts identify a song with whichever field the originating platform
//! uses: `hash` (Kugou), `songmid` (QQ), or a plain `id`. Exactly one is
//! needed; precedence when several are present is `hash`, `songmid`, `id`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, Result};

/// Minimal song identity carried in a resolution request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDescriptor {
    /// Generic identifier
    #[serde(default, deserialize_with = "de_id_field")]
    pub id: Option<String>,
    /// QQ Music song mid
    #[serde(default, deserialize_with = "de_id_field")]
    pub songmid: Option<String>,
    /// Kugou file hash
    #[serde(default, deserialize_with = "de_id_field")]
    pub hash: Option<String>,
    /// Display name, used only for logging
    #[serde(default)]
    pub name: Option<String>,
}

impl SongDescriptor {
    /// Build a descriptor from a plain id.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Resolve the identity field to use, `hash` > `songmid` > `id`.
    ///
    /// Blank (empty or whitespace-only) fields are treated as absent, so
    /// an unusable descriptor is rejected before any network round trip.
    pub fn resolved_id(&self) -> Result<String> {
        let candidate = [&self.hash, &self.songmid, &self.id]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty());

        match candidate {
            Some(value) => Ok(value.clone()),
            None => Err(CoreError::invalid_song_id(
                "no usable id, songmid or hash field",
            )),
        }
    }

    /// Name for log lines; hosts do not always send one.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown track")
    }
}

/// Accept identity fields as either JSON strings or numbers.
///
/// Some hosts send numeric track ids; they are coerced to strings before
/// any interpolation happens.
fn de_id_field<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdField {
        Text(String),
        Number(i64),
    }

    let value = Option::<IdField>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        IdField::Text(s) => s,
        IdField::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_hash_then_songmid_then_id() {
        let song = SongDescriptor {
            id: Some("plain".into()),
            songmid: Some("mid".into()),
            hash: Some("abc123".into()),
            name: None,
        };
        assert_eq!(song.resolved_id().unwrap(), "abc123");

        let song = SongDescriptor {
            id: Some("plain".into()),
            songmid: Some("mid".into()),
            hash: None,
            name: None,
        };
        assert_eq!(song.resolved_id().unwrap(), "mid");
    }

    #[test]
    fn blank_fields_are_skipped() {
        let song = SongDescriptor {
            id: Some("plain".into()),
            songmid: Some("   ".into()),
            hash: Some(String::new()),
            name: None,
        };
        assert_eq!(song.resolved_id().unwrap(), "plain");
    }

    #[test]
    fn empty_descriptor_rejected() {
        let song = SongDescriptor::default();
        assert!(matches!(
            song.resolved_id(),
            Err(CoreError::InvalidSongId(_))
        ));
    }

    #[test]
    fn numeric_ids_coerced_to_strings() {
        let song: SongDescriptor =
            serde_json::from_str(r#"{"id": 1005471336, "name": "Song"}"#).unwrap();
        assert_eq!(song.resolved_id().unwrap(), "1005471336");
    }

    #[test]
    fn display_name_defaults() {
        assert_eq!(SongDescriptor::default().display_name(), "unknown track");
        assert_eq!(SongDescriptor::with_id("1", "Title").display_name(), "Title");
    }
}
