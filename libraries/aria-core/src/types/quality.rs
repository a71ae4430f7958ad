//! Quality tokens
//!
//! Callers name qualities with the host vocabulary (`128k`, `320k`, `flac`,
//! ...). The aggregator fallback APIs speak a numeric bitrate vocabulary
//! instead; the mapping is a fixed table and unknown tokens pass through
//! unchanged.

use serde::{Deserialize, Serialize};

/// A caller-facing quality token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Quality {
    /// 128 kbps MP3
    Q128k,
    /// 320 kbps MP3
    Q320k,
    /// Lossless FLAC
    Flac,
    /// 24-bit FLAC
    Flac24bit,
    /// Hi-Res
    Hires,
    /// Dolby Atmos
    Atmos,
    /// Dolby Atmos (enhanced)
    AtmosPlus,
    /// Master quality
    Master,
    /// Unrecognized token, passed through verbatim
    Other(String),
}

impl Quality {
    /// The token as the host spells it.
    pub fn as_token(&self) -> &str {
        match self {
            Self::Q128k => "128k",
            Self::Q320k => "320k",
            Self::Flac => "flac",
            Self::Flac24bit => "flac24bit",
            Self::Hires => "hires",
            Self::Atmos => "atmos",
            Self::AtmosPlus => "atmos_plus",
            Self::Master => "master",
            Self::Other(token) => token,
        }
    }

    /// Translate to the aggregator `br` vocabulary.
    ///
    /// Tokens outside the fixed table pass through unchanged.
    pub fn aggregator_bitrate(&self) -> &str {
        match self {
            Self::Q128k => "128",
            Self::Q320k => "320",
            Self::Flac => "740",
            Self::Flac24bit => "999",
            other => other.as_token(),
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "128k" => Self::Q128k,
            "320k" => Self::Q320k,
            "flac" => Self::Flac,
            "flac24bit" => Self::Flac24bit,
            "hires" => Self::Hires,
            "atmos" => Self::Atmos,
            "atmos_plus" => Self::AtmosPlus,
            "master" => Self::Master,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<String> for Quality {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(Self::Other(s))
    }
}

impl From<Quality> for String {
    fn from(q: Quality) -> Self {
        q.as_token().to_string()
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tokens_map_to_bitrates() {
        let q: Quality = "128k".parse().unwrap();
        assert_eq!(q.aggregator_bitrate(), "128");
        let q: Quality = "flac".parse().unwrap();
        assert_eq!(q.aggregator_bitrate(), "740");
        let q: Quality = "flac24bit".parse().unwrap();
        assert_eq!(q.aggregator_bitrate(), "999");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let q: Quality = "dsd512".parse().unwrap();
        assert_eq!(q, Quality::Other("dsd512".to_string()));
        assert_eq!(q.aggregator_bitrate(), "dsd512");
        assert_eq!(q.as_token(), "dsd512");
    }

    #[test]
    fn hires_has_no_table_entry() {
        // Present in source capability lists but absent from the fixed
        // bitrate table, so it passes through.
        let q: Quality = "hires".parse().unwrap();
        assert_eq!(q, Quality::Hires);
        assert_eq!(q.aggregator_bitrate(), "hires");
    }

    #[test]
    fn serde_round_trips_as_plain_string() {
        let q: Quality = serde_json::from_str("\"320k\"").unwrap();
        assert_eq!(q, Quality::Q320k);
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"320k\"");

        let q: Quality = serde_json::from_str("\"weird\"").unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"weird\"");
    }
}
