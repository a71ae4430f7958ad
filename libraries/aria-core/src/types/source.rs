//! Logical music sources
//!
//! A source is the platform a song identity belongs to (its short code is
//! what the host sends in requests); the aggregator fallback APIs use a
//! longer per-platform name.

use serde::{Deserialize, Serialize};

use crate::types::Quality;

/// A logical music source the resolver can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicSource {
    /// Kuwo (`kw`)
    Kw,
    /// Kugou (`kg`)
    Kg,
    /// Netease Cloud Music (`wy`)
    Wy,
    /// QQ Music (`tx`)
    Tx,
    /// Migu (`mg`)
    Mg,
}

impl MusicSource {
    /// All sources, in advertised order.
    pub const ALL: [MusicSource; 5] = [
        MusicSource::Kw,
        MusicSource::Kg,
        MusicSource::Wy,
        MusicSource::Tx,
        MusicSource::Mg,
    ];

    /// Parse the host-facing short code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "kw" => Some(Self::Kw),
            "kg" => Some(Self::Kg),
            "wy" => Some(Self::Wy),
            "tx" => Some(Self::Tx),
            "mg" => Some(Self::Mg),
            _ => None,
        }
    }

    /// The short code used on the wire towards providers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Kw => "kw",
            Self::Kg => "kg",
            Self::Wy => "wy",
            Self::Tx => "tx",
            Self::Mg => "mg",
        }
    }

    /// The platform name the aggregator fallback APIs expect.
    pub fn aggregator_name(&self) -> &'static str {
        match self {
            Self::Kw => "kuwo",
            Self::Kg => "kugou",
            Self::Wy => "netease",
            Self::Tx => "tencent",
            Self::Mg => "migu",
        }
    }

    /// Human-readable name, used in the advertised catalogue.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Kw => "Kuwo Music",
            Self::Kg => "Kugou Music",
            Self::Wy => "Netease Cloud Music",
            Self::Tx => "QQ Music",
            Self::Mg => "Migu Music",
        }
    }

    /// Quality tokens this source is advertised to support.
    pub fn supported_qualities(&self) -> &'static [Quality] {
        use Quality::*;
        match self {
            Self::Kw | Self::Mg => &[Q128k, Q320k, Flac, Flac24bit, Hires],
            Self::Kg | Self::Wy => &[Q128k, Q320k, Flac, Flac24bit, Hires, Atmos, Master],
            Self::Tx => &[
                Q128k, Q320k, Flac, Flac24bit, Hires, Atmos, AtmosPlus, Master,
            ],
        }
    }
}

impl std::fmt::Display for MusicSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        for source in MusicSource::ALL {
            assert_eq!(MusicSource::from_code(source.code()), Some(source));
        }
    }

    #[test]
    fn unknown_code_rejected() {
        assert_eq!(MusicSource::from_code("spotify"), None);
        assert_eq!(MusicSource::from_code(""), None);
        // Codes are case sensitive
        assert_eq!(MusicSource::from_code("KW"), None);
    }

    #[test]
    fn aggregator_names() {
        assert_eq!(MusicSource::Wy.aggregator_name(), "netease");
        assert_eq!(MusicSource::Tx.aggregator_name(), "tencent");
    }

    #[test]
    fn serde_uses_short_codes() {
        let json = serde_json::to_string(&MusicSource::Kg).unwrap();
        assert_eq!(json, "\"kg\"");
        let back: MusicSource = serde_json::from_str("\"mg\"").unwrap();
        assert_eq!(back, MusicSource::Mg);
    }
}
