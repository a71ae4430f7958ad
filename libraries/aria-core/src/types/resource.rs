//! Resource kinds and host action mapping

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// What kind of resource a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Playable URL
    Url,
    /// Cover image URL
    Pic,
    /// Lyric text
    Lyric,
}

impl ResourceKind {
    /// The path/query segment providers expect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Pic => "pic",
            Self::Lyric => "lyric",
        }
    }

    /// Map a host action name to a resource kind.
    ///
    /// Unknown actions are rejected here, before any I/O happens.
    pub fn from_action(action: &str) -> Result<Self> {
        match action {
            "musicUrl" => Ok(Self::Url),
            "pic" => Ok(Self::Pic),
            "lyric" => Ok(Self::Lyric),
            other => Err(CoreError::UnknownAction(other.to_string())),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
