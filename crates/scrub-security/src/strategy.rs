use std::fmt;
use std::str::FromStr;

use scrub_core::Error;
use serde::{Deserialize, Serialize};

/// How detected entities are rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionStrategy {
    /// Deterministic keyed hash tokens
    Hash,
    /// Each entity replaced by the literal `[REDACTED]`
    Replace,
    /// Entity characters overwritten with `*`
    Mask,
    /// Reversible AES-256-GCM ciphertext
    Encrypt,
}

impl RedactionStrategy {
    pub const ALL: [RedactionStrategy; 4] = [Self::Hash, Self::Replace, Self::Mask, Self::Encrypt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::Replace => "replace",
            Self::Mask => "mask",
            Self::Encrypt => "encrypt",
        }
    }
}

impl fmt::Display for RedactionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedactionStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hash" => Ok(Self::Hash),
            "replace" => Ok(Self::Replace),
            "mask" => Ok(Self::Mask),
            "encrypt" => Ok(Self::Encrypt),
            other => Err(Error::Redactor(format!(
                "Unknown redaction strategy: {}",
                other
            ))),
        }
    }
}
