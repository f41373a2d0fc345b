//! Backend identifiers for the closed set of supported providers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MimirError;

/// One of the supported generation backends.
///
/// The set is closed: the fallback engine and factory are polymorphic over
/// exactly these three implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
}

impl Backend {
    /// All backends, in registry declaration order.
    pub const ALL: [Backend; 3] = [Backend::Gemini, Backend::OpenAi, Backend::Anthropic];

    /// Canonical lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Gemini => "gemini",
            Backend::OpenAi => "openai",
            Backend::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding this backend's API key.
    pub fn env_key(self) -> &'static str {
        match self {
            Backend::Gemini => "GEMINI_API_KEY",
            Backend::OpenAi => "OPENAI_API_KEY",
            Backend::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = MimirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(Backend::Gemini),
            "openai" => Ok(Backend::OpenAi),
            "anthropic" => Ok(Backend::Anthropic),
            other => Err(MimirError::UnsupportedBackend(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_roundtrip() {
        for backend in Backend::ALL {
            assert_eq!(backend.as_str().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = "cohere".parse::<Backend>().unwrap_err();
        assert!(matches!(err, MimirError::UnsupportedBackend(name) if name == "cohere"));
    }
}
