//! Static model tier registry.

use crate::config::CredentialMap;
use crate::types::Backend;

/// One (backend, model) pairing with an assigned relative cost and expected
/// quality, used for fallback ordering. Immutable and statically enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelTier {
    pub backend: Backend,
    pub model: &'static str,
    /// Relative cost (lower = cheaper). Used purely for trial ordering.
    pub cost: u8,
    /// Expected quality 1-10.
    pub quality: u8,
}

/// Model tiers spanning four cost bands across the three backends,
/// declared cheapest first.
pub const MODEL_TIERS: [ModelTier; 10] = [
    // Cheapest tier
    ModelTier {
        backend: Backend::Gemini,
        model: "gemini-1.5-flash",
        cost: 1,
        quality: 7,
    },
    ModelTier {
        backend: Backend::OpenAi,
        model: "gpt-4o-mini",
        cost: 2,
        quality: 7,
    },
    ModelTier {
        backend: Backend::Anthropic,
        model: "claude-3-haiku-20240307",
        cost: 3,
        quality: 7,
    },
    // Mid tier
    ModelTier {
        backend: Backend::Gemini,
        model: "gemini-2.5-flash-preview-09-2025",
        cost: 4,
        quality: 8,
    },
    ModelTier {
        backend: Backend::OpenAi,
        model: "gpt-3.5-turbo",
        cost: 5,
        quality: 8,
    },
    ModelTier {
        backend: Backend::Gemini,
        model: "gemini-1.5-pro",
        cost: 6,
        quality: 9,
    },
    // Premium tier
    ModelTier {
        backend: Backend::OpenAi,
        model: "gpt-4o",
        cost: 7,
        quality: 9,
    },
    ModelTier {
        backend: Backend::Anthropic,
        model: "claude-3-5-sonnet-20241022",
        cost: 8,
        quality: 9,
    },
    // Best tier
    ModelTier {
        backend: Backend::OpenAi,
        model: "gpt-4-turbo",
        cost: 9,
        quality: 10,
    },
    ModelTier {
        backend: Backend::Anthropic,
        model: "claude-3-opus-20240229",
        cost: 10,
        quality: 10,
    },
];

/// Tiers whose backend has a configured credential, sorted ascending by
/// relative cost. The sort is stable: registry declaration order breaks
/// cost ties.
pub fn available_tiers(keys: &CredentialMap) -> Vec<ModelTier> {
    let mut tiers: Vec<ModelTier> = MODEL_TIERS
        .iter()
        .copied()
        .filter(|tier| keys.key_for(tier.backend).is_some())
        .collect();
    tiers.sort_by_key(|tier| tier.cost);
    tiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_cost_sorted_when_filtered() {
        let keys = CredentialMap::new().gemini("g").openai("o").anthropic("a");
        let tiers = available_tiers(&keys);
        assert_eq!(tiers.len(), MODEL_TIERS.len());
        assert!(tiers.windows(2).all(|w| w[0].cost <= w[1].cost));
        assert_eq!(tiers[0].model, "gemini-1.5-flash");
    }

    #[test]
    fn missing_credentials_exclude_backends() {
        let keys = CredentialMap::new().anthropic("a");
        let tiers = available_tiers(&keys);
        assert_eq!(tiers.len(), 3);
        assert!(tiers.iter().all(|t| t.backend == Backend::Anthropic));
        assert_eq!(tiers[0].model, "claude-3-haiku-20240307");
    }

    #[test]
    fn no_credentials_yields_empty_set() {
        assert!(available_tiers(&CredentialMap::new()).is_empty());
    }
}
