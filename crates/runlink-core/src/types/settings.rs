//! CorrelationSettings and the four matching strategies they toggle.

use serde::{Deserialize, Serialize};

use super::artifact::Artifact;

/// The four matching strategies. Identity is reflexive only; the other three
/// link distinct artifacts with equal keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Identity,
    Hash,
    NameQualifier,
    NameQualifierLocation,
}

impl MatchStrategy {
    /// Strategies that compare artifact keys, in evaluation order.
    pub const KEYED: [MatchStrategy; 3] = [
        MatchStrategy::Hash,
        MatchStrategy::NameQualifier,
        MatchStrategy::NameQualifierLocation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Hash => "hash",
            Self::NameQualifier => "name_qualifier",
            Self::NameQualifierLocation => "name_qualifier_location",
        }
    }

    /// Whether `artifact` carries every field this strategy keys on.
    /// Identity applies to every run, so every artifact is in its domain.
    pub fn in_domain(&self, artifact: &Artifact) -> bool {
        match self {
            Self::Identity => true,
            Self::Hash => artifact.hash.is_some(),
            Self::NameQualifier => artifact.name.is_some() && artifact.qualifier.is_some(),
            Self::NameQualifierLocation => {
                artifact.name.is_some()
                    && artifact.qualifier.is_some()
                    && artifact.location.is_some()
            }
        }
    }
}

/// One independent switch per strategy. All false means correlation is off.
///
/// Maps directly onto the `[correlation]` table of `runlink.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationSettings {
    pub identity: bool,
    pub hash: bool,
    pub name_qualifier: bool,
    pub name_qualifier_location: bool,
}

impl CorrelationSettings {
    pub fn is_enabled(&self, strategy: MatchStrategy) -> bool {
        match strategy {
            MatchStrategy::Identity => self.identity,
            MatchStrategy::Hash => self.hash,
            MatchStrategy::NameQualifier => self.name_qualifier,
            MatchStrategy::NameQualifierLocation => self.name_qualifier_location,
        }
    }

    /// Enabled key-comparing strategies, in evaluation order.
    pub fn keyed_strategies(&self) -> Vec<MatchStrategy> {
        MatchStrategy::KEYED
            .into_iter()
            .filter(|s| self.is_enabled(*s))
            .collect()
    }
}
