//! Key extraction for the key-comparing strategies.

use runlink_core::types::{Artifact, MatchStrategy};

/// Borrowed equality key of one artifact under one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKey<'a> {
    Hash(&'a str),
    NameQualifier(&'a str, &'a str),
    NameQualifierLocation(&'a str, &'a str, &'a str),
}

/// The key of `artifact` under `strategy`, or `None` when the artifact lies
/// outside the strategy's domain. Identity never yields a key.
pub fn key_of(strategy: MatchStrategy, artifact: &Artifact) -> Option<StrategyKey<'_>> {
    match strategy {
        MatchStrategy::Identity => None,
        MatchStrategy::Hash => artifact.hash.as_deref().map(StrategyKey::Hash),
        MatchStrategy::NameQualifier => Some(StrategyKey::NameQualifier(
            artifact.name.as_deref()?,
            artifact.qualifier.as_deref()?,
        )),
        MatchStrategy::NameQualifierLocation => Some(StrategyKey::NameQualifierLocation(
            artifact.name.as_deref()?,
            artifact.qualifier.as_deref()?,
            artifact.location.as_deref()?,
        )),
    }
}
