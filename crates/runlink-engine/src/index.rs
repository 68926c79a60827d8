//! Equal-key indexes over a slice of artifacts.
//!
//! `KeyIndex` borrows the keys and answers lookups by key. `KeyGroups` is its
//! owned form, answering "who shares my key" by position, so it can be kept
//! next to the artifacts it was built from.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use runlink_core::types::{Artifact, MatchStrategy};

use crate::strategy::{key_of, StrategyKey};

/// Positions into the indexed slice. Most keys are shared by a handful of
/// artifacts, so buckets stay inline.
pub type Bucket = SmallVec<[usize; 4]>;

/// Maps each key of one strategy to the positions of every artifact carrying it.
pub struct KeyIndex<'a> {
    buckets: FxHashMap<StrategyKey<'a>, Bucket>,
}

impl<'a> KeyIndex<'a> {
    /// Index every artifact in the strategy's domain. Positions within a
    /// bucket follow slice order.
    pub fn build(strategy: MatchStrategy, artifacts: &'a [Artifact]) -> Self {
        let mut buckets: FxHashMap<StrategyKey<'a>, Bucket> = FxHashMap::default();
        for (pos, artifact) in artifacts.iter().enumerate() {
            if let Some(key) = key_of(strategy, artifact) {
                buckets.entry(key).or_default().push(pos);
            }
        }
        Self { buckets }
    }

    /// Positions of all artifacts whose key equals `key`.
    pub fn lookup(&self, key: &StrategyKey<'a>) -> &[usize] {
        self.buckets
            .get(key)
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Artifacts of one strategy grouped by key, addressed by position.
pub struct KeyGroups {
    /// Group of each position; `None` outside the strategy's domain.
    group_of: Vec<Option<usize>>,
    groups: Vec<Bucket>,
}

impl KeyGroups {
    pub fn build(strategy: MatchStrategy, artifacts: &[Artifact]) -> Self {
        let index = KeyIndex::build(strategy, artifacts);
        let mut group_of = vec![None; artifacts.len()];
        let mut groups = Vec::with_capacity(index.len());
        for bucket in index.buckets.into_values() {
            for &pos in &bucket {
                group_of[pos] = Some(groups.len());
            }
            groups.push(bucket);
        }
        Self { group_of, groups }
    }

    /// Positions sharing the key of `pos`, `pos` itself included.
    pub fn peers(&self, pos: usize) -> &[usize] {
        match self.group_of.get(pos).copied().flatten() {
            Some(group) => self.groups[group].as_slice(),
            None => &[],
        }
    }

    /// Number of distinct keys.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
