//! `IMappingStore`: Durable cache of computed correlation mappings.
//!
//! Callers populate it from engine output for O(1) reuse. It is not kept
//! consistent with live artifact data; a refresh overwrites stale entries.

use std::sync::Arc;

use uuid::Uuid;

use crate::errors::StorageResult;
use crate::types::IntermediateMapping;

pub trait IMappingStore: Send + Sync {
    /// Union `mapping.correlated_run_ids` into the anchor's stored set.
    fn upsert_mapping(&self, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()>;

    /// Overwrite the anchor's stored set with `mapping.correlated_run_ids`.
    fn replace_mapping(&self, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()>;

    /// The stored set for `anchor_run_id`, `None` if nothing is stored.
    fn get_mapping(
        &self,
        tenant: &str,
        anchor_run_id: Uuid,
    ) -> StorageResult<Option<IntermediateMapping>>;

    /// One page of stored mappings ordered by anchor id.
    fn list_mappings(
        &self,
        tenant: &str,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<IntermediateMapping>>;

    /// Remove `run_id` everywhere: as an anchor and from every other anchor's set.
    /// Returns the number of stored pairs removed.
    fn delete_mappings_for_run(&self, tenant: &str, run_id: Uuid) -> StorageResult<usize>;

    /// Number of anchors with a stored mapping.
    fn count_mappings(&self, tenant: &str) -> StorageResult<u64>;
}

// ─── Arc blanket impl ───────────────────────────────────────────────

impl<T: IMappingStore + ?Sized> IMappingStore for Arc<T> {
    fn upsert_mapping(&self, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()> {
        (**self).upsert_mapping(tenant, mapping)
    }
    fn replace_mapping(&self, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()> {
        (**self).replace_mapping(tenant, mapping)
    }
    fn get_mapping(
        &self,
        tenant: &str,
        anchor_run_id: Uuid,
    ) -> StorageResult<Option<IntermediateMapping>> {
        (**self).get_mapping(tenant, anchor_run_id)
    }
    fn list_mappings(
        &self,
        tenant: &str,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<IntermediateMapping>> {
        (**self).list_mappings(tenant, offset, limit)
    }
    fn delete_mappings_for_run(&self, tenant: &str, run_id: Uuid) -> StorageResult<usize> {
        (**self).delete_mappings_for_run(tenant, run_id)
    }
    fn count_mappings(&self, tenant: &str) -> StorageResult<u64> {
        (**self).count_mappings(tenant)
    }
}
