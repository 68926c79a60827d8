//! cicd_job_run_artifact_mappings queries.
//!
//! A mapping `(anchor, {r1, r2})` is stored as one row per pair:
//! `(anchor, r1)`, `(anchor, r2)`.

use std::collections::BTreeMap;

use rusqlite::{params, Connection};
use uuid::Uuid;

use runlink_core::errors::StorageResult;
use runlink_core::types::IntermediateMapping;

use super::{page_bounds, parse_uuid, uuid_text};

const TABLE: &str = "cicd_job_run_artifact_mappings";

fn insert_pairs(conn: &Connection, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO cicd_job_run_artifact_mappings
         (tenant, cicd_job_run_id1, cicd_job_run_id2) VALUES (?1, ?2, ?3)",
    )?;
    let anchor = uuid_text(mapping.anchor_run_id);
    for run in &mapping.correlated_run_ids {
        stmt.execute(params![tenant, anchor, uuid_text(*run)])?;
    }
    Ok(())
}

pub fn upsert_mapping(conn: &Connection, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()> {
    let tx = conn.unchecked_transaction()?;
    insert_pairs(&tx, tenant, mapping)?;
    tx.commit()?;
    Ok(())
}

pub fn replace_mapping(conn: &Connection, tenant: &str, mapping: &IntermediateMapping) -> StorageResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM cicd_job_run_artifact_mappings WHERE tenant = ?1 AND cicd_job_run_id1 = ?2",
        params![tenant, uuid_text(mapping.anchor_run_id)],
    )?;
    insert_pairs(&tx, tenant, mapping)?;
    tx.commit()?;
    Ok(())
}

pub fn get_mapping(
    conn: &Connection,
    tenant: &str,
    anchor_run_id: Uuid,
) -> StorageResult<Option<IntermediateMapping>> {
    let mut stmt = conn.prepare_cached(
        "SELECT cicd_job_run_id2 FROM cicd_job_run_artifact_mappings
         WHERE tenant = ?1 AND cicd_job_run_id1 = ?2 ORDER BY cicd_job_run_id2",
    )?;
    let mut rows = stmt.query(params![tenant, uuid_text(anchor_run_id)])?;
    let mut runs = Vec::new();
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        runs.push(parse_uuid(TABLE, "cicd_job_run_id2", &raw)?);
    }
    if runs.is_empty() {
        return Ok(None);
    }
    Ok(Some(IntermediateMapping::new(anchor_run_id, runs)))
}

/// One page of anchors, each with its full stored set.
pub fn list_mappings(
    conn: &Connection,
    tenant: &str,
    offset: usize,
    limit: usize,
) -> StorageResult<Vec<IntermediateMapping>> {
    let (offset, limit) = page_bounds(offset, limit);
    let mut stmt = conn.prepare_cached(
        "SELECT m.cicd_job_run_id1, m.cicd_job_run_id2
         FROM cicd_job_run_artifact_mappings m
         JOIN (SELECT DISTINCT cicd_job_run_id1 AS anchor
               FROM cicd_job_run_artifact_mappings
               WHERE tenant = ?1
               ORDER BY anchor LIMIT ?2 OFFSET ?3) page
           ON m.cicd_job_run_id1 = page.anchor
         WHERE m.tenant = ?1
         ORDER BY m.cicd_job_run_id1, m.cicd_job_run_id2",
    )?;
    let mut rows = stmt.query(params![tenant, limit, offset])?;
    let mut grouped: BTreeMap<Uuid, Vec<Uuid>> = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let raw_anchor: String = row.get(0)?;
        let raw_run: String = row.get(1)?;
        grouped
            .entry(parse_uuid(TABLE, "cicd_job_run_id1", &raw_anchor)?)
            .or_default()
            .push(parse_uuid(TABLE, "cicd_job_run_id2", &raw_run)?);
    }
    Ok(grouped
        .into_iter()
        .map(|(anchor, runs)| IntermediateMapping::new(anchor, runs))
        .collect())
}

pub fn delete_mappings_for_run(conn: &Connection, tenant: &str, run_id: Uuid) -> StorageResult<usize> {
    let mut stmt = conn.prepare_cached(
        "DELETE FROM cicd_job_run_artifact_mappings
         WHERE tenant = ?1 AND (cicd_job_run_id1 = ?2 OR cicd_job_run_id2 = ?2)",
    )?;
    Ok(stmt.execute(params![tenant, uuid_text(run_id)])?)
}

pub fn count_mappings(conn: &Connection, tenant: &str) -> StorageResult<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT cicd_job_run_id1) FROM cicd_job_run_artifact_mappings WHERE tenant = ?1",
        params![tenant],
        |row| row.get(0),
    )?;
    Ok(count.max(0) as u64)
}
