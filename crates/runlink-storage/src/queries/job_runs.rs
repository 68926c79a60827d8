//! cicd_job_runs queries.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use runlink_core::errors::{StorageError, StorageResult};
use runlink_core::types::JobRun;

use super::{parse_uuid, uuid_text};

const TABLE: &str = "cicd_job_runs";

pub fn insert_job_run(conn: &Connection, tenant: &str, run: &JobRun) -> StorageResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO cicd_job_runs (tenant, id, cicd_job_id, job_run_number, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    stmt.execute(params![
        tenant,
        uuid_text(run.id),
        uuid_text(run.job_id),
        run.job_run_number,
        run.status,
        run.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
    ])?;
    Ok(())
}

pub fn get_job_run(conn: &Connection, tenant: &str, id: Uuid) -> StorageResult<Option<JobRun>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, cicd_job_id, job_run_number, status, created_at
         FROM cicd_job_runs WHERE tenant = ?1 AND id = ?2",
    )?;
    let mut rows = stmt.query(params![tenant, uuid_text(id)])?;
    match rows.next()? {
        Some(row) => Ok(Some(decode_job_run(row)?)),
        None => Ok(None),
    }
}

pub fn list_job_run_ids(conn: &Connection, tenant: &str) -> StorageResult<Vec<Uuid>> {
    let mut stmt =
        conn.prepare_cached("SELECT id FROM cicd_job_runs WHERE tenant = ?1 ORDER BY id")?;
    let mut rows = stmt.query(params![tenant])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        ids.push(parse_uuid(TABLE, "id", &raw)?);
    }
    Ok(ids)
}

fn decode_job_run(row: &Row<'_>) -> StorageResult<JobRun> {
    let raw_id: String = row.get(0)?;
    let raw_job: String = row.get(1)?;
    let raw_created: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&raw_created)
        .map_err(|e| StorageError::contract(TABLE, format!("bad created_at {raw_created:?}: {e}")))?
        .with_timezone(&Utc);

    Ok(JobRun {
        id: parse_uuid(TABLE, "id", &raw_id)?,
        job_id: parse_uuid(TABLE, "cicd_job_id", &raw_job)?,
        job_run_number: row.get(2)?,
        status: row.get(3)?,
        created_at,
    })
}
