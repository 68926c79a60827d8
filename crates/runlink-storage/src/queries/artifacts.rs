//! cicd_job_run_artifacts queries.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use tracing::warn;
use uuid::Uuid;

use runlink_core::errors::{StorageError, StorageResult};
use runlink_core::types::{Artifact, ArtifactFilter, MatchStrategy};

use super::{page_bounds, parse_uuid, push_in_clause, uuid_text};

const TABLE: &str = "cicd_job_run_artifacts";

const COLUMNS: &str =
    "id, cicd_job_run_id, name, qualifier, location, hash, type, input, output, metadata";

pub fn insert_artifact(conn: &Connection, tenant: &str, artifact: &Artifact) -> StorageResult<()> {
    let metadata = serde_json::to_string(&artifact.metadata)?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO cicd_job_run_artifacts
         (tenant, id, cicd_job_run_id, name, qualifier, location, hash, type, input, output, metadata)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    stmt.execute(params![
        tenant,
        uuid_text(artifact.id),
        uuid_text(artifact.job_run_id),
        artifact.name,
        artifact.qualifier,
        artifact.location,
        artifact.hash,
        artifact.artifact_type,
        artifact.input,
        artifact.output,
        metadata,
    ])?;
    Ok(())
}

pub fn delete_artifacts_for_run(
    conn: &Connection,
    tenant: &str,
    job_run_id: Uuid,
) -> StorageResult<usize> {
    let mut stmt = conn.prepare_cached(
        "DELETE FROM cicd_job_run_artifacts WHERE tenant = ?1 AND cicd_job_run_id = ?2",
    )?;
    Ok(stmt.execute(params![tenant, uuid_text(job_run_id)])?)
}

/// Atomically swap a run's artifact set. Each artifact is stored under
/// `job_run_id` whatever its own `job_run_id` field says.
pub fn replace_artifacts(
    conn: &Connection,
    tenant: &str,
    job_run_id: Uuid,
    artifacts: &[Artifact],
) -> StorageResult<Vec<Uuid>> {
    let tx = conn.unchecked_transaction()?;
    delete_artifacts_for_run(&tx, tenant, job_run_id)?;
    let mut ids = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let owned = Artifact {
            job_run_id,
            ..artifact.clone()
        };
        insert_artifact(&tx, tenant, &owned)?;
        ids.push(owned.id);
    }
    tx.commit()?;
    Ok(ids)
}

pub fn get_artifact(conn: &Connection, tenant: &str, id: Uuid) -> StorageResult<Option<Artifact>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM cicd_job_run_artifacts WHERE tenant = ?1 AND id = ?2"
    ))?;
    let mut rows = stmt.query(params![tenant, uuid_text(id)])?;
    match rows.next()? {
        Some(row) => Ok(Some(decode_artifact(row)?)),
        None => Ok(None),
    }
}

/// One page of matching artifacts, ordered by `(cicd_job_run_id, id)`.
/// Bulk readers should page with `ArtifactFilter::after` and offset 0.
pub fn list_artifacts(
    conn: &Connection,
    tenant: &str,
    filter: &ArtifactFilter,
    offset: usize,
    limit: usize,
) -> StorageResult<Vec<Artifact>> {
    let (where_sql, mut values) = build_where(tenant, filter);
    let (offset, limit) = page_bounds(offset, limit);
    values.push(Value::Integer(limit));
    values.push(Value::Integer(offset));

    let sql = format!(
        "SELECT {COLUMNS} FROM cicd_job_run_artifacts WHERE {where_sql}
         ORDER BY cicd_job_run_id, id LIMIT ? OFFSET ?"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let mut rows = stmt.query(params_from_iter(values))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(decode_artifact(row)?);
    }
    Ok(out)
}

pub fn count_artifacts(conn: &Connection, tenant: &str, filter: &ArtifactFilter) -> StorageResult<u64> {
    let (where_sql, values) = build_where(tenant, filter);
    let sql = format!("SELECT COUNT(*) FROM cicd_job_run_artifacts WHERE {where_sql}");
    let mut stmt = conn.prepare_cached(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(values), |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

/// Translate a filter into a WHERE clause with positional parameters.
/// Mirrors `ArtifactFilter::matches`.
fn build_where(tenant: &str, filter: &ArtifactFilter) -> (String, Vec<Value>) {
    let mut clauses = vec!["tenant = ?".to_string()];
    let mut values = vec![Value::Text(tenant.to_string())];

    let uuids = |ids: &[Uuid]| {
        ids.iter()
            .map(|id| Value::Text(uuid_text(*id)))
            .collect::<Vec<_>>()
    };
    let texts = |list: &[String]| {
        list.iter()
            .map(|s| Value::Text(s.clone()))
            .collect::<Vec<_>>()
    };

    push_in_clause(&mut clauses, &mut values, "cicd_job_run_id", uuids(&filter.job_run_ids));
    push_in_clause(&mut clauses, &mut values, "id", uuids(&filter.ids));
    push_in_clause(&mut clauses, &mut values, "name", texts(&filter.names));
    push_in_clause(&mut clauses, &mut values, "qualifier", texts(&filter.qualifiers));
    push_in_clause(&mut clauses, &mut values, "location", texts(&filter.locations));
    push_in_clause(&mut clauses, &mut values, "hash", texts(&filter.hashes));
    push_in_clause(&mut clauses, &mut values, "type", texts(&filter.types));

    if let Some(input) = filter.input {
        clauses.push("input = ?".to_string());
        values.push(Value::Integer(i64::from(input)));
    }
    if let Some(output) = filter.output {
        clauses.push("output = ?".to_string());
        values.push(Value::Integer(i64::from(output)));
    }

    let domains: Vec<&str> = filter
        .domains
        .iter()
        .filter_map(|s| match s {
            MatchStrategy::Identity => None,
            MatchStrategy::Hash => Some("hash IS NOT NULL"),
            MatchStrategy::NameQualifier => Some("(name IS NOT NULL AND qualifier IS NOT NULL)"),
            MatchStrategy::NameQualifierLocation => Some(
                "(name IS NOT NULL AND qualifier IS NOT NULL AND location IS NOT NULL)",
            ),
        })
        .collect();
    if !domains.is_empty() {
        clauses.push(format!("({})", domains.join(" OR ")));
    }
    if let Some((job_run_id, id)) = filter.after {
        clauses.push("(cicd_job_run_id, id) > (?, ?)".to_string());
        values.push(Value::Text(uuid_text(job_run_id)));
        values.push(Value::Text(uuid_text(id)));
    }

    (clauses.join(" AND "), values)
}

/// Decode one row. A NULL or malformed owner is a contract violation and
/// aborts the whole read.
fn decode_artifact(row: &Row<'_>) -> StorageResult<Artifact> {
    let raw_id: String = row.get(0)?;
    let id = parse_uuid(TABLE, "id", &raw_id)?;
    let raw_owner: Option<String> = row.get(1)?;
    let job_run_id = match raw_owner {
        Some(raw) => parse_uuid(TABLE, "cicd_job_run_id", &raw)?,
        None => {
            warn!(%id, "artifact without owning run");
            return Err(StorageError::contract(
                TABLE,
                format!("artifact {id} has NULL cicd_job_run_id"),
            ));
        }
    };
    let metadata_raw: Option<String> = row.get(9)?;
    let metadata = match metadata_raw {
        Some(raw) => serde_json::from_str(&raw)?,
        None => serde_json::Value::Object(serde_json::Map::new()),
    };

    Ok(Artifact {
        id,
        job_run_id,
        name: row.get(2)?,
        qualifier: row.get(3)?,
        location: row.get(4)?,
        hash: row.get(5)?,
        artifact_type: row.get(6)?,
        input: row.get(7)?,
        output: row.get(8)?,
        metadata,
    })
}
