//! Schema SQL constants used by migrations.rs.

/// V1 schema: job runs, their artifacts, and the stored correlation pairs.
///
/// Every table carries a `tenant` column; all queries are scoped by it.
/// UUIDs are stored as lowercase hyphenated TEXT so that TEXT ordering
/// matches `Uuid` ordering.
pub const RUNLINK_TABLES_V1: &str = "
    CREATE TABLE IF NOT EXISTS cicd_job_runs (
        tenant TEXT NOT NULL,
        id TEXT NOT NULL,
        cicd_job_id TEXT NOT NULL,
        job_run_number INTEGER NOT NULL,
        status TEXT,
        created_at TEXT NOT NULL,
        PRIMARY KEY (tenant, id)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS cicd_job_run_artifacts (
        tenant TEXT NOT NULL,
        id TEXT NOT NULL,
        cicd_job_run_id TEXT NOT NULL,
        name TEXT,
        qualifier TEXT,
        location TEXT,
        hash TEXT,
        type TEXT,
        input INTEGER NOT NULL DEFAULT 0,
        output INTEGER NOT NULL DEFAULT 0,
        metadata TEXT NOT NULL DEFAULT '{}',
        created_at INTEGER NOT NULL DEFAULT (unixepoch()),
        PRIMARY KEY (tenant, id),
        FOREIGN KEY (tenant, cicd_job_run_id)
            REFERENCES cicd_job_runs(tenant, id) ON DELETE CASCADE
    ) STRICT;

    CREATE TABLE IF NOT EXISTS cicd_job_run_artifact_mappings (
        tenant TEXT NOT NULL,
        cicd_job_run_id1 TEXT NOT NULL,
        cicd_job_run_id2 TEXT NOT NULL,
        created_at INTEGER NOT NULL DEFAULT (unixepoch()),
        PRIMARY KEY (tenant, cicd_job_run_id1, cicd_job_run_id2)
    ) STRICT, WITHOUT ROWID;

    CREATE INDEX IF NOT EXISTS idx_artifacts_run
        ON cicd_job_run_artifacts(tenant, cicd_job_run_id);
    CREATE INDEX IF NOT EXISTS idx_artifacts_hash
        ON cicd_job_run_artifacts(tenant, hash);
    CREATE INDEX IF NOT EXISTS idx_artifacts_name_qualifier_location
        ON cicd_job_run_artifacts(tenant, name, qualifier, location);
    CREATE INDEX IF NOT EXISTS idx_mappings_run2
        ON cicd_job_run_artifact_mappings(tenant, cicd_job_run_id2);
";

/// Data tables created by V1 (excludes `runlink_schema_version`).
pub const RUNLINK_TABLE_NAMES: [&str; 3] = [
    "cicd_job_runs",
    "cicd_job_run_artifacts",
    "cicd_job_run_artifact_mappings",
];
