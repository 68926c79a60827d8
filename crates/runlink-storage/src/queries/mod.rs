//! Free-function queries over a borrowed `Connection`.
//! The engine routes each call through the pool.

pub mod artifacts;
pub mod job_runs;
pub mod mappings;

use rusqlite::types::Value;
use uuid::Uuid;

use runlink_core::errors::{StorageError, StorageResult};

/// Page bounds as SQLite integers. `usize::MAX` limit means unbounded.
pub(crate) fn page_bounds(offset: usize, limit: usize) -> (i64, i64) {
    (
        i64::try_from(offset).unwrap_or(i64::MAX),
        i64::try_from(limit).unwrap_or(i64::MAX),
    )
}

pub(crate) fn uuid_text(id: Uuid) -> String {
    id.hyphenated().to_string()
}

/// Parse a stored UUID column. Malformed text breaks the repository contract.
pub(crate) fn parse_uuid(table: &str, column: &str, raw: &str) -> StorageResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| StorageError::contract(table, format!("bad {column} {raw:?}: {e}")))
}

/// Append `column IN (?, ?, ...)` for a non-empty value list.
pub(crate) fn push_in_clause(
    clauses: &mut Vec<String>,
    values: &mut Vec<Value>,
    column: &str,
    list: impl IntoIterator<Item = Value>,
) {
    let start = values.len();
    values.extend(list);
    let added = values.len() - start;
    if added == 0 {
        return;
    }
    let placeholders = vec!["?"; added].join(", ");
    clauses.push(format!("{column} IN ({placeholders})"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_in_clause_skips_empty_lists() {
        let mut clauses = Vec::new();
        let mut values = Vec::new();
        push_in_clause(&mut clauses, &mut values, "hash", Vec::<Value>::new());
        assert!(clauses.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_push_in_clause_placeholders() {
        let mut clauses = Vec::new();
        let mut values = vec![Value::Text("t".into())];
        push_in_clause(
            &mut clauses,
            &mut values,
            "name",
            ["a", "b"].map(|s| Value::Text(s.to_string())),
        );
        assert_eq!(clauses, vec!["name IN (?, ?)".to_string()]);
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        let err = parse_uuid("cicd_job_runs", "id", "not-a-uuid").unwrap_err();
        assert!(matches!(err, StorageError::ContractViolation { .. }));
    }

    #[test]
    fn test_page_bounds_saturate() {
        assert_eq!(page_bounds(3, usize::MAX), (3, i64::MAX));
    }
}
