//! MappingService tests: per-run mapping after ingestion and full refresh.

use std::sync::Arc;

use runlink_core::config::MappingConfig;
use runlink_core::traits::{IArtifactRepository, IJobRunRepository, IMappingStore};
use runlink_core::types::{Artifact, CorrelationSettings, IntermediateMapping, JobRun};
use runlink_engine::{CorrelationEngine, CorrelationError, MappingService, RefreshReport};
use runlink_storage::RunlinkStorageEngine;
use uuid::Uuid;

const TENANT: &str = "acme";

fn temp_store() -> (tempfile::TempDir, Arc<RunlinkStorageEngine>) {
    let dir = tempfile::tempdir().unwrap();
    let store = RunlinkStorageEngine::open(&dir.path().join("runlink.db")).unwrap();
    (dir, Arc::new(store))
}

fn service(store: &Arc<RunlinkStorageEngine>, settings: CorrelationSettings, page: usize) -> MappingService {
    let engine = CorrelationEngine::new(store.clone(), store.clone(), settings);
    MappingService::new(engine, store.clone(), &MappingConfig { sweep_page_size: page }).unwrap()
}

fn new_run(store: &RunlinkStorageEngine, n: i64) -> JobRun {
    let run = JobRun::new(Uuid::new_v4(), n);
    store.insert_job_run(TENANT, &run).unwrap();
    run
}

fn hash_and_identity() -> CorrelationSettings {
    CorrelationSettings {
        identity: true,
        hash: true,
        ..Default::default()
    }
}

#[test]
fn map_job_run_upserts_both_directions() {
    let (_dir, store) = temp_store();
    let svc = service(&store, hash_and_identity(), 100);

    let first = new_run(&store, 1);
    let ids = store
        .replace_artifacts(TENANT, first.id, &[Artifact::new(first.id).with_hash("sha:1")])
        .unwrap();
    svc.map_job_run(TENANT, &first, &ids).unwrap();
    assert_eq!(
        store.get_mapping(TENANT, first.id).unwrap(),
        Some(IntermediateMapping::reflexive(first.id))
    );

    let second = new_run(&store, 2);
    let ids = store
        .replace_artifacts(TENANT, second.id, &[Artifact::new(second.id).with_hash("sha:1")])
        .unwrap();
    let emitted = svc.map_job_run(TENANT, &second, &ids).unwrap();
    assert_eq!(emitted.len(), 3);

    assert_eq!(
        store.get_mapping(TENANT, first.id).unwrap(),
        Some(IntermediateMapping::new(first.id, [first.id, second.id]))
    );
    assert_eq!(
        store.get_mapping(TENANT, second.id).unwrap(),
        Some(IntermediateMapping::new(second.id, [first.id, second.id]))
    );
}

#[test]
fn map_job_run_without_matches_stores_nothing_when_identity_off() {
    let (_dir, store) = temp_store();
    let svc = service(
        &store,
        CorrelationSettings {
            hash: true,
            ..Default::default()
        },
        100,
    );
    let run = new_run(&store, 1);
    let ids = store
        .replace_artifacts(TENANT, run.id, &[Artifact::new(run.id).with_hash("lonely")])
        .unwrap();

    assert!(svc.map_job_run(TENANT, &run, &ids).unwrap().is_empty());
    assert_eq!(store.count_mappings(TENANT).unwrap(), 0);
}

#[test]
fn refresh_all_overwrites_every_anchor() {
    let (_dir, store) = temp_store();
    let runs: Vec<JobRun> = (0..5).map(|n| new_run(&store, n)).collect();
    for run in &runs[..3] {
        store
            .insert_artifact(TENANT, &Artifact::new(run.id).with_hash("shared"))
            .unwrap();
    }

    // Stale entry that the refresh must replace.
    let stranger = Uuid::new_v4();
    store
        .upsert_mapping(TENANT, &IntermediateMapping::new(runs[0].id, [stranger]))
        .unwrap();

    let svc = service(&store, hash_and_identity(), 2);
    let report = svc.refresh_all(TENANT).unwrap();
    assert_eq!(report, RefreshReport { anchors: 5, pages: 3 });
    assert_eq!(store.count_mappings(TENANT).unwrap(), 5);

    let linked: Vec<Uuid> = runs[..3].iter().map(|r| r.id).collect();
    for run in &runs[..3] {
        let stored = store.get_mapping(TENANT, run.id).unwrap().unwrap();
        assert_eq!(stored, IntermediateMapping::new(run.id, linked.iter().copied()));
        assert!(!stored.contains(&stranger));
    }
    for run in &runs[3..] {
        assert_eq!(
            store.get_mapping(TENANT, run.id).unwrap(),
            Some(IntermediateMapping::reflexive(run.id))
        );
    }
}

#[test]
fn single_anchor_pages_store_the_same_mappings() {
    let (_dir, store) = temp_store();
    let runs: Vec<JobRun> = (0..6).map(|n| new_run(&store, n)).collect();
    // Chain: run i shares a hash with run i + 1.
    for (i, run) in runs.iter().enumerate() {
        for key in [i, i + 1] {
            store
                .insert_artifact(TENANT, &Artifact::new(run.id).with_hash(format!("h{key}")))
                .unwrap();
        }
    }

    let report = service(&store, hash_and_identity(), 1).refresh_all(TENANT).unwrap();
    assert_eq!(report, RefreshReport { anchors: 6, pages: 6 });
    let one_by_one = store.list_mappings(TENANT, 0, 100).unwrap();

    let report = service(&store, hash_and_identity(), 100).refresh_all(TENANT).unwrap();
    assert_eq!(report, RefreshReport { anchors: 6, pages: 1 });
    assert_eq!(store.list_mappings(TENANT, 0, 100).unwrap(), one_by_one);

    for (i, run) in runs.iter().enumerate() {
        let expected: Vec<Uuid> = runs[i.saturating_sub(1)..(i + 2).min(runs.len())]
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(
            store.get_mapping(TENANT, run.id).unwrap(),
            Some(IntermediateMapping::new(run.id, expected))
        );
    }
}

#[test]
fn refresh_on_exact_page_boundary() {
    let (_dir, store) = temp_store();
    for n in 0..4 {
        new_run(&store, n);
    }
    let identity = CorrelationSettings {
        identity: true,
        ..Default::default()
    };
    let report = service(&store, identity, 2).refresh_all(TENANT).unwrap();
    assert_eq!(report, RefreshReport { anchors: 4, pages: 2 });
}

#[test]
fn refresh_with_nothing_enabled_is_a_no_op() {
    let (_dir, store) = temp_store();
    new_run(&store, 1);
    let report = service(&store, CorrelationSettings::default(), 10)
        .refresh_all(TENANT)
        .unwrap();
    assert_eq!(report, RefreshReport::default());
    assert_eq!(store.count_mappings(TENANT).unwrap(), 0);
}

#[test]
fn zero_page_size_is_rejected() {
    let (_dir, store) = temp_store();
    let engine = CorrelationEngine::new(store.clone(), store.clone(), hash_and_identity());
    let result = MappingService::new(engine, store.clone(), &MappingConfig { sweep_page_size: 0 });
    assert!(matches!(result, Err(CorrelationError::Config(_))));
}
