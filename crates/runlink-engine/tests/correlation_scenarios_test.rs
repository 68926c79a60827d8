//! End-to-end correlation scenarios over a SQLite-backed store.
//!
//! Every fixture has three runs (A, B, C); a run may own zero artifacts.

use std::sync::Arc;

use runlink_core::traits::{IArtifactRepository, IJobRunRepository};
use runlink_core::types::{Artifact, CorrelationSettings, IntermediateMapping, JobRun};
use runlink_engine::CorrelationEngine;
use runlink_storage::RunlinkStorageEngine;
use uuid::Uuid;

const TENANT: &str = "acme";

struct Fixture {
    store: Arc<RunlinkStorageEngine>,
    a: Uuid,
    b: Uuid,
    c: Uuid,
}

impl Fixture {
    fn new() -> Self {
        runlink_core::tracing::init_tracing();
        let store = Arc::new(RunlinkStorageEngine::open_in_memory().unwrap());
        let job = Uuid::new_v4();
        let mut runs = (1..=3).map(|n| {
            store
                .insert_job_run(TENANT, &JobRun::new(job, n).with_status("SUCCESS"))
                .unwrap()
        });
        let (a, b, c) = (
            runs.next().unwrap(),
            runs.next().unwrap(),
            runs.next().unwrap(),
        );
        Self { store, a, b, c }
    }

    /// Store an artifact `(name, qualifier, location, hash)` under `run`.
    fn artifact(&self, run: Uuid, name: &str, qualifier: &str, location: &str, hash: &str) -> Uuid {
        let artifact = Artifact::new(run)
            .with_name(name)
            .with_qualifier(qualifier)
            .with_location(location)
            .with_hash(hash)
            .with_type("container")
            .with_direction(true, true);
        self.store.insert_artifact(TENANT, &artifact).unwrap()
    }

    fn engine(&self, settings: CorrelationSettings) -> CorrelationEngine {
        CorrelationEngine::new(self.store.clone(), self.store.clone(), settings)
    }

    fn run(&self, id: Uuid) -> JobRun {
        self.store.get_job_run(TENANT, id).unwrap().unwrap()
    }
}

fn sorted(mut mappings: Vec<IntermediateMapping>) -> Vec<IntermediateMapping> {
    mappings.sort();
    mappings
}

fn m(anchor: Uuid, runs: &[Uuid]) -> IntermediateMapping {
    IntermediateMapping::new(anchor, runs.iter().copied())
}

fn identity() -> CorrelationSettings {
    CorrelationSettings {
        identity: true,
        ..Default::default()
    }
}

fn hash() -> CorrelationSettings {
    CorrelationSettings {
        hash: true,
        ..Default::default()
    }
}

fn name_qualifier() -> CorrelationSettings {
    CorrelationSettings {
        name_qualifier: true,
        ..Default::default()
    }
}

fn name_qualifier_location() -> CorrelationSettings {
    CorrelationSettings {
        name_qualifier_location: true,
        ..Default::default()
    }
}

// ─── Core scenarios ─────────────────────────────────────────────────

#[test]
fn no_strategy_enabled_yields_nothing() {
    let f = Fixture::new();
    f.artifact(f.a, "test1", "v1", "loc", "hash");
    let engine = f.engine(CorrelationSettings::default());

    assert!(engine.correlated_runs(TENANT, 0, 10).unwrap().is_empty());
    assert!(engine
        .individual_correlations(TENANT, &f.run(f.a), &[])
        .unwrap()
        .is_empty());
}

#[test]
fn identity_qualifies_runs_without_artifacts() {
    let f = Fixture::new();
    let engine = f.engine(identity());

    let sweep = engine.correlated_runs(TENANT, 0, 10).unwrap();
    assert_eq!(
        sorted(sweep),
        sorted(vec![m(f.a, &[f.a]), m(f.b, &[f.b]), m(f.c, &[f.c])])
    );

    let individual = engine
        .individual_correlations(TENANT, &f.run(f.a), &[])
        .unwrap();
    assert_eq!(individual, vec![m(f.a, &[f.a])]);
}

#[test]
fn hash_links_equal_hashes() {
    let f = Fixture::new();
    let a1 = f.artifact(f.a, "test1", "v1", "loc1", "hashA");
    f.artifact(f.b, "test2", "v2", "loc2", "hashA");
    f.artifact(f.c, "test3", "v2", "loc2", "hashB");
    let engine = f.engine(hash());

    let sweep = engine.correlated_runs(TENANT, 0, 10).unwrap();
    assert_eq!(
        sorted(sweep),
        sorted(vec![
            m(f.a, &[f.a, f.b]),
            m(f.b, &[f.a, f.b]),
            m(f.c, &[f.c]),
        ])
    );

    let individual = engine
        .individual_correlations(TENANT, &f.run(f.a), &[a1])
        .unwrap();
    assert_eq!(
        sorted(individual),
        sorted(vec![m(f.a, &[f.b]), m(f.b, &[f.a])])
    );
}

#[test]
fn name_qualifier_location_links_exact_triples() {
    let f = Fixture::new();
    f.artifact(f.a, "test", "v1", "loc1", "hashA");
    f.artifact(f.b, "test", "v2", "loc2", "hashA");
    let a3 = f.artifact(f.c, "test", "v2", "loc2", "hashB");
    let engine = f.engine(name_qualifier_location());

    let sweep = engine.correlated_runs(TENANT, 0, 10).unwrap();
    assert_eq!(
        sorted(sweep),
        sorted(vec![
            m(f.a, &[f.a]),
            m(f.b, &[f.b, f.c]),
            m(f.c, &[f.b, f.c]),
        ])
    );

    let individual = engine
        .individual_correlations(TENANT, &f.run(f.c), &[a3])
        .unwrap();
    assert_eq!(
        sorted(individual),
        sorted(vec![m(f.c, &[f.b]), m(f.b, &[f.c])])
    );
}

#[test]
fn sweep_is_one_hop_not_transitive() {
    let f = Fixture::new();
    let a1 = f.artifact(f.a, "test", "v1", "loc1", "hashA");
    let a2 = f.artifact(f.b, "test", "v2", "loc2", "hashB");
    let a3 = f.artifact(f.c, "test", "v2", "loc2", "hashA");
    let settings = CorrelationSettings {
        identity: true,
        hash: true,
        name_qualifier_location: true,
        ..Default::default()
    };
    let engine = f.engine(settings);

    // C bridges A (by hash) and B (by name/qualifier/location); A and B stay apart.
    let sweep = engine.correlated_runs(TENANT, 0, 10).unwrap();
    assert_eq!(
        sorted(sweep),
        sorted(vec![
            m(f.a, &[f.a, f.c]),
            m(f.b, &[f.b, f.c]),
            m(f.c, &[f.a, f.b, f.c]),
        ])
    );

    let individual_a = engine
        .individual_correlations(TENANT, &f.run(f.a), &[a1])
        .unwrap();
    assert_eq!(
        sorted(individual_a),
        sorted(vec![m(f.a, &[f.a]), m(f.a, &[f.c]), m(f.c, &[f.a])])
    );

    let individual_b = engine
        .individual_correlations(TENANT, &f.run(f.b), &[a2])
        .unwrap();
    assert_eq!(
        sorted(individual_b),
        sorted(vec![m(f.b, &[f.b]), m(f.b, &[f.c]), m(f.c, &[f.b])])
    );

    // One entry per matched artifact, not a merged neighborhood.
    let individual_c = engine
        .individual_correlations(TENANT, &f.run(f.c), &[a3])
        .unwrap();
    assert_eq!(
        sorted(individual_c),
        sorted(vec![
            m(f.c, &[f.c]),
            m(f.c, &[f.a]),
            m(f.a, &[f.c]),
            m(f.c, &[f.b]),
            m(f.b, &[f.c]),
        ])
    );
}

// ─── Further fixtures ───────────────────────────────────────────────

#[test]
fn hash_and_identity_include_runs_without_artifacts() {
    let f = Fixture::new();
    let a1 = f.artifact(f.a, "test1", "v1", "loc1", "hashA");
    f.artifact(f.b, "test2", "v2", "loc2", "hashA");
    let settings = CorrelationSettings {
        identity: true,
        hash: true,
        ..Default::default()
    };
    let engine = f.engine(settings);

    let sweep = engine.correlated_runs(TENANT, 0, 10).unwrap();
    assert_eq!(
        sorted(sweep),
        sorted(vec![
            m(f.a, &[f.a, f.b]),
            m(f.b, &[f.a, f.b]),
            m(f.c, &[f.c]),
        ])
    );

    let individual_a = engine
        .individual_correlations(TENANT, &f.run(f.a), &[a1])
        .unwrap();
    assert_eq!(
        sorted(individual_a),
        sorted(vec![m(f.a, &[f.b]), m(f.a, &[f.a]), m(f.b, &[f.a])])
    );

    let individual_c = engine
        .individual_correlations(TENANT, &f.run(f.c), &[])
        .unwrap();
    assert_eq!(individual_c, vec![m(f.c, &[f.c])]);
}

#[test]
fn name_qualifier_ignores_location() {
    let f = Fixture::new();
    let a1 = f.artifact(f.a, "test", "v1", "loc1", "hashA");
    f.artifact(f.b, "test", "v2", "loc2", "hashA");
    let a3 = f.artifact(f.c, "test", "v2", "loc3", "hashB");
    let engine = f.engine(name_qualifier());

    let sweep = engine.correlated_runs(TENANT, 0, 10).unwrap();
    assert_eq!(
        sorted(sweep),
        sorted(vec![
            m(f.a, &[f.a]),
            m(f.b, &[f.b, f.c]),
            m(f.c, &[f.b, f.c]),
        ])
    );

    assert!(engine
        .individual_correlations(TENANT, &f.run(f.a), &[a1])
        .unwrap()
        .is_empty());
    assert_eq!(
        sorted(engine.individual_correlations(TENANT, &f.run(f.c), &[a3]).unwrap()),
        sorted(vec![m(f.c, &[f.b]), m(f.b, &[f.c])])
    );
}

#[test]
fn name_qualifier_location_without_match() {
    let f = Fixture::new();
    let a1 = f.artifact(f.a, "test", "v1", "loc1", "hashA");
    let a2 = f.artifact(f.b, "test", "v2", "loc2", "hashA");
    let a3 = f.artifact(f.c, "test", "v2", "loc3", "hashB");
    let engine = f.engine(name_qualifier_location());

    let sweep = engine.correlated_runs(TENANT, 0, 10).unwrap();
    assert_eq!(
        sorted(sweep),
        sorted(vec![m(f.a, &[f.a]), m(f.b, &[f.b]), m(f.c, &[f.c])])
    );

    for (run, own) in [(f.a, a1), (f.b, a2), (f.c, a3)] {
        assert!(engine
            .individual_correlations(TENANT, &f.run(run), &[own])
            .unwrap()
            .is_empty());
    }
}

// ─── Edge cases ─────────────────────────────────────────────────────

#[test]
fn exclude_skips_matched_artifacts() {
    let f = Fixture::new();
    f.artifact(f.a, "x", "1", "l", "hashA");
    let b1 = f.artifact(f.b, "y", "1", "l", "hashA");
    f.artifact(f.c, "z", "1", "l", "hashA");
    let engine = f.engine(hash());

    let individual = engine
        .individual_correlations(TENANT, &f.run(f.a), &[b1])
        .unwrap();
    assert_eq!(
        sorted(individual),
        sorted(vec![m(f.a, &[f.c]), m(f.c, &[f.a])])
    );
}

#[test]
fn individual_emits_one_pair_per_match() {
    let f = Fixture::new();
    // Two artifacts of A both match B's artifact.
    f.artifact(f.a, "x", "1", "l", "hashA");
    f.artifact(f.a, "y", "1", "l", "hashA");
    f.artifact(f.b, "z", "1", "l", "hashA");
    let engine = f.engine(hash());

    let individual = engine
        .individual_correlations(TENANT, &f.run(f.a), &[])
        .unwrap();
    assert_eq!(individual.len(), 4);
    assert_eq!(
        sorted(individual),
        sorted(vec![
            m(f.a, &[f.b]),
            m(f.b, &[f.a]),
            m(f.a, &[f.b]),
            m(f.b, &[f.a]),
        ])
    );
}

#[test]
fn unknown_run_is_empty_even_with_identity() {
    let f = Fixture::new();
    let engine = f.engine(identity());
    let stranger = JobRun::new(Uuid::new_v4(), 99);
    assert!(engine
        .individual_correlations(TENANT, &stranger, &[])
        .unwrap()
        .is_empty());
}

#[test]
fn paging_selects_anchors_but_not_edges() {
    let f = Fixture::new();
    f.artifact(f.a, "n", "q", "l", "hashA");
    f.artifact(f.b, "n", "q", "l", "hashA");
    f.artifact(f.c, "n", "q", "l", "hashA");
    let engine = f.engine(hash());

    let full = engine.correlated_runs(TENANT, 0, 10).unwrap();
    assert_eq!(full.len(), 3);
    let anchors: Vec<Uuid> = full.iter().map(|m| m.anchor_run_id).collect();
    let mut ascending = anchors.clone();
    ascending.sort();
    assert_eq!(anchors, ascending);

    let second = engine.correlated_runs(TENANT, 1, 1).unwrap();
    assert_eq!(second, vec![full[1].clone()]);
    assert_eq!(second[0].correlated_run_ids.len(), 3);

    assert!(engine.correlated_runs(TENANT, 3, 10).unwrap().is_empty());
    assert!(engine.correlated_runs(TENANT, 0, 0).unwrap().is_empty());
}

#[test]
fn other_tenants_do_not_correlate() {
    let f = Fixture::new();
    f.artifact(f.a, "n", "q", "l", "hashA");
    let other_run = f
        .store
        .insert_job_run("globex", &JobRun::new(Uuid::new_v4(), 1))
        .unwrap();
    f.store
        .insert_artifact("globex", &Artifact::new(other_run).with_hash("hashA"))
        .unwrap();
    let engine = f.engine(hash());

    assert_eq!(
        engine.correlated_runs(TENANT, 0, 10).unwrap(),
        vec![m(f.a, &[f.a])]
    );
}
