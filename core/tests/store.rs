//! Result store tests: declarations, event log and run bookkeeping.

use fptp_core::{
    config::{ElectionConfig, PartyConfig},
    engine::{SimEngine, RUN_LEVEL},
    error::SimError,
    event::SimEvent,
    result::ConstituencyResult,
    store::SimStore,
};

fn build(run_id: &str, seed: u64) -> SimEngine {
    SimEngine::build_test(run_id.to_string(), seed).expect("build test engine")
}

#[test]
fn every_constituency_is_declared_and_persisted() {
    let run_id = "store-declared";
    let mut engine = build(run_id, 0x1111_AAAA);
    let seats = engine.run().unwrap();

    let constituencies = engine.config.constituencies;
    assert_eq!(engine.store.declared_count(run_id).unwrap(), constituencies);

    let persisted = engine.store.seat_totals(run_id, engine.config.party_count()).unwrap();
    assert_eq!(persisted, seats.seats, "Store and engine disagree on seats");

    for n in 1..=constituencies {
        let result = engine.store.declaration(run_id, n).unwrap().expect("declaration row");
        assert_eq!(result.turnout(), engine.config.average_turnout());
    }
    assert!(engine.store.declaration(run_id, constituencies + 1).unwrap().is_none());
}

#[test]
fn run_level_events_describe_the_electorate() {
    let run_id = "store-run-level";
    let mut engine = build(run_id, 5);
    engine.run().unwrap();

    let events: Vec<SimEvent> = engine
        .store_events_for_constituency(RUN_LEVEL)
        .unwrap()
        .into_iter()
        .map(|e| serde_json::from_str(&e.payload).expect("decode event"))
        .collect();

    let party_count = engine.config.party_count();
    assert_eq!(events.len(), party_count + 2);
    assert!(matches!(events[0], SimEvent::RunInitialized { seed: 5, .. }));

    for (i, event) in events[1..=party_count].iter().enumerate() {
        match event {
            SimEvent::ElectorateGenerated { party, voters, .. } => {
                assert_eq!(*party, i);
                assert_eq!(*voters, engine.config.parties[i].votes);
            }
            other => panic!("Expected electorate_generated, got {other:?}"),
        }
    }

    match events.last().unwrap() {
        SimEvent::RunCompleted { constituencies, seats } => {
            assert_eq!(*constituencies, engine.config.constituencies);
            assert_eq!(seats.iter().sum::<u64>(), *constituencies);
        }
        other => panic!("Expected run_completed, got {other:?}"),
    }
}

#[test]
fn each_constituency_has_one_declaration_event() {
    let run_id = "store-per-constituency";
    let mut engine = build(run_id, 9);
    engine.run().unwrap();

    let entries = engine.store_events_for_constituency(4).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].event_type, "constituency_declared");
    assert_eq!(entries[0].source, "engine");
}

#[test]
fn a_run_cannot_be_replayed_on_the_same_engine() {
    let mut engine = build("store-replay", 1);
    engine.run().unwrap();
    assert!(matches!(engine.run(), Err(SimError::RunAlreadyStarted { .. })));
}

/// A run aborted by a store error leaves the engine spent: a second attempt
/// must not append another set of run-level events.
#[test]
fn failed_run_is_not_replayed() {
    let run_id = "store-failed-run";
    let mut engine = build(run_id, 8);

    // Occupy constituency 3's declaration row so the run aborts there.
    let squatter = ConstituencyResult { constituency: 3, tally: vec![0; 4], winner: 0 };
    engine.store.record_declaration(run_id, &squatter).unwrap();

    assert!(matches!(engine.run(), Err(SimError::Database(_))));
    let events_after_failure = engine.store.all_events(run_id).unwrap().len();
    let run_level_after_failure = engine.store_events_for_constituency(RUN_LEVEL).unwrap().len();
    assert_eq!(run_level_after_failure, 1 + engine.config.party_count());

    assert!(matches!(engine.run(), Err(SimError::RunAlreadyStarted { .. })));
    assert_eq!(engine.store.all_events(run_id).unwrap().len(), events_after_failure);
    assert_eq!(engine.store.declared_count(run_id).unwrap(), 3);
}

#[test]
fn run_with_reports_each_declaration() {
    let mut engine = build("store-run-with", 3);
    let mut lines = Vec::new();
    let seats = engine
        .run_with(|result, running| lines.push((result.constituency, running.total())))
        .unwrap();

    assert_eq!(lines.len() as u64, engine.config.constituencies);
    assert!(lines.iter().all(|(n, total)| n == total));
    assert_eq!(seats.total(), engine.config.constituencies);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let config = ElectionConfig {
        region: "Nowhere".into(),
        total_voters: 10,
        constituencies: 20,
        parties: vec![PartyConfig::new("Solo", 10)],
    };
    let err = SimEngine::build_in_memory("store-invalid".into(), 1, config).err();
    assert!(matches!(err, Some(SimError::InvalidConfig { .. })));
}

#[test]
fn run_record_keeps_its_seed() {
    let store = SimStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.insert_run("seeded", 0xFEED, "0.1.0-test", 0).unwrap();
    assert_eq!(store.run_seed("seeded").unwrap(), Some(0xFEED));
    assert_eq!(store.run_seed("missing").unwrap(), None);
}

/// Only "no such row" maps to `None`; a bad row is a database error.
#[test]
fn unreadable_run_row_is_an_error_not_a_miss() {
    let path = std::env::temp_dir().join(format!("fptp-store-{}.db", std::process::id()));
    let path_str = path.to_str().expect("utf-8 temp path");

    let store = SimStore::open(path_str).unwrap();
    store.migrate().unwrap();

    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute(
        "INSERT INTO run (run_id, seed, version, started_at) VALUES ('corrupt', 'not-a-seed', 'x', 0)",
        [],
    )
    .unwrap();
    drop(raw);

    let outcome = store.run_seed("corrupt");
    drop(store);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path_str}{suffix}"));
    }

    assert!(matches!(outcome, Err(SimError::Database(_))), "got {outcome:?}");
}
