//! Integration tests for the allocator engine
//!
//! These tests drive the engine end to end with scripted and seeded sources.

#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

use parkway_rl::{
    reward, Allocator, AllocatorEngine, CongestionBand, LotGeometry, RandomSnapshotSource,
    ScriptedSnapshotSource, Snapshot, SnapshotSource, TabularQAllocator, MAX_TOTAL_SLOTS,
};

/// Four-slot walkthrough: index, reward, successor and the first update
#[test]
fn test_four_slot_walkthrough() {
    let snapshot = Snapshot::new(vec![0, 1, 0, 1]);
    assert_eq!(snapshot.state_index(), 5);
    assert_eq!(reward(&snapshot, 0), 10.0);

    let successor = snapshot.successor(0);
    assert_eq!(successor.values(), &[1, 1, 0, 1]);

    let geometry = LotGeometry::new(1, 4).unwrap();
    let mut engine = AllocatorEngine::new(geometry, Some(1)).with_exploration_rate(0.0);
    let mut source = ScriptedSnapshotSource::repeat(snapshot);

    let outcome = engine.train_step(&mut source);
    assert_eq!(outcome.experience.action, 0);
    assert_eq!(engine.allocator().value(5, 0), 1.0);
    assert_eq!(engine.allocator().value(successor.state_index(), 0), 0.0);
}

/// Explicit check of the one-step update against a hand-computed value
#[test]
fn test_update_matches_formula_for_nonzero_prior() {
    let geometry = LotGeometry::new(1, 4).unwrap();
    let mut engine = AllocatorEngine::new(geometry, Some(2)).with_exploration_rate(0.0);
    let mut source = ScriptedSnapshotSource::repeat(Snapshot::new(vec![0, 1, 0, 1]));

    // First step leaves table[5][0] = 1.0; successor row 13 is still zero
    engine.train_step(&mut source);
    let v0 = engine.allocator().value(5, 0);
    let b = engine.allocator().best_value(0b1101);

    let outcome = engine.train_step(&mut source);
    let expected = v0 + 0.1 * (10.0 + 0.9 * b - v0);
    assert_eq!(outcome.updated_value, expected);
    assert_eq!(engine.allocator().value(5, 0), expected);
}

/// Each run clears the trace and leaves exactly N entries in both sequences
#[test]
fn test_trace_lifecycle_across_runs() {
    let geometry = LotGeometry::new(5, 10).unwrap();
    let mut engine = AllocatorEngine::new(geometry, Some(3));
    let mut source = RandomSnapshotSource::seeded(3);

    for episodes in [300, 1, 0, 25] {
        let report = engine.train(episodes, &mut source);
        assert_eq!(report.episodes, episodes);
        assert_eq!(engine.trace().allocator().len(), episodes);
        assert_eq!(engine.trace().random().len(), episodes);
    }
}

/// The learned policy beats the random baseline on a small lot
#[test]
fn test_allocator_beats_random_baseline() {
    let geometry = LotGeometry::new(2, 2).unwrap();
    let mut engine = AllocatorEngine::new(geometry, Some(11));
    let mut source = RandomSnapshotSource::seeded(11);

    let report = engine.train(3000, &mut source);

    assert!(
        report.average_allocator_reward > report.average_random_reward + 3.0,
        "allocator {:.2} vs random {:.2}",
        report.average_allocator_reward,
        report.average_random_reward
    );
    assert!(report.improvement > 3.0);
}

/// After training, recommendations on fully-indexed lots point at free slots
#[test]
fn test_trained_recommendations_pick_free_slots() {
    let geometry = LotGeometry::new(1, 4).unwrap();
    let mut engine = AllocatorEngine::new(geometry, Some(5)).with_exploration_rate(1.0);
    let mut source = RandomSnapshotSource::seeded(5);
    engine.train(50_000, &mut source);

    let mut probe = RandomSnapshotSource::seeded(99);
    for _ in 0..50 {
        let rec = engine.recommend(&mut probe);
        if rec.free_slots > 0 {
            assert!(
                rec.snapshot.is_free(rec.action),
                "recommended occupied slot {} for {:?}",
                rec.action,
                rec.snapshot
            );
        }
    }
}

/// Slots past the twelfth never influence the row that gets updated
#[test]
fn test_large_lot_aliases_on_prefix() {
    let geometry = LotGeometry::new(2, 10).unwrap();
    let engine = AllocatorEngine::new(geometry, Some(6));

    let mut a = vec![0u8; 20];
    let mut b = vec![0u8; 20];
    a[15] = 1;
    b[19] = 1;

    let rec_a = engine.recommend_for(Snapshot::new(a));
    let rec_b = engine.recommend_for(Snapshot::new(b));
    assert_eq!(rec_a.state_index, rec_b.state_index);
    assert_eq!(rec_a.state_index, 0);
}

/// Recommendation floor/slot decomposition and congestion banding
#[test]
fn test_recommendation_fields() {
    let geometry = LotGeometry::new(5, 10).unwrap();
    let engine = AllocatorEngine::new(geometry, Some(8));
    let mut source = ScriptedSnapshotSource::repeat(Snapshot::new(vec![1; 50]));

    let rec = engine.recommend(&mut source);
    assert_eq!(rec.total_slots, 50);
    assert_eq!(rec.free_slots, 0);
    assert_eq!(rec.efficiency, 0.0);
    assert_eq!(rec.congestion, CongestionBand::High);
    assert_eq!(rec.floor, rec.action / 10);
    assert_eq!(rec.slot, rec.action % 10);
}

/// A custom allocator can be plugged into the engine
#[test]
fn test_engine_with_explicit_allocator() {
    let geometry = LotGeometry::new(1, 3).unwrap();
    let allocator = Box::new(TabularQAllocator::with_rates(3, 0.5, 0.0));
    let mut engine = AllocatorEngine::with_allocator(geometry, allocator, Some(4))
        .unwrap()
        .with_exploration_rate(0.0);
    let mut source = ScriptedSnapshotSource::repeat(Snapshot::new(vec![0, 0, 0]));

    let outcome = engine.train_step(&mut source);
    assert_eq!(outcome.updated_value, 5.0);
    assert_eq!(engine.stats().algorithm, "tabular_q");
}

/// Lots too large for a dense value table are refused before allocation
#[test]
fn test_oversized_lot_is_rejected() {
    let err = LotGeometry::new(100_000, 100_000).unwrap_err();
    assert!(err.to_string().contains("slot limit"));
    assert!(LotGeometry::new(usize::MAX, 2).is_err());
    assert!(LotGeometry::new(2, MAX_TOTAL_SLOTS / 2).is_ok());
}

/// Sources are usable through the trait object the engine takes
#[test]
fn test_sources_as_trait_objects() {
    let mut sources: Vec<Box<dyn SnapshotSource>> = vec![
        Box::new(RandomSnapshotSource::seeded(1)),
        Box::new(ScriptedSnapshotSource::repeat(Snapshot::new(vec![0, 1]))),
    ];
    for source in &mut sources {
        assert_eq!(source.next_snapshot(6).len(), 6);
    }
}
