//! End-to-end placement scenarios and run-wide properties.

use place_solver::matching::diagnosis::Fit;
use place_solver::{
    GammaSweep, MatchOutcome, MatchingConfig, MatchingEngine, PlacementInput, PowerSearch,
    ProposalOrder, Reason, StudentRecord, Tier, UnitRecord,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Check the invariants every finished run must satisfy
fn assert_run_invariants(input: &PlacementInput, outcome: &MatchOutcome) {
    let mut placed = 0;
    for placement in &outcome.placements {
        let homes: Vec<&str> = outcome
            .units
            .iter()
            .filter(|u| u.members.contains(&placement.student))
            .map(|u| u.name.as_str())
            .collect();
        match &placement.unit {
            Some(unit) => {
                placed += 1;
                assert_eq!(homes, vec![unit.as_str()], "{} must sit in exactly one unit", placement.student);
            }
            None => {
                assert!(homes.is_empty());
                assert!(placement.reason.is_unmatched());
            }
        }
    }

    // Every proposal step advances exactly one pointer by one and no pointer
    // moves back, so the final positions add up to the step count
    let mut flat_total = 0;
    let mut examined_total = 0;
    for (record, fill) in input.distinct_units().zip(&outcome.units) {
        let flat_len = record.preferences.flatten().len();
        flat_total += flat_len;
        examined_total += fill.examined;
        assert!(fill.members.len() <= fill.capacity, "{} is over capacity", fill.name);
        assert!(fill.examined <= flat_len);
        assert_eq!(outcome.members_of(&fill.name), Some(fill.members.as_slice()));
    }
    assert_eq!(examined_total, outcome.proposals);
    assert_eq!(
        outcome.units.iter().map(|u| u.members.len()).sum::<usize>(),
        placed
    );
    assert!(outcome.proposals <= flat_total);
}

#[test]
fn test_mutual_first_choices() {
    let input = PlacementInput::new(
        vec![
            StudentRecord::new("A", vec![Tier::from("X"), Tier::from("Y")]),
            StudentRecord::new("B", vec![Tier::from("Y"), Tier::from("X")]),
        ],
        vec![
            UnitRecord::new("X", 1, vec![Tier::from(vec!["A", "B"])]),
            UnitRecord::new("Y", 1, vec![Tier::from(vec!["B", "A"])]),
        ],
    );

    let outcome = MatchingEngine::with_gamma(1.0).run_records(&input);
    assert_eq!(outcome.unit_of("A"), Some("X"));
    assert_eq!(outcome.unit_of("B"), Some("Y"));
    assert_eq!(outcome.unmatched_count(), 0);
    assert_run_invariants(&input, &outcome);
}

#[test]
fn test_power_overrides_stated_preference() {
    let input = PlacementInput::new(
        vec![StudentRecord::new("A", vec![Tier::from("X")])],
        vec![
            UnitRecord::new("X", 1, vec![Tier::from("Someone")]),
            UnitRecord::new("Y", 1, vec![Tier::from("A")]).with_power(1000.0),
        ],
    );

    let outcome = MatchingEngine::with_gamma(1.0).run_records(&input);
    assert_eq!(outcome.unit_of("A"), Some("Y"));

    let placement = outcome.placement("A").unwrap();
    assert!(matches!(
        placement.reason,
        Reason::Accepted {
            fit: Fit::Unranked { .. },
            ..
        }
    ));
    let text = placement.reason.to_string();
    assert!(text.contains("did not rank Y"));
    assert!(text.contains("power"));
    assert_run_invariants(&input, &outcome);
}

#[test]
fn test_equal_totals_never_switch() {
    // A at X scores 1 * (2 - 0) + 1.0, at Y scores 1 * (2 - 1) + 2.0: both 3.0
    let input = PlacementInput::new(
        vec![StudentRecord::new("A", vec![Tier::from("X"), Tier::from("Y")])],
        vec![
            UnitRecord::new("X", 1, vec![Tier::from("A")]).with_power(1.0),
            UnitRecord::new("Y", 1, vec![Tier::from("A")]).with_power(2.0),
        ],
    );

    for (order, first) in [
        (ProposalOrder::Input, "X"),
        (ProposalOrder::PowerDescending, "Y"),
    ] {
        let engine = MatchingEngine::with_config(MatchingConfig {
            gamma: 1.0,
            proposal_order: order,
        });
        let outcome = engine.run_records(&input);
        assert_eq!(outcome.unit_of("A"), Some(first));
        assert!(matches!(
            outcome.placement("A").unwrap().reason,
            Reason::Stayed { .. }
        ));
        assert_run_invariants(&input, &outcome);
    }
}

#[test]
fn test_sticky_power_preserved_for_any_iteration_count() {
    let input = PlacementInput::new(
        vec![
            StudentRecord::new("A", vec![Tier::from("X"), Tier::from("Y")]),
            StudentRecord::new("B", vec![Tier::from("X")]),
            StudentRecord::new("C", vec![Tier::from("Y"), Tier::from("X")]),
        ],
        vec![
            UnitRecord::new("X", 1, vec![Tier::from(vec!["A", "B", "C"])])
                .with_power(3.0)
                .sticky(),
            UnitRecord::new("Y", 1, vec![Tier::from("C"), Tier::from("A")]),
        ],
    );

    for iterations in [1, 3, 25, 200] {
        let search = PowerSearch {
            iterations,
            seed: Some(iterations as u64),
            ..PowerSearch::default()
        };
        let result = search.run(&input).unwrap();
        assert!((result.powers["X"] - 3.0).abs() < f64::EPSILON);
        assert!((result.outcome.unit("X").unwrap().power - 3.0).abs() < f64::EPSILON);
        assert_run_invariants(&input, &result.outcome);
    }
}

#[test]
fn test_search_stops_at_first_perfect_trial() {
    let input = PlacementInput::new(
        vec![
            StudentRecord::new("A", vec![Tier::from("X")]),
            StudentRecord::new("B", vec![Tier::from("Y")]),
            StudentRecord::new("C", vec![Tier::from("Z")]),
        ],
        vec![
            UnitRecord::new("X", 1, vec![Tier::from("A")]),
            UnitRecord::new("Y", 1, vec![Tier::from("B")]),
            UnitRecord::new("Z", 1, vec![Tier::from("C")]),
        ],
    );

    let baseline = MatchingEngine::with_gamma(1.0).run_records(&input);
    assert_eq!(baseline.unmatched_count(), 0);

    let search = PowerSearch {
        iterations: 200,
        seed: Some(99),
        ..PowerSearch::default()
    };
    let result = search.run(&input).unwrap();
    assert_eq!(result.unmatched, 0);
    assert_eq!(result.trials_run, 1);
}

#[test]
fn test_sweep_runs_on_fresh_state() {
    let input = PlacementInput::new(
        vec![
            StudentRecord::new("A", vec![Tier::from("X"), Tier::from("Y")]),
            StudentRecord::new("B", vec![Tier::from("X")]),
        ],
        vec![
            UnitRecord::new("X", 1, vec![Tier::from("A"), Tier::from("B")]),
            UnitRecord::new("Y", 1, vec![Tier::from("A")]).with_power(3.0),
        ],
    );
    let before = input.clone();

    let first = GammaSweep::default().run(&input).unwrap();
    let second = GammaSweep::default().run(&input).unwrap();
    assert_eq!(input, before);
    assert_eq!(first.outcome.matches(), second.outcome.matches());
    assert!((first.gamma - second.gamma).abs() < f64::EPSILON);
}

#[test]
fn test_invariants_hold_on_generated_inputs() {
    let mut rng = StdRng::seed_from_u64(2024);
    let students: Vec<String> = (0..15).map(|i| format!("S{i}")).collect();
    let units: Vec<String> = (0..5).map(|i| format!("U{i}")).collect();

    for _ in 0..40 {
        let student_records = students
            .iter()
            .map(|name| {
                let mut listed = units.clone();
                listed.shuffle(&mut rng);
                listed.truncate(rng.gen_range(0..=units.len()));
                let tiers: Vec<Tier> = listed.into_iter().map(Tier::Single).collect();
                StudentRecord::new(name.clone(), tiers).with_voice(rng.gen_range(0.5..3.0))
            })
            .collect();

        let unit_records = units
            .iter()
            .map(|name| {
                let mut listed = students.clone();
                listed.push("Ghost".to_string());
                listed.shuffle(&mut rng);
                listed.truncate(rng.gen_range(0..=listed.len()));
                let tiers: Vec<Tier> = listed
                    .chunks(rng.gen_range(1..=3))
                    .map(|chunk| Tier::Group(chunk.to_vec()))
                    .collect();
                UnitRecord::new(name.clone(), rng.gen_range(0..=4), tiers)
                    .with_power(rng.gen_range(0.5..10.0))
            })
            .collect();

        let input = PlacementInput::new(student_records, unit_records);
        let gamma = rng.gen_range(0.0..5.0);
        let outcome = MatchingEngine::with_gamma(gamma).run_records(&input);
        assert_run_invariants(&input, &outcome);

        let boosted = MatchingEngine::with_gamma(gamma).run_boosted(&input, 1.0);
        assert_run_invariants(&input, &boosted);
    }
}

#[test]
fn test_duplicate_names_use_first_record() {
    let input = PlacementInput::new(
        vec![
            StudentRecord::new("A", vec![Tier::from("X")]),
            StudentRecord::new("B", vec![Tier::from("X")]),
            StudentRecord::new("B", vec![Tier::from("Y")]),
        ],
        vec![
            UnitRecord::new("X", 1, vec![Tier::from("A")]).with_power(2.0),
            UnitRecord::new("X", 1, vec![Tier::from("B")])
                .with_power(9.0)
                .sticky(),
        ],
    );

    let outcome = MatchingEngine::with_gamma(1.0).run_records(&input);
    assert_eq!(outcome.units.len(), 1);
    assert_eq!(outcome.placements.len(), 2);
    assert_eq!(outcome.members_of("X"), Some(&["A".to_string()][..]));
    assert!((outcome.unit("X").unwrap().power - 2.0).abs() < f64::EPSILON);
    assert_eq!(outcome.unit_of("B"), None);
    assert_run_invariants(&input, &outcome);
}
