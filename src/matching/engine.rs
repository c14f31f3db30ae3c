use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::Serialize;

use crate::core::student::Student;
use crate::core::types::{PlacementInput, ProposalOrder};
use crate::core::unit::Unit;
use crate::matching::assignment::Assignment;
use crate::matching::demand::boost_voice_by_demand;
use crate::matching::diagnosis::Reason;
use crate::matching::scoring::ScoreComponents;

/// Default global multiplier on unit power
pub const DEFAULT_GAMMA: f64 = 1.0;

/// Where one student ended up, and why
#[derive(Debug, Clone, Serialize)]
pub struct Placement {
    pub student: String,
    pub unit: Option<String>,
    pub reason: Reason,
}

/// Final state of one unit after a run
#[derive(Debug, Clone, Serialize)]
pub struct UnitFill {
    pub name: String,
    pub capacity: usize,
    pub power: f64,

    /// Accepted students, in acceptance order
    pub members: Vec<String>,

    /// How far the unit got through its flattened preference list
    pub examined: usize,
}

impl UnitFill {
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.members.len())
    }
}

/// Result of one matching run
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    /// Gamma the run used
    pub gamma: f64,

    /// One entry per student, in input order
    pub placements: Vec<Placement>,

    /// One entry per unit, in input order
    pub units: Vec<UnitFill>,

    /// Number of proposal steps that yielded a candidate
    pub proposals: usize,
}

impl MatchOutcome {
    /// Student name -> unit name (or none)
    #[must_use]
    pub fn matches(&self) -> BTreeMap<&str, Option<&str>> {
        self.placements
            .iter()
            .map(|p| (p.student.as_str(), p.unit.as_deref()))
            .collect()
    }

    /// Student name -> explanation
    #[must_use]
    pub fn reasons(&self) -> BTreeMap<&str, String> {
        self.placements
            .iter()
            .map(|p| (p.student.as_str(), p.reason.to_string()))
            .collect()
    }

    #[must_use]
    pub fn unmatched_count(&self) -> usize {
        self.placements.iter().filter(|p| p.unit.is_none()).count()
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &str> {
        self.placements
            .iter()
            .filter(|p| p.unit.is_none())
            .map(|p| p.student.as_str())
    }

    pub fn placement(&self, student: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.student == student)
    }

    pub fn unit(&self, name: &str) -> Option<&UnitFill> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Students accepted by a unit, in acceptance order
    pub fn members_of(&self, unit: &str) -> Option<&[String]> {
        self.unit(unit).map(|u| u.members.as_slice())
    }

    /// Unit a student was placed in, if any
    pub fn unit_of(&self, student: &str) -> Option<&str> {
        self.placement(student).and_then(|p| p.unit.as_deref())
    }
}

/// Configuration for the matching engine
#[derive(Debug, Clone, Copy)]
pub struct MatchingConfig {
    /// Multiplier applied to every unit's power
    pub gamma: f64,
    /// Initial order of the proposal queue
    pub proposal_order: ProposalOrder,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            proposal_order: ProposalOrder::default(),
        }
    }
}

/// Weighted, unit-proposing deferred acceptance.
///
/// Units propose down their flattened preference lists. A free student accepts the
/// first offer; a placed student moves only when the proposer's total score is
/// strictly higher than the current unit's.
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    config: MatchingConfig,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn with_gamma(gamma: f64) -> Self {
        Self::with_config(MatchingConfig {
            gamma,
            ..MatchingConfig::default()
        })
    }

    /// Run on fresh state built from `input`
    #[must_use]
    pub fn run_records(&self, input: &PlacementInput) -> MatchOutcome {
        let (students, units) = input.snapshot();
        self.run(students, units)
    }

    /// Run on fresh state built from `input`, after boosting voices by demand
    #[must_use]
    pub fn run_boosted(&self, input: &PlacementInput, alpha: f64) -> MatchOutcome {
        let (mut students, units) = input.snapshot();
        boost_voice_by_demand(&mut students, &units, alpha);
        self.run(students, units)
    }

    /// Run deferred acceptance to a fixed point.
    ///
    /// Names in a unit's list that match no student are skipped. Duplicate student
    /// names are not detected; the first one wins.
    #[must_use]
    pub fn run(&self, students: Vec<Student>, mut units: Vec<Unit>) -> MatchOutcome {
        let gamma = self.config.gamma;
        let unit_count = units.len();

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(students.len());
        for (i, s) in students.iter().enumerate() {
            index.entry(s.name.as_str()).or_insert(i);
        }

        let mut assignment = Assignment::new(students.len(), unit_count);
        let mut reasons: Vec<Option<Reason>> = vec![None; students.len()];

        let mut initial: Vec<usize> = (0..unit_count)
            .filter(|&u| units[u].capacity > 0 && units[u].has_unexamined())
            .collect();
        if self.config.proposal_order == ProposalOrder::PowerDescending {
            initial.sort_by(|&a, &b| units[b].power.total_cmp(&units[a].power));
        }

        let mut in_queue = vec![false; unit_count];
        for &u in &initial {
            in_queue[u] = true;
        }
        let mut queue: VecDeque<usize> = initial.into();
        let mut proposals = 0usize;

        while let Some(u) = queue.pop_front() {
            in_queue[u] = false;
            if assignment.accepted_count(u) >= units[u].capacity {
                continue;
            }

            let Some(candidate) = units[u].next_candidate().map(|c| index.get(c).copied()) else {
                tracing::trace!(unit = %units[u].name, "no candidates left");
                continue;
            };
            proposals += 1;

            if let Some(s) = candidate {
                let student = &students[s];
                let offer = ScoreComponents::calculate(student, &units[u], unit_count, gamma);

                match assignment.unit_of(s) {
                    None => {
                        reasons[s] = Some(Reason::accepted(
                            &units[u].name,
                            &offer,
                            student.voice,
                            units[u].power,
                            gamma,
                            student.preferences.tier_count(),
                        ));
                        assignment.place(s, u);
                        tracing::debug!(
                            student = %student.name,
                            unit = %units[u].name,
                            total = offer.total,
                            "accepted first offer"
                        );
                    }
                    Some(current) if current == u => {}
                    Some(current) => {
                        let held =
                            ScoreComponents::calculate(student, &units[current], unit_count, gamma);
                        if offer.beats(&held) {
                            reasons[s] = Some(Reason::switched(
                                &units[current].name,
                                &units[u].name,
                                &held,
                                &offer,
                            ));
                            assignment.place(s, u);
                            tracing::debug!(
                                student = %student.name,
                                from = %units[current].name,
                                to = %units[u].name,
                                old_total = held.total,
                                new_total = offer.total,
                                "switched"
                            );
                            if !in_queue[current]
                                && assignment.accepted_count(current) < units[current].capacity
                                && units[current].has_unexamined()
                            {
                                in_queue[current] = true;
                                queue.push_back(current);
                            }
                        } else {
                            reasons[s] = Some(Reason::stayed(
                                &units[current].name,
                                &units[u].name,
                                &held,
                                &offer,
                            ));
                            tracing::debug!(
                                student = %student.name,
                                kept = %units[current].name,
                                rejected = %units[u].name,
                                "stayed"
                            );
                        }
                    }
                }
            } else {
                tracing::trace!(
                    unit = %units[u].name,
                    position = units[u].preference_pointer() - 1,
                    "skipping unknown student"
                );
            }

            debug_assert!(assignment.accepted_count(u) <= units[u].capacity);

            if !in_queue[u]
                && assignment.accepted_count(u) < units[u].capacity
                && units[u].has_unexamined()
            {
                in_queue[u] = true;
                queue.push_back(u);
            }
        }

        debug_assert!(assignment.is_consistent());

        let placements: Vec<Placement> = students
            .iter()
            .enumerate()
            .map(|(s, student)| {
                let unit = assignment.unit_of(s).map(|u| units[u].name.clone());
                let reason = match (&unit, reasons[s].take()) {
                    (Some(_), Some(reason)) => reason,
                    _ => Reason::Unmatched,
                };
                Placement {
                    student: student.name.clone(),
                    unit,
                    reason,
                }
            })
            .collect();

        let fills: Vec<UnitFill> = units
            .iter()
            .enumerate()
            .map(|(u, unit)| UnitFill {
                name: unit.name.clone(),
                capacity: unit.capacity,
                power: unit.power,
                members: assignment
                    .members(u)
                    .iter()
                    .map(|&s| students[s].name.clone())
                    .collect(),
                examined: unit.preference_pointer(),
            })
            .collect();

        let outcome = MatchOutcome {
            gamma,
            placements,
            units: fills,
            proposals,
        };

        tracing::debug!(
            gamma,
            proposals,
            unmatched = outcome.unmatched_count(),
            "matching run finished"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preference::{Preferences, Tier};
    use crate::core::student::StudentRecord;
    use crate::core::unit::UnitRecord;
    use crate::matching::diagnosis::{Fit, StayCause};

    fn scenario_a() -> PlacementInput {
        PlacementInput::new(
            vec![
                StudentRecord::new("A", vec![Tier::from("X"), Tier::from("Y")]),
                StudentRecord::new("B", vec![Tier::from("Y"), Tier::from("X")]),
            ],
            vec![
                UnitRecord::new("X", 1, vec![Tier::from(vec!["A", "B"])]),
                UnitRecord::new("Y", 1, vec![Tier::from(vec!["B", "A"])]),
            ],
        )
    }

    fn assert_invariants(input: &PlacementInput, outcome: &MatchOutcome) {
        for fill in &outcome.units {
            assert!(fill.members.len() <= fill.capacity, "{} over capacity", fill.name);
        }
        for placement in &outcome.placements {
            let holders: Vec<&str> = outcome
                .units
                .iter()
                .filter(|u| u.members.contains(&placement.student))
                .map(|u| u.name.as_str())
                .collect();
            match &placement.unit {
                Some(unit) => assert_eq!(holders, vec![unit.as_str()]),
                None => assert!(holders.is_empty()),
            }
        }
        let bound: usize = input.units.iter().map(|u| u.preferences.flatten().len()).sum();
        assert!(outcome.proposals <= bound);
    }

    #[test]
    fn test_scenario_a() {
        let input = scenario_a();
        let outcome = MatchingEngine::with_gamma(1.0).run_records(&input);

        assert_eq!(outcome.unit_of("A"), Some("X"));
        assert_eq!(outcome.unit_of("B"), Some("Y"));
        assert_eq!(outcome.unmatched_count(), 0);
        assert_invariants(&input, &outcome);
    }

    #[test]
    fn test_power_override_for_unranked_unit() {
        let input = PlacementInput::new(
            vec![StudentRecord::new("A", vec![Tier::from("X")])],
            vec![
                UnitRecord::new("X", 1, Preferences::default()),
                UnitRecord::new("Y", 1, vec![Tier::from("A")]).with_power(1000.0),
            ],
        );
        let outcome = MatchingEngine::with_gamma(1.0).run_records(&input);

        assert_eq!(outcome.unit_of("A"), Some("Y"));
        let reason = &outcome.placement("A").unwrap().reason;
        assert!(matches!(reason, Reason::Accepted { fit: Fit::Unranked { .. }, .. }));
        assert!(reason.to_string().contains("power"));
    }

    #[test]
    fn test_equal_totals_do_not_switch() {
        // A ties X and Y; equal power, so Y's proposal scores exactly the same
        let input = PlacementInput::new(
            vec![StudentRecord::new("A", vec![Tier::from(vec!["X", "Y"])])],
            vec![
                UnitRecord::new("X", 1, vec![Tier::from("A")]),
                UnitRecord::new("Y", 1, vec![Tier::from("A")]),
            ],
        );
        let engine = MatchingEngine::with_config(MatchingConfig {
            gamma: 1.0,
            proposal_order: ProposalOrder::Input,
        });
        let outcome = engine.run_records(&input);

        assert_eq!(outcome.unit_of("A"), Some("X"));
        assert!(matches!(
            outcome.placement("A").unwrap().reason,
            Reason::Stayed {
                cause: StayCause::IncumbentStronger,
                ..
            }
        ));
        assert_eq!(outcome.unit("Y").unwrap().members.len(), 0);
    }

    #[test]
    fn test_strictly_better_offer_switches_and_frees_slot() {
        // X proposes first; Y is preferred and equally strong, so A moves.
        // X then falls back to B.
        let input = PlacementInput::new(
            vec![
                StudentRecord::new("A", vec![Tier::from("Y"), Tier::from("X")]),
                StudentRecord::new("B", vec![Tier::from("X")]),
            ],
            vec![
                UnitRecord::new("X", 1, vec![Tier::from("A"), Tier::from("B")]),
                UnitRecord::new("Y", 1, vec![Tier::from("A")]),
            ],
        );
        let engine = MatchingEngine::with_config(MatchingConfig {
            gamma: 1.0,
            proposal_order: ProposalOrder::Input,
        });
        let outcome = engine.run_records(&input);

        assert_eq!(outcome.unit_of("A"), Some("Y"));
        assert_eq!(outcome.unit_of("B"), Some("X"));
        assert!(matches!(
            outcome.placement("A").unwrap().reason,
            Reason::Switched { .. }
        ));
        assert!(outcome.reasons()["A"].contains("2nd → 1st"));
        assert_invariants(&input, &outcome);
    }

    #[test]
    fn test_unmatched_reason_and_dangling_names() {
        let input = PlacementInput::new(
            vec![
                StudentRecord::new("A", vec![Tier::from("X")]),
                StudentRecord::new("B", vec![Tier::from("X")]),
            ],
            vec![UnitRecord::new(
                "X",
                1,
                vec![Tier::from("ghost"), Tier::from("A"), Tier::from("B")],
            )],
        );
        let outcome = MatchingEngine::new().run_records(&input);

        assert_eq!(outcome.unit_of("A"), Some("X"));
        assert_eq!(outcome.unit_of("B"), None);
        assert!(outcome.placement("B").unwrap().reason.is_unmatched());
        assert_eq!(outcome.unmatched().collect::<Vec<_>>(), vec!["B"]);
        // The dangling name still consumes a step
        assert_eq!(outcome.proposals, 2);
        assert_invariants(&input, &outcome);
    }

    #[test]
    fn test_zero_capacity_and_empty_lists_never_propose() {
        let input = PlacementInput::new(
            vec![StudentRecord::new("A", vec![Tier::from("X")])],
            vec![
                UnitRecord::new("X", 0, vec![Tier::from("A")]),
                UnitRecord::new("Y", 2, Preferences::default()),
            ],
        );
        let outcome = MatchingEngine::new().run_records(&input);

        assert_eq!(outcome.proposals, 0);
        assert_eq!(outcome.unmatched_count(), 1);
        assert_eq!(outcome.unit("X").unwrap().examined, 0);
    }

    #[test]
    fn test_power_descending_order_proposes_strong_units_first() {
        // Both units list A and A ranks them equally; whoever proposes first keeps A
        let input = PlacementInput::new(
            vec![StudentRecord::new("A", vec![Tier::from(vec!["X", "Y"])])],
            vec![
                UnitRecord::new("X", 1, vec![Tier::from("A")]).with_power(1.0),
                UnitRecord::new("Y", 1, vec![Tier::from("A")]).with_power(1.0),
                UnitRecord::new("Z", 1, vec![Tier::from("A")]).with_power(5.0),
            ],
        );
        let outcome = MatchingEngine::new().run_records(&input);
        assert_eq!(outcome.unit_of("A"), Some("Z"));
        assert!(matches!(
            outcome.placement("A").unwrap().reason,
            Reason::Stayed { .. }
        ));
    }

    #[test]
    fn test_capacity_respected_with_many_proposals() {
        let students: Vec<StudentRecord> = (0..12)
            .map(|i| {
                let prefs = if i % 2 == 0 {
                    vec![Tier::from("X"), Tier::from("Y"), Tier::from("Z")]
                } else {
                    vec![Tier::from("Z"), Tier::from(vec!["X", "Y"])]
                };
                StudentRecord::new(format!("s{i}"), prefs)
            })
            .collect();
        let names: Vec<String> = students.iter().map(|s| s.name.clone()).collect();
        let all = |rev: bool| {
            let mut order: Vec<&str> = names.iter().map(String::as_str).collect();
            if rev {
                order.reverse();
            }
            Preferences::new(order.into_iter().map(Tier::from).collect())
        };
        let input = PlacementInput::new(
            students,
            vec![
                UnitRecord::new("X", 3, all(false)).with_power(2.0),
                UnitRecord::new("Y", 2, all(true)).with_power(7.0),
                UnitRecord::new("Z", 4, all(false)).with_power(0.5),
            ],
        );

        for gamma in [0.0, 0.5, 1.0, 3.0] {
            let outcome = MatchingEngine::with_gamma(gamma).run_boosted(&input, 1.0);
            assert_invariants(&input, &outcome);
            assert_eq!(outcome.unmatched_count(), 12 - 9);
        }
    }
}
