//! Property tests for the Deferred Acceptance engine.
//!
//! These tests verify, over many seeded random instances:
//! 1. Every round is stable and injective
//! 2. Proposals never exceed the sum of candidate list lengths
//! 3. Multi-round results never repeat a pair
//! 4. Re-running on the same lists reproduces the same digests
//!
//! ## Running
//!
//! ```bash
//! cargo test --release --test stability_test -- --nocapture
//! ```

use std::collections::HashSet;

use deferred_match::engine::verify::{check_injective, find_blocking_pair, verify_rounds};
use deferred_match::report::{pair_rows, write_pair_files, write_round_file, DisplacementReport};
use deferred_match::{AgentId, MatchError, MatchingEngine, Pair, PreferenceStore, ProposalOutcome};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Random instances checked per property
const INSTANCES: u64 = 200;

/// Largest population per side
const MAX_AGENTS: usize = 30;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Random list over `1..=population`, with occasional out-of-range entries.
fn random_list(rng: &mut ChaCha8Rng, population: usize) -> Vec<AgentId> {
    let mut ids: Vec<AgentId> = (1..=population as AgentId).collect();
    ids.shuffle(rng);
    ids.truncate(rng.gen_range(0..=population));

    if rng.gen_bool(0.1) {
        let position = rng.gen_range(0..=ids.len());
        ids.insert(position, population as AgentId + rng.gen_range(1..5));
    }

    ids
}

/// Generate a deterministic random instance; same seed = same lists.
fn generate_instance(seed: u64) -> PreferenceStore {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let candidates = rng.gen_range(0..=MAX_AGENTS);
    let employers = rng.gen_range(0..=MAX_AGENTS);

    let candidate_lists = (0..candidates).map(|_| random_list(&mut rng, employers)).collect();
    let employer_lists = (0..employers).map(|_| random_list(&mut rng, candidates)).collect();

    PreferenceStore::from_lists(candidate_lists, employer_lists)
}

fn scenario_store() -> PreferenceStore {
    PreferenceStore::from_lists(
        vec![vec![2, 1, 3], vec![1, 3, 2], vec![1, 2, 3]],
        vec![vec![1, 2, 3], vec![2, 1, 3], vec![1, 3, 2]],
    )
}

// ============================================================================
// SINGLE ROUND PROPERTIES
// ============================================================================

#[test]
fn single_round_is_stable_and_injective() {
    let mut engine = MatchingEngine::new();

    for seed in 0..INSTANCES {
        let store = generate_instance(seed);
        let result = engine.run_round(&store);

        assert!(check_injective(&result.matches), "seed {seed}: not injective");
        assert_eq!(
            find_blocking_pair(&store, &result.matches),
            None,
            "seed {seed}: blocking pair found"
        );
    }
}

#[test]
fn proposals_bounded_by_list_lengths() {
    let mut engine = MatchingEngine::new();

    for seed in 0..INSTANCES {
        let store = generate_instance(seed);
        let result = engine.run_round(&store);

        assert!(
            result.proposals.len() <= store.total_candidate_entries(),
            "seed {seed}: {} proposals for {} entries",
            result.proposals.len(),
            store.total_candidate_entries()
        );
    }
}

#[test]
fn matched_pairs_are_mutually_acceptable() {
    let mut engine = MatchingEngine::new();

    for seed in 0..INSTANCES {
        let store = generate_instance(seed);
        let result = engine.run_round(&store);

        for pair in result.pairs() {
            assert!(store.candidate_prefs(pair.candidate).contains(&pair.employer));
            assert!(store.employer_prefs(pair.employer).contains(&pair.candidate));
        }
    }
}

#[test]
fn proposal_log_is_consistent_with_final_matches() {
    let mut engine = MatchingEngine::new();

    for seed in 0..INSTANCES {
        let store = generate_instance(seed);
        let result = engine.run_round(&store);

        // Each candidate proposes down its list in order, never repeating
        let mut next: Vec<usize> = vec![0; store.candidate_count()];
        for proposal in &result.proposals {
            let i = (proposal.candidate - 1) as usize;
            assert_eq!(store.candidate_prefs(proposal.candidate)[next[i]], proposal.employer);
            next[i] += 1;
        }

        // A matched candidate's last proposal was accepted by its employer
        for pair in result.pairs() {
            let last = result
                .proposals
                .iter()
                .rev()
                .find(|p| p.candidate == pair.candidate)
                .expect("matched candidate must have proposed");
            assert_eq!(last.employer, pair.employer);
            assert!(last.outcome.is_accepted());
        }
    }
}

#[test]
fn rerun_reproduces_digest() {
    for seed in 0..INSTANCES {
        let store = generate_instance(seed);

        let first = MatchingEngine::new().run_round(&store);
        let second = MatchingEngine::new().run_round(&store);

        assert_eq!(first.digest().unwrap(), second.digest().unwrap());
        assert_eq!(first.proposals, second.proposals);
    }
}

// ============================================================================
// MULTI ROUND PROPERTIES
// ============================================================================

#[test]
fn multi_round_pairs_never_repeat() {
    let mut engine = MatchingEngine::new();

    for seed in 0..INSTANCES {
        let store = generate_instance(seed);
        let snapshot = store.clone();
        let rounds = engine.run_multi_round(&store, 6).unwrap();

        let mut seen: HashSet<Pair> = HashSet::new();
        for round in &rounds {
            assert!(!round.is_empty(), "seed {seed}: empty round kept");
            for pair in round.pairs() {
                assert!(seen.insert(pair.clone()), "seed {seed}: {pair:?} repeated");
            }
        }

        assert!(rounds.len() <= 6);
        assert_eq!(store, snapshot, "seed {seed}: input store mutated");
        verify_rounds(&store, &rounds).unwrap();
    }
}

#[test]
fn multi_round_first_round_equals_single_round() {
    let mut engine = MatchingEngine::new();

    for seed in 0..INSTANCES {
        let store = generate_instance(seed);

        let single = engine.run_round(&store);
        let rounds = engine.run_multi_round(&store, 3).unwrap();

        match rounds.first() {
            Some(first) => assert_eq!(first.digest().unwrap(), single.digest().unwrap()),
            None => assert!(single.is_empty()),
        }
    }
}

#[test]
fn multi_round_consumes_every_acceptable_pair() {
    // Rounds only stop once no mutually acceptable pair is left, so complete
    // lists on an n x n market end with all n * n pairs used
    let n = 6;
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let complete = |rng: &mut ChaCha8Rng| -> Vec<Vec<AgentId>> {
        (0..n)
            .map(|_| {
                let mut list: Vec<AgentId> = (1..=n as AgentId).collect();
                list.shuffle(rng);
                list
            })
            .collect()
    };
    let candidates = complete(&mut rng);
    let employers = complete(&mut rng);
    let store = PreferenceStore::from_lists(candidates, employers);

    let rounds = MatchingEngine::new().run_multi_round(&store, 100).unwrap();

    let total: usize = rounds.iter().map(|r| r.matches.len()).sum();
    assert_eq!(total, n * n);
    assert_eq!(rounds[0].matches.len(), n);
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn scenario_three_by_three() {
    let result = MatchingEngine::new().run_round(&scenario_store());

    assert_eq!(
        result.pairs(),
        vec![Pair::new(1, 2), Pair::new(2, 1), Pair::new(3, 3)]
    );
}

#[test]
fn scenario_employer_with_empty_list() {
    let store = PreferenceStore::from_lists(
        vec![vec![2, 1], vec![2, 1], vec![2], vec![1, 2]],
        vec![vec![1, 2, 3, 4], vec![]],
    );

    let rounds = MatchingEngine::new().run_multi_round(&store, 5).unwrap();

    assert!(!rounds.is_empty());
    for round in &rounds {
        assert_eq!(round.matches.candidate_of(2), None);
        assert!(round
            .proposals
            .iter()
            .filter(|p| p.employer == 2)
            .all(|p| p.outcome == ProposalOutcome::Rejected));
    }
}

#[test]
fn scenario_two_rounds_mutual() {
    let store = PreferenceStore::from_lists(
        vec![vec![1, 2], vec![2, 1]],
        vec![vec![1, 2], vec![2, 1]],
    );

    let rounds = MatchingEngine::new().run_multi_round(&store, 2).unwrap();

    assert_eq!(rounds[0].pairs(), vec![Pair::new(1, 1), Pair::new(2, 2)]);
    assert_eq!(rounds[1].pairs(), vec![Pair::new(1, 2), Pair::new(2, 1)]);

    let first: HashSet<Pair> = rounds[0].pairs().into_iter().collect();
    assert!(rounds[1].pairs().iter().all(|p| !first.contains(p)));
}

// ============================================================================
// END TO END
// ============================================================================

#[test]
fn malformed_file_aborts_with_row() {
    let err = PreferenceStore::from_text("1,2\n2,1\n", "1,2\n2,x,1\n").unwrap_err();

    match err {
        MatchError::MalformedInput { row, token, .. } => {
            assert_eq!(row, 2);
            assert_eq!(token, "x");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn files_in_files_out() {
    let dir = tempfile::tempdir().unwrap();
    let candidates_path = dir.path().join("candidate_preferences.csv");
    let employers_path = dir.path().join("job_preferences.csv");
    std::fs::write(&candidates_path, "2,1,3\n1,3,2\n1,2,3\n").unwrap();
    std::fs::write(&employers_path, "1,2,3,0\n2,1,3,0\n1,3,2,0\n").unwrap();

    let store = PreferenceStore::from_files(&candidates_path, &employers_path).unwrap();
    let mut engine = MatchingEngine::new();

    // Single round
    let result = engine.run_round(&store);
    let round_path = dir.path().join("matching_results.csv");
    write_round_file(&round_path, &result).unwrap();
    assert_eq!(
        std::fs::read_to_string(&round_path).unwrap(),
        "# Matching Results\nemployer,matched_candidate\n1,2\n2,1\n3,3\n"
    );
    let metrics = result.metrics();
    assert_eq!(metrics.total_proposals, 5);
    assert_eq!(metrics.average_proposals.to_string(), "1.67");
    assert_eq!(metrics.unmatched_candidates, 0);

    // Multi round
    let rounds = engine.run_multi_round(&store, 10).unwrap();
    assert_eq!(rounds.len(), 3);
    let candidate_out = dir.path().join("candidate_pairs.csv");
    let employer_out = dir.path().join("job_pairs.csv");
    write_pair_files(&candidate_out, &employer_out, &rounds, 3, 3).unwrap();

    let (candidate_rows, employer_rows) = pair_rows(&rounds, 3, 3);
    let candidate_text = std::fs::read_to_string(&candidate_out).unwrap();
    let employer_text = std::fs::read_to_string(&employer_out).unwrap();
    assert_eq!(candidate_text.lines().count(), 3);
    assert_eq!(employer_text.lines().count(), 3);
    assert!(candidate_text.starts_with("2,"));
    for row in candidate_rows.iter().chain(employer_rows.iter()) {
        let distinct: HashSet<_> = row.iter().collect();
        assert_eq!(distinct.len(), row.len());
        assert_eq!(row.len(), 3);
    }

    let report = DisplacementReport::compute(&store, &rounds);
    assert_eq!(report.rounds.len(), 3);
    assert!(report.rounds[0].candidate_avg <= report.rounds[2].candidate_avg);
}
