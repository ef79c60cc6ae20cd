use log::debug;

use crate::config::*;
use crate::tiebreak::resolve_best;

// All the functions below expect profiles that have been checked:
// at least one voter, no empty profile, the same candidates everywhere.

fn finish(method: &str, scores: ScoreTable<u64>) -> ScoringStats {
    debug!("{}: scores: {:?}", method, scores);
    let outcome = resolve_best(scores.highest());
    debug!("{}: outcome: {:?}", method, outcome);
    ScoringStats { scores, outcome }
}

/// One point for the first choice of each voter.
pub(crate) fn plurality(profiles: &Profiles) -> ScoringStats {
    let mut scores: ScoreTable<u64> = ScoreTable::new();
    for p in profiles.profiles() {
        if let Some(first) = p.first() {
            scores.add(&first.candidate, 1);
        }
    }
    finish("plurality", scores)
}

/// One point for every candidate but the last choice of each voter.
pub(crate) fn veto(profiles: &Profiles) -> ScoringStats {
    let candidates = profiles.candidates();
    if let [single] = candidates.as_slice() {
        debug!("veto: single candidate {}", single);
        return ScoringStats {
            scores: ScoreTable::new(),
            outcome: Some(WinnerResult {
                winner: single.clone(),
                was_tie_broken: false,
                tied_candidates: vec![single.clone()],
            }),
        };
    }
    let mut scores: ScoreTable<u64> = ScoreTable::new();
    for p in profiles.profiles() {
        let kept = p.len().saturating_sub(1);
        for pref in p.preferences().iter().take(kept) {
            scores.add(&pref.candidate, 1);
        }
    }
    finish("veto", scores)
}

/// `maximum` points for the first choice, `step` points less for each
/// following rank, never less than 0.
pub(crate) fn borda(profiles: &Profiles, params: &BordaParams) -> ScoringStats {
    let mut scores: ScoreTable<u64> = ScoreTable::new();
    for p in profiles.profiles() {
        for (rank, pref) in p.preferences().iter().enumerate() {
            let points = params
                .maximum
                .saturating_sub((rank as u64).saturating_mul(params.step));
            if points > 0 {
                scores.add(&pref.candidate, points);
            }
        }
    }
    finish("borda", scores)
}

/// True if the candidate lies within the approval zone of the voter.
pub(crate) fn is_approved(affinity: f64, approval_radius: f64) -> bool {
    affinity >= (100.0 - approval_radius) / 100.0
}

/// One point for every candidate within the approval radius of each voter.
pub(crate) fn approval(profiles: &Profiles, params: &ApprovalParams) -> ScoringStats {
    let mut scores: ScoreTable<u64> = ScoreTable::new();
    for p in profiles.profiles() {
        for pref in p.preferences() {
            if is_approved(pref.affinity, params.approval_radius) {
                scores.add(&pref.candidate, 1);
            }
        }
    }
    finish("approval", scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles(data: &[(&str, &[(&str, f64)])]) -> Profiles {
        let mut res = Profiles::new();
        for (voter, prefs) in data {
            let p = Profile::new(*prefs).unwrap();
            res.insert(voter, p).unwrap();
        }
        res
    }

    fn names(l: &[&str]) -> Vec<CandidateId> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plurality_counts_first_choices() {
        let ps = profiles(&[
            ("1", &[("A", 0.9), ("B", 0.5)]),
            ("2", &[("B", 0.8), ("A", 0.1)]),
            ("3", &[("A", 0.7), ("B", 0.6)]),
        ]);
        let stats = plurality(&ps);
        assert_eq!(stats.scores.get("A"), Some(2));
        assert_eq!(stats.scores.get("B"), Some(1));
        let outcome = stats.outcome.unwrap();
        assert_eq!(outcome.winner, "A");
        assert!(!outcome.was_tie_broken);
    }

    #[test]
    fn veto_single_candidate() {
        let ps = profiles(&[("1", &[("A", 0.9)]), ("2", &[("A", 0.2)])]);
        let outcome = veto(&ps).outcome.unwrap();
        assert_eq!(outcome.winner, "A");
        assert!(!outcome.was_tie_broken);
        assert_eq!(outcome.tied_candidates, names(&["A"]));
    }

    #[test]
    fn veto_skips_last_choice() {
        let ps = profiles(&[
            ("1", &[("A", 0.9), ("B", 0.5), ("C", 0.1)]),
            ("2", &[("B", 0.8), ("C", 0.3), ("A", 0.1)]),
        ]);
        let stats = veto(&ps);
        assert_eq!(stats.scores.get("A"), Some(1));
        assert_eq!(stats.scores.get("B"), Some(2));
        assert_eq!(stats.scores.get("C"), Some(1));
        assert_eq!(stats.outcome.unwrap().winner, "B");
    }

    #[test]
    fn borda_never_negative() {
        let ps = profiles(&[("1", &[("A", 0.9), ("B", 0.5), ("C", 0.4), ("D", 0.1)])]);
        let stats = borda(&ps, &BordaParams { maximum: 3, step: 2 });
        assert_eq!(stats.scores.get("A"), Some(3));
        assert_eq!(stats.scores.get("B"), Some(1));
        // Ranks with no points are not credited.
        assert!(!stats.scores.contains("C"));
        assert!(!stats.scores.contains("D"));

        let empty = borda(&ps, &BordaParams { maximum: 0, step: 1 });
        assert!(empty.scores.is_empty());
        assert_eq!(empty.outcome, None);
    }

    #[test]
    fn borda_ranking_stable_when_maximum_grows() {
        let ps = profiles(&[
            ("1", &[("A", 0.9), ("B", 0.5), ("C", 0.4)]),
            ("2", &[("B", 0.9), ("C", 0.5), ("A", 0.4)]),
            ("3", &[("A", 0.9), ("C", 0.5), ("B", 0.4)]),
        ]);
        let small = borda(&ps, &BordaParams { maximum: 3, step: 1 });
        let large = borda(&ps, &BordaParams { maximum: 10, step: 1 });
        let cmp = |s: &ScoringStats, a: &str, b: &str| s.scores.get(a).cmp(&s.scores.get(b));
        for (a, b) in [("A", "B"), ("A", "C"), ("B", "C")] {
            assert_eq!(cmp(&small, a, b), cmp(&large, a, b));
        }
    }

    #[test]
    fn approval_boundary_is_inclusive() {
        assert!(is_approved(0.75, 25.0));
        assert!(!is_approved(0.74, 25.0));
        assert!(is_approved(0.0, 100.0));
        assert!(!is_approved(0.99, 0.0));
        assert!(is_approved(1.0, 0.0));
        assert!(is_approved(0.29, 71.0));
        assert!(is_approved(0.57, 43.0));
        assert!(!is_approved(0.28, 71.0));
    }

    #[test]
    fn approval_at_the_radius() {
        for (affinity, radius) in [(0.29, 71.0), (0.57, 43.0)] {
            let ps = profiles(&[("1", &[("A", affinity), ("B", 0.1)])]);
            let stats = approval(&ps, &ApprovalParams { approval_radius: radius });
            assert_eq!(stats.scores.get("A"), Some(1));
            assert_eq!(stats.outcome.unwrap().winner, "A");
        }
    }

    #[test]
    fn approval_without_approvals() {
        let ps = profiles(&[("1", &[("A", 0.5), ("B", 0.2)])]);
        let stats = approval(&ps, &ApprovalParams { approval_radius: 10.0 });
        assert!(stats.scores.is_empty());
        assert_eq!(stats.outcome, None);
    }
}
