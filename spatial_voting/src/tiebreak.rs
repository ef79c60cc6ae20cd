use log::debug;

use crate::config::*;

/// Sorts the candidates in case-insensitive alphabetical order.
/// Labels that only differ by case keep their relative order.
pub fn sorted_candidates(candidates: &[CandidateId]) -> Vec<CandidateId> {
    let mut res = candidates.to_vec();
    res.sort_by_cached_key(|c| c.to_lowercase());
    res
}

/// The first candidate in case-insensitive alphabetical order.
pub fn lexicographic_first(tied: &[CandidateId]) -> Option<CandidateId> {
    sorted_candidates(tied).into_iter().next()
}

/// The last candidate in case-insensitive alphabetical order.
///
/// This is the loser when several candidates have to be eliminated together.
pub fn lexicographic_last(tied: &[CandidateId]) -> Option<CandidateId> {
    let mut res = tied.to_vec();
    res.sort_by_cached_key(|c| std::cmp::Reverse(c.to_lowercase()));
    res.into_iter().next()
}

/// Picks a candidate that is hard to guess in advance but always the same
/// for the same duel records.
///
/// The label and the number of wins, losses and draws of each tied candidate
/// (in alphabetical order) are concatenated and hashed with SHA-256. The sum
/// of the characters of the hexadecimal digest, modulo the number of tied
/// candidates, is the index of the winner in `tied`, taken in the order given.
pub fn hashed_pick(
    tied: &[CandidateId],
    records: &[(CandidateId, DuelRecord)],
) -> Option<CandidateId> {
    if tied.is_empty() {
        return None;
    }
    let sorted = sorted_candidates(tied);
    let mut seed = String::new();
    for c in sorted.iter() {
        let (wins, losses, draws) = records
            .iter()
            .find(|(name, _)| name == c)
            .map(|(_, r)| (r.wins.len(), r.losses.len(), r.draws.len()))
            .unwrap_or((0, 0, 0));
        seed.push_str(&format!("{}{}{}{}", c, wins, losses, draws));
    }
    let digest = sha256::digest(seed.as_str());
    let total: u64 = digest.bytes().map(|b| b as u64).sum();
    let idx = (total % tied.len() as u64) as usize;
    debug!(
        "hashed_pick: seed: {:?} digest: {} index: {}",
        seed, digest, idx
    );
    tied.get(idx).cloned()
}

/// Resolves the candidates sharing the best score into a single winner.
///
/// The tied list is reported as given.
pub fn resolve_best(tied: Vec<CandidateId>) -> Option<WinnerResult> {
    let winner = lexicographic_first(&tied)?;
    Some(WinnerResult {
        winner,
        was_tie_broken: tied.len() > 1,
        tied_candidates: tied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(l: &[&str]) -> Vec<CandidateId> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lexicographic_ignores_case() {
        let tied = names(&["bob", "Charlie", "anna"]);
        assert_eq!(lexicographic_first(&tied), Some("anna".to_string()));
        assert_eq!(lexicographic_last(&tied), Some("Charlie".to_string()));
        assert_eq!(lexicographic_first(&[]), None);
    }

    #[test]
    fn resolve_single() {
        let res = resolve_best(names(&["D"]));
        assert_eq!(
            res,
            Some(WinnerResult {
                winner: "D".to_string(),
                was_tie_broken: false,
                tied_candidates: names(&["D"]),
            })
        );
        assert_eq!(resolve_best(Vec::new()), None);
    }

    #[test]
    fn resolve_keeps_tied_order() {
        let res = resolve_best(names(&["C", "B", "E"]));
        assert_eq!(
            res,
            Some(WinnerResult {
                winner: "B".to_string(),
                was_tie_broken: true,
                tied_candidates: names(&["C", "B", "E"]),
            })
        );
    }

    #[test]
    fn hashed_pick_is_reproducible() {
        let _ = env_logger::try_init();
        let record = |w: &[&str], l: &[&str]| DuelRecord {
            wins: names(w),
            losses: names(l),
            draws: Vec::new(),
        };
        let records = vec![
            ("A".to_string(), record(&["B"], &["C"])),
            ("B".to_string(), record(&["C"], &["A"])),
            ("C".to_string(), record(&["A"], &["B"])),
        ];
        let tied = names(&["C", "A", "B"]);
        let first = hashed_pick(&tied, &records);
        assert!(first.is_some());
        assert!(first.as_ref().map_or(false, |w| tied.contains(w)));
        for _ in 0..5 {
            assert_eq!(hashed_pick(&tied, &records), first);
        }
        // "A110B110C110" selects the second tied candidate.
        assert_eq!(first, Some("A".to_string()));
        assert_eq!(
            hashed_pick(&names(&["A", "C", "B"]), &records),
            Some("C".to_string())
        );
        assert_eq!(
            hashed_pick(&names(&["B", "A", "C"]), &records),
            Some("A".to_string())
        );
        assert_eq!(hashed_pick(&[], &records), None);
    }
}
