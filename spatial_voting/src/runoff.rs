use log::{debug, info};

use crate::config::*;
use crate::tiebreak::lexicographic_last;

fn compute_tally(profiles: &Profiles) -> Vec<(CandidateId, u64)> {
    // Every candidate still running appears, even without any first choice.
    let mut tally: Vec<(CandidateId, u64)> = profiles
        .candidates()
        .into_iter()
        .map(|c| (c, 0))
        .collect();
    for p in profiles.profiles() {
        if let Some(first) = p.first() {
            if let Some((_, count)) = tally.iter_mut().find(|(c, _)| *c == first.candidate) {
                *count += 1;
            }
        }
    }
    tally
}

fn lowest(tally: &[(CandidateId, u64)]) -> Vec<CandidateId> {
    match tally.iter().map(|(_, count)| *count).min() {
        None => Vec::new(),
        Some(min_count) => tally
            .iter()
            .filter(|(_, count)| *count == min_count)
            .map(|(c, _)| c.clone())
            .collect(),
    }
}

/// Instant runoff over a private copy of the profiles.
///
/// Each round, a candidate with strictly more than half of the first choices
/// of the voters wins. Otherwise, the candidate with the fewest first choices
/// is removed from every profile (the alphabetically last one among equals).
pub(crate) fn instant_runoff(profiles: &Profiles) -> RunoffStats {
    let mut remaining: Profiles = profiles.clone();
    let threshold = (remaining.len() as u64) / 2 + 1;
    info!(
        "instant_runoff: {} voters, threshold: {}",
        remaining.len(),
        threshold
    );
    let mut round_stats: Vec<RunoffRound> = Vec::new();

    loop {
        let round = round_stats.len() as u32 + 1;
        let tally = compute_tally(&remaining);
        debug!("instant_runoff: round {}: tally: {:?}", round, tally);

        let winner = tally
            .iter()
            .find(|(_, count)| *count >= threshold)
            .map(|(c, _)| c.clone())
            .or_else(|| match tally.as_slice() {
                [(c, _)] => Some(c.clone()),
                _ => None,
            });
        if let Some(winner) = winner {
            info!("instant_runoff: round {}: elected {}", round, winner);
            round_stats.push(RunoffRound {
                round,
                tally,
                eliminated: None,
                lowest: Vec::new(),
            });
            return RunoffStats {
                threshold,
                round_stats,
                outcome: Some(WinnerResult {
                    winner,
                    was_tie_broken: false,
                    tied_candidates: Vec::new(),
                }),
            };
        }

        let all_lowest = lowest(&tally);
        let eliminated = match lexicographic_last(&all_lowest) {
            Some(c) => c,
            None => {
                return RunoffStats {
                    threshold,
                    round_stats,
                    outcome: None,
                }
            }
        };
        debug!(
            "instant_runoff: round {}: lowest: {:?} eliminated: {}",
            round, all_lowest, eliminated
        );
        remaining.remove_candidate(&eliminated);
        round_stats.push(RunoffRound {
            round,
            tally,
            eliminated: Some(eliminated),
            lowest: all_lowest,
        });
    }
}
