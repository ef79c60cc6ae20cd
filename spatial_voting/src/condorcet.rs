use log::{debug, info};

use crate::config::*;
use crate::tiebreak::{hashed_pick, lexicographic_first, sorted_candidates};

/// Runs every head-to-head comparison between the candidates, given in
/// canonical order. A voter counts for the candidate ranked higher.
fn run_duels(profiles: &Profiles, candidates: &[CandidateId]) -> Vec<Duel> {
    let mut duels: Vec<Duel> = Vec::new();
    for (idx, first) in candidates.iter().enumerate() {
        for second in candidates.iter().skip(idx + 1) {
            let mut duel = Duel {
                first: first.clone(),
                second: second.clone(),
                first_votes: 0,
                second_votes: 0,
            };
            for p in profiles.profiles() {
                match (p.position(first), p.position(second)) {
                    (Some(a), Some(b)) if a < b => duel.first_votes += 1,
                    (Some(_), Some(_)) => duel.second_votes += 1,
                    _ => {}
                }
            }
            debug!("run_duels: {:?}", duel);
            duels.push(duel);
        }
    }
    duels
}

fn record_mut<'a>(
    records: &'a mut [(CandidateId, DuelRecord)],
    name: &str,
) -> Option<&'a mut DuelRecord> {
    records.iter_mut().find(|(c, _)| c == name).map(|(_, r)| r)
}

fn duel_records(candidates: &[CandidateId], duels: &[Duel]) -> Vec<(CandidateId, DuelRecord)> {
    let mut records: Vec<(CandidateId, DuelRecord)> = candidates
        .iter()
        .map(|c| (c.clone(), DuelRecord::default()))
        .collect();
    for duel in duels.iter() {
        match (duel.winner(), duel.loser()) {
            (Some(w), Some(l)) => {
                if let Some(r) = record_mut(&mut records, w) {
                    r.wins.push(l.to_string());
                }
                if let Some(r) = record_mut(&mut records, l) {
                    r.losses.push(w.to_string());
                }
            }
            _ => {
                if let Some(r) = record_mut(&mut records, &duel.first) {
                    r.draws.push(duel.second.clone());
                }
                if let Some(r) = record_mut(&mut records, &duel.second) {
                    r.draws.push(duel.first.clone());
                }
            }
        }
    }
    records
}

/// Points for each won duel, half a point for each draw.
fn copeland_scores(duels: &[Duel]) -> ScoreTable<f64> {
    let mut scores: ScoreTable<f64> = ScoreTable::new();
    for duel in duels.iter() {
        match duel.winner() {
            Some(w) => scores.add(w, 1.0),
            None => {
                scores.add(&duel.first, 0.5);
                scores.add(&duel.second, 0.5);
            }
        }
    }
    scores
}

fn enter_at_zero(scores: &mut ScoreTable<u64>, candidate: &str) {
    if !scores.contains(candidate) {
        scores.set(candidate, 0);
    }
}

/// The largest margin by which each candidate lost a duel.
fn simpson_scores(duels: &[Duel]) -> ScoreTable<u64> {
    let mut scores: ScoreTable<u64> = ScoreTable::new();
    for duel in duels.iter() {
        match (duel.winner(), duel.loser()) {
            (Some(w), Some(l)) => {
                let worst = scores.get(l).unwrap_or(0).max(duel.margin());
                scores.set(l, worst);
                enter_at_zero(&mut scores, w);
            }
            _ => {
                enter_at_zero(&mut scores, &duel.first);
                enter_at_zero(&mut scores, &duel.second);
            }
        }
    }
    scores
}

/// Condorcet election.
///
/// A candidate who wins all the duels is elected directly. Otherwise the
/// configured method scores the duels, and the tie breaking rule decides
/// among the best candidates if needed.
pub(crate) fn condorcet(profiles: &Profiles, params: &CondorcetParams) -> CondorcetStats {
    let candidates = sorted_candidates(&profiles.candidates());
    info!(
        "condorcet: {} voters, candidates: {:?}, params: {:?}",
        profiles.len(),
        candidates,
        params
    );

    if candidates.len() == 1 {
        let winner = candidates[0].clone();
        return CondorcetStats {
            outcome: Some(CondorcetResult {
                winner,
                method_was_used: false,
                tie_break_was_used: false,
                all_winners: None,
            }),
            candidates,
            ..Default::default()
        };
    }

    let duels = run_duels(profiles, &candidates);
    let records = duel_records(&candidates, &duels);

    let undefeated: Vec<CandidateId> = records
        .iter()
        .filter(|(_, r)| r.losses.is_empty() && r.draws.is_empty())
        .map(|(c, _)| c.clone())
        .collect();
    if undefeated.len() == 1 {
        let winner = undefeated[0].clone();
        info!("condorcet: outright winner {}", winner);
        return CondorcetStats {
            outcome: Some(CondorcetResult {
                winner,
                method_was_used: false,
                tie_break_was_used: false,
                all_winners: None,
            }),
            candidates,
            duels,
            records,
            fallback: None,
        };
    }

    let (fallback, best) = match params.method {
        CondorcetMethod::Copeland => {
            let scores = copeland_scores(&duels);
            let best = scores.highest();
            (FallbackScores::Copeland(scores), best)
        }
        CondorcetMethod::Simpson => {
            let scores = simpson_scores(&duels);
            let best = scores.lowest();
            (FallbackScores::Simpson(scores), best)
        }
    };
    debug!("condorcet: fallback: {:?} best: {:?}", fallback, best);

    let outcome = match best.as_slice() {
        [] => None,
        [winner] => Some(CondorcetResult {
            winner: winner.clone(),
            method_was_used: true,
            tie_break_was_used: false,
            all_winners: None,
        }),
        _ => {
            let picked = match params.tie_breaking_rule {
                TieBreakingRule::Lexicographic => lexicographic_first(&best),
                TieBreakingRule::Random => hashed_pick(&best, &records),
            };
            picked.map(|winner| CondorcetResult {
                winner,
                method_was_used: true,
                tie_break_was_used: true,
                all_winners: Some(best.clone()),
            })
        }
    };
    info!("condorcet: outcome: {:?}", outcome);

    CondorcetStats {
        candidates,
        duels,
        records,
        fallback: Some(fallback),
        outcome,
    }
}
