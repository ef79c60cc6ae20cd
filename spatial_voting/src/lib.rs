/*!

Voting rules for elections simulated on a two-dimensional plane.

Voters and candidates are points of the [-1, 1] x [-1, 1] plane. Each voter
ranks the candidates by affinity, which decreases with the distance between
them (see [builder::Builder]). This crate computes the winner of an election
under six rules:

- [plurality]: one point for the first choice
- [veto]: one point for every candidate but the last choice
- [borda]: points decreasing with the rank
- [approval]: one point for every candidate close enough
- [instant_runoff]: successive elimination of the weakest candidate
- [condorcet]: head-to-head duels, with Copeland or Simpson as a fallback

All the rules also have a `_stats` version returning the intermediate data
(scores, rounds, duels) along with the result, and [run_election] runs any
of them from a [VotingMethod].

```
use spatial_voting::*;

let mut profiles = Profiles::new();
profiles.insert("v1", Profile::new(&[("Anna", 0.9), ("Bob", 0.4)])?)?;
profiles.insert("v2", Profile::new(&[("Anna", 0.2), ("Bob", 0.7)])?)?;
profiles.insert("v3", Profile::new(&[("Anna", 0.8), ("Bob", 0.3)])?)?;

let result = plurality(&profiles)?;
assert_eq!(result.map(|r| r.winner), Some("Anna".to_string()));

# Ok::<(), VotingErrors>(())
```

Elections without voters, or with a voter that ranks no candidate, have no
winner: all the rules return `Ok(None)`.

More information is available in the [manual].
*/

pub mod builder;
mod condorcet;
mod config;
pub mod manual;
mod runoff;
mod scoring;
pub mod tiebreak;

use log::info;

pub use crate::config::*;

/// Validates the profiles before a vote.
///
/// Returns false if there is nothing to vote on.
fn checks(profiles: &Profiles, method: &str) -> Result<bool, VotingErrors> {
    info!(
        "{}: processing {} voters, candidates: {:?}",
        method,
        profiles.len(),
        profiles.candidates()
    );
    if profiles.is_degenerate() {
        info!("{}: no voter or no candidate, no result", method);
        return Ok(false);
    }
    profiles.check_candidates()?;
    Ok(true)
}

fn check_approval_radius(approval_radius: f64) -> Result<(), VotingErrors> {
    if approval_radius.is_finite() && (0.0..=100.0).contains(&approval_radius) {
        Ok(())
    } else {
        Err(VotingErrors::InvalidParameter {
            name: "approval_radius".to_string(),
            value: approval_radius.to_string(),
        })
    }
}

pub fn plurality_stats(profiles: &Profiles) -> Result<ScoringStats, VotingErrors> {
    if !checks(profiles, "plurality")? {
        return Ok(ScoringStats::default());
    }
    Ok(scoring::plurality(profiles))
}

/// The candidate that is the first choice of the most voters.
pub fn plurality(profiles: &Profiles) -> Result<Option<WinnerResult>, VotingErrors> {
    Ok(plurality_stats(profiles)?.outcome)
}

pub fn veto_stats(profiles: &Profiles) -> Result<ScoringStats, VotingErrors> {
    if !checks(profiles, "veto")? {
        return Ok(ScoringStats::default());
    }
    Ok(scoring::veto(profiles))
}

/// The candidate that is the last choice of the fewest voters.
///
/// With a single candidate, this candidate wins directly.
pub fn veto(profiles: &Profiles) -> Result<Option<WinnerResult>, VotingErrors> {
    Ok(veto_stats(profiles)?.outcome)
}

pub fn borda_stats(
    profiles: &Profiles,
    maximum: u64,
    step: u64,
) -> Result<ScoringStats, VotingErrors> {
    if !checks(profiles, "borda")? {
        return Ok(ScoringStats::default());
    }
    Ok(scoring::borda(profiles, &BordaParams { maximum, step }))
}

/// Borda count: the candidate at rank `i` (starting at 0) gets
/// `maximum - i * step` points from each voter, and never less than 0.
///
/// Returns `None` if no candidate gets any point.
pub fn borda(
    profiles: &Profiles,
    maximum: u64,
    step: u64,
) -> Result<Option<WinnerResult>, VotingErrors> {
    Ok(borda_stats(profiles, maximum, step)?.outcome)
}

pub fn approval_stats(
    profiles: &Profiles,
    approval_radius: f64,
) -> Result<ScoringStats, VotingErrors> {
    check_approval_radius(approval_radius)?;
    if !checks(profiles, "approval")? {
        return Ok(ScoringStats::default());
    }
    Ok(scoring::approval(profiles, &ApprovalParams { approval_radius }))
}

/// Approval voting: a voter approves a candidate if its affinity, as a
/// percentage, is at least `100 - approval_radius`.
///
/// Returns `None` if nobody approves of any candidate.
pub fn approval(
    profiles: &Profiles,
    approval_radius: f64,
) -> Result<Option<WinnerResult>, VotingErrors> {
    Ok(approval_stats(profiles, approval_radius)?.outcome)
}

pub fn instant_runoff_stats(profiles: &Profiles) -> Result<RunoffStats, VotingErrors> {
    if !checks(profiles, "instant_runoff")? {
        return Ok(RunoffStats::default());
    }
    Ok(runoff::instant_runoff(profiles))
}

/// Instant runoff voting.
///
/// The profiles are not modified: the eliminations happen on a copy.
/// The winner has strictly more than half of the first choices in the last
/// round, and the list of tied candidates is always empty.
pub fn instant_runoff(profiles: &Profiles) -> Result<Option<WinnerResult>, VotingErrors> {
    Ok(instant_runoff_stats(profiles)?.outcome)
}

pub fn condorcet_stats(
    profiles: &Profiles,
    method: CondorcetMethod,
    tie_breaking_rule: TieBreakingRule,
) -> Result<CondorcetStats, VotingErrors> {
    if !checks(profiles, "condorcet")? {
        return Ok(CondorcetStats::default());
    }
    Ok(condorcet::condorcet(
        profiles,
        &CondorcetParams {
            method,
            tie_breaking_rule,
        },
    ))
}

/// Condorcet method.
///
/// An outright winner (who wins all the duels) is always elected, whatever
/// the method and the tie breaking rule.
pub fn condorcet(
    profiles: &Profiles,
    method: CondorcetMethod,
    tie_breaking_rule: TieBreakingRule,
) -> Result<Option<CondorcetResult>, VotingErrors> {
    Ok(condorcet_stats(profiles, method, tie_breaking_rule)?.outcome)
}

/// Runs the given voting method and returns its details.
pub fn run_election(
    profiles: &Profiles,
    method: &VotingMethod,
) -> Result<ElectionReport, VotingErrors> {
    let report = match method {
        VotingMethod::Plurality => ElectionReport::Scoring(plurality_stats(profiles)?),
        VotingMethod::Veto => ElectionReport::Scoring(veto_stats(profiles)?),
        VotingMethod::Borda(p) => {
            ElectionReport::Scoring(borda_stats(profiles, p.maximum, p.step)?)
        }
        VotingMethod::Approval(p) => {
            ElectionReport::Scoring(approval_stats(profiles, p.approval_radius)?)
        }
        VotingMethod::InstantRunoff => ElectionReport::Runoff(instant_runoff_stats(profiles)?),
        VotingMethod::Condorcet(p) => ElectionReport::Condorcet(condorcet_stats(
            profiles,
            p.method,
            p.tie_breaking_rule,
        )?),
    };
    info!(
        "run_election: {}: winner: {:?}",
        method.name(),
        report.winner()
    );
    Ok(report)
}
