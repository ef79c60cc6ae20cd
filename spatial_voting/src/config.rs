// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::ops::Add;

/// The label of a candidate. Unique within one election.
pub type CandidateId = String;

/// The label of a voter. Unique within one election.
pub type VoterId = String;

/// The affinity of one voter for one candidate.
///
/// An affinity of 1 means that the voter and the candidate share the same
/// position, 0 that they sit at opposite corners of the plane.
#[derive(PartialEq, Debug, Clone)]
pub struct Preference {
    pub candidate: CandidateId,
    pub affinity: f64,
}

/// The ranking of all the candidates by a single voter, most preferred first.
///
/// A profile can only be built through [Profile::new], which checks the
/// affinities and sorts the preferences.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Profile {
    preferences: Vec<Preference>,
}

impl Profile {
    /// Builds a profile from (candidate, affinity) pairs given in any order.
    ///
    /// The pairs are sorted by decreasing affinity. Candidates with the same
    /// affinity keep the order in which they were given.
    ///
    /// ```
    /// use spatial_voting::Profile;
    /// # use spatial_voting::VotingErrors;
    ///
    /// let profile = Profile::new(&[("Bob", 0.4), ("Anna", 0.9)])?;
    /// assert_eq!(profile.first().map(|p| p.candidate.as_str()), Some("Anna"));
    ///
    /// # Ok::<(), VotingErrors>(())
    /// ```
    pub fn new<S: AsRef<str>>(pairs: &[(S, f64)]) -> Result<Profile, VotingErrors> {
        let mut preferences: Vec<Preference> = Vec::with_capacity(pairs.len());
        for (name, affinity) in pairs {
            let candidate = name.as_ref().to_string();
            if !affinity.is_finite() || *affinity < 0.0 || *affinity > 1.0 {
                return Err(VotingErrors::InvalidAffinity {
                    candidate,
                    affinity: *affinity,
                });
            }
            if preferences.iter().any(|p| p.candidate == candidate) {
                return Err(VotingErrors::DuplicateCandidate(candidate));
            }
            preferences.push(Preference {
                candidate,
                affinity: *affinity,
            });
        }
        // Stable: equal affinities keep the input order.
        preferences.sort_by(|a, b| b.affinity.total_cmp(&a.affinity));
        Ok(Profile { preferences })
    }

    pub fn preferences(&self) -> &[Preference] {
        &self.preferences
    }

    pub fn len(&self) -> usize {
        self.preferences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }

    /// The most preferred candidate.
    pub fn first(&self) -> Option<&Preference> {
        self.preferences.first()
    }

    /// The least preferred candidate.
    pub fn last(&self) -> Option<&Preference> {
        self.preferences.last()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.preferences.iter().map(|p| p.candidate.as_str())
    }

    /// The rank (0 is the most preferred) of a candidate in this profile.
    pub fn position(&self, candidate: &str) -> Option<usize> {
        self.preferences
            .iter()
            .position(|p| p.candidate == candidate)
    }

    /// Removes a candidate, keeping the order of the other ones.
    /// Returns true if the candidate was present.
    pub fn remove_candidate(&mut self, candidate: &str) -> bool {
        let before = self.preferences.len();
        self.preferences.retain(|p| p.candidate != candidate);
        before != self.preferences.len()
    }
}

/// The profiles of all the voters of an election, in insertion order.
///
/// The insertion order matters: it is the order in which the scores are
/// accumulated, and therefore the order in which tied candidates are reported.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Profiles {
    entries: Vec<(VoterId, Profile)>,
}

impl Profiles {
    pub fn new() -> Profiles {
        Profiles {
            entries: Vec::new(),
        }
    }

    /// Adds the profile of a new voter.
    pub fn insert(&mut self, voter: &str, profile: Profile) -> Result<(), VotingErrors> {
        if self.entries.iter().any(|(v, _)| v == voter) {
            return Err(VotingErrors::DuplicateVoter(voter.to_string()));
        }
        self.entries.push((voter.to_string(), profile));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, voter: &str) -> Option<&Profile> {
        self.entries
            .iter()
            .find(|(v, _)| v == voter)
            .map(|(_, p)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.entries.iter().map(|(v, p)| (v.as_str(), p))
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.entries.iter().map(|(_, p)| p)
    }

    /// The candidates, in the order of preference of the first voter.
    pub fn candidates(&self) -> Vec<CandidateId> {
        self.entries
            .first()
            .map(|(_, p)| p.candidates().map(|c| c.to_string()).collect())
            .unwrap_or_default()
    }

    /// True if there is nothing to vote on: no voter, or a voter without candidates.
    pub fn is_degenerate(&self) -> bool {
        self.entries.is_empty() || self.entries.iter().any(|(_, p)| p.is_empty())
    }

    /// Removes a candidate from the profile of every voter.
    ///
    /// This is destructive: the voting methods never call it on the profiles
    /// they are given, only on their own copy.
    pub fn remove_candidate(&mut self, candidate: &str) {
        for (_, p) in self.entries.iter_mut() {
            p.remove_candidate(candidate);
        }
    }

    /// Checks that all the voters rank the same set of candidates.
    pub fn check_candidates(&self) -> Result<(), VotingErrors> {
        let mut reference: Vec<&str> = match self.entries.first() {
            Some((_, p)) => p.candidates().collect(),
            None => return Ok(()),
        };
        reference.sort_unstable();
        for (voter, p) in self.entries.iter().skip(1) {
            let mut cands: Vec<&str> = p.candidates().collect();
            cands.sort_unstable();
            if cands != reference {
                return Err(VotingErrors::MismatchedCandidates {
                    voter: voter.clone(),
                });
            }
        }
        Ok(())
    }
}

// ******** Output data structures *********

/// Scores of the candidates, in the order in which they were first credited.
///
/// A candidate that never received any contribution is absent from the table.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ScoreTable<S> {
    entries: Vec<(CandidateId, S)>,
}

impl<S> ScoreTable<S> {
    pub fn new() -> ScoreTable<S> {
        ScoreTable {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &S)> {
        self.entries.iter().map(|(c, s)| (c.as_str(), s))
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.entries.iter().any(|(c, _)| c == candidate)
    }

    /// Sets the score of a candidate, inserting it at the end if needed.
    pub fn set(&mut self, candidate: &str, score: S) {
        match self.entries.iter_mut().find(|(c, _)| c == candidate) {
            Some((_, s)) => *s = score,
            None => self.entries.push((candidate.to_string(), score)),
        }
    }
}

impl<S: Copy + PartialOrd> ScoreTable<S> {
    pub fn get(&self, candidate: &str) -> Option<S> {
        self.entries
            .iter()
            .find(|(c, _)| c == candidate)
            .map(|(_, s)| *s)
    }

    /// All the candidates with the highest score, in table order.
    pub fn highest(&self) -> Vec<CandidateId> {
        self.extreme(|s, t| s > t)
    }

    /// All the candidates with the lowest score, in table order.
    pub fn lowest(&self) -> Vec<CandidateId> {
        self.extreme(|s, t| s < t)
    }

    fn extreme(&self, better: impl Fn(S, S) -> bool) -> Vec<CandidateId> {
        let mut target: Option<S> = None;
        for (_, s) in self.entries.iter() {
            match target {
                Some(t) if !better(*s, t) => {}
                _ => target = Some(*s),
            }
        }
        match target {
            None => Vec::new(),
            Some(t) => self
                .entries
                .iter()
                .filter(|(_, s)| *s == t)
                .map(|(c, _)| c.clone())
                .collect(),
        }
    }
}

impl<S: Copy + Add<Output = S>> ScoreTable<S> {
    /// Adds to the score of a candidate, inserting it at the end if needed.
    pub fn add(&mut self, candidate: &str, amount: S) {
        match self.entries.iter_mut().find(|(c, _)| c == candidate) {
            Some((_, s)) => *s = *s + amount,
            None => self.entries.push((candidate.to_string(), amount)),
        }
    }
}

/// The winner of a scoring or runoff election.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct WinnerResult {
    pub winner: CandidateId,
    /// True if several candidates shared the best score.
    pub was_tie_broken: bool,
    /// The candidates that shared the best score, in the order in which they
    /// were credited. The runoff leaves it empty.
    pub tied_candidates: Vec<CandidateId>,
}

/// The winner of a Condorcet election.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CondorcetResult {
    pub winner: CandidateId,
    /// True if there was no outright Condorcet winner and the fallback
    /// method (Copeland or Simpson) decided.
    pub method_was_used: bool,
    /// True if the fallback method did not separate the best candidates.
    pub tie_break_was_used: bool,
    /// The candidates the tie was broken between.
    pub all_winners: Option<Vec<CandidateId>>,
}

/// Details of a scoring election (plurality, veto, Borda, approval).
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ScoringStats {
    pub scores: ScoreTable<u64>,
    pub outcome: Option<WinnerResult>,
}

/// Statistics for one round of the runoff.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunoffRound {
    pub round: u32,
    /// First choices of the voters, for every candidate still running.
    pub tally: Vec<(CandidateId, u64)>,
    /// The candidate removed at the end of this round, if any.
    pub eliminated: Option<CandidateId>,
    /// The candidates sharing the lowest count this round.
    pub lowest: Vec<CandidateId>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunoffStats {
    /// Number of first choices needed to win: strictly more than half of the voters.
    pub threshold: u64,
    pub round_stats: Vec<RunoffRound>,
    pub outcome: Option<WinnerResult>,
}

/// A head-to-head comparison between two candidates.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Duel {
    pub first: CandidateId,
    pub second: CandidateId,
    /// Number of voters ranking `first` above `second`.
    pub first_votes: u64,
    pub second_votes: u64,
}

impl Duel {
    pub fn is_draw(&self) -> bool {
        self.first_votes == self.second_votes
    }

    pub fn winner(&self) -> Option<&str> {
        match self.first_votes.cmp(&self.second_votes) {
            std::cmp::Ordering::Greater => Some(&self.first),
            std::cmp::Ordering::Less => Some(&self.second),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn loser(&self) -> Option<&str> {
        match self.first_votes.cmp(&self.second_votes) {
            std::cmp::Ordering::Greater => Some(&self.second),
            std::cmp::Ordering::Less => Some(&self.first),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The difference of votes between the two sides.
    pub fn margin(&self) -> u64 {
        self.first_votes.abs_diff(self.second_votes)
    }
}

/// The opponents a candidate won against, lost against, or drew with.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DuelRecord {
    pub wins: Vec<CandidateId>,
    pub losses: Vec<CandidateId>,
    pub draws: Vec<CandidateId>,
}

/// The scores of the method used when there is no outright Condorcet winner.
#[derive(PartialEq, Debug, Clone)]
pub enum FallbackScores {
    /// Duels won, plus one half per draw. Highest wins.
    Copeland(ScoreTable<f64>),
    /// Largest margin of defeat. Lowest wins.
    Simpson(ScoreTable<u64>),
}

/// Details of a Condorcet election.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct CondorcetStats {
    /// The candidates, in canonical (case-insensitive) order.
    pub candidates: Vec<CandidateId>,
    pub duels: Vec<Duel>,
    pub records: Vec<(CandidateId, DuelRecord)>,
    pub fallback: Option<FallbackScores>,
    pub outcome: Option<CondorcetResult>,
}

/// The details of an election run with [crate::run_election].
#[derive(PartialEq, Debug, Clone)]
pub enum ElectionReport {
    Scoring(ScoringStats),
    Runoff(RunoffStats),
    Condorcet(CondorcetStats),
}

impl ElectionReport {
    pub fn winner(&self) -> Option<&str> {
        match self {
            ElectionReport::Scoring(s) => s.outcome.as_ref().map(|o| o.winner.as_str()),
            ElectionReport::Runoff(s) => s.outcome.as_ref().map(|o| o.winner.as_str()),
            ElectionReport::Condorcet(s) => s.outcome.as_ref().map(|o| o.winner.as_str()),
        }
    }

    pub fn was_tie_broken(&self) -> bool {
        match self {
            ElectionReport::Scoring(s) => s.outcome.as_ref().map_or(false, |o| o.was_tie_broken),
            ElectionReport::Runoff(s) => s.outcome.as_ref().map_or(false, |o| o.was_tie_broken),
            ElectionReport::Condorcet(s) => s
                .outcome
                .as_ref()
                .map_or(false, |o| o.tie_break_was_used),
        }
    }
}

/// Errors that prevent a vote from being computed.
#[derive(PartialEq, Debug, Clone)]
pub enum VotingErrors {
    /// An affinity outside of [0, 1].
    InvalidAffinity { candidate: String, affinity: f64 },
    /// A candidate appears twice in a profile, or two candidates share a label.
    DuplicateCandidate(String),
    DuplicateVoter(String),
    /// This voter does not rank the same candidates as the first voter.
    MismatchedCandidates { voter: String },
    InvalidParameter { name: String, value: String },
    /// A position outside of the [-1, 1] x [-1, 1] plane.
    OutOfBounds { label: String, x: f64, y: f64 },
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::InvalidAffinity {
                candidate,
                affinity,
            } => write!(
                f,
                "affinity {} for candidate {} is not in [0, 1]",
                affinity, candidate
            ),
            VotingErrors::DuplicateCandidate(c) => write!(f, "duplicate candidate {}", c),
            VotingErrors::DuplicateVoter(v) => write!(f, "duplicate voter {}", v),
            VotingErrors::MismatchedCandidates { voter } => write!(
                f,
                "voter {} does not rank the same candidates as the other voters",
                voter
            ),
            VotingErrors::InvalidParameter { name, value } => {
                write!(f, "invalid value {} for parameter {}", value, name)
            }
            VotingErrors::OutOfBounds { label, x, y } => {
                write!(f, "{} is outside of the plane: ({}, {})", label, x, y)
            }
        }
    }
}

// ********* Configuration **********

/// Parameters of the Borda count.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct BordaParams {
    /// Points given to the first choice.
    pub maximum: u64,
    /// Points removed for each following rank. Contributions stop at 0.
    pub step: u64,
}

/// Parameters of approval voting.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ApprovalParams {
    /// Percentage (0 to 100) of the maximum distance within which a voter
    /// approves of a candidate.
    pub approval_radius: f64,
}

/// The method deciding a Condorcet election without an outright winner.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CondorcetMethod {
    Copeland,
    Simpson,
}

/// How to pick among the candidates the fallback method could not separate.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakingRule {
    /// Not random in the statistical sense: the choice is derived from a
    /// SHA-256 hash of the duel records and is reproducible.
    Random,
    /// Case-insensitive alphabetical order.
    Lexicographic,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct CondorcetParams {
    pub method: CondorcetMethod,
    pub tie_breaking_rule: TieBreakingRule,
}

impl CondorcetParams {
    pub const DEFAULT: CondorcetParams = CondorcetParams {
        method: CondorcetMethod::Copeland,
        tie_breaking_rule: TieBreakingRule::Lexicographic,
    };
}

/// A voting rule and its parameters.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum VotingMethod {
    Plurality,
    Veto,
    Borda(BordaParams),
    Approval(ApprovalParams),
    InstantRunoff,
    Condorcet(CondorcetParams),
}

impl VotingMethod {
    /// The name of the method, as used in the configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            VotingMethod::Plurality => "plurality",
            VotingMethod::Veto => "veto",
            VotingMethod::Borda(_) => "borda",
            VotingMethod::Approval(_) => "approval",
            VotingMethod::InstantRunoff => "instantRunoff",
            VotingMethod::Condorcet(_) => "condorcet",
        }
    }
}
