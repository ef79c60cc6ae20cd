use crate::sim::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub voters: usize,
    pub candidates: Vec<String>,
}

/// A voter or a candidate on the plane.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SimPosition {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SimPreference {
    pub candidate: String,
    pub affinity: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SimProfile {
    pub voter: String,
    pub preferences: Vec<SimPreference>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SimRules {
    #[serde(rename = "methods", default)]
    pub methods: Vec<String>,
    #[serde(rename = "bordaMaximum")]
    pub borda_maximum: Option<u64>,
    #[serde(rename = "bordaStep")]
    pub borda_step: Option<u64>,
    #[serde(rename = "approvalRadius")]
    pub approval_radius: Option<f64>,
    #[serde(rename = "condorcetMethod")]
    pub condorcet_method: Option<String>,
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub candidates: Vec<SimPosition>,
    #[serde(default)]
    pub voters: Vec<SimPosition>,
    /// Profiles given directly. Takes precedence over the positions.
    pub profiles: Option<Vec<SimProfile>>,
    pub rules: SimRules,
}

/// Builds the profiles of the voters, either from the explicit profiles
/// or from the positions.
pub fn build_profiles(config: &SimConfig) -> SimResult<Profiles> {
    if let Some(sim_profiles) = &config.profiles {
        if !config.voters.is_empty() || !config.candidates.is_empty() {
            warn!("build_profiles: explicit profiles given, ignoring the positions");
        }
        let mut profiles = Profiles::new();
        for sp in sim_profiles.iter() {
            let pairs: Vec<(&str, f64)> = sp
                .preferences
                .iter()
                .map(|p| (p.candidate.as_str(), p.affinity))
                .collect();
            let profile = Profile::new(&pairs).context(VotingSnafu {})?;
            profiles.insert(&sp.voter, profile).context(VotingSnafu {})?;
        }
        return Ok(profiles);
    }

    let candidates: Vec<(String, Point)> = config
        .candidates
        .iter()
        .map(|c| (c.name.clone(), Point::new(c.x, c.y)))
        .collect();
    let mut builder = Builder::new()
        .candidates(&candidates)
        .context(VotingSnafu {})?;
    for v in config.voters.iter() {
        builder
            .add_voter(&v.name, Point::new(v.x, v.y))
            .context(VotingSnafu {})?;
    }
    builder.build().context(VotingSnafu {})
}

/// The approval radius is only checked when approval voting is selected.
fn approval_params(rules: &SimRules) -> SimResult<ApprovalParams> {
    let approval_radius = match rules.approval_radius {
        None => 25.0,
        Some(r) if r.is_finite() && (0.0..=100.0).contains(&r) => r,
        Some(r) => {
            whatever!("approvalRadius must be between 0 and 100, got {}", r)
        }
    };
    Ok(ApprovalParams { approval_radius })
}

/// Turns the rules of the configuration into voting methods.
///
/// `num_candidates` is the default Borda maximum. If `method_override` is
/// provided, only this method is returned.
pub fn validate_rules(
    rules: &SimRules,
    num_candidates: usize,
    method_override: Option<String>,
) -> SimResult<Vec<VotingMethod>> {
    let condorcet = CondorcetParams {
        method: match rules.condorcet_method.as_deref() {
            None | Some("copeland") => CondorcetMethod::Copeland,
            Some("simpson") => CondorcetMethod::Simpson,
            Some(x) => {
                whatever!(
                    "Unknown condorcet method {:?}: expected copeland or simpson",
                    x
                )
            }
        },
        tie_breaking_rule: match rules.tiebreak_mode.as_deref() {
            None | Some("lexicographic") => TieBreakingRule::Lexicographic,
            Some("random") => TieBreakingRule::Random,
            Some(x) => {
                whatever!(
                    "Unknown tiebreak mode {:?}: expected lexicographic or random",
                    x
                )
            }
        },
    };
    let borda = BordaParams {
        maximum: rules.borda_maximum.unwrap_or(num_candidates as u64),
        step: rules.borda_step.unwrap_or(1),
    };

    let names: Vec<String> = match method_override {
        Some(m) => vec![m],
        None => rules.methods.clone(),
    };
    if names.is_empty() {
        whatever!("No voting method specified");
    }
    let mut res: Vec<VotingMethod> = Vec::new();
    for name in names.iter() {
        let method = match name.as_str() {
            "plurality" => VotingMethod::Plurality,
            "veto" => VotingMethod::Veto,
            "borda" => VotingMethod::Borda(borda),
            "approval" => VotingMethod::Approval(approval_params(rules)?),
            "instantRunoff" => VotingMethod::InstantRunoff,
            "condorcet" => VotingMethod::Condorcet(condorcet),
            x => {
                whatever!("Unknown voting method {:?}", x)
            }
        };
        res.push(method);
    }
    Ok(res)
}
