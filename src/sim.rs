use log::{info, warn};

use snafu::{prelude::*, Snafu};
use spatial_voting::builder::{Builder, Point};
use spatial_voting::*;

use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;

use crate::sim::config_reader::*;

#[derive(Debug, Snafu)]
pub enum SimError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON from {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error formatting the summary"))]
    FormattingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid election: {source}"))]
    Voting { source: VotingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SimResult<T> = Result<T, SimError>;

fn scores_to_json<S: serde::Serialize>(scores: &ScoreTable<S>) -> Vec<JSValue> {
    scores
        .iter()
        .map(|(c, s)| json!({"candidate": c, "score": s}))
        .collect()
}

fn runoff_to_json(stats: &RunoffStats) -> JSValue {
    let rounds: Vec<JSValue> = stats
        .round_stats
        .iter()
        .map(|r| {
            let tally: Vec<JSValue> = r
                .tally
                .iter()
                .map(|(c, count)| json!({"candidate": c, "votes": count}))
                .collect();
            json!({
                "round": r.round,
                "tally": tally,
                "eliminated": r.eliminated,
                "lowest": r.lowest,
            })
        })
        .collect();
    json!({"threshold": stats.threshold, "rounds": rounds})
}

fn condorcet_to_json(stats: &CondorcetStats) -> JSValue {
    let duels: Vec<JSValue> = stats
        .duels
        .iter()
        .map(|d| {
            json!({
                "first": d.first,
                "second": d.second,
                "firstVotes": d.first_votes,
                "secondVotes": d.second_votes,
            })
        })
        .collect();
    let records: Vec<JSValue> = stats
        .records
        .iter()
        .map(|(c, r)| {
            json!({
                "candidate": c,
                "wins": r.wins,
                "losses": r.losses,
                "draws": r.draws,
            })
        })
        .collect();
    let fallback = match &stats.fallback {
        Some(FallbackScores::Copeland(scores)) => {
            json!({"method": "copeland", "scores": scores_to_json(scores)})
        }
        Some(FallbackScores::Simpson(scores)) => {
            json!({"method": "simpson", "scores": scores_to_json(scores)})
        }
        None => JSValue::Null,
    };
    json!({
        "methodUsed": stats.outcome.as_ref().map_or(false, |o| o.method_was_used),
        "candidates": stats.candidates,
        "duels": duels,
        "records": records,
        "fallback": fallback,
    })
}

fn parameters_to_json(method: &VotingMethod) -> JSValue {
    match method {
        VotingMethod::Borda(p) => json!({"maximum": p.maximum, "step": p.step}),
        VotingMethod::Approval(p) => json!({"approvalRadius": p.approval_radius}),
        VotingMethod::Condorcet(p) => json!({
            "method": match p.method {
                CondorcetMethod::Copeland => "copeland",
                CondorcetMethod::Simpson => "simpson",
            },
            "tiebreakMode": match p.tie_breaking_rule {
                TieBreakingRule::Lexicographic => "lexicographic",
                TieBreakingRule::Random => "random",
            },
        }),
        _ => json!({}),
    }
}

fn report_to_json(method: &VotingMethod, report: &ElectionReport) -> JSValue {
    let (tied, details): (Vec<String>, JSValue) = match report {
        ElectionReport::Scoring(s) => (
            s.outcome
                .as_ref()
                .map(|o| o.tied_candidates.clone())
                .unwrap_or_default(),
            json!({"scores": scores_to_json(&s.scores)}),
        ),
        ElectionReport::Runoff(s) => (
            s.outcome
                .as_ref()
                .map(|o| o.tied_candidates.clone())
                .unwrap_or_default(),
            runoff_to_json(s),
        ),
        ElectionReport::Condorcet(s) => (
            s.outcome
                .as_ref()
                .and_then(|o| o.all_winners.clone())
                .unwrap_or_default(),
            condorcet_to_json(s),
        ),
    };
    json!({
        "method": method.name(),
        "parameters": parameters_to_json(method),
        "winner": report.winner(),
        "tieBroken": report.was_tie_broken(),
        "tiedCandidates": tied,
        "details": details,
    })
}

fn build_summary_js(config: &SimConfig, profiles: &Profiles, results: &[JSValue]) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        voters: profiles.len(),
        candidates: profiles.candidates(),
    };
    json!({
        "config": c,
        "results": results })
}

/// Runs all the voting methods of an election description and returns the summary.
pub fn compute_summary(config: &SimConfig, method_override: Option<String>) -> SimResult<JSValue> {
    let profiles = build_profiles(config)?;
    info!(
        "compute_summary: {} voters, candidates: {:?}",
        profiles.len(),
        profiles.candidates()
    );
    if profiles.is_degenerate() {
        warn!("compute_summary: no voter or no candidate, no winner will be found");
    }

    let methods = validate_rules(&config.rules, profiles.candidates().len(), method_override)?;
    let mut results: Vec<JSValue> = Vec::new();
    for method in methods.iter() {
        let report = spatial_voting::run_election(&profiles, method).context(VotingSnafu {})?;
        info!(
            "compute_summary: {}: winner: {:?}",
            method.name(),
            report.winner()
        );
        results.push(report_to_json(method, &report));
    }
    Ok(build_summary_js(config, &profiles, &results))
}

fn read_config(path: &str) -> SimResult<SimConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu { path })
}

fn read_summary(path: &str) -> SimResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

pub fn run_election(
    config_path: String,
    check_summary_path: Option<String>,
    out: Option<String>,
    method_override: Option<String>,
) -> SimResult<()> {
    let config = read_config(&config_path)?;
    info!("config: {:?}", config);

    let result_js = compute_summary(&config, method_override)?;
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(FormattingJsonSnafu {})?;

    match out.as_deref() {
        None | Some("") | Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) => {
            fs::write(path, &pretty_js_stats).context(WritingSummarySnafu { path })?;
            info!("run_election: summary written to {}", path);
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(&summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(FormattingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_path(name: &str) -> String {
        format!("{}/demos/{}/{}", env!("CARGO_MANIFEST_DIR"), name, name)
    }

    fn spatial_config(extra_rules: &str) -> SimConfig {
        let js = format!(
            r#"{{
                "outputSettings": {{ "contestName": "Line" }},
                "candidates": [
                    {{ "name": "Left", "x": -0.6, "y": 0.0 }},
                    {{ "name": "Center", "x": 0.0, "y": 0.0 }},
                    {{ "name": "Right", "x": 0.6, "y": 0.0 }}
                ],
                "voters": [
                    {{ "name": "1", "x": -0.7, "y": 0.1 }},
                    {{ "name": "2", "x": -0.5, "y": -0.1 }},
                    {{ "name": "3", "x": 0.1, "y": 0.0 }},
                    {{ "name": "4", "x": 0.5, "y": 0.2 }},
                    {{ "name": "5", "x": 0.7, "y": 0.0 }}
                ],
                "rules": {{ {} }}
            }}"#,
            extra_rules
        );
        serde_json::from_str(&js).unwrap()
    }

    fn winners(summary: &JSValue) -> Vec<(String, JSValue)> {
        summary["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| (r["method"].as_str().unwrap().to_string(), r["winner"].clone()))
            .collect()
    }

    #[test]
    fn center_squeeze() {
        let _ = env_logger::try_init();
        let config = spatial_config(
            r#""methods": ["plurality", "borda", "instantRunoff", "condorcet"]"#,
        );
        let summary = compute_summary(&config, None).unwrap();
        assert_eq!(summary["config"]["voters"], json!(5));
        assert_eq!(summary["config"]["candidates"], json!(["Left", "Center", "Right"]));
        // Left and Right both have 2 first choices. Center is eliminated first
        // in the runoff but wins all its duels.
        assert_eq!(
            winners(&summary),
            vec![
                ("plurality".to_string(), json!("Left")),
                ("borda".to_string(), json!("Center")),
                ("instantRunoff".to_string(), json!("Right")),
                ("condorcet".to_string(), json!("Center")),
            ]
        );
        let plurality = &summary["results"][0];
        assert_eq!(plurality["tieBroken"], json!(true));
        assert_eq!(plurality["tiedCandidates"], json!(["Left", "Right"]));
    }

    #[test]
    fn method_override() {
        let config = spatial_config(r#""methods": ["plurality"]"#);
        let summary = compute_summary(&config, Some("veto".to_string())).unwrap();
        assert_eq!(winners(&summary), vec![("veto".to_string(), json!("Center"))]);
    }

    #[test]
    fn default_rules() {
        let rules: SimRules = serde_json::from_str(r#"{ "methods": ["borda", "approval", "condorcet"] }"#)
            .unwrap();
        let methods = validate_rules(&rules, 4, None).unwrap();
        assert_eq!(
            methods,
            vec![
                VotingMethod::Borda(BordaParams {
                    maximum: 4,
                    step: 1
                }),
                VotingMethod::Approval(ApprovalParams {
                    approval_radius: 25.0
                }),
                VotingMethod::Condorcet(CondorcetParams {
                    method: CondorcetMethod::Copeland,
                    tie_breaking_rule: TieBreakingRule::Lexicographic,
                }),
            ]
        );
    }

    #[test]
    fn invalid_rules() {
        let parse = |s: &str| -> SimRules { serde_json::from_str(s).unwrap() };
        assert!(validate_rules(&parse(r#"{ "methods": ["majority"] }"#), 3, None).is_err());
        assert!(validate_rules(&parse(r#"{ "methods": [] }"#), 3, None).is_err());
        assert!(validate_rules(
            &parse(r#"{ "methods": ["approval"], "approvalRadius": 150 }"#),
            3,
            None
        )
        .is_err());
        // The radius only matters when approval voting is run.
        assert!(validate_rules(
            &parse(r#"{ "methods": ["plurality"], "approvalRadius": 150 }"#),
            3,
            None
        )
        .is_ok());
        assert!(validate_rules(
            &parse(r#"{ "methods": ["approval"], "approvalRadius": 150 }"#),
            3,
            Some("veto".to_string())
        )
        .is_ok());
        assert!(validate_rules(
            &parse(r#"{ "methods": ["condorcet"], "tiebreakMode": "coin" }"#),
            3,
            None
        )
        .is_err());
    }

    #[test]
    fn out_of_bounds_voter() {
        let mut config = spatial_config(r#""methods": ["plurality"]"#);
        config.voters[0].x = 2.0;
        let res = compute_summary(&config, None);
        assert!(matches!(
            res,
            Err(SimError::Voting {
                source: VotingErrors::OutOfBounds { .. }
            })
        ));
    }

    #[test]
    fn cyclic_reference() {
        let _ = env_logger::try_init();
        let dir = demo_path("cyclic");
        let res = run_election(
            format!("{}_config.json", dir),
            Some(format!("{}_expected_summary.json", dir)),
            None,
            None,
        );
        if let Err(e) = &res {
            eprintln!("An error occured {}", e);
        }
        assert!(res.is_ok());
    }
}
