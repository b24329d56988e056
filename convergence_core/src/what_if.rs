//! What-If Simulator
//!
//! Re-runs the router on a modified copy of a baseline request and diffs
//! the nine factors pairwise.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convergence::{ConvergenceEngine, ConvergenceResult, PropRequest};
use crate::models::{DefenseRanking, Signal};
use crate::verdict::{synthesize_verdict, Verdict, VerdictInput};

/// A hypothetical change, applied in order to the baseline request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Modification {
    ChangeLine {
        line: f64,
    },
    /// Override the opponent's defense, optionally swapping the opponent
    ChangeOpponent {
        #[serde(default)]
        team: Option<String>,
        rank: u32,
        stats_allowed: f64,
    },
    /// Swap home and away identity
    ChangeVenue,
    ToggleB2b,
    ChangeRestDays {
        days: u32,
    },
}

impl Modification {
    pub fn apply(&self, request: &mut PropRequest) {
        match self {
            Modification::ChangeLine { line } => request.line = *line,
            Modification::ChangeOpponent {
                team,
                rank,
                stats_allowed,
            } => {
                if let Some(team) = team {
                    if request.is_home() {
                        request.game.away_team = team.clone();
                    } else {
                        request.game.home_team = team.clone();
                    }
                }
                request.defense_ranking = Some(DefenseRanking {
                    rank: *rank,
                    stats_allowed: *stats_allowed,
                });
            }
            Modification::ChangeVenue => {
                let game = &mut request.game;
                std::mem::swap(&mut game.home_team, &mut game.away_team);
                // Spread is quoted from the home side; keep the same favorite
                game.spread = game.spread.map(|s| -s);
            }
            Modification::ToggleB2b => {
                if let Some(latest) = request.game_logs.most_recent_mut() {
                    latest.is_back_to_back = !latest.is_back_to_back;
                    latest.rest_days = if latest.is_back_to_back {
                        0
                    } else {
                        latest.rest_days.max(1)
                    };
                }
            }
            Modification::ChangeRestDays { days } => {
                if let Some(latest) = request.game_logs.most_recent_mut() {
                    latest.rest_days = *days;
                    latest.is_back_to_back = *days == 0;
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorChange {
    pub name: String,
    pub before: Signal,
    pub after: Signal,
    pub strength_before: f64,
    pub strength_after: f64,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfResult {
    pub original: ConvergenceResult,
    pub modified: ConvergenceResult,
    pub original_verdict: Verdict,
    pub modified_verdict: Verdict,
    pub changes: Vec<FactorChange>,
    pub changed_count: usize,
    pub summary: String,
}

pub fn simulate(engine: &ConvergenceEngine, baseline: &PropRequest, modifications: &[Modification]) -> WhatIfResult {
    let mut modified_request = baseline.clone();
    for modification in modifications {
        modification.apply(&mut modified_request);
    }

    let original = engine.evaluate(baseline);
    let modified = engine.evaluate(&modified_request);
    let original_verdict = synthesize_verdict(&VerdictInput::from_result(&original));
    let modified_verdict = synthesize_verdict(&VerdictInput::from_result(&modified));

    let changes: Vec<FactorChange> = original
        .weighted_factors
        .iter()
        .zip(&modified.weighted_factors)
        .map(|(before, after)| FactorChange {
            name: before.name.clone(),
            before: before.signal,
            after: after.signal,
            strength_before: before.strength,
            strength_after: after.strength,
            changed: before.signal != after.signal,
        })
        .collect();
    let changed_count = changes.iter().filter(|c| c.changed).count();
    let summary = summarize(&changes, changed_count, &original_verdict, &modified_verdict);

    debug!(
        player = %baseline.player.id,
        modifications = modifications.len(),
        changed = changed_count,
        "What-if simulation complete"
    );

    WhatIfResult {
        original,
        modified,
        original_verdict,
        modified_verdict,
        changes,
        changed_count,
        summary,
    }
}

fn summarize(changes: &[FactorChange], changed_count: usize, before: &Verdict, after: &Verdict) -> String {
    let verdict_line = format!(
        "Verdict: {} {}/9 → {} {}/9",
        before.direction.label(),
        before.convergence_score,
        after.direction.label(),
        after.convergence_score
    );
    if changed_count == 0 {
        return format!("No factors changed. {}", verdict_line);
    }
    let listed: Vec<String> = changes
        .iter()
        .filter(|c| c.changed)
        .map(|c| format!("{} {} → {}", c.name, c.before.label(), c.after.label()))
        .collect();
    let noun = if changed_count == 1 { "factor" } else { "factors" };
    format!(
        "{} {} changed: {}. {}",
        changed_count,
        noun,
        listed.join(", "),
        verdict_line
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::test_support::*;
    use crate::models::Sport;

    fn request(line: f64) -> PropRequest {
        PropRequest {
            player: player(Sport::NBA, "BOS", "SF"),
            game: game("BOS", "MIA"),
            game_logs: logs("points", &[30.0, 28.0, 32.0, 29.0, 31.0, 27.0], "MIA"),
            season_stats: Some(season(29.0)),
            defense_ranking: None,
            stat: "points".to_string(),
            line,
            extra: None,
        }
    }

    #[test]
    fn test_modification_serde_tags() {
        let m: Modification = serde_json::from_str(r#"{"type":"change_line","line":30.0}"#).unwrap();
        assert_eq!(m, Modification::ChangeLine { line: 30.0 });
        let m: Modification = serde_json::from_str(r#"{"type":"toggle_b2b"}"#).unwrap();
        assert_eq!(m, Modification::ToggleB2b);
        let m: Modification = serde_json::from_str(r#"{"type":"change_rest_days","days":3}"#).unwrap();
        assert_eq!(m, Modification::ChangeRestDays { days: 3 });
    }

    #[test]
    fn test_rest_mutations_touch_latest_only() {
        let mut r = request(24.5);
        Modification::ToggleB2b.apply(&mut r);
        assert!(r.game_logs.as_slice()[0].is_back_to_back);
        assert_eq!(r.game_logs.as_slice()[0].rest_days, 0);
        assert!(!r.game_logs.as_slice()[1].is_back_to_back);

        Modification::ChangeRestDays { days: 3 }.apply(&mut r);
        assert!(!r.game_logs.as_slice()[0].is_back_to_back);
        assert_eq!(r.game_logs.as_slice()[0].rest_days, 3);
        assert_eq!(r.game_logs.as_slice()[1].rest_days, 1);

        let mut empty = PropRequest {
            game_logs: Default::default(),
            ..request(24.5)
        };
        Modification::ToggleB2b.apply(&mut empty);
        assert!(empty.game_logs.is_empty());
    }

    #[test]
    fn test_change_venue_and_opponent() {
        let mut r = request(24.5);
        r.game.spread = Some(-5.0);
        Modification::ChangeVenue.apply(&mut r);
        assert!(!r.is_home());
        assert_eq!(r.game.spread, Some(5.0));

        Modification::ChangeOpponent {
            team: Some("NYK".to_string()),
            rank: 28,
            stats_allowed: 27.5,
        }
        .apply(&mut r);
        assert_eq!(r.game.home_team, "NYK");
        assert_eq!(r.defense_ranking.as_ref().map(|d| d.rank), Some(28));
    }

    #[test]
    fn test_no_modifications_changes_nothing() {
        let engine = ConvergenceEngine::with_defaults();
        let result = simulate(&engine, &request(24.5), &[]);
        assert_eq!(result.changed_count, 0);
        assert_eq!(result.original, result.modified);
        assert!(result.summary.starts_with("No factors changed."));
    }

    #[test]
    fn test_line_change_summary_names_changed_factors() {
        let engine = ConvergenceEngine::with_defaults();
        let result = simulate(&engine, &request(24.5), &[Modification::ChangeLine { line: 34.0 }]);
        assert!(result.changed_count > 0);
        for change in &result.changes {
            assert_eq!(result.summary.contains(change.name.as_str()), change.changed, "{}", change.name);
        }
        assert_eq!(result.original_verdict.direction, crate::models::LeanDirection::Over);
        assert_eq!(result.modified_verdict.direction, crate::models::LeanDirection::Under);
    }
}
