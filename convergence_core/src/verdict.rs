//! Verdict Synthesizer
//!
//! Maps a factor tally into a display-ready verdict. Weight-aware mode is
//! preferred; the count-based legacy mode remains for callers that only
//! hold flat factors.

use serde::{Deserialize, Serialize};

use crate::convergence::{clamp_confidence, weighted_sum, ConvergenceResult, TOSS_UP_THRESHOLD};
use crate::models::{ConvergenceFactor, LeanDirection, Signal, WeightedFactor};
use crate::sports::FACTOR_COUNT;

const TOSS_UP_CONFIDENCE: u8 = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerdictInput {
    pub over_count: usize,
    pub under_count: usize,
    pub neutral_count: usize,
    pub factors: Vec<ConvergenceFactor>,
    #[serde(default)]
    pub weighted_factors: Option<Vec<WeightedFactor>>,
    /// Fraction of the last 10 games over the line (0-1)
    #[serde(default)]
    pub hit_rate_l10: Option<f64>,
    #[serde(default)]
    pub avg_margin_l10: Option<f64>,
    #[serde(default)]
    pub season_average: Option<f64>,
}

impl VerdictInput {
    pub fn from_result(result: &ConvergenceResult) -> Self {
        Self {
            over_count: result.over_count,
            under_count: result.under_count,
            neutral_count: result.neutral_count,
            factors: result.factors.clone(),
            weighted_factors: Some(result.weighted_factors.clone()),
            hit_rate_l10: None,
            avg_margin_l10: None,
            season_average: None,
        }
    }

    pub fn with_context(
        mut self,
        hit_rate_l10: Option<f64>,
        avg_margin_l10: Option<f64>,
        season_average: Option<f64>,
    ) -> Self {
        self.hit_rate_l10 = hit_rate_l10.filter(|v| v.is_finite());
        self.avg_margin_l10 = avg_margin_l10.filter(|v| v.is_finite());
        self.season_average = season_average.filter(|v| v.is_finite());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictMode {
    WeightAware,
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub direction: LeanDirection,
    /// Factors aligned with the direction, out of 9
    pub convergence_score: u8,
    pub confidence: u8,
    pub label: String,
    pub sublabel: String,
    pub icon: String,
    pub color: String,
    pub mode: VerdictMode,
}

/// Row shape stored by the persistence consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedVerdict {
    pub player_id: String,
    pub stat: String,
    pub line: f64,
    pub direction: LeanDirection,
    pub convergence_score: u8,
    pub confidence: u8,
}

impl PersistedVerdict {
    pub fn new(result: &ConvergenceResult, verdict: &Verdict) -> Self {
        Self {
            player_id: result.player_id.clone(),
            stat: result.stat.clone(),
            line: result.line,
            direction: verdict.direction,
            convergence_score: verdict.convergence_score,
            confidence: verdict.confidence,
        }
    }
}

pub fn synthesize_verdict(input: &VerdictInput) -> Verdict {
    let (direction, score, confidence, mode) = match input.weighted_factors.as_deref() {
        Some(weighted) if !weighted.is_empty() => weight_aware(input, weighted),
        _ => legacy(input),
    };
    let score = score.min(FACTOR_COUNT) as u8;
    let style = style_for(direction, score);

    Verdict {
        direction,
        convergence_score: score,
        confidence,
        label: style.label.to_string(),
        sublabel: sublabel(input, score),
        icon: style.icon.to_string(),
        color: style.color.to_string(),
        mode,
    }
}

fn weight_aware(input: &VerdictInput, weighted: &[WeightedFactor]) -> (LeanDirection, usize, u8, VerdictMode) {
    let sum = weighted_sum(weighted);
    let raw = sum.abs() * 100.0;

    if raw < TOSS_UP_THRESHOLD {
        let score = input.over_count.max(input.under_count);
        return (LeanDirection::TossUp, score, TOSS_UP_CONFIDENCE, VerdictMode::WeightAware);
    }

    let direction = if sum > 0.0 {
        LeanDirection::Over
    } else {
        LeanDirection::Under
    };
    let score = weighted.iter().filter(|f| direction.agrees_with(f.signal)).count();
    let reinforcement = input
        .hit_rate_l10
        .map(|hr| (hr.clamp(0.0, 1.0) - 0.5).abs() * 40.0)
        .unwrap_or(0.0);

    (direction, score, clamp_confidence(raw + reinforcement), VerdictMode::WeightAware)
}

fn legacy(input: &VerdictInput) -> (LeanDirection, usize, u8, VerdictMode) {
    let (direction, score) = match input.over_count.cmp(&input.under_count) {
        std::cmp::Ordering::Greater => (LeanDirection::Over, input.over_count),
        std::cmp::Ordering::Less => (LeanDirection::Under, input.under_count),
        std::cmp::Ordering::Equal => (LeanDirection::TossUp, input.over_count),
    };

    let total: f64 = input.factors.iter().map(|f| f.strength).sum();
    let aligned: f64 = input
        .factors
        .iter()
        .filter(|f| direction.agrees_with(f.signal))
        .map(|f| f.strength)
        .sum();
    let strength_share = if total > 0.0 { aligned / total } else { 0.0 };
    let raw = 0.6 * (score as f64 / FACTOR_COUNT as f64) * 100.0 + 0.4 * strength_share * 100.0;

    (direction, score, clamp_confidence(raw), VerdictMode::Legacy)
}

struct VerdictStyle {
    label: &'static str,
    icon: &'static str,
    color: &'static str,
}

fn style_for(direction: LeanDirection, score: u8) -> VerdictStyle {
    let (label, icon, color) = match direction {
        LeanDirection::Over => match score {
            9 => ("FULL CONVERGENCE", "🔥", "#15803d"),
            8 => ("NEAR-FULL CONVERGENCE", "🔥", "#16a34a"),
            6 | 7 => ("STRONG CONVERGENCE", "📈", "#22c55e"),
            5 => ("LEAN", "↗️", "#4ade80"),
            _ => ("SLIGHT LEAN", "↗️", "#86efac"),
        },
        LeanDirection::TossUp => ("MIXED", "⚖️", "#f59e0b"),
        LeanDirection::Under => match score {
            8 | 9 => ("FADE", "🧊", "#b91c1c"),
            6 | 7 => ("STRONG AGAINST", "📉", "#dc2626"),
            _ => ("LEAN AGAINST", "↘️", "#f87171"),
        },
    };
    VerdictStyle { label, icon, color }
}

fn sublabel(input: &VerdictInput, score: u8) -> String {
    let mut parts = vec![format!("{}/{} factors aligned", score, FACTOR_COUNT)];
    if let Some(hr) = input.hit_rate_l10 {
        parts.push(format!("L10 hit rate {:.0}%", hr * 100.0));
    }
    if let Some(margin) = input.avg_margin_l10 {
        parts.push(format!("L10 margin {:+.1}", margin));
    }
    if let Some(avg) = input.season_average {
        parts.push(format!("Season avg {:.1}", avg));
    }
    parts.join(" · ")
}

/// Count helper for callers building a legacy input by hand.
pub fn tally(factors: &[ConvergenceFactor]) -> (usize, usize, usize) {
    factors.iter().fold((0, 0, 0), |(o, u, n), f| match f.signal {
        Signal::Over => (o + 1, u, n),
        Signal::Under => (o, u + 1, n),
        Signal::Neutral => (o, u, n + 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FactorResult;

    fn flat(signal: Signal, strength: f64) -> ConvergenceFactor {
        ConvergenceFactor {
            name: "f".to_string(),
            signal,
            strength,
            detail: String::new(),
            data_point: String::new(),
        }
    }

    fn legacy_input(signals: &[(Signal, f64)]) -> VerdictInput {
        let factors: Vec<ConvergenceFactor> = signals.iter().map(|(s, st)| flat(*s, *st)).collect();
        let (over_count, under_count, neutral_count) = tally(&factors);
        VerdictInput {
            over_count,
            under_count,
            neutral_count,
            factors,
            ..Default::default()
        }
    }

    #[test]
    fn test_label_table() {
        let cases = [
            (LeanDirection::Over, 9, "FULL CONVERGENCE"),
            (LeanDirection::Over, 8, "NEAR-FULL CONVERGENCE"),
            (LeanDirection::Over, 7, "STRONG CONVERGENCE"),
            (LeanDirection::Over, 6, "STRONG CONVERGENCE"),
            (LeanDirection::Over, 5, "LEAN"),
            (LeanDirection::Over, 3, "SLIGHT LEAN"),
            (LeanDirection::TossUp, 4, "MIXED"),
            (LeanDirection::Under, 9, "FADE"),
            (LeanDirection::Under, 8, "FADE"),
            (LeanDirection::Under, 6, "STRONG AGAINST"),
            (LeanDirection::Under, 5, "LEAN AGAINST"),
        ];
        for (direction, score, label) in cases {
            assert_eq!(style_for(direction, score).label, label, "{:?} {}", direction, score);
        }
        assert_eq!(style_for(LeanDirection::TossUp, 0).color, "#f59e0b");
    }

    #[test]
    fn test_legacy_confidence() {
        // 6 over at 0.5, 3 neutral at 0: 0.6 * 6/9 * 100 + 0.4 * 100 = 80
        let mut signals = vec![(Signal::Over, 0.5); 6];
        signals.extend([(Signal::Neutral, 0.0); 3]);
        let v = synthesize_verdict(&legacy_input(&signals));
        assert_eq!(v.mode, VerdictMode::Legacy);
        assert_eq!(v.direction, LeanDirection::Over);
        assert_eq!(v.convergence_score, 6);
        assert_eq!(v.confidence, 80);
    }

    #[test]
    fn test_legacy_tie_and_zero_strength() {
        let v = synthesize_verdict(&legacy_input(&[
            (Signal::Over, 0.0),
            (Signal::Under, 0.0),
            (Signal::Neutral, 0.0),
        ]));
        assert_eq!(v.direction, LeanDirection::TossUp);
        assert_eq!(v.convergence_score, 1);
        // 0.6 * 1/9 * 100 = 6.67
        assert_eq!(v.confidence, 7);
    }

    #[test]
    fn test_weight_aware_hit_rate_bonus() {
        let weighted: Vec<WeightedFactor> = (0..9)
            .map(|i| {
                let signal = if i < 6 { Signal::Over } else { Signal::Neutral };
                WeightedFactor::from_result("f", 1.0 / 9.0, FactorResult::new(signal, 0.6, "", ""))
            })
            .collect();
        let input = VerdictInput {
            over_count: 6,
            neutral_count: 3,
            weighted_factors: Some(weighted),
            ..Default::default()
        }
        .with_context(Some(0.8), Some(3.2), Some(26.1));

        // raw = 6/9 * 0.6 * 100 = 40, bonus = 0.3 * 40 = 12
        let v = synthesize_verdict(&input);
        assert_eq!(v.mode, VerdictMode::WeightAware);
        assert_eq!(v.direction, LeanDirection::Over);
        assert_eq!(v.convergence_score, 6);
        assert_eq!(v.confidence, 52);
        assert_eq!(v.label, "STRONG CONVERGENCE");
        assert!(v.sublabel.contains("6/9"));
        assert!(v.sublabel.contains("L10 hit rate 80%"));
        assert!(v.sublabel.contains("L10 margin +3.2"));
    }

    #[test]
    fn test_weight_aware_toss_up_is_fifty() {
        let weighted = vec![
            WeightedFactor::from_result("a", 0.5, FactorResult::new(Signal::Over, 0.3, "", "")),
            WeightedFactor::from_result("b", 0.5, FactorResult::new(Signal::Under, 0.2, "", "")),
        ];
        let input = VerdictInput {
            over_count: 1,
            under_count: 1,
            weighted_factors: Some(weighted),
            hit_rate_l10: Some(1.0),
            ..Default::default()
        };
        let v = synthesize_verdict(&input);
        assert_eq!(v.direction, LeanDirection::TossUp);
        assert_eq!(v.confidence, 50);
        assert_eq!(v.label, "MIXED");
    }
}
