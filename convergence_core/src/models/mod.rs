// Shared models for the prop convergence engine
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod extra;
pub mod game_log;

pub use extra::*;
pub use game_log::*;

// ============================================================================
// Sport
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sport {
    NBA,
    NFL,
    MLB,
    NHL,
    NCAAB,
    NCAAF,
}

impl Sport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::NBA => "NBA",
            Sport::NFL => "NFL",
            Sport::MLB => "MLB",
            Sport::NHL => "NHL",
            Sport::NCAAB => "NCAAB",
            Sport::NCAAF => "NCAAF",
        }
    }

    /// Parse a sport code, falling back to NBA for anything unrecognized.
    pub fn from_str_lossy(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "NFL" => Sport::NFL,
            "MLB" => Sport::MLB,
            "NHL" => Sport::NHL,
            "NCAAB" => Sport::NCAAB,
            "NCAAF" => Sport::NCAAF,
            _ => Sport::NBA,
        }
    }

    /// EWMA smoothing factor for recent-trend calculations.
    ///
    /// Higher alpha trusts the newest game more. MLB plays daily so it
    /// smooths harder; NFL's short season trusts the latest game almost fully.
    pub fn ewma_alpha(&self) -> f64 {
        match self {
            Sport::MLB => 0.70,
            Sport::NFL | Sport::NCAAF => 0.90,
            _ => 0.85,
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Player / Game / Season context
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Team abbreviation (e.g. "DEN")
    pub team: String,
    pub position: String,
    pub sport: Sport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub venue: Option<String>,
    /// Market over/under for the game
    #[serde(default)]
    pub total: Option<f64>,
    /// Signed spread, negative favors the home team
    #[serde(default)]
    pub spread: Option<f64>,
}

impl Game {
    pub fn is_home_team(&self, team: &str) -> bool {
        self.home_team.trim().eq_ignore_ascii_case(team.trim())
    }

    /// Opponent abbreviation from the perspective of the given side.
    pub fn opponent_for(&self, is_home: bool) -> &str {
        if is_home {
            &self.away_team
        } else {
            &self.home_team
        }
    }

    /// Spread from the perspective of the given side (negative = favorite).
    pub fn team_spread(&self, is_home: bool) -> Option<f64> {
        self.spread.map(|s| if is_home { s } else { -s })
    }

    /// Implied team total: `total/2 - spread/2` for the home side,
    /// `total/2 + spread/2` for the away side.
    pub fn implied_team_total(&self, is_home: bool) -> Option<f64> {
        let total = self.total?;
        let spread = self.spread.unwrap_or(0.0);
        Some(if is_home {
            total / 2.0 - spread / 2.0
        } else {
            total / 2.0 + spread / 2.0
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub average: f64,
    #[serde(default)]
    pub median: Option<f64>,
    #[serde(default)]
    pub games_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseRanking {
    /// 1 = toughest defense
    pub rank: u32,
    /// Average allowed per game for the stat/position
    pub stats_allowed: f64,
}

// ============================================================================
// Signals & Factors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Over,
    Under,
    Neutral,
}

impl Signal {
    pub fn direction(&self) -> i8 {
        match self {
            Signal::Over => 1,
            Signal::Under => -1,
            Signal::Neutral => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Signal::Over => "OVER",
            Signal::Under => "UNDER",
            Signal::Neutral => "NEUTRAL",
        }
    }
}

/// Output of a single factor scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorResult {
    pub signal: Signal,
    pub strength: f64,
    pub detail: String,
    pub data_point: String,
}

impl FactorResult {
    pub fn new(
        signal: Signal,
        strength: f64,
        detail: impl Into<String>,
        data_point: impl Into<String>,
    ) -> Self {
        let strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            signal,
            strength,
            detail: detail.into(),
            data_point: data_point.into(),
        }
    }

    /// Neutral result with zero strength, used whenever inputs are missing.
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new(Signal::Neutral, 0.0, detail, "N/A")
    }
}

/// Factor result tagged with the sport weight it carries in the lean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedFactor {
    pub name: String,
    pub signal: Signal,
    pub strength: f64,
    pub detail: String,
    pub data_point: String,
    pub weight: f64,
    pub direction: i8,
    pub fired: bool,
}

impl WeightedFactor {
    pub fn from_result(name: &str, weight: f64, result: FactorResult) -> Self {
        let direction = result.signal.direction();
        let fired = result.signal != Signal::Neutral && result.strength > 0.1;
        Self {
            name: name.to_string(),
            signal: result.signal,
            strength: result.strength,
            detail: result.detail,
            data_point: result.data_point,
            weight,
            direction,
            fired,
        }
    }

    /// Signed contribution to the weighted vote.
    pub fn contribution(&self) -> f64 {
        self.weight * self.direction as f64 * self.strength
    }
}

/// Legacy flat factor shape (no weight/direction/fired).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceFactor {
    pub name: String,
    pub signal: Signal,
    pub strength: f64,
    pub detail: String,
    pub data_point: String,
}

impl From<&WeightedFactor> for ConvergenceFactor {
    fn from(factor: &WeightedFactor) -> Self {
        Self {
            name: factor.name.clone(),
            signal: factor.signal,
            strength: factor.strength,
            detail: factor.detail.clone(),
            data_point: factor.data_point.clone(),
        }
    }
}

// ============================================================================
// Lean
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeanDirection {
    Over,
    Under,
    TossUp,
}

impl LeanDirection {
    pub fn label(&self) -> &'static str {
        match self {
            LeanDirection::Over => "OVER",
            LeanDirection::Under => "UNDER",
            LeanDirection::TossUp => "TOSS-UP",
        }
    }

    pub fn agrees_with(&self, signal: Signal) -> bool {
        matches!(
            (self, signal),
            (LeanDirection::Over, Signal::Over) | (LeanDirection::Under, Signal::Under)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Strong,
    Moderate,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lean {
    pub direction: LeanDirection,
    pub confidence: u8,
    pub tier: Tier,
    pub factors: Vec<WeightedFactor>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sport_lossy_fallback() {
        assert_eq!(Sport::from_str_lossy("mlb"), Sport::MLB);
        assert_eq!(Sport::from_str_lossy(" nfl "), Sport::NFL);
        assert_eq!(Sport::from_str_lossy("cricket"), Sport::NBA);
    }

    #[test]
    fn test_implied_team_total() {
        let game = Game {
            id: "g1".to_string(),
            home_team: "KC".to_string(),
            away_team: "LV".to_string(),
            venue: None,
            total: Some(48.0),
            spread: Some(-7.0),
        };
        assert_eq!(game.implied_team_total(true), Some(27.5));
        assert_eq!(game.implied_team_total(false), Some(20.5));
        assert_eq!(game.team_spread(false), Some(7.0));
    }

    #[test]
    fn test_factor_result_clamps_strength() {
        assert_eq!(FactorResult::new(Signal::Over, 1.7, "", "").strength, 1.0);
        assert_eq!(FactorResult::new(Signal::Over, -0.2, "", "").strength, 0.0);
        assert_eq!(FactorResult::new(Signal::Over, f64::NAN, "", "").strength, 0.0);
    }

    #[test]
    fn test_fired_requires_signal_and_strength() {
        let weak = WeightedFactor::from_result("x", 0.1, FactorResult::new(Signal::Over, 0.1, "", ""));
        assert!(!weak.fired);
        let neutral =
            WeightedFactor::from_result("x", 0.1, FactorResult::new(Signal::Neutral, 0.9, "", ""));
        assert!(!neutral.fired);
        let fired = WeightedFactor::from_result("x", 0.1, FactorResult::new(Signal::Under, 0.5, "", ""));
        assert!(fired.fired);
        assert_eq!(fired.direction, -1);
    }
}
