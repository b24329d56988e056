//! Sport-specific extension payloads passed alongside Player/Game.

use serde::{Deserialize, Serialize};

use super::Sport;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    #[serde(default)]
    pub wind_speed_mph: Option<f64>,
    /// Direction the wind blows toward, in compass degrees
    #[serde(default)]
    pub wind_direction_deg: Option<f64>,
    #[serde(default)]
    pub temperature_f: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub is_indoor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitcherProfile {
    pub name: String,
    pub throws: Handedness,
    #[serde(default)]
    pub era: Option<f64>,
    #[serde(default)]
    pub fip: Option<f64>,
    #[serde(default)]
    pub k_per_9: Option<f64>,
    #[serde(default)]
    pub whip: Option<f64>,
    #[serde(default)]
    pub rest_days: Option<u32>,
}

/// wRC+-style production by opposing pitcher hand (100 = league average).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatoonSplits {
    pub vs_left: f64,
    pub vs_right: f64,
}

impl PlatoonSplits {
    pub fn against(&self, hand: Handedness) -> f64 {
        match hand {
            Handedness::Left => self.vs_left,
            Handedness::Right => self.vs_right,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MlbExtra {
    #[serde(default)]
    pub weather: Option<WeatherConditions>,
    #[serde(default)]
    pub opposing_pitcher: Option<PitcherProfile>,
    #[serde(default)]
    pub platoon_splits: Option<PlatoonSplits>,
    /// Batting order slot (1-9)
    #[serde(default)]
    pub lineup_spot: Option<u8>,
}

/// Usage shares are percentages (0-100).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NflExtra {
    #[serde(default)]
    pub weather: Option<WeatherConditions>,
    #[serde(default)]
    pub snap_pct: Option<f64>,
    #[serde(default)]
    pub season_avg_snap_pct: Option<f64>,
    #[serde(default)]
    pub target_share: Option<f64>,
    #[serde(default)]
    pub season_avg_target_share: Option<f64>,
    #[serde(default)]
    pub carries_share: Option<f64>,
    #[serde(default)]
    pub season_avg_carries_share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sport", rename_all = "UPPERCASE")]
pub enum SportExtra {
    Mlb(MlbExtra),
    Nfl(NflExtra),
}

impl SportExtra {
    pub fn sport(&self) -> Sport {
        match self {
            SportExtra::Mlb(_) => Sport::MLB,
            SportExtra::Nfl(_) => Sport::NFL,
        }
    }

    pub fn as_mlb(&self) -> Option<&MlbExtra> {
        match self {
            SportExtra::Mlb(extra) => Some(extra),
            _ => None,
        }
    }

    pub fn as_nfl(&self) -> Option<&NflExtra> {
        match self {
            SportExtra::Nfl(extra) => Some(extra),
            _ => None,
        }
    }
}
