//! Weather signal calculator for outdoor sports.
//!
//! Converts raw observations into a bounded signal in [-1, 1] where positive
//! means conditions favor the offense (hitter-friendly / scoring-friendly).

use serde::{Deserialize, Serialize};

use crate::models::{Sport, WeatherConditions};
use crate::venues;

const PRECIP_KEYWORDS: [&str; 4] = ["rain", "drizzle", "thunderstorm", "snow"];

/// Coarse stat family, used to decide which weather effects apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatCategory {
    Passing,
    Rushing,
    Receiving,
    Hitting,
    Pitching,
    Other,
}

impl StatCategory {
    pub fn from_stat(sport: Sport, stat: &str) -> Self {
        let key = stat.trim().to_lowercase();
        match sport {
            Sport::NFL | Sport::NCAAF => {
                if key.contains("pass") || key.contains("complet") || key.contains("interception") {
                    StatCategory::Passing
                } else if key.contains("rec") || key.contains("target") {
                    StatCategory::Receiving
                } else if key.contains("rush") || key.contains("carr") {
                    StatCategory::Rushing
                } else {
                    StatCategory::Other
                }
            }
            Sport::MLB => {
                if key.starts_with("pitcher_")
                    || key.contains("allowed")
                    || key.contains("innings")
                    || key.contains("earned")
                    || key.contains("outs_recorded")
                {
                    StatCategory::Pitching
                } else {
                    StatCategory::Hitting
                }
            }
            _ => StatCategory::Other,
        }
    }

    fn is_pass_game(&self) -> bool {
        matches!(self, StatCategory::Passing | StatCategory::Receiving)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSignal {
    /// Bounded effect in [-1, 1]
    pub signal: f64,
    pub detail: String,
    /// Wind component along the park axis (MLB only), positive = blowing out
    pub effective_wind: Option<f64>,
}

impl WeatherSignal {
    fn neutral(detail: &str) -> Self {
        Self {
            signal: 0.0,
            detail: detail.to_string(),
            effective_wind: None,
        }
    }
}

/// Compute the weather signal for a game.
pub fn calculate_weather_signal(
    weather: Option<&WeatherConditions>,
    sport: Sport,
    category: StatCategory,
    home_team: &str,
) -> WeatherSignal {
    match sport {
        Sport::MLB | Sport::NFL | Sport::NCAAF => {}
        _ => return WeatherSignal::neutral("Indoor sport"),
    }

    if matches!(sport, Sport::NFL | Sport::NCAAF) && venues::is_nfl_dome(home_team) {
        return WeatherSignal::neutral("Indoor dome");
    }
    if sport == Sport::MLB && venues::ballpark(home_team).is_some_and(|p| p.fixed_roof) {
        return WeatherSignal::neutral("Indoor dome");
    }

    let Some(weather) = weather else {
        return WeatherSignal::neutral("Weather data unavailable");
    };
    if weather.is_indoor {
        return WeatherSignal::neutral("Indoor venue, no weather effect");
    }
    if weather.wind_speed_mph.is_none()
        && weather.temperature_f.is_none()
        && weather.condition.is_none()
    {
        return WeatherSignal::neutral("Weather data unavailable");
    }

    let (mut signal, mut parts, effective_wind) = if sport == Sport::MLB {
        mlb_components(weather, home_team)
    } else {
        nfl_components(weather, category)
    };

    if let Some(condition) = weather.condition.as_deref() {
        let lowered = condition.to_lowercase();
        if PRECIP_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            let effect = if sport == Sport::MLB { -0.20 } else { -0.15 };
            signal += effect;
            parts.push(format!("{} ({:+.2})", condition.trim(), effect));
        }
    }

    if sport == Sport::MLB && category == StatCategory::Pitching {
        signal = -signal;
    }

    let signal = signal.clamp(-1.0, 1.0);
    let detail = if parts.is_empty() {
        "Neutral conditions".to_string()
    } else {
        parts.join(", ")
    };

    WeatherSignal {
        signal,
        detail,
        effective_wind,
    }
}

fn mlb_components(weather: &WeatherConditions, home_team: &str) -> (f64, Vec<String>, Option<f64>) {
    let mut signal = 0.0;
    let mut parts = Vec::new();
    let mut effective_wind = None;

    if let (Some(speed), Some(dir), Some(park)) = (
        weather.wind_speed_mph,
        weather.wind_direction_deg,
        venues::ballpark(home_team),
    ) {
        let effective = speed * (dir - park.orientation_deg).to_radians().cos();
        effective_wind = Some(effective);
        // Wind blowing in suppresses more than wind blowing out inflates.
        let effect = if effective > 15.0 {
            0.7
        } else if effective > 10.0 {
            0.4
        } else if effective > 5.0 {
            0.2
        } else if effective < -15.0 {
            -0.8
        } else if effective < -10.0 {
            -0.5
        } else if effective < -5.0 {
            -0.25
        } else {
            0.0
        };
        if effect != 0.0 {
            let label = if effective > 0.0 { "out" } else { "in" };
            parts.push(format!(
                "Wind {} {:.0} mph ({:+.2})",
                label,
                effective.abs(),
                effect
            ));
            signal += effect;
        }
    }

    if let Some(temp) = weather.temperature_f {
        let effect = if temp < 45.0 {
            -0.35
        } else if temp < 55.0 {
            -0.20
        } else if temp > 85.0 {
            0.15
        } else {
            0.0
        };
        if effect != 0.0 {
            parts.push(format!("{:.0}°F ({:+.2})", temp, effect));
            signal += effect;
        }
    }

    (signal, parts, effective_wind)
}

fn nfl_components(weather: &WeatherConditions, category: StatCategory) -> (f64, Vec<String>, Option<f64>) {
    let mut signal = 0.0;
    let mut parts = Vec::new();

    if let Some(speed) = weather.wind_speed_mph {
        let effect = if category.is_pass_game() {
            if speed > 30.0 {
                -0.8
            } else if speed > 20.0 {
                -0.5
            } else if speed > 15.0 {
                -0.25
            } else {
                0.0
            }
        } else if category == StatCategory::Rushing && speed > 20.0 {
            // Offenses lean on the run in heavy wind
            0.3
        } else {
            0.0
        };
        if effect != 0.0 {
            parts.push(format!("Wind {:.0} mph ({:+.2})", speed, effect));
            signal += effect;
        }
    }

    if let Some(temp) = weather.temperature_f {
        let effect = if temp < 30.0 {
            -0.20
        } else if temp < 40.0 {
            -0.10
        } else {
            0.0
        };
        if effect != 0.0 {
            parts.push(format!("{:.0}°F ({:+.2})", temp, effect));
            signal += effect;
        }
    }

    (signal, parts, None)
}
