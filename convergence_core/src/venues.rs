//! Static venue tables.
//!
//! This module provides:
//! - MLB park run-environment index and outfield orientation
//! - NFL stadium roof status and division membership

/// MLB ballpark entry.
#[derive(Debug, Clone)]
pub struct Ballpark {
    /// Home team abbreviation
    pub team: &'static str,
    pub name: &'static str,
    /// Run-environment index, 100 = neutral
    pub factor: u32,
    /// Home plate to center field azimuth, compass degrees
    pub orientation_deg: f64,
    /// Fixed roof; weather never applies
    pub fixed_roof: bool,
}

pub static BALLPARKS: &[Ballpark] = &[
    Ballpark { team: "ARI", name: "Chase Field", factor: 102, orientation_deg: 0.0, fixed_roof: false },
    Ballpark { team: "ATL", name: "Truist Park", factor: 100, orientation_deg: 45.0, fixed_roof: false },
    Ballpark { team: "BAL", name: "Camden Yards", factor: 101, orientation_deg: 30.0, fixed_roof: false },
    Ballpark { team: "BOS", name: "Fenway Park", factor: 106, orientation_deg: 45.0, fixed_roof: false },
    Ballpark { team: "CHC", name: "Wrigley Field", factor: 102, orientation_deg: 30.0, fixed_roof: false },
    Ballpark { team: "CWS", name: "Rate Field", factor: 100, orientation_deg: 135.0, fixed_roof: false },
    Ballpark { team: "CIN", name: "Great American Ball Park", factor: 108, orientation_deg: 120.0, fixed_roof: false },
    Ballpark { team: "CLE", name: "Progressive Field", factor: 97, orientation_deg: 0.0, fixed_roof: false },
    Ballpark { team: "COL", name: "Coors Field", factor: 120, orientation_deg: 0.0, fixed_roof: false },
    Ballpark { team: "DET", name: "Comerica Park", factor: 97, orientation_deg: 150.0, fixed_roof: false },
    Ballpark { team: "HOU", name: "Daikin Park", factor: 99, orientation_deg: 345.0, fixed_roof: false },
    Ballpark { team: "KC", name: "Kauffman Stadium", factor: 101, orientation_deg: 45.0, fixed_roof: false },
    Ballpark { team: "LAA", name: "Angel Stadium", factor: 100, orientation_deg: 45.0, fixed_roof: false },
    Ballpark { team: "LAD", name: "Dodger Stadium", factor: 99, orientation_deg: 25.0, fixed_roof: false },
    Ballpark { team: "MIA", name: "loanDepot park", factor: 94, orientation_deg: 40.0, fixed_roof: false },
    Ballpark { team: "MIL", name: "American Family Field", factor: 101, orientation_deg: 130.0, fixed_roof: false },
    Ballpark { team: "MIN", name: "Target Field", factor: 100, orientation_deg: 90.0, fixed_roof: false },
    Ballpark { team: "NYM", name: "Citi Field", factor: 96, orientation_deg: 30.0, fixed_roof: false },
    Ballpark { team: "NYY", name: "Yankee Stadium", factor: 103, orientation_deg: 75.0, fixed_roof: false },
    Ballpark { team: "ATH", name: "Sutter Health Park", factor: 98, orientation_deg: 60.0, fixed_roof: false },
    Ballpark { team: "PHI", name: "Citizens Bank Park", factor: 103, orientation_deg: 15.0, fixed_roof: false },
    Ballpark { team: "PIT", name: "PNC Park", factor: 98, orientation_deg: 115.0, fixed_roof: false },
    Ballpark { team: "SD", name: "Petco Park", factor: 92, orientation_deg: 0.0, fixed_roof: false },
    Ballpark { team: "SF", name: "Oracle Park", factor: 94, orientation_deg: 90.0, fixed_roof: false },
    Ballpark { team: "SEA", name: "T-Mobile Park", factor: 93, orientation_deg: 50.0, fixed_roof: false },
    Ballpark { team: "STL", name: "Busch Stadium", factor: 97, orientation_deg: 60.0, fixed_roof: false },
    Ballpark { team: "TB", name: "Tropicana Field", factor: 95, orientation_deg: 45.0, fixed_roof: true },
    Ballpark { team: "TEX", name: "Globe Life Field", factor: 100, orientation_deg: 45.0, fixed_roof: false },
    Ballpark { team: "TOR", name: "Rogers Centre", factor: 100, orientation_deg: 0.0, fixed_roof: false },
    Ballpark { team: "WSH", name: "Nationals Park", factor: 100, orientation_deg: 30.0, fixed_roof: false },
];

/// NFL stadium entry.
#[derive(Debug, Clone)]
pub struct Stadium {
    pub team: &'static str,
    pub division: &'static str,
    /// Indoor or covered venue
    pub dome: bool,
}

pub static NFL_STADIUMS: &[Stadium] = &[
    // AFC
    Stadium { team: "BUF", division: "AFC East", dome: false },
    Stadium { team: "MIA", division: "AFC East", dome: false },
    Stadium { team: "NE", division: "AFC East", dome: false },
    Stadium { team: "NYJ", division: "AFC East", dome: false },
    Stadium { team: "BAL", division: "AFC North", dome: false },
    Stadium { team: "CIN", division: "AFC North", dome: false },
    Stadium { team: "CLE", division: "AFC North", dome: false },
    Stadium { team: "PIT", division: "AFC North", dome: false },
    Stadium { team: "HOU", division: "AFC South", dome: true },
    Stadium { team: "IND", division: "AFC South", dome: true },
    Stadium { team: "JAX", division: "AFC South", dome: false },
    Stadium { team: "TEN", division: "AFC South", dome: false },
    Stadium { team: "DEN", division: "AFC West", dome: false },
    Stadium { team: "KC", division: "AFC West", dome: false },
    Stadium { team: "LV", division: "AFC West", dome: true },
    Stadium { team: "LAC", division: "AFC West", dome: true },
    // NFC
    Stadium { team: "DAL", division: "NFC East", dome: true },
    Stadium { team: "NYG", division: "NFC East", dome: false },
    Stadium { team: "PHI", division: "NFC East", dome: false },
    Stadium { team: "WAS", division: "NFC East", dome: false },
    Stadium { team: "CHI", division: "NFC North", dome: false },
    Stadium { team: "DET", division: "NFC North", dome: true },
    Stadium { team: "GB", division: "NFC North", dome: false },
    Stadium { team: "MIN", division: "NFC North", dome: true },
    Stadium { team: "ATL", division: "NFC South", dome: true },
    Stadium { team: "CAR", division: "NFC South", dome: false },
    Stadium { team: "NO", division: "NFC South", dome: true },
    Stadium { team: "TB", division: "NFC South", dome: false },
    Stadium { team: "ARI", division: "NFC West", dome: true },
    Stadium { team: "LAR", division: "NFC West", dome: true },
    Stadium { team: "SF", division: "NFC West", dome: false },
    Stadium { team: "SEA", division: "NFC West", dome: false },
];

pub fn ballpark(team: &str) -> Option<&'static Ballpark> {
    let team = team.trim();
    BALLPARKS.iter().find(|p| p.team.eq_ignore_ascii_case(team))
}

/// Park index for the home team, 100 when the park is unknown.
pub fn ballpark_factor(team: &str) -> u32 {
    ballpark(team).map(|p| p.factor).unwrap_or(100)
}

pub fn nfl_stadium(team: &str) -> Option<&'static Stadium> {
    let team = team.trim();
    NFL_STADIUMS.iter().find(|s| s.team.eq_ignore_ascii_case(team))
}

pub fn is_nfl_dome(team: &str) -> bool {
    nfl_stadium(team).map(|s| s.dome).unwrap_or(false)
}

pub fn are_division_rivals(team_a: &str, team_b: &str) -> bool {
    match (nfl_stadium(team_a), nfl_stadium(team_b)) {
        (Some(a), Some(b)) => a.team != b.team && a.division == b.division,
        _ => false,
    }
}
