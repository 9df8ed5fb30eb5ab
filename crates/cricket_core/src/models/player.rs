use serde::{Deserialize, Serialize};

/// One roster slot: batting and bowling figures for a single match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub short_name: String,

    // Batting
    pub runs: u32,
    pub balls_faced: u32,
    pub out: bool,
    pub how_out: Option<String>,

    // Bowling
    pub bowling_balls: u32,
    pub runs_conceded: u32,
    pub wickets_taken: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let short_name = abbreviate_name(&name);
        Self {
            name,
            short_name,
            runs: 0,
            balls_faced: 0,
            out: false,
            how_out: None,
            bowling_balls: 0,
            runs_conceded: 0,
            wickets_taken: 0,
        }
    }

    /// Mark the batter out. Dismissal is final: a second call is ignored and
    /// the first description is kept.
    pub fn dismiss(&mut self, how_out: impl Into<String>) -> bool {
        if self.out {
            return false;
        }
        self.out = true;
        self.how_out = Some(how_out.into());
        true
    }

    /// Runs per hundred balls faced.
    pub fn strike_rate(&self) -> Option<f64> {
        (self.balls_faced > 0).then(|| self.runs as f64 * 100.0 / self.balls_faced as f64)
    }

    /// Runs conceded per six legal balls.
    pub fn economy(&self, balls_per_over: u32) -> Option<f64> {
        (self.bowling_balls > 0)
            .then(|| self.runs_conceded as f64 * balls_per_over as f64 / self.bowling_balls as f64)
    }

    /// Bowling figures in `wickets/runs` form.
    pub fn figures(&self) -> String {
        format!("{}/{}", self.wickets_taken, self.runs_conceded)
    }
}

/// First initial, a period, then every remaining token:
/// `"AB de Villiers"` → `"A. de Villiers"`.
pub fn abbreviate_name(full_name: &str) -> String {
    let mut tokens = full_name.split_whitespace();
    let Some(first) = tokens.next() else {
        return String::new();
    };
    let initial = first.chars().next().map(String::from).unwrap_or_default();
    let rest: Vec<&str> = tokens.collect();
    if rest.is_empty() {
        format!("{initial}.")
    } else {
        format!("{initial}. {}", rest.join(" "))
    }
}
