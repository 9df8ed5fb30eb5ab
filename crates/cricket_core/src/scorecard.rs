//! Batting and bowling cards for a finished (or in-progress) innings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::config::{format_overs_with, MatchConfig};
use crate::engine::innings::{Innings, OverSummary};
use crate::models::{InningsEnd, Player, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattingStatus {
    Out,
    NotOut,
    DidNotBat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingLine {
    pub name: String,
    pub short_name: String,
    pub status: BattingStatus,
    pub how_out: Option<String>,
    pub runs: u32,
    pub balls: u32,
    pub strike_rate: Option<f64>,
    pub captain: bool,
    pub keeper: bool,
}

impl BattingLine {
    pub fn from_player(team: &Team, idx: usize) -> Self {
        let player = &team.players[idx];
        let status = if player.out {
            BattingStatus::Out
        } else if team.has_batted(idx) {
            BattingStatus::NotOut
        } else {
            BattingStatus::DidNotBat
        };
        Self {
            name: player.name.clone(),
            short_name: player.short_name.clone(),
            status,
            how_out: player.how_out.clone(),
            runs: player.runs,
            balls: player.balls_faced,
            strike_rate: player.strike_rate(),
            captain: idx == team.captain_idx,
            keeper: idx == team.keeper_idx,
        }
    }

    /// `"†A. Smith (c)"` style.
    pub fn display_name(&self) -> String {
        format!(
            "{}{}{}",
            if self.keeper { "†" } else { "" },
            self.short_name,
            if self.captain { " (c)" } else { "" }
        )
    }

    pub fn dismissal_text(&self) -> &str {
        match self.status {
            BattingStatus::Out => self.how_out.as_deref().unwrap_or("out"),
            BattingStatus::NotOut => "not out",
            BattingStatus::DidNotBat => "did not bat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingLine {
    pub name: String,
    pub short_name: String,
    pub overs: String,
    pub legal_balls: u32,
    pub runs: u32,
    pub wickets: u32,
    pub economy: Option<f64>,
}

impl BowlingLine {
    pub fn from_player(player: &Player, balls_per_over: u32) -> Self {
        Self {
            name: player.name.clone(),
            short_name: player.short_name.clone(),
            overs: format_overs_with(player.bowling_balls, balls_per_over),
            legal_balls: player.bowling_balls,
            runs: player.runs_conceded,
            wickets: player.wickets_taken,
            economy: player.economy(balls_per_over),
        }
    }
}

/// Highest run-scorers among those who batted; fewer balls breaks ties.
pub fn top_scorers(lines: &[BattingLine], n: usize) -> Vec<BattingLine> {
    let mut batted: Vec<&BattingLine> =
        lines.iter().filter(|l| l.status != BattingStatus::DidNotBat).collect();
    batted.sort_by(|a, b| b.runs.cmp(&a.runs).then(a.balls.cmp(&b.balls)));
    batted.into_iter().take(n).cloned().collect()
}

/// Most wickets, then fewest runs conceded.
pub fn top_bowlers(lines: &[BowlingLine], n: usize) -> Vec<BowlingLine> {
    let mut sorted: Vec<&BowlingLine> = lines.iter().collect();
    sorted.sort_by(|a, b| b.wickets.cmp(&a.wickets).then(a.runs.cmp(&b.runs)));
    sorted.into_iter().take(n).cloned().collect()
}

/// One innings as it goes into the match report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningsSummary {
    pub number: u8,
    pub batting_team: String,
    pub bowling_team: String,
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub legal_balls: u32,
    /// Already included in `runs` and in the facing batters' tallies.
    pub extras: u32,
    pub target: Option<u32>,
    pub end: Option<InningsEnd>,
    pub batting: Vec<BattingLine>,
    /// In the order bowlers first came on.
    pub bowling: Vec<BowlingLine>,
    pub top_scorers: Vec<BattingLine>,
    pub top_bowlers: Vec<BowlingLine>,
    pub over_summaries: Vec<OverSummary>,
}

impl InningsSummary {
    pub fn build(innings: &Innings, batting: &Team, bowling: &Team, config: &MatchConfig) -> Self {
        let batting_lines: Vec<BattingLine> =
            (0..batting.players.len()).map(|idx| BattingLine::from_player(batting, idx)).collect();
        let bowling_lines: Vec<BowlingLine> = innings
            .bowler_order()
            .iter()
            .filter_map(|idx| bowling.players.get(*idx))
            .map(|p| BowlingLine::from_player(p, config.balls_per_over))
            .collect();

        Self {
            number: innings.number,
            batting_team: batting.name.clone(),
            bowling_team: bowling.name.clone(),
            runs: batting.runs,
            wickets: batting.outs,
            overs: format_overs_with(batting.legal_balls, config.balls_per_over),
            legal_balls: batting.legal_balls,
            extras: batting.extras,
            target: innings.target,
            end: innings.end(),
            top_scorers: top_scorers(&batting_lines, 3),
            top_bowlers: top_bowlers(&bowling_lines, 3),
            batting: batting_lines,
            bowling: bowling_lines,
            over_summaries: innings.overs().to_vec(),
        }
    }

    pub fn score(&self) -> String {
        format!("{}/{}", self.runs, self.wickets)
    }
}

fn rate(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for InningsSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} innings", self.batting_team)?;
        if let Some(target) = self.target {
            writeln!(f, "Target: {target}")?;
        }
        writeln!(f, "{:<24} {:<32} {:>4} {:>4} {:>7}", "Batter", "", "R", "B", "SR")?;
        for line in &self.batting {
            if line.status == BattingStatus::DidNotBat {
                continue;
            }
            writeln!(
                f,
                "{:<24} {:<32} {:>4} {:>4} {:>7}",
                line.display_name(),
                line.dismissal_text(),
                line.runs,
                line.balls,
                rate(line.strike_rate)
            )?;
        }
        let yet_to_bat: Vec<String> = self
            .batting
            .iter()
            .filter(|l| l.status == BattingStatus::DidNotBat)
            .map(BattingLine::display_name)
            .collect();
        if !yet_to_bat.is_empty() {
            writeln!(f, "Did not bat: {}", yet_to_bat.join(", "))?;
        }
        writeln!(f, "Extras (nb/w, in batter runs): {}", self.extras)?;
        writeln!(f, "Total: {} ({} overs)", self.score(), self.overs)?;
        writeln!(f)?;
        writeln!(f, "{:<24} {:>5} {:>4} {:>4} {:>6}", "Bowler", "O", "R", "W", "Econ")?;
        for line in &self.bowling {
            writeln!(
                f,
                "{:<24} {:>5} {:>4} {:>4} {:>6}",
                line.short_name,
                line.overs,
                line.runs,
                line.wickets,
                rate(line.economy)
            )?;
        }
        Ok(())
    }
}
