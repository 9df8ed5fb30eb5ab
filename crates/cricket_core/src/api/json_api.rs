use serde::{Deserialize, Serialize};

use crate::data::NamePools;
use crate::engine::{Game, MatchConfig, RollSource, SeededRolls};
use crate::error::{MatchError, Result};
use crate::models::{CoinFace, MatchReport, TossDecision};
use crate::SCHEMA_VERSION;

fn default_team1() -> String {
    "Team A".to_string()
}

fn default_team2() -> String {
    "Team B".to_string()
}

/// Non-interactive match request. Only `schema_version` and `seed` are
/// required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub schema_version: u8,
    pub seed: u64,
    #[serde(default = "default_team1")]
    pub team1: String,
    #[serde(default = "default_team2")]
    pub team2: String,
    /// Team 1's call; drawn at random when absent.
    #[serde(default)]
    pub toss_call: Option<CoinFace>,
    /// Used only if team 1 wins the toss.
    #[serde(default)]
    pub toss_decision: Option<TossDecision>,
    #[serde(default)]
    pub config: Option<MatchConfig>,
    #[serde(default)]
    pub first_names: Option<Vec<String>>,
    #[serde(default)]
    pub surnames: Option<Vec<String>>,
}

impl MatchRequest {
    pub fn new(seed: u64) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            seed,
            team1: default_team1(),
            team2: default_team2(),
            toss_call: None,
            toss_decision: None,
            config: None,
            first_names: None,
            surnames: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(MatchError::InvalidRequest(format!(
                "Unsupported schema version: {}",
                self.schema_version
            )));
        }
        if self.team1.trim().is_empty() || self.team2.trim().is_empty() {
            return Err(MatchError::InvalidRequest("team names must not be empty".into()));
        }
        if self.team1 == self.team2 {
            return Err(MatchError::InvalidRequest(format!(
                "both teams are named '{}'",
                self.team1
            )));
        }
        Ok(())
    }

    fn name_pools(&self) -> NamePools {
        let defaults = NamePools::default();
        NamePools::new(
            self.first_names.clone().unwrap_or(defaults.first_names),
            self.surnames.clone().unwrap_or(defaults.surnames),
        )
    }
}

/// Play a whole match from `request`. The seed fixes every random draw, so
/// equal requests give equal reports.
pub fn simulate_match(request: &MatchRequest) -> Result<MatchReport> {
    request.validate()?;

    let config = request.config.clone().unwrap_or_default();
    let mut rng = SeededRolls::new(request.seed);
    let mut game = Game::new(
        request.team1.clone(),
        request.team2.clone(),
        config,
        &request.name_pools(),
        &mut rng,
    )?;

    let call = match request.toss_call {
        Some(call) => call,
        None => CoinFace::from_flip(rng.coin_flip()),
    };
    game.toss(call, request.toss_decision, &mut rng)?;
    game.play(&mut rng)?;
    Ok(game.report(Some(request.seed))?)
}

/// JSON in, JSON out wrapper around [`simulate_match`].
pub fn simulate_match_json(request_json: &str) -> Result<String> {
    let request: MatchRequest = serde_json::from_str(request_json)
        .map_err(|e| MatchError::InvalidRequest(format!("Invalid JSON request: {e}")))?;
    let report = simulate_match(&request)?;
    Ok(serde_json::to_string(&report)?)
}
