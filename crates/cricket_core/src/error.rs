use thiserror::Error;

/// Setup failures. Raised before a match exists; the match is never created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Name pool '{pool}' needs {required} distinct entries, found {found}")]
    NamePoolTooSmall { pool: &'static str, required: usize, found: usize },

    #[error("Team size must be at least 2, got {0}")]
    TeamSizeTooSmall(usize),

    #[error("Wicket limit {max_wickets} must be between 1 and {team_size} - 1")]
    InvalidWicketLimit { max_wickets: u32, team_size: usize },

    #[error("Invalid over settings: {0}")]
    InvalidOvers(String),

    #[error("Bowler pool {start}..={end} is empty or outside a roster of {team_size}")]
    BowlerPoolOutOfRange { start: usize, end: usize, team_size: usize },

    #[error("Bowler pool of {bowlers} at {overs_each} overs each cannot cover {overs} overs")]
    BowlerPoolTooSmall { bowlers: usize, overs_each: u32, overs: u32 },

    #[error("Keeper pool 0..={end} is outside a roster of {team_size}")]
    KeeperPoolOutOfRange { end: usize, team_size: usize },

    #[error("Dismissal weights must have a positive total")]
    EmptyDismissalWeights,

    #[error("Dismissal weights total exceeds u32::MAX")]
    DismissalWeightsOverflow,

    #[error("Roster for '{team}' must have {expected} players, found {found}")]
    RosterSize { team: String, expected: usize, found: usize },

    #[error("Roster for '{team}' contains duplicate player '{name}'")]
    DuplicatePlayer { team: String, name: String },

    #[error("{role} index {index} is invalid for '{team}'")]
    InvalidRole { team: String, role: &'static str, index: usize },
}

/// Internal invariant violations. These indicate a bug in the engine or a
/// caller driving it out of order, never bad user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineFault {
    #[error("No eligible bowler for over {over} (previous bowler: {previous:?})")]
    NoEligibleBowler { over: u32, previous: Option<usize> },

    #[error("Striker and non-striker share roster index {0}")]
    StrikeCollision(usize),

    #[error("Batting order exhausted at slot {next_idx} with only {outs} wickets down")]
    BattingOrderExhausted { next_idx: usize, outs: u32 },

    #[error("Innings for '{0}' is already complete")]
    InningsComplete(String),

    #[error("Die roll {0} outside 0..=9")]
    RollOutOfRange(u8),

    #[error("Bowler index {index} outside bowling roster of {roster}")]
    BowlerOutOfRange { index: usize, roster: usize },

    #[error("Operation '{operation}' not allowed while match is {phase}")]
    WrongPhase { operation: &'static str, phase: String },
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine fault: {0}")]
    Fault(#[from] EngineFault),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MatchError {
    /// True for invariant violations, false for anything the caller supplied.
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, MatchError::Fault(_))
    }
}

/// Bad toss call or bat/bowl choice at an interactive prompt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{input}' is not a valid {expected}")]
pub struct ParseChoiceError {
    pub input: String,
    pub expected: &'static str,
}

pub type Result<T> = std::result::Result<T, MatchError>;

/// Report an engine fault. Logged always; panics under `strict_contracts`.
pub(crate) fn raise(fault: EngineFault) -> EngineFault {
    tracing::error!(%fault, "engine invariant violated");

    #[cfg(feature = "strict_contracts")]
    panic!("STRICT: {fault}");

    #[cfg(not(feature = "strict_contracts"))]
    fault
}
