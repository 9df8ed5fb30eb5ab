pub mod bowling;
pub mod config;
pub mod dismissal;
pub mod game;
pub mod innings;
pub mod resolver;
pub mod roll;

pub use bowling::{eligible_bowlers, select_bowler};
pub use config::{format_overs, format_overs_with, MatchConfig};
pub use dismissal::{describe_dismissal, Dismissal, DismissalKind, DismissalWeights};
pub use game::{Game, MatchPhase};
pub use innings::{ChaseState, Delivery, Innings, InningsPhase, Milestone, OverSummary};
pub use resolver::resolve_ball;
pub use roll::{RollSource, ScriptedRolls, SeededRolls, DIE_MAX};
