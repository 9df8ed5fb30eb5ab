pub mod ball;
pub mod match_result;
pub mod player;
pub mod team;

pub use ball::{BallOutcome, BallResult};
pub use match_result::{
    CoinFace, InningsEnd, MatchOutcome, MatchReport, TeamSlot, TossDecision, TossResult,
};
pub use player::{abbreviate_name, Player};
pub use team::Team;
