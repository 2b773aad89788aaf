pub mod game;
pub mod model;
pub mod policy;

/// Highest score a hand can be worth under the go-out rule; reaching it ends a player's round.
pub const MAX_SCORE: u8 = 31;
