//! Position evaluation
//!
//! The heuristic is the plain score difference between the two players. It
//! does not look at rack leave, tile scarcity or how many tiles remain.

use super::board::ScrabbleBoard;
use super::session::Player;

/// Anything carrying a running game score
pub trait Scored {
    fn score(&self) -> u32;
}

impl Scored for Player {
    fn score(&self) -> u32 {
        self.score
    }
}

pub struct Evaluator;

impl Evaluator {
    /// Score of the position from `perspective`'s point of view
    pub fn evaluate<S: Scored>(_board: &ScrabbleBoard, perspective: &S, opponent: &S) -> i32 {
        perspective.score() as i32 - opponent.score() as i32
    }
}
