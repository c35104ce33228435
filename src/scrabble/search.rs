//! Move search
//!
//! Depth-bounded minimax with alpha-beta pruning. The agent's own move is the
//! root ply; `depth` more plies are searched below it, alternating between
//! the opponent (minimising) and the agent (maximising). Leaves are scored by
//! [`Evaluator`].
//!
//! Every `place` made while searching is undone by a matching `remove` on a
//! private copy of the board before the call returns. Racks are cloned per
//! branch and are not refilled inside the tree.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::board::ScrabbleBoard;
use super::dictionary::Dictionary;
use super::evaluate::{Evaluator, Scored};
use super::movegen::MoveGenerator;
use super::rack::Rack;
use super::session::Player;
use super::util::Move;

/// Search settings for an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Plies searched below the agent's own move
    #[serde(default = "default_depth")]
    pub depth: u8,
    /// Evaluate root moves on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_depth() -> u8 {
    1
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            parallel: false,
        }
    }
}

/// The part of a player the search needs
#[derive(Debug, Clone)]
struct Side {
    score: u32,
    rack: Rack,
}

impl Side {
    fn of(player: &Player) -> Self {
        Self {
            score: player.score,
            rack: player.rack.clone(),
        }
    }
}

impl Scored for Side {
    fn score(&self) -> u32 {
        self.score
    }
}

/// Plays `m` for `side`. Only generator output reaches this, so a rejection
/// means the generator and the board disagree.
fn play(board: &mut ScrabbleBoard, side: &Side, m: &Move) -> Side {
    let mut rack = side.rack.clone();
    let gained = match board.place(m, &mut rack) {
        Ok(points) => points,
        Err(err) => panic!("generated move {} rejected by the board: {}", m, err),
    };
    Side {
        score: side.score + gained,
        rack,
    }
}

pub struct Searcher<'a> {
    dictionary: &'a Dictionary,
    generator: MoveGenerator<'a>,
    prune: bool,
    parallel: bool,
    nodes_searched: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self {
            dictionary,
            generator: MoveGenerator::new(dictionary),
            prune: true,
            parallel: false,
            nodes_searched: 0,
        }
    }

    pub fn from_config(dictionary: &'a Dictionary, config: &SearchConfig) -> Self {
        Self::new(dictionary).parallel(config.parallel)
    }

    /// Spreads root moves over worker threads, each with its own board copy
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Plain minimax, visiting every node. Same result, more work.
    pub fn unpruned(mut self) -> Self {
        self.prune = false;
        self
    }

    /// Number of nodes visited by the last search
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Best move for `agent`, or `None` when it has no legal move and has to
    /// pass. Among moves of equal value the first one generated wins.
    pub fn best_move(
        &mut self,
        board: &ScrabbleBoard,
        agent: &Player,
        opponent: &Player,
        depth: u8,
    ) -> Option<Move> {
        self.search(board, agent, opponent, depth).map(|(m, _)| m)
    }

    /// Like [`best_move`](Self::best_move), also returning the move's value
    pub fn search(
        &mut self,
        board: &ScrabbleBoard,
        agent: &Player,
        opponent: &Player,
        depth: u8,
    ) -> Option<(Move, i32)> {
        self.nodes_searched = 0;
        let agent = Side::of(agent);
        let opponent = Side::of(opponent);
        let moves = self
            .generator
            .candidates(&agent.rack, board)
            .collect::<Vec<_>>();

        let best = if self.parallel {
            self.search_parallel(board, &agent, &opponent, moves, depth)
        } else {
            self.search_sequential(board, &agent, &opponent, moves, depth)
        };

        debug!(
            depth,
            nodes = self.nodes_searched,
            value = ?best.as_ref().map(|(_, v)| *v),
            chosen = %best.as_ref().map(|(m, _)| m.to_string()).unwrap_or_default(),
            "search finished"
        );
        best
    }

    fn search_sequential(
        &mut self,
        board: &ScrabbleBoard,
        agent: &Side,
        opponent: &Side,
        moves: Vec<Move>,
        depth: u8,
    ) -> Option<(Move, i32)> {
        let mut scratch = board.clone();
        let mut best: Option<(Move, i32)> = None;
        let mut alpha = i32::MIN;
        for m in moves {
            let child = play(&mut scratch, agent, &m);
            let value = self.alpha_beta(&mut scratch, &child, opponent, depth, alpha, i32::MAX, false);
            scratch.remove(&m);

            if best.as_ref().map_or(true, |(_, b)| value > *b) {
                alpha = alpha.max(value);
                best = Some((m, value));
            }
        }
        debug_assert!(scratch.placements.len() == board.placements.len());
        best
    }

    fn search_parallel(
        &mut self,
        board: &ScrabbleBoard,
        agent: &Side,
        opponent: &Side,
        moves: Vec<Move>,
        depth: u8,
    ) -> Option<(Move, i32)> {
        let dictionary = self.dictionary;
        let prune = self.prune;
        let results = moves
            .par_iter()
            .map(|m| {
                let mut worker = Searcher::new(dictionary);
                worker.prune = prune;
                let mut scratch = board.clone();
                let child = play(&mut scratch, agent, m);
                let value = worker.alpha_beta(&mut scratch, &child, opponent, depth, i32::MIN, i32::MAX, false);
                scratch.remove(m);
                (value, worker.nodes_searched)
            })
            .collect::<Vec<_>>();

        self.nodes_searched = results.iter().map(|(_, n)| n).sum();
        let mut best: Option<(Move, i32)> = None;
        for (m, (value, _)) in moves.into_iter().zip(results) {
            if best.as_ref().map_or(true, |(_, b)| value > *b) {
                best = Some((m, value));
            }
        }
        best
    }

    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &mut ScrabbleBoard,
        agent: &Side,
        opponent: &Side,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes_searched += 1;

        let leaf = Evaluator::evaluate(board, agent, opponent);
        if depth == 0 {
            return leaf;
        }

        let mover = if maximizing { agent } else { opponent };
        let moves = self
            .generator
            .candidates(&mover.rack, board)
            .collect::<Vec<_>>();
        // A player without moves ends the line here
        if moves.is_empty() {
            return leaf;
        }

        if maximizing {
            let mut best = i32::MIN;
            for m in &moves {
                let child = play(board, agent, m);
                let value = self.alpha_beta(board, &child, opponent, depth - 1, alpha, beta, false);
                board.remove(m);

                best = best.max(value);
                if best > alpha {
                    alpha = best;
                }
                if self.prune && beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for m in &moves {
                let child = play(board, opponent, m);
                let value = self.alpha_beta(board, agent, &child, depth - 1, alpha, beta, true);
                board.remove(m);

                best = best.min(value);
                if best < beta {
                    beta = best;
                }
                if self.prune && beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}
