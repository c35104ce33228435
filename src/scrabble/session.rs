//! A two player game: one human at the console, one search agent.

use std::cmp::Ordering;
use std::ops::ControlFlow;
use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use crate::utils::config::GameConfig;

use super::bag::{TileBag, TileSet};
use super::board::{PremiumLayout, ScrabbleBoard};
use super::dictionary::Dictionary;
use super::error::MoveError;
use super::movegen;
use super::rack::Rack;
use super::search::{SearchConfig, Searcher};
use super::util::{Direction, Move, Position};

/// Who decides a player's moves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Human,
    Agent(SearchConfig),
}

#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub score: u32,
    pub rack: Rack,
    pub strategy: Strategy,
}

impl Player {
    pub fn new<S: Into<String>>(name: S, rack: Rack, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            score: 0,
            rack,
            strategy,
        }
    }

    pub fn is_human(&self) -> bool {
        self.strategy == Strategy::Human
    }
}

/// What a human asks for on their turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnAction {
    Play {
        word: String,
        row: usize,
        col: usize,
        dir: Direction,
    },
    Pass,
}

/// Source of human moves
pub trait TurnInput {
    /// Next action for the current player of `game`
    fn next_action(&mut self, game: &GameSession) -> TurnAction;

    /// Called when the last action could not be played. The turn is asked
    /// for again afterwards.
    fn rejected(&mut self, _error: &MoveError) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Played { mv: Move, points: u32 },
    Passed,
}

pub struct GameSession {
    dictionary: Arc<Dictionary>,
    tileset: TileSet,
    board: ScrabbleBoard,
    bag: TileBag,
    players: [Player; 2],
    current: usize,
    round: usize,
    consecutive_passes: usize,
    max_passes: usize,
}

impl GameSession {
    /// Starts a game with a bag shuffled by `rng`
    pub fn new<R: Rng + ?Sized>(
        config: &GameConfig,
        dictionary: Arc<Dictionary>,
        tileset: TileSet,
        layout: Arc<PremiumLayout>,
        rng: &mut R,
    ) -> Self {
        let bag = TileBag::new(&tileset, rng);
        Self::with_bag(config, dictionary, tileset, layout, bag)
    }

    /// Starts a game drawing from `bag` as given. The human draws first.
    pub fn with_bag(
        config: &GameConfig,
        dictionary: Arc<Dictionary>,
        tileset: TileSet,
        layout: Arc<PremiumLayout>,
        mut bag: TileBag,
    ) -> Self {
        let mut human = Player::new(
            config.human_name.clone(),
            Rack::new(config.rack_capacity),
            Strategy::Human,
        );
        let mut agent = Player::new(
            config.agent_name.clone(),
            Rack::new(config.rack_capacity),
            Strategy::Agent(config.search.clone()),
        );
        bag.refill(&mut human.rack);
        bag.refill(&mut agent.rack);

        Self {
            dictionary,
            tileset,
            board: ScrabbleBoard::new(layout).with_word_multipliers(config.word_multipliers),
            bag,
            players: [human, agent],
            current: 0,
            round: 1,
            consecutive_passes: 0,
            max_passes: config.max_passes,
        }
    }

    pub fn board(&self) -> &ScrabbleBoard {
        &self.board
    }

    pub fn bag(&self) -> &TileBag {
        &self.bag
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    fn other_player(&self) -> &Player {
        &self.players[1 - self.current]
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn consecutive_passes(&self) -> usize {
        self.consecutive_passes
    }

    fn advance(&mut self) {
        self.current = 1 - self.current;
        if self.current == 0 {
            self.round += 1;
        }
    }

    /// Checks `m` for the current player: a dictionary word, legal on the
    /// board, playable from the rack.
    fn check(&self, m: &Move) -> Result<(), MoveError> {
        if m.word.iter().any(|l| l.spelling().is_none()) || !self.dictionary.contains(&m.text()) {
            return Err(MoveError::InvalidWord { word: m.text() });
        }
        movegen::validate(&self.board, &self.current_player().rack, m)
    }

    /// Plays `m` for the current player. On success the score is added, the
    /// rack refilled and the turn passes on. On error nothing changes.
    pub fn submit(&mut self, m: Move) -> Result<u32, MoveError> {
        self.check(&m)?;
        let player = &mut self.players[self.current];
        let points = self.board.place(&m, &mut player.rack)?;
        player.score += points;
        let drawn = self.bag.refill(&mut player.rack);
        info!(
            round = self.round,
            player = %player.name,
            word = %m,
            points,
            score = player.score,
            drawn,
            "played"
        );

        self.consecutive_passes = 0;
        self.advance();
        Ok(points)
    }

    pub fn pass(&mut self) {
        self.consecutive_passes += 1;
        info!(
            round = self.round,
            player = %self.current_player().name,
            passes = self.consecutive_passes,
            "passed"
        );
        self.advance();
    }

    /// Reads typed text as tiles. Text such as `NGA` can be split more than
    /// one way; the first split the current player can play wins. When none
    /// can be played the first split's error is returned.
    pub fn parse_move(&self, text: &str, row: usize, col: usize, dir: Direction) -> Result<Move, MoveError> {
        let mut first_err = None;
        let found = self.tileset.find_segmentation(text, |word| {
            let m = Move::new(word.to_vec(), Position::new(row, col), dir);
            match self.check(&m) {
                Ok(()) => ControlFlow::Break(m),
                Err(e) => {
                    first_err.get_or_insert(e);
                    ControlFlow::Continue(())
                }
            }
        })?;
        found.ok_or_else(|| first_err.unwrap_or(MoveError::EmptyWord))
    }

    /// Best move for the current player, `None` if it has to pass
    pub fn agent_move(&self) -> Option<Move> {
        let config = match &self.current_player().strategy {
            Strategy::Agent(config) => config.clone(),
            Strategy::Human => SearchConfig::default(),
        };
        Searcher::from_config(&self.dictionary, &config).best_move(
            &self.board,
            self.current_player(),
            self.other_player(),
            config.depth,
        )
    }

    /// Plays one turn for whoever is to move
    pub fn play_turn<I: TurnInput + ?Sized>(&mut self, input: &mut I) -> TurnOutcome {
        if self.current_player().is_human() {
            self.human_turn(input)
        } else {
            self.agent_turn()
        }
    }

    fn human_turn<I: TurnInput + ?Sized>(&mut self, input: &mut I) -> TurnOutcome {
        loop {
            let action = input.next_action(self);
            let (word, row, col, dir) = match action {
                TurnAction::Pass => {
                    self.pass();
                    return TurnOutcome::Passed;
                }
                TurnAction::Play { word, row, col, dir } => (word, row, col, dir),
            };

            let result = self
                .parse_move(&word, row, col, dir)
                .and_then(|m| self.submit(m.clone()).map(|points| (m, points)));
            match result {
                Ok((mv, points)) => return TurnOutcome::Played { mv, points },
                Err(e) => input.rejected(&e),
            }
        }
    }

    fn agent_turn(&mut self) -> TurnOutcome {
        let mv = match self.agent_move() {
            Some(mv) => mv,
            None => {
                self.pass();
                return TurnOutcome::Passed;
            }
        };
        match self.submit(mv.clone()) {
            Ok(points) => TurnOutcome::Played { mv, points },
            Err(error) => {
                warn!(%error, word = %mv, "agent move rejected");
                self.pass();
                TurnOutcome::Passed
            }
        }
    }

    /// Over after `max_passes` passes in a row, or once someone has emptied
    /// their rack with the bag already empty
    pub fn is_over(&self) -> bool {
        self.consecutive_passes >= self.max_passes
            || (self.bag.is_empty() && self.players.iter().any(|p| p.rack.is_empty()))
    }

    /// Highest score, `None` on a tie
    pub fn winner(&self) -> Option<&Player> {
        let [first, second] = &self.players;
        match first.score.cmp(&second.score) {
            Ordering::Greater => Some(first),
            Ordering::Less => Some(second),
            Ordering::Equal => None,
        }
    }

    /// Plays turns until the game is over
    pub fn run<I: TurnInput + ?Sized>(&mut self, input: &mut I) -> Option<&Player> {
        while !self.is_over() {
            self.play_turn(input);
        }
        info!(
            rounds = self.round,
            scores = ?self.players.iter().map(|p| (p.name.as_str(), p.score)).collect::<Vec<_>>(),
            "game over"
        );
        self.winner()
    }
}
