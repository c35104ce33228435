use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[macro_use]
extern crate text_io;

use crate::scrabble::bag::TileSet;
use crate::scrabble::board::PremiumLayout;
use crate::scrabble::dictionary::Dictionary;
use crate::scrabble::error::MoveError;
use crate::scrabble::session::{GameSession, TurnAction, TurnInput};
use crate::scrabble::util::Direction;
use crate::utils::config::GameConfig;

mod scrabble;
mod utils;

/// Reads human moves from stdin
struct ConsoleInput;

impl ConsoleInput {
    fn prompt(text: &str) -> String {
        println!("{}", text);
        let line: String = read!("{}\n");
        line.trim().to_string()
    }

    fn prompt_number(text: &str) -> usize {
        loop {
            match Self::prompt(text).parse() {
                Ok(n) => return n,
                Err(_) => println!("Please enter a number."),
            }
        }
    }

    fn prompt_direction() -> Direction {
        loop {
            match Direction::parse(&Self::prompt("Direction of word (right or down):")) {
                Some(dir) => return dir,
                None => println!("Please enter right or down."),
            }
        }
    }
}

impl TurnInput for ConsoleInput {
    fn next_action(&mut self, game: &GameSession) -> TurnAction {
        let player = game.current_player();
        println!("\nRound {}: {}'s turn\n", game.round(), player.name);
        println!("{}", game.board());
        for p in game.players() {
            println!("{}'s score: {}", p.name, p.score);
        }
        println!("\n{}'s letter rack: {}", player.name, player.rack);

        let word = Self::prompt("Word to play (leave empty to pass):");
        if word.is_empty() {
            return TurnAction::Pass;
        }
        let col = Self::prompt_number("Column number:");
        let row = Self::prompt_number("Row number:");
        let dir = Self::prompt_direction();
        TurnAction::Play { word, row, col, dir }
    }

    fn rejected(&mut self, error: &MoveError) {
        println!("Cannot play that: {}", error);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::from_file(&path).with_context(|| format!("reading config {}", path))?,
        None => GameConfig::default(),
    };

    let dictionary = Dictionary::from_file(&config.dictionary.path, config.dictionary.min_word_len)
        .with_context(|| format!("loading dictionary {}", config.dictionary.path.display()))?;
    let layout = match &config.layout {
        Some(path) => PremiumLayout::from_file(path)
            .with_context(|| format!("loading board layout {}", path.display()))?,
        None => PremiumLayout::standard(),
    };
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let dictionary = Arc::new(dictionary);
    let layout = Arc::new(layout);
    info!(depth = config.search.depth, parallel = config.search.parallel, "starting game");
    loop {
        println!("\n\t\t\tWelcome to TagaLetrAI!");
        let mut game = GameSession::new(&config, dictionary.clone(), TileSet::tagalog(), layout.clone(), &mut rng);
        let winner = game.run(&mut ConsoleInput).map(|p| p.name.clone());

        println!("\n{}", game.board());
        for player in game.players() {
            println!("{}: {}", player.name, player.score);
        }
        match winner {
            Some(name) => println!("GAME OVER! {}, you have won!", name),
            None => println!("GAME OVER! It's a tie."),
        }

        if !ConsoleInput::prompt("Play again? (y/n)").eq_ignore_ascii_case("y") {
            break;
        }
    }
    Ok(())
}
