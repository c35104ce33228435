use std::fmt;
use std::slice::Iter;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::MoveError;
use super::BOARD_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    pub fn iter() -> Iter<'static, Direction> {
        static DIRS: [Direction; 2] = [Direction::Across, Direction::Down];
        DIRS.iter()
    }

    /// Reads a direction as typed by a player
    pub fn parse(text: &str) -> Option<Direction> {
        match text.trim().to_lowercase().as_str() {
            "across" | "right" | "a" | "r" => Some(Direction::Across),
            "down" | "d" => Some(Direction::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const CENTER: Position = Position {
        row: BOARD_SIZE / 2,
        col: BOARD_SIZE / 2,
    };

    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Returns the next position in the given direction
    pub fn next(&self, dir: Direction) -> Option<Position> {
        self.step_n(1, dir)
    }

    /// Returns the previous position in the given direction
    pub fn prev(&self, dir: Direction) -> Option<Position> {
        let mut p = *self;
        p[dir] = p[dir].checked_sub(1)?;
        Some(p)
    }

    /// Returns all the valid adjacent positions to this position
    pub fn adjacent(&self) -> Vec<Position> {
        let mut result = Vec::new();
        for d in Direction::iter() {
            if let Some(pos) = self.next(*d) {
                result.push(pos);
            }
            if let Some(pos) = self.prev(*d) {
                result.push(pos);
            }
        }
        result
    }

    /// Moves the position forward a fixed number of steps, `None` once that
    /// leaves the board
    pub fn step_n(&self, n: usize, dir: Direction) -> Option<Position> {
        let mut p = *self;
        p[dir] = p[dir].checked_add(n)?;
        if p.in_bounds() {
            Some(p)
        } else {
            None
        }
    }
}

impl std::ops::Index<Direction> for Position {
    type Output = usize;

    fn index(&self, index: Direction) -> &Self::Output {
        match index {
            Direction::Across => &self.col,
            Direction::Down => &self.row,
        }
    }
}

impl std::ops::IndexMut<Direction> for Position {
    fn index_mut(&mut self, index: Direction) -> &mut Self::Output {
        match index {
            Direction::Across => &mut self.col,
            Direction::Down => &mut self.row,
        }
    }
}

/// A tile face. Glyphs may span several characters (`NG`, `NANG`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    Blank,
    Glyph(Arc<str>),
}

impl Letter {
    pub const BLANK_SYMBOL: &'static str = "#";

    /// Parses a symbol, uppercasing it. `#` is the blank.
    pub fn parse(text: &str) -> Self {
        let upper = text.trim().to_uppercase();
        if upper == Self::BLANK_SYMBOL {
            Self::Blank
        } else {
            Self::Glyph(upper.into())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Blank => Self::BLANK_SYMBOL,
            Self::Glyph(g) => g,
        }
    }

    /// Text the letter contributes to a word. Blanks never spell anything.
    pub fn spelling(&self) -> Option<&str> {
        match self {
            Self::Blank => None,
            Self::Glyph(g) => Some(g),
        }
    }
}

impl From<&str> for Letter {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<char> for Letter {
    fn from(c: char) -> Self {
        Self::parse(c.encode_utf8(&mut [0; 4]))
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    pub letter: Letter,
    pub value: u32,
}

impl Tile {
    pub fn new(letter: Letter, value: u32) -> Self {
        Self { letter, value }
    }
}

/// A word placement. Ephemeral: built by the generator or from player input,
/// applied, then either kept or undone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub word: Vec<Letter>,
    pub pos: Position,
    pub dir: Direction,
}

impl Move {
    pub fn new(word: Vec<Letter>, pos: Position, dir: Direction) -> Self {
        Self { word, pos, dir }
    }

    /// Pairs each letter with the cell it lands on. Fails at the first cell
    /// off the board.
    pub fn cells(&self) -> Result<Vec<(Position, &Letter)>, MoveError> {
        self.word
            .iter()
            .enumerate()
            .map(|(i, l)| match self.pos.step_n(i, self.dir) {
                Some(p) => Ok((p, l)),
                None => {
                    let mut p = self.pos;
                    p[self.dir] = p[self.dir].saturating_add(i);
                    Err(MoveError::OutOfBounds { row: p.row, col: p.col })
                }
            })
            .collect()
    }

    /// Position of the last letter, `None` if it is off the board
    pub fn end(&self) -> Option<Position> {
        self.pos.step_n(self.word.len().saturating_sub(1), self.dir)
    }

    pub fn text(&self) -> String {
        self.word.iter().map(Letter::as_str).collect()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} at ({}, {}) {:?}",
            self.text(),
            self.pos.row,
            self.pos.col,
            self.dir
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareEffect {
    DoubleWord,
    DoubleLetter,
    TripleWord,
    TripleLetter,
    Plain,
}

impl SquareEffect {
    pub fn letter_multiplier(&self) -> u32 {
        match self {
            Self::DoubleLetter => 2,
            Self::TripleLetter => 3,
            _ => 1,
        }
    }

    pub fn word_multiplier(&self) -> u32 {
        match self {
            Self::DoubleWord => 2,
            Self::TripleWord => 3,
            _ => 1,
        }
    }

    /// Layout file code for the square.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TripleWord => "TW",
            Self::DoubleWord => "DW",
            Self::TripleLetter => "TL",
            Self::DoubleLetter => "DL",
            Self::Plain => "",
        }
    }
}
