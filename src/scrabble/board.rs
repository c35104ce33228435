use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use super::error::{ConfigError, MoveError};
use super::rack::Rack;
use super::util::{Letter, Move, Position, SquareEffect, Tile};
use super::BOARD_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Filled(Tile),
}

impl Cell {
    pub fn letter(&self) -> Option<&Letter> {
        match self {
            Cell::Empty => None,
            Cell::Filled(t) => Some(&t.letter),
        }
    }
}

/// Static premium squares of the board. Never changes once built and is
/// invariant under the board's rotations and reflections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremiumLayout {
    squares: [[SquareEffect; BOARD_SIZE]; BOARD_SIZE],
}

impl PremiumLayout {
    /// A layout without premium squares
    pub fn plain() -> Self {
        Self {
            squares: [[SquareEffect::Plain; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// The layout the game ships with. The centre square is plain.
    pub fn standard() -> Self {
        const TRIPLE_WORD: [(usize, usize); 2] = [(0, 0), (0, 7)];
        const DOUBLE_WORD: [(usize, usize); 4] = [(1, 1), (2, 2), (3, 3), (4, 4)];
        const TRIPLE_LETTER: [(usize, usize); 2] = [(1, 5), (5, 5)];
        const DOUBLE_LETTER: [(usize, usize); 5] = [(0, 3), (2, 6), (3, 7), (6, 6), (6, 2)];

        let mut layout = Self::plain();
        for (effect, coords) in [
            (SquareEffect::TripleWord, &TRIPLE_WORD[..]),
            (SquareEffect::DoubleWord, &DOUBLE_WORD[..]),
            (SquareEffect::TripleLetter, &TRIPLE_LETTER[..]),
            (SquareEffect::DoubleLetter, &DOUBLE_LETTER[..]),
        ] {
            for &(row, col) in coords {
                layout = layout.with_symmetric(Position { row, col }, effect);
            }
        }
        layout
    }

    /// Sets `pos` and every square it maps to under the board symmetries
    pub fn with_symmetric(mut self, pos: Position, effect: SquareEffect) -> Self {
        for p in Self::orbit(pos) {
            self.squares[p.row][p.col] = effect;
        }
        self
    }

    /// Loads a layout from a JSON grid of square codes (`"TW"`, `"DW"`,
    /// `"TL"`, `"DL"` or `""`)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path.as_ref())?;
        let mut data = String::new();
        file.read_to_string(&mut data)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let raw_board: Vec<Vec<String>> = serde_json::from_str(data)?;
        Self::from_codes(&raw_board)
    }

    pub fn from_codes(raw_board: &[Vec<String>]) -> Result<Self, ConfigError> {
        let dimensions = |row: usize, cols: usize| ConfigError::LayoutDimensions {
            expected: BOARD_SIZE,
            rows: raw_board.len(),
            row,
            cols,
        };
        if raw_board.len() != BOARD_SIZE {
            return Err(dimensions(0, raw_board.first().map_or(0, Vec::len)));
        }

        let mut layout = Self::plain();
        for (i, row) in raw_board.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(dimensions(i, row.len()));
            }
            for (j, code) in row.iter().enumerate() {
                layout.squares[i][j] = match code.trim().to_uppercase().as_str() {
                    "" => SquareEffect::Plain,
                    "TW" => SquareEffect::TripleWord,
                    "DW" => SquareEffect::DoubleWord,
                    "TL" => SquareEffect::TripleLetter,
                    "DL" => SquareEffect::DoubleLetter,
                    _ => return Err(ConfigError::UnknownSquare(code.clone())),
                };
            }
        }

        match layout.first_asymmetry() {
            Some(pos) => Err(ConfigError::AsymmetricLayout {
                row: pos.row,
                col: pos.col,
            }),
            None => Ok(layout),
        }
    }

    pub fn effect(&self, pos: Position) -> SquareEffect {
        self.squares[pos.row][pos.col]
    }

    /// First square whose images under the board symmetries disagree with it
    pub fn first_asymmetry(&self) -> Option<Position> {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let pos = Position { row, col };
                let effect = self.effect(pos);
                if Self::orbit(pos).any(|p| self.effect(p) != effect) {
                    return Some(pos);
                }
            }
        }
        None
    }

    /// All images of `pos` under transposition and the two reflections
    fn orbit(pos: Position) -> impl Iterator<Item = Position> {
        let last = BOARD_SIZE - 1;
        let (r, c) = (pos.row, pos.col);
        [
            (r, c),
            (c, r),
            (last - r, c),
            (r, last - c),
            (last - r, last - c),
            (c, last - r),
            (last - c, r),
            (last - c, last - r),
        ]
        .into_iter()
        .map(|(row, col)| Position { row, col })
    }
}

impl Default for PremiumLayout {
    fn default() -> Self {
        Self::standard()
    }
}

/// Record of one `place` call, kept so `remove` can undo exactly it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub mv: Move,
    /// Cells that were empty before the placement
    pub written: Vec<Position>,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct ScrabbleBoard {
    /// Actual tiles on the board
    state: Vec<Vec<Cell>>,
    /// Premium squares, shared between clones
    layout: Arc<PremiumLayout>,
    /// Whether DW/TW squares multiply the word score
    word_multipliers: bool,
    /// Moves placed on the board, most recent last
    pub placements: Vec<Placement>,
}

impl ScrabbleBoard {
    pub fn empty() -> Self {
        Self::new(Arc::new(PremiumLayout::standard()))
    }

    pub fn new(layout: Arc<PremiumLayout>) -> Self {
        Self {
            state: vec![vec![Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
            layout,
            word_multipliers: false,
            placements: Vec::new(),
        }
    }

    pub fn with_word_multipliers(mut self, enabled: bool) -> Self {
        self.word_multipliers = enabled;
        self
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Result<&Cell, MoveError> {
        let pos = Position { row, col };
        if !pos.in_bounds() {
            return Err(MoveError::OutOfBounds { row, col });
        }
        Ok(&self[pos])
    }

    pub fn premium_at(&self, pos: Position) -> SquareEffect {
        self.layout.effect(pos)
    }

    /// Places `m` on the board, taking the newly laid tiles from `rack`.
    /// Squares may already hold the same letter; those are crossed, not
    /// replaced. Nothing changes unless the whole move fits.
    ///
    /// Returns the score: tile values, with letter premiums counted only on
    /// squares this move fills.
    pub fn place(&mut self, m: &Move, rack: &mut Rack) -> Result<u32, MoveError> {
        if m.word.is_empty() {
            return Err(MoveError::EmptyWord);
        }

        let mut crossed_score = 0;
        let mut fresh = Vec::with_capacity(m.word.len());
        for (pos, letter) in m.cells()? {
            match &self[pos] {
                Cell::Filled(tile) if tile.letter == *letter => crossed_score += tile.value,
                Cell::Filled(tile) => {
                    return Err(MoveError::Occupied {
                        row: pos.row,
                        col: pos.col,
                        found: tile.letter.to_string(),
                        wanted: letter.to_string(),
                    })
                }
                Cell::Empty => fresh.push((pos, letter)),
            }
        }
        if fresh.is_empty() {
            return Err(MoveError::NothingPlaced);
        }

        let tiles = rack
            .take_all(fresh.iter().map(|(_, l)| *l))
            .map_err(|l| MoveError::RackMismatch {
                symbol: l.to_string(),
            })?;

        let mut score = crossed_score;
        let mut word_mult = 1;
        let mut written = Vec::with_capacity(fresh.len());
        for ((pos, _), tile) in fresh.into_iter().zip(tiles) {
            let effect = self.premium_at(pos);
            score += tile.value * effect.letter_multiplier();
            word_mult *= effect.word_multiplier();
            self[pos] = Cell::Filled(tile);
            written.push(pos);
        }
        if self.word_multipliers {
            score *= word_mult;
        }

        self.placements.push(Placement {
            mv: m.clone(),
            written,
            score,
        });
        Ok(score)
    }

    /// Undoes the most recent placement, which must be `m`. Rack tiles used
    /// by the placement are not given back.
    pub fn remove(&mut self, m: &Move) {
        let placement = self.placements.pop();
        assert!(
            placement.as_ref().map_or(false, |p| p.mv == *m),
            "remove({}) does not match the last placement",
            m
        );
        if let Some(placement) = placement {
            for pos in placement.written {
                self[pos] = Cell::Empty;
            }
        }
    }

    /// Checks if the board holds no tiles at all
    pub fn is_empty(&self) -> bool {
        self.state
            .iter()
            .all(|row| row.iter().all(|c| *c == Cell::Empty))
    }

    /// Checks if the cell at the given position holds a letter. Off-board
    /// positions hold nothing.
    pub fn is_letter(&self, pos: Position) -> bool {
        pos.in_bounds() && matches!(self[pos], Cell::Filled(_))
    }

    /// Checks if a letter sits directly beside `pos`
    pub fn touches_letter(&self, pos: Position) -> bool {
        pos.adjacent().into_iter().any(|n| self.is_letter(n))
    }

    /// The letters of every cell, row by row. Used to compare grids.
    pub fn snapshot(&self) -> Vec<Vec<Option<Letter>>> {
        self.state
            .iter()
            .map(|row| row.iter().map(|c| c.letter().cloned()).collect())
            .collect()
    }
}

impl std::ops::Index<Position> for ScrabbleBoard {
    type Output = Cell;

    fn index(&self, index: Position) -> &Self::Output {
        &self.state[index.row][index.col]
    }
}

impl std::ops::IndexMut<Position> for ScrabbleBoard {
    fn index_mut(&mut self, index: Position) -> &mut Self::Output {
        &mut self.state[index.row][index.col]
    }
}

impl fmt::Display for ScrabbleBoard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "    ")?;
        for col in 0..BOARD_SIZE {
            write!(f, "{:^5}", col)?;
        }
        writeln!(f)?;
        for row in 0..BOARD_SIZE {
            write!(f, "{:>3} ", row)?;
            for col in 0..BOARD_SIZE {
                let pos = Position { row, col };
                let text = match &self[pos] {
                    Cell::Filled(tile) => tile.letter.to_string(),
                    Cell::Empty => self.premium_at(pos).code().to_lowercase(),
                };
                write!(f, "[{:^3}]", text)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrabble::util::Direction;

    fn tile(s: &str, value: u32) -> Tile {
        Tile::new(s.into(), value)
    }

    fn word(s: &[&str]) -> Vec<Letter> {
        s.iter().map(|&l| Letter::from(l)).collect()
    }

    fn cat_rack() -> Rack {
        Rack::from_tiles(
            7,
            vec![
                tile("C", 3),
                tile("A", 1),
                tile("T", 1),
                tile("#", 0),
                tile("#", 0),
                tile("#", 0),
                tile("#", 0),
            ],
        )
    }

    #[test]
    fn test_standard_layout_is_symmetric() {
        let layout = PremiumLayout::standard();
        assert_eq!(layout.first_asymmetry(), None);
        assert_eq!(layout.effect(Position::new(0, 14)), SquareEffect::TripleWord);
        assert_eq!(layout.effect(Position::new(7, 14)), SquareEffect::TripleWord);
        assert_eq!(layout.effect(Position::new(13, 1)), SquareEffect::DoubleWord);
        assert_eq!(layout.effect(Position::new(9, 13)), SquareEffect::TripleLetter);
        assert_eq!(layout.effect(Position::new(11, 7)), SquareEffect::DoubleLetter);
        assert_eq!(layout.effect(Position::new(8, 12)), SquareEffect::DoubleLetter);
        assert_eq!(layout.effect(Position::CENTER), SquareEffect::Plain);
    }

    #[test]
    fn test_layout_codes() {
        let mut codes = vec![vec![String::new(); BOARD_SIZE]; BOARD_SIZE];
        for (r, c) in [(0, 0), (0, 14), (14, 0), (14, 14)] {
            codes[r][c] = "TW".to_string();
        }
        let layout = PremiumLayout::from_codes(&codes).unwrap();
        assert_eq!(layout.effect(Position::new(14, 14)), SquareEffect::TripleWord);

        codes[0][0] = String::new();
        assert!(matches!(
            PremiumLayout::from_codes(&codes),
            Err(ConfigError::AsymmetricLayout { .. })
        ));

        codes[0][0] = "XX".to_string();
        assert!(matches!(
            PremiumLayout::from_codes(&codes),
            Err(ConfigError::UnknownSquare(_))
        ));

        codes.pop();
        assert!(matches!(
            PremiumLayout::from_codes(&codes),
            Err(ConfigError::LayoutDimensions { rows: 14, .. })
        ));
    }

    #[test]
    fn test_layout_from_json() {
        let row = format!("[{}]", vec!["\"\""; BOARD_SIZE].join(","));
        let json = format!("[{}]", vec![row; BOARD_SIZE].join(","));
        assert_eq!(PremiumLayout::from_json_str(&json).unwrap(), PremiumLayout::plain());
        assert!(matches!(
            PremiumLayout::from_json_str("{}"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_place_cat_through_centre() {
        let mut board = ScrabbleBoard::empty();
        let mut rack = cat_rack();
        let m = Move::new(word(&["C", "A", "T"]), Position::new(7, 6), Direction::Across);

        assert_eq!(board.place(&m, &mut rack), Ok(5));
        assert_eq!(rack.len(), 4);
        assert_eq!(board.cell_at(7, 7).unwrap().letter(), Some(&"A".into()));
    }

    #[test]
    fn test_letter_premium_only_on_new_tiles() {
        let layout = PremiumLayout::plain().with_symmetric(Position::new(7, 8), SquareEffect::DoubleLetter);
        let mut board = ScrabbleBoard::new(Arc::new(layout));
        let mut rack = Rack::from_tiles(7, vec![tile("Z", 10), tile("A", 1), tile("A", 1)]);

        let za = Move::new(word(&["Z"]), Position::new(7, 8), Direction::Across);
        assert_eq!(board.place(&za, &mut rack), Ok(20));

        // Crossing the Z again counts it at face value
        let az = Move::new(word(&["A", "Z"]), Position::new(6, 8), Direction::Down);
        assert_eq!(board.place(&az, &mut rack), Ok(11));
        assert_eq!(rack.len(), 1);
    }

    #[test]
    fn test_word_multipliers_when_enabled() {
        let layout = PremiumLayout::plain().with_symmetric(Position::new(7, 7), SquareEffect::DoubleWord);
        let mut board = ScrabbleBoard::new(Arc::new(layout)).with_word_multipliers(true);
        let mut rack = cat_rack();
        let m = Move::new(word(&["C", "A", "T"]), Position::new(7, 6), Direction::Across);
        assert_eq!(board.place(&m, &mut rack), Ok(10));
    }

    #[test]
    fn test_place_then_remove_restores_grid() {
        let mut board = ScrabbleBoard::empty();
        let mut rack = cat_rack();
        let first = Move::new(word(&["C", "A", "T"]), Position::new(7, 6), Direction::Across);
        board.place(&first, &mut rack).unwrap();

        let before = board.snapshot();
        let mut rack = Rack::from_tiles(7, vec![tile("T", 1), tile("A", 1)]);
        let cross = Move::new(word(&["A", "T"]), Position::new(7, 7), Direction::Down);
        board.place(&cross, &mut rack).unwrap();
        assert_ne!(board.snapshot(), before);
        // Only T was laid; A was already there
        assert_eq!(rack.tiles(), &[tile("A", 1)]);

        board.remove(&cross);
        assert_eq!(board.snapshot(), before);
        assert_eq!(board.placements.len(), 1);
        // Rack tiles stay consumed
        assert_eq!(rack.len(), 1);
    }

    #[test]
    fn test_out_of_bounds_leaves_state_alone() {
        let mut board = ScrabbleBoard::empty();
        let mut rack = cat_rack();
        let m = Move::new(word(&["C", "A", "T"]), Position::new(3, 13), Direction::Across);
        assert_eq!(
            board.place(&m, &mut rack),
            Err(MoveError::OutOfBounds { row: 3, col: 15 })
        );
        assert!(board.is_empty());
        assert_eq!(rack, cat_rack());
        assert!(board.placements.is_empty());
    }

    #[test]
    fn test_occupied_and_rack_mismatch() {
        let mut board = ScrabbleBoard::empty();
        let mut rack = cat_rack();
        let m = Move::new(word(&["C", "A", "T"]), Position::new(7, 6), Direction::Across);
        board.place(&m, &mut rack).unwrap();

        let mut rack = Rack::from_tiles(7, vec![tile("O", 1), tile("X", 8)]);
        let clash = Move::new(word(&["O", "X"]), Position::new(7, 7), Direction::Down);
        assert!(matches!(
            board.place(&clash, &mut rack),
            Err(MoveError::Occupied { row: 7, col: 7, .. })
        ));

        let missing = Move::new(word(&["A", "X", "E"]), Position::new(7, 7), Direction::Down);
        assert_eq!(
            board.place(&missing, &mut rack),
            Err(MoveError::RackMismatch {
                symbol: "E".to_string()
            })
        );
        assert_eq!(rack.len(), 2);

        let same = Move::new(word(&["A"]), Position::new(7, 7), Direction::Down);
        assert_eq!(board.place(&same, &mut rack), Err(MoveError::NothingPlaced));
    }

    #[test]
    fn test_cell_at_bounds() {
        let board = ScrabbleBoard::empty();
        assert_eq!(board.cell_at(14, 14), Ok(&Cell::Empty));
        assert_eq!(
            board.cell_at(15, 0),
            Err(MoveError::OutOfBounds { row: 15, col: 0 })
        );
    }

    #[test]
    #[should_panic]
    fn test_remove_unmatched_move_panics() {
        let mut board = ScrabbleBoard::empty();
        let m = Move::new(word(&["A"]), Position::CENTER, Direction::Across);
        board.remove(&m);
    }
}
