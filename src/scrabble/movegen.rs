use fst::raw::Node;

use super::board::ScrabbleBoard;
use super::dictionary::Dictionary;
use super::error::MoveError;
use super::rack::Rack;
use super::util::{Direction, Letter, Move, Position};
use super::BOARD_SIZE;

/// Checks that `m` may be played from `rack` on `board`, dictionary aside.
///
/// The rules: the word fits on the board, overlapped squares hold the same
/// letter, at least one tile comes from the rack and the rack holds all of
/// them, the squares just before and after the word are free, and the word
/// either covers the centre (first move) or touches a tile already placed.
pub fn validate(board: &ScrabbleBoard, rack: &Rack, m: &Move) -> Result<(), MoveError> {
    check_placement(board, rack, m, board.is_empty())
}

fn check_placement(
    board: &ScrabbleBoard,
    rack: &Rack,
    m: &Move,
    first_move: bool,
) -> Result<(), MoveError> {
    if m.word.is_empty() {
        return Err(MoveError::EmptyWord);
    }
    let cells = m.cells()?;
    let end = cells.last().map_or(m.pos, |(p, _)| *p);

    // The word must not run on into tiles already in its line
    for edge in [m.pos.prev(m.dir), end.next(m.dir)].into_iter().flatten() {
        if board.is_letter(edge) {
            return Err(MoveError::RunsInto {
                row: edge.row,
                col: edge.col,
            });
        }
    }

    let mut needed = Vec::with_capacity(m.word.len());
    let mut connected = false;
    let mut covers_centre = false;
    for (pos, letter) in cells {
        covers_centre |= pos == Position::CENTER;
        match board[pos].letter() {
            Some(found) if found == letter => connected = true,
            Some(found) => {
                return Err(MoveError::Occupied {
                    row: pos.row,
                    col: pos.col,
                    found: found.to_string(),
                    wanted: letter.to_string(),
                })
            }
            None => {
                connected |= board.touches_letter(pos);
                needed.push(letter);
            }
        }
    }

    if needed.is_empty() {
        return Err(MoveError::NothingPlaced);
    }
    if first_move && !covers_centre {
        return Err(MoveError::MissesCentre);
    }
    if !first_move && !connected {
        return Err(MoveError::NotConnected);
    }
    rack.can_supply(needed).map_err(|l| MoveError::RackMismatch {
        symbol: l.to_string(),
    })
}

/// Enumerates legal moves for a rack
pub struct MoveGenerator<'a> {
    dictionary: &'a Dictionary,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    /// Every dictionary word that can be spelled with tiles from `rack`, each
    /// distinct letter sequence once. Order follows the rack: at each depth
    /// letters are tried in the order they first appear on the rack.
    pub fn words(&self, rack: &Rack) -> Vec<Vec<Letter>> {
        let letters = rack.letters().cloned().collect::<Vec<_>>();
        let mut used = vec![false; letters.len()];
        let mut word = Vec::with_capacity(letters.len());
        let mut found = Vec::new();
        self.collect_words(&letters, &mut used, self.dictionary.root(), &mut word, &mut found);
        found
    }

    fn collect_words(
        &self,
        letters: &[Letter],
        used: &mut [bool],
        node: Node<'a>,
        word: &mut Vec<Letter>,
        found: &mut Vec<Vec<Letter>>,
    ) {
        if !word.is_empty() && node.is_final() {
            found.push(word.clone());
        }

        let mut tried: Vec<&Letter> = Vec::new();
        for i in 0..letters.len() {
            let letter = &letters[i];
            if used[i] || tried.contains(&letter) {
                continue;
            }
            tried.push(letter);

            let spelling = match letter.spelling() {
                Some(s) => s,
                None => continue,
            };
            if let Some(next) = self.dictionary.advance(&node, spelling) {
                used[i] = true;
                word.push(letter.clone());
                self.collect_words(letters, used, next, word, found);
                word.pop();
                used[i] = false;
            }
        }
    }

    /// Legal moves for `rack` on `board`: words in `words` order, then
    /// `Across` before `Down`, then origins row by row.
    pub fn candidates<'b>(
        &self,
        rack: &'b Rack,
        board: &'b ScrabbleBoard,
    ) -> impl Iterator<Item = Move> + 'b {
        let first_move = board.is_empty();
        self.words(rack).into_iter().flat_map(move |word| {
            let len = word.len();
            Direction::iter().flat_map(move |&dir| {
                let word = word.clone();
                origins(len, dir).filter_map(move |pos| {
                    let m = Move::new(word.clone(), pos, dir);
                    check_placement(board, rack, &m, first_move).ok().map(|_| m)
                })
            })
        })
    }
}

/// Origins from which a word of `len` letters stays on the board
fn origins(len: usize, dir: Direction) -> impl Iterator<Item = Position> {
    let span = BOARD_SIZE + 1 - len.min(BOARD_SIZE);
    let (rows, cols) = match dir {
        Direction::Across => (BOARD_SIZE, span),
        Direction::Down => (span, BOARD_SIZE),
    };
    (0..rows).flat_map(move |row| (0..cols).map(move |col| Position { row, col }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::scrabble::board::PremiumLayout;
    use crate::scrabble::util::{SquareEffect, Tile};

    fn tile(s: &str, value: u32) -> Tile {
        Tile::new(s.into(), value)
    }

    fn rack_of(symbols: &[(&str, u32)]) -> Rack {
        Rack::from_tiles(7, symbols.iter().map(|&(s, v)| tile(s, v)).collect())
    }

    fn word(s: &[&str]) -> Vec<Letter> {
        s.iter().map(|&l| Letter::from(l)).collect()
    }

    fn cat_rack() -> Rack {
        rack_of(&[("C", 3), ("A", 1), ("T", 1), ("#", 0), ("#", 0), ("#", 0), ("#", 0)])
    }

    #[test]
    fn test_words_from_rack() {
        let dict = Dictionary::from_words(["CAT", "AT", "TA", "ACT", "CATS", "TACT"]).unwrap();
        let gen = MoveGenerator::new(&dict);
        let words = gen
            .words(&cat_rack())
            .iter()
            .map(|w| w.iter().map(Letter::as_str).collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(words, vec!["CAT", "ACT", "AT", "TA"]);
    }

    #[test]
    fn test_words_with_digraphs() {
        let dict = Dictionary::from_words(["NGA", "NANG", "ANG"]).unwrap();
        let gen = MoveGenerator::new(&dict);
        let rack = rack_of(&[("NG", 5), ("A", 1), ("N", 1)]);
        let words = gen.words(&rack);
        assert!(words.contains(&word(&["NG", "A"])));
        assert!(words.contains(&word(&["A", "NG"])));
        assert!(words.contains(&word(&["N", "A", "NG"])));
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn test_first_move_covers_centre() {
        let dict = Dictionary::from_words(["CAT"]).unwrap();
        let gen = MoveGenerator::new(&dict);
        let board = ScrabbleBoard::empty();
        let rack = cat_rack();
        let moves = gen.candidates(&rack, &board).collect::<Vec<_>>();

        // Three origins per direction put one of C, A, T on the centre
        assert_eq!(moves.len(), 6);
        assert!(moves
            .iter()
            .all(|m| m.cells().unwrap().iter().any(|(p, _)| *p == Position::CENTER)));
        assert_eq!(moves[0].dir, Direction::Across);
        assert_eq!(moves[0].pos, Position::new(7, 5));

        let through_centre = Move::new(word(&["C", "A", "T"]), Position::new(7, 6), Direction::Across);
        assert!(moves.contains(&through_centre));
        let mut board = board;
        let mut rack = rack;
        assert_eq!(board.place(&through_centre, &mut rack), Ok(5));
    }

    #[test]
    fn test_single_letter_on_double_letter() {
        let layout = PremiumLayout::plain().with_symmetric(Position::CENTER, SquareEffect::DoubleLetter);
        let dict = Dictionary::from_words(["Z"]).unwrap();
        let gen = MoveGenerator::new(&dict);
        let mut board = ScrabbleBoard::new(Arc::new(layout));
        let mut rack = rack_of(&[("Z", 10)]);

        let moves = gen.candidates(&rack, &board).collect::<Vec<_>>();
        assert_eq!(moves.len(), 2);
        assert_eq!(board.place(&moves[0], &mut rack), Ok(20));
    }

    #[test]
    fn test_later_moves_must_connect() {
        let dict = Dictionary::from_words(["CAT", "AT"]).unwrap();
        let gen = MoveGenerator::new(&dict);
        let mut board = ScrabbleBoard::empty();
        let mut rack = cat_rack();
        let cat = Move::new(word(&["C", "A", "T"]), Position::new(7, 6), Direction::Across);
        board.place(&cat, &mut rack).unwrap();

        let rack = rack_of(&[("A", 1), ("T", 1)]);
        let moves = gen.candidates(&rack, &board).collect::<Vec<_>>();
        assert!(!moves.is_empty());
        for m in &moves {
            assert_eq!(validate(&board, &rack, m), Ok(()));
            assert!(m
                .cells()
                .unwrap()
                .iter()
                .any(|(p, _)| board.is_letter(*p) || board.touches_letter(*p)));
        }
        // Crossing the A of CAT uses only the T
        assert!(moves.contains(&Move::new(word(&["A", "T"]), Position::new(7, 7), Direction::Down)));

        let far = Move::new(word(&["A", "T"]), Position::new(0, 0), Direction::Across);
        assert_eq!(validate(&board, &rack, &far), Err(MoveError::NotConnected));
    }

    #[test]
    fn test_validate_rejections() {
        let mut board = ScrabbleBoard::empty();
        let mut rack = cat_rack();
        let cat = Move::new(word(&["C", "A", "T"]), Position::new(7, 6), Direction::Across);

        let off_centre = Move::new(word(&["C", "A", "T"]), Position::new(0, 0), Direction::Across);
        assert_eq!(validate(&board, &rack, &off_centre), Err(MoveError::MissesCentre));

        let past_edge = Move::new(word(&["C", "A", "T"]), Position::new(7, 13), Direction::Across);
        assert_eq!(
            validate(&board, &rack, &past_edge),
            Err(MoveError::OutOfBounds { row: 7, col: 15 })
        );
        let huge = Move::new(word(&["C", "A", "T"]), Position::new(usize::MAX, 0), Direction::Down);
        assert_eq!(
            validate(&board, &rack, &huge),
            Err(MoveError::OutOfBounds {
                row: usize::MAX,
                col: 0
            })
        );

        board.place(&cat, &mut rack).unwrap();
        let rack = rack_of(&[("A", 1), ("T", 1), ("S", 1)]);

        let run_on = Move::new(word(&["A", "T"]), Position::new(7, 9), Direction::Across);
        assert_eq!(
            validate(&board, &rack, &run_on),
            Err(MoveError::RunsInto { row: 7, col: 8 })
        );

        let missing = Move::new(word(&["A", "X"]), Position::new(7, 7), Direction::Down);
        assert_eq!(
            validate(&board, &rack, &missing),
            Err(MoveError::RackMismatch {
                symbol: "X".to_string()
            })
        );

        let clash = Move::new(word(&["S", "T"]), Position::new(7, 7), Direction::Down);
        assert!(matches!(
            validate(&board, &rack, &clash),
            Err(MoveError::Occupied { .. })
        ));
    }

    #[test]
    fn test_no_words_no_moves() {
        let dict = Dictionary::from_words(["DOG"]).unwrap();
        let gen = MoveGenerator::new(&dict);
        let board = ScrabbleBoard::empty();
        assert_eq!(gen.candidates(&cat_rack(), &board).count(), 0);
        assert_eq!(gen.candidates(&Rack::empty(), &board).count(), 0);
    }
}
