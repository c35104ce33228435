use std::collections::HashMap;
use std::ops::ControlFlow;

use rand::prelude::SliceRandom;
use rand::Rng;

use super::error::MoveError;
use super::rack::Rack;
use super::util::{Letter, Tile};
use super::BOARD_SIZE;

/// Scoring table and starting distribution for a tile set
#[derive(Debug, Clone)]
pub struct TileSet {
    /// Symbols in the order they are listed in the set
    alph: Vec<Letter>,
    /// Number of copies of each symbol in a fresh bag
    amts: Vec<usize>,
    scores: HashMap<Letter, u32>,
}

impl TileSet {
    /// Builds a set from `(symbol, value, count)` entries
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, u32, usize)>) -> Self {
        let mut set = Self {
            alph: Vec::new(),
            amts: Vec::new(),
            scores: HashMap::new(),
        };
        for (symbol, value, amount) in entries {
            let letter = Letter::parse(symbol);
            set.scores.insert(letter.clone(), value);
            set.alph.push(letter);
            set.amts.push(amount);
        }
        set
    }

    /// The Tagalog set, including the `NG`, `NANG` and `Ñ` tiles
    pub fn tagalog() -> Self {
        Self::new([
            ("A", 1, 9),
            ("B", 3, 2),
            ("C", 3, 2),
            ("D", 2, 4),
            ("E", 1, 12),
            ("F", 4, 2),
            ("G", 2, 3),
            ("H", 4, 2),
            ("I", 1, 9),
            ("J", 1, 1),
            ("K", 5, 1),
            ("L", 1, 4),
            ("M", 3, 2),
            ("N", 1, 6),
            ("O", 1, 8),
            ("P", 3, 2),
            ("Q", 10, 1),
            ("R", 1, 6),
            ("S", 1, 4),
            ("T", 1, 6),
            ("U", 1, 4),
            ("V", 4, 2),
            ("W", 4, 2),
            ("X", 8, 1),
            ("Y", 4, 2),
            ("Z", 10, 1),
            ("#", 0, 2),
            ("NG", 5, 2),
            ("NANG", 5, 2),
            ("Ñ", 6, 3),
        ])
    }

    /// Point value of a symbol, 0 if the set does not know it
    pub fn score(&self, letter: &Letter) -> u32 {
        self.scores.get(letter).copied().unwrap_or(0)
    }

    pub fn tile(&self, letter: Letter) -> Tile {
        let value = self.score(&letter);
        Tile::new(letter, value)
    }

    pub fn total_tiles(&self) -> usize {
        self.amts.iter().sum()
    }

    /// Splits `text` into symbols of this set and hands each split to
    /// `visit`, longest symbols first, until `visit` breaks. Splits with more
    /// symbols than a board row holds are skipped.
    ///
    /// Returns the break value, or `None` once every split has been visited.
    /// Text with no split at all is an error.
    pub fn find_segmentation<B, F>(&self, text: &str, mut visit: F) -> Result<Option<B>, MoveError>
    where
        F: FnMut(&[Letter]) -> ControlFlow<B>,
    {
        let text = text.trim().to_uppercase();
        let mut by_length = self
            .alph
            .iter()
            .filter_map(|l| l.spelling().map(|s| (s, l)))
            .collect::<Vec<_>>();
        by_length.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        let longest = by_length.first().map_or(1, |(s, _)| s.len());

        let mut current = Vec::with_capacity(BOARD_SIZE);
        let mut found = false;
        let flow = Self::segment(&text, &by_length, longest, &mut current, &mut found, &mut visit);
        if let ControlFlow::Break(value) = flow {
            return Ok(Some(value));
        }
        if found {
            return Ok(None);
        }
        let len = text.chars().count();
        if len > BOARD_SIZE {
            Err(MoveError::WordTooLong { len, max: BOARD_SIZE })
        } else {
            Err(MoveError::UnknownSymbol(text))
        }
    }

    fn segment<B, F>(
        rest: &str,
        symbols: &[(&str, &Letter)],
        longest: usize,
        current: &mut Vec<Letter>,
        found: &mut bool,
        visit: &mut F,
    ) -> ControlFlow<B>
    where
        F: FnMut(&[Letter]) -> ControlFlow<B>,
    {
        if rest.is_empty() {
            if current.is_empty() {
                return ControlFlow::Continue(());
            }
            *found = true;
            return visit(current);
        }
        // Even the longest symbols would overflow a row from here
        let fewest = (rest.len() + longest - 1) / longest;
        if current.len() + fewest > BOARD_SIZE {
            return ControlFlow::Continue(());
        }

        for (spelling, letter) in symbols {
            if let Some(tail) = rest.strip_prefix(*spelling) {
                current.push((*letter).clone());
                let flow = Self::segment(tail, symbols, longest, current, found, visit);
                current.pop();
                if flow.is_break() {
                    return flow;
                }
            }
        }
        ControlFlow::Continue(())
    }
}

impl Default for TileSet {
    fn default() -> Self {
        Self::tagalog()
    }
}

/// Tiles left to draw. Drawing pops from the end of the sequence.
#[derive(Debug, Clone)]
pub struct TileBag {
    pub distribution: Vec<Tile>,
}

impl TileBag {
    /// A full bag for `set`, shuffled with `rng`
    pub fn new<R: Rng + ?Sized>(set: &TileSet, rng: &mut R) -> Self {
        let mut distribution = Vec::with_capacity(set.total_tiles());
        for (i, letter) in set.alph.iter().enumerate() {
            for _ in 0..set.amts[i] {
                distribution.push(set.tile(letter.clone()));
            }
        }
        distribution.shuffle(rng);
        Self { distribution }
    }

    /// A bag that hands out `order` back to front, without shuffling
    pub fn new_with_order(order: Vec<Tile>) -> Self {
        Self {
            distribution: order,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.distribution.is_empty()
    }

    pub fn remaining_count(&self) -> usize {
        self.distribution.len()
    }

    pub fn take(&mut self) -> Option<Tile> {
        self.distribution.pop()
    }

    /// Tops the rack up to capacity while tiles remain. Returns the number
    /// of tiles drawn.
    pub fn refill(&mut self, rack: &mut Rack) -> usize {
        let mut drawn = 0;
        while !rack.is_full() {
            match self.take() {
                Some(tile) => {
                    rack.push(tile);
                    drawn += 1;
                }
                None => break,
            }
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_tagalog_values() {
        let set = TileSet::tagalog();
        assert_eq!(set.score(&"C".into()), 3);
        assert_eq!(set.score(&"Z".into()), 10);
        assert_eq!(set.score(&"NANG".into()), 5);
        assert_eq!(set.score(&Letter::Blank), 0);
        assert_eq!(set.score(&"?".into()), 0);
        assert_eq!(set.total_tiles(), 107);
    }

    #[test]
    fn test_seeded_bag_is_deterministic() {
        let set = TileSet::tagalog();
        let a = TileBag::new(&set, &mut StdRng::seed_from_u64(7));
        let b = TileBag::new(&set, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.distribution, b.distribution);
        assert_eq!(a.remaining_count(), set.total_tiles());
    }

    #[test]
    fn test_take_pops_from_end() {
        let set = TileSet::tagalog();
        let mut bag = TileBag::new_with_order(vec![set.tile("A".into()), set.tile("B".into())]);
        assert_eq!(bag.take().map(|t| t.letter), Some("B".into()));
        assert_eq!(bag.take().map(|t| t.letter), Some("A".into()));
        assert_eq!(bag.take(), None);
    }

    #[test]
    fn test_refill_respects_capacity() {
        let set = TileSet::tagalog();
        let mut bag = TileBag::new(&set, &mut StdRng::seed_from_u64(1));
        let mut rack = Rack::new(7);
        rack.push(set.tile("Q".into()));
        let kept = rack.tiles().to_vec();

        assert_eq!(bag.refill(&mut rack), 6);
        assert_eq!(rack.len(), 7);
        assert_eq!(rack.tiles()[0], kept[0]);
        assert_eq!(bag.remaining_count(), set.total_tiles() - 6);

        // Already full: nothing drawn
        assert_eq!(bag.refill(&mut rack), 0);
        assert_eq!(rack.len(), 7);
    }

    #[test]
    fn test_refill_with_empty_bag_is_noop() {
        let set = TileSet::tagalog();
        let mut bag = TileBag::new_with_order(vec![]);
        let mut rack = Rack::from_tiles(7, vec![set.tile("A".into())]);
        assert_eq!(bag.refill(&mut rack), 0);
        assert_eq!(bag.refill(&mut rack), 0);
        assert_eq!(rack.len(), 1);
        assert_eq!(bag.remaining_count(), 0);
    }

    fn all_splits(set: &TileSet, text: &str) -> Result<Vec<String>, MoveError> {
        let mut all = Vec::new();
        set.find_segmentation(text, |split| {
            all.push(split.iter().map(Letter::as_str).collect::<Vec<_>>().join("-"));
            ControlFlow::<()>::Continue(())
        })?;
        Ok(all)
    }

    #[test]
    fn test_segmentations_handle_digraphs() {
        let set = TileSet::tagalog();
        assert_eq!(all_splits(&set, "nang").unwrap(), vec!["NANG", "N-A-NG", "N-A-N-G"]);
        assert_eq!(all_splits(&set, ""), Err(MoveError::UnknownSymbol(String::new())));
        assert_eq!(all_splits(&set, "a1"), Err(MoveError::UnknownSymbol("A1".to_string())));
    }

    #[test]
    fn test_segmentation_stops_at_first_break() {
        let set = TileSet::tagalog();
        let mut visited = 0;
        let first = set.find_segmentation("nang", |split| {
            visited += 1;
            ControlFlow::Break(split.len())
        });
        assert_eq!(first, Ok(Some(1)));
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_long_text_is_bounded() {
        let set = TileSet::tagalog();
        let long = "NG".repeat(40);
        assert_eq!(
            all_splits(&set, &long),
            Err(MoveError::WordTooLong {
                len: 80,
                max: BOARD_SIZE
            })
        );

        // Only splits that fit a row: at least 9 of the 12 NGs kept whole
        let splits = all_splits(&set, &"NG".repeat(12)).unwrap();
        assert_eq!(splits.len(), 220 + 66 + 12 + 1);
        assert!(splits.iter().all(|s| s.split('-').count() <= BOARD_SIZE));
        assert_eq!(splits[0], vec!["NG"; 12].join("-"));
    }
}
