use std::fmt;

use super::util::{Letter, Tile};

pub const RACK_CAPACITY: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rack {
    /// Tiles currently held, in draw order
    tiles: Vec<Tile>,
    /// Maximum number of tiles the rack holds after a refill
    capacity: usize,
}

impl Rack {
    pub fn new(capacity: usize) -> Self {
        Self {
            tiles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn empty() -> Self {
        Self::new(RACK_CAPACITY)
    }

    /// Builds a rack holding `tiles`. Extra tiles beyond `capacity` are dropped.
    pub fn from_tiles(capacity: usize, tiles: Vec<Tile>) -> Self {
        let mut rack = Self::new(capacity);
        for tile in tiles {
            rack.push(tile);
        }
        rack
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tiles.len() >= self.capacity
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Adds a tile if there is room. Returns false when the rack is full.
    pub fn push(&mut self, tile: Tile) -> bool {
        if self.is_full() {
            return false;
        }
        self.tiles.push(tile);
        true
    }

    /// Checks the rack can supply every letter in `needed`, counting repeats
    pub fn can_supply<'a>(&self, needed: impl IntoIterator<Item = &'a Letter>) -> Result<(), &'a Letter> {
        self.find_slots(needed).map(|_| ())
    }

    /// Removes one tile per entry of `needed`, or nothing at all if the rack
    /// cannot supply every one of them. Tiles come back in `needed` order.
    pub fn take_all<'a>(&mut self, needed: impl IntoIterator<Item = &'a Letter>) -> Result<Vec<Tile>, &'a Letter> {
        let slots = self.find_slots(needed)?;
        let taken = slots.iter().map(|&i| self.tiles[i].clone()).collect();
        let mut descending = slots;
        descending.sort_unstable_by(|a, b| b.cmp(a));
        for i in descending {
            self.tiles.remove(i);
        }
        Ok(taken)
    }

    fn find_slots<'a>(&self, needed: impl IntoIterator<Item = &'a Letter>) -> Result<Vec<usize>, &'a Letter> {
        let mut used = vec![false; self.tiles.len()];
        let mut slots = Vec::new();
        for letter in needed {
            let slot = self
                .tiles
                .iter()
                .enumerate()
                .position(|(i, t)| !used[i] && &t.letter == letter);
            match slot {
                Some(i) => {
                    used[i] = true;
                    slots.push(i);
                }
                None => return Err(letter),
            }
        }
        Ok(slots)
    }

    pub fn letters(&self) -> impl Iterator<Item = &Letter> {
        self.tiles.iter().map(|t| &t.letter)
    }
}

impl Default for Rack {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Rack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let faces = self
            .tiles
            .iter()
            .map(|t| format!("{}({})", t.letter, t.value))
            .collect::<Vec<_>>();
        write!(f, "{}", faces.join(", "))
    }
}
