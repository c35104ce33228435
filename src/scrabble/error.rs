//! Error types for move validation and game setup.

use thiserror::Error;

/// Reasons a move can be rejected. All of them are recoverable: the caller
/// retries (human) or passes (agent).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("rack has no {symbol} tile left")]
    RackMismatch { symbol: String },

    #[error("{word} is not in the dictionary")]
    InvalidWord { word: String },

    #[error("({row}, {col}) already holds {found}, cannot place {wanted}")]
    Occupied {
        row: usize,
        col: usize,
        found: String,
        wanted: String,
    },

    #[error("word must touch a tile already on the board")]
    NotConnected,

    #[error("first word must cover the centre square")]
    MissesCentre,

    #[error("word runs into the tile at ({row}, {col})")]
    RunsInto { row: usize, col: usize },

    #[error("move does not place any tile from the rack")]
    NothingPlaced,

    #[error("word is empty")]
    EmptyWord,

    #[error("word has {len} letters, a board row holds {max}")]
    WordTooLong { len: usize, max: usize },

    #[error("{0} is not a tile in this set")]
    UnknownSymbol(String),
}

/// Failures while loading configuration, layouts or word lists.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dictionary error: {0}")]
    Fst(#[from] fst::Error),

    #[error("layout must be {expected}x{expected}, found {rows} rows (row {row} has {cols} cells)")]
    LayoutDimensions {
        expected: usize,
        rows: usize,
        row: usize,
        cols: usize,
    },

    #[error("unknown square code {0:?}")]
    UnknownSquare(String),

    #[error("layout is not symmetric at ({row}, {col})")]
    AsymmetricLayout { row: usize, col: usize },

    #[error("rack capacity must be between 1 and {max}, got {capacity}")]
    RackCapacity { capacity: usize, max: usize },
}
