pub mod bag;
pub mod board;
pub mod dictionary;
pub mod error;
pub mod evaluate;
pub mod movegen;
pub mod rack;
pub mod search;
pub mod session;
pub mod util;

pub const BOARD_SIZE: usize = 15;
