use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod game;
pub mod types;
pub mod wasm;

pub use ai::{AlphaBetaAI, SearchConfig};
pub use board::Board;
pub use game::{GameError, GameInstance};
pub use types::{Color, Disc, Point};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
