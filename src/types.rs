use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

pub const BOARD_SIZE: usize = 8;
pub const MAX_TURNS: usize = 60;

/// Cell contents. The signed encoding matters: the opponent of a player
/// color is its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(i8)]
pub enum Color {
    #[default]
    Empty = 0,
    White = -1,
    Black = 1,
    Wall = 2,
}

impl Color {
    /// Negates a player color. `Empty` and `Wall` map to themselves.
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            other => other,
        }
    }

    /// Numeric value used by the evaluators: Black=1, White=-1, others 0.
    pub fn sign(self) -> i32 {
        match self {
            Color::Black => 1,
            Color::White => -1,
            Color::Empty | Color::Wall => 0,
        }
    }
}

/// A cell coordinate on the walled 10x10 grid. 1..=8 is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

impl Point {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub fn is_on_board(self) -> bool {
        (1..=BOARD_SIZE as u8).contains(&self.x) && (1..=BOARD_SIZE as u8).contains(&self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            write!(f, "{}{}", (b'a' + self.x - 1) as char, self.y)
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCoordError {
    #[error("coordinate must be a file letter followed by a rank digit, got {0:?}")]
    TooShort(String),
    #[error("file must be in a..h, got {0:?}")]
    InvalidFile(char),
    #[error("rank must be in 1..8, got {0:?}")]
    InvalidRank(char),
}

impl FromStr for Point {
    type Err = ParseCoordError;

    /// Parses Reversi notation such as `d3`: file letter, then rank digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (file, rank) = match (chars.next(), chars.next()) {
            (Some(file), Some(rank)) => (file, rank),
            _ => return Err(ParseCoordError::TooShort(s.to_string())),
        };

        let file_lower = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file_lower) {
            return Err(ParseCoordError::InvalidFile(file));
        }
        if !('1'..='8').contains(&rank) {
            return Err(ParseCoordError::InvalidRank(rank));
        }

        Ok(Point::new(file_lower as u8 - b'a' + 1, rank as u8 - b'1' + 1))
    }
}

/// A coordinate tagged with the color that was written there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Disc {
    pub point: Point,
    pub color: Color,
}

impl Disc {
    pub const fn new(x: u8, y: u8, color: Color) -> Self {
        Self {
            point: Point::new(x, y),
            color,
        }
    }
}

/// Disc tallies for Black, White and Empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorStorage {
    data: [i32; 3],
}

impl ColorStorage {
    pub fn get(&self, color: Color) -> i32 {
        slot(color).map_or(0, |idx| self.data[idx])
    }

    pub fn set(&mut self, color: Color, value: i32) {
        if let Some(idx) = slot(color) {
            self.data[idx] = value;
        }
    }

    pub fn add(&mut self, color: Color, delta: i32) {
        if let Some(idx) = slot(color) {
            self.data[idx] += delta;
        }
    }
}

fn slot(color: Color) -> Option<usize> {
    match color {
        Color::White => Some(0),
        Color::Empty => Some(1),
        Color::Black => Some(2),
        Color::Wall => None,
    }
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// Row-major cell colors: 1 black, -1 white, 0 empty.
    pub board: Vec<i8>,
    pub current_player: i8,
    pub black_count: u8,
    pub white_count: u8,
    pub turns: u8,
    pub is_game_over: bool,
    /// `true` when the last committed action was a pass.
    pub is_pass: bool,
    /// Contract:
    /// - Normal move: the placed disc first, then every flipped disc.
    /// - Pass or fresh game: empty.
    pub updated: Vec<Disc>,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// 1 black wins, -1 white wins, 0 draw.
    pub winner: i8,
    pub black_count: u8,
    pub white_count: u8,
}
