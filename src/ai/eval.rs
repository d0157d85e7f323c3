use crate::board::Board;
use crate::types::{BOARD_SIZE, Color, Point};

/// Static position score from the side-to-move perspective.
pub trait Evaluator {
    fn evaluate(&self, board: &Board) -> i32;
}

/// Exact disc differential. Meaningful once search reaches the end of the game.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerfectEvaluator;

impl Evaluator for PerfectEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        let diff = board.count_disc(Color::Black) - board.count_disc(Color::White);
        board.current_color().sign() * diff
    }
}

const POINT_TABLE: [[i32; BOARD_SIZE]; BOARD_SIZE] = [
    [100, -50, 10, 0, 0, 10, -50, 100],
    [-50, -70, -5, -10, -10, -5, -70, -50],
    [10, -5, -10, -5, -5, -10, -5, 10],
    [0, -10, -5, 0, 0, -5, -10, 0],
    [0, -10, -5, 0, 0, -5, -10, 0],
    [10, -5, -10, -5, -5, -10, -5, 10],
    [-50, -70, -5, -10, -10, -5, -70, -50],
    [100, -50, 10, 0, 0, 10, -50, 100],
];

/// Positional weights: corners are prized, the cells next to them punished.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointTableEvaluator;

impl Evaluator for PointTableEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        let me = board.current_color().sign();
        let mut point = 0;

        for x in 1..=BOARD_SIZE {
            for y in 1..=BOARD_SIZE {
                let cell = board.color_at(Point::new(x as u8, y as u8));
                point += me * cell.sign() * POINT_TABLE[x - 1][y - 1];
            }
        }

        point
    }
}
