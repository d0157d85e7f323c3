use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use web_time::Instant;

use crate::ai::eval::{Evaluator, PerfectEvaluator, PointTableEvaluator};
use crate::board::Board;
use crate::types::{MAX_TURNS, Point};

const MIN_SCORE: i32 = -i32::MAX;
const MAX_SCORE: i32 = i32::MAX;
/// Depth limit used for exhaustive endgame search.
const UNLIMITED_DEPTH: i32 = i32::MAX;

/// Search depth policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched in the midgame.
    pub normal_depth: i32,
    /// Search runs to the end of the game once this many plies or fewer remain.
    pub wld_depth: usize,
    /// Leaves are scored by exact disc difference once this many plies or fewer remain.
    pub perfect_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            normal_depth: 5,
            wld_depth: 10,
            perfect_depth: 7,
        }
    }
}

/// Negamax alpha-beta player. Simulates candidates on the caller's board
/// with `make_move`/`pass_turn` and `undo`, then commits one action.
#[derive(Debug, Clone, Default)]
pub struct AlphaBetaAI {
    config: SearchConfig,
    perfect: PerfectEvaluator,
    point_table: PointTableEvaluator,
    nodes: u64,
}

impl AlphaBetaAI {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            perfect: PerfectEvaluator,
            point_table: PointTableEvaluator,
            nodes: 0,
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Commits exactly one action for the side to move.
    /// Returns the move played, or `None` when the AI passed.
    pub fn make_move(&mut self, board: &mut Board) -> Option<Point> {
        self.nodes = 0;

        let movables = board.movable_pos().to_vec();
        let Some(&first) = movables.first() else {
            let passed = board.pass_turn();
            trace!(turns = board.turns(), passed, "no legal move, passing");
            return None;
        };
        if movables.len() == 1 {
            trace!(turns = board.turns(), mv = %first, "single legal move");
            let moved = board.make_move(first);
            debug_assert!(moved, "listed move {first} was refused");
            return Some(first);
        }

        let start = Instant::now();
        let limit = self.depth_limit(board);

        let mut eval_max = MIN_SCORE;
        let mut best = first;
        for mv in movables {
            let moved = board.make_move(mv);
            debug_assert!(moved, "listed move {mv} was refused");
            let eval = -self.alphabeta(board, limit.saturating_sub(1), MIN_SCORE, MAX_SCORE);
            let undone = board.undo();
            debug_assert!(undone);
            if eval > eval_max {
                eval_max = eval;
                best = mv;
            }
        }

        debug!(
            turns = board.turns(),
            limit,
            mv = %best,
            score = eval_max,
            nodes = self.nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search finished"
        );

        if !board.make_move(best) {
            return None;
        }
        Some(best)
    }

    fn depth_limit(&self, board: &Board) -> i32 {
        if MAX_TURNS - board.turns() <= self.config.wld_depth {
            UNLIMITED_DEPTH
        } else {
            self.config.normal_depth
        }
    }

    /// Score of `board` for the side to move, searched `limit` plies deep.
    fn alphabeta(&mut self, board: &mut Board, limit: i32, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;

        if board.is_game_over() || limit <= 0 {
            return self.evaluate(board);
        }

        let count = board.movable_pos().len();
        if count == 0 {
            // Passing does not consume depth.
            let passed = board.pass_turn();
            debug_assert!(passed);
            let eval = -self.alphabeta(board, limit, -beta, -alpha);
            let undone = board.undo();
            debug_assert!(undone);
            return eval;
        }

        // This ply's cache slot is untouched by child make/undo pairs.
        for i in 0..count {
            let mv = board.movable_pos()[i];
            let moved = board.make_move(mv);
            debug_assert!(moved, "listed move {mv} was refused");
            let eval = -self.alphabeta(board, limit.saturating_sub(1), -beta, -alpha);
            let undone = board.undo();
            debug_assert!(undone);

            alpha = alpha.max(eval);
            if alpha >= beta {
                return alpha;
            }
        }

        alpha
    }

    fn evaluate(&self, board: &Board) -> i32 {
        if MAX_TURNS - board.turns() > self.config.perfect_depth {
            self.point_table.evaluate(board)
        } else {
            self.perfect.evaluate(board)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn total(board: &Board) -> i32 {
        board.count_disc(Color::Black)
            + board.count_disc(Color::White)
            + board.count_disc(Color::Empty)
    }

    /// Two black corners against a white x-square: the positional and the
    /// exact scores disagree (270 vs 1 for black).
    fn corners_at(turns: usize) -> Board {
        Board::from_rows(
            [
                "X.......", ".O......", "........", "...OX...", "...XO...", "........",
                "........", ".......X",
            ],
            Color::Black,
        )
        .with_turns(turns)
    }

    fn black_must_pass(to_move: Color) -> Board {
        Board::from_rows(
            [
                ".XOOOOOO", "OOOOOOOO", "OOOOOOOO", "OOOOOOOO", "OOOOOOOO", "OOOOOOOO",
                "OOOOOOOO", "OOOOOOOO",
            ],
            to_move,
        )
    }

    /// Full-width negamax without pruning.
    fn negamax(ai: &AlphaBetaAI, board: &mut Board, limit: i32) -> i32 {
        if board.is_game_over() || limit <= 0 {
            return ai.evaluate(board);
        }
        let moves = board.movable_pos().to_vec();
        if moves.is_empty() {
            assert!(board.pass_turn());
            let eval = -negamax(ai, board, limit);
            assert!(board.undo());
            return eval;
        }
        let mut best = MIN_SCORE;
        for mv in moves {
            assert!(board.make_move(mv));
            best = best.max(-negamax(ai, board, limit - 1));
            assert!(board.undo());
        }
        best
    }

    /// Plays a deterministic line, cycling through the legal moves.
    fn play_line(plies: usize) -> Board {
        let mut board = Board::new();
        while board.turns() < plies && !board.is_game_over() {
            let moves = board.movable_pos();
            if moves.is_empty() {
                assert!(board.pass_turn());
            } else {
                let mv = moves[board.turns() % moves.len()];
                assert!(board.make_move(mv));
            }
        }
        board
    }

    #[test]
    fn default_config_matches_depth_policy() {
        let config = SearchConfig::default();
        assert_eq!(config.normal_depth, 5);
        assert_eq!(config.wld_depth, 10);
        assert_eq!(config.perfect_depth, 7);
    }

    #[test]
    fn depth_limit_switches_exactly_at_wld_threshold() {
        let ai = AlphaBetaAI::new();

        assert_eq!(ai.depth_limit(&corners_at(49)), 5);
        assert_eq!(ai.depth_limit(&corners_at(50)), UNLIMITED_DEPTH);
    }

    #[test]
    fn evaluate_switches_exactly_at_perfect_threshold() {
        let ai = AlphaBetaAI::new();

        let midgame = corners_at(52);
        assert_eq!(
            ai.evaluate(&midgame),
            PointTableEvaluator.evaluate(&midgame)
        );
        assert_eq!(ai.evaluate(&midgame), 270);

        let endgame = corners_at(53);
        assert_eq!(ai.evaluate(&endgame), PerfectEvaluator.evaluate(&endgame));
        assert_eq!(ai.evaluate(&endgame), 1);
    }

    #[test]
    fn non_positive_depth_still_commits_a_legal_move() {
        for normal_depth in [i32::MIN, -3, 0] {
            let mut board = Board::new();
            let legal = board.movable_pos().to_vec();
            let mut ai = AlphaBetaAI::with_config(SearchConfig {
                normal_depth,
                ..SearchConfig::default()
            });

            let mv = ai.make_move(&mut board).expect("opening always has a move");

            assert!(legal.contains(&mv), "normal_depth={normal_depth}");
            assert_eq!(board.turns(), 1);
            assert_eq!(total(&board), 64);
        }
    }

    #[test]
    fn initial_move_is_legal_and_keeps_counts() {
        let mut board = Board::new();
        let legal = board.movable_pos().to_vec();
        let mut ai = AlphaBetaAI::new();

        let mv = ai.make_move(&mut board).expect("opening always has a move");

        assert!(legal.contains(&mv));
        assert_eq!(board.turns(), 1);
        assert_eq!(board.current_color(), Color::White);
        assert_eq!(total(&board), 64);
        assert_eq!(board.update()[0].point, mv);
        assert!(ai.nodes() > 0);
    }

    #[test]
    fn search_leaves_the_board_as_it_found_it_apart_from_the_commit() {
        let mut board = play_line(20);
        let mut expected = board.clone();
        let mut ai = AlphaBetaAI::new();

        let mv = ai.make_move(&mut board).expect("midgame line has moves");

        assert!(expected.make_move(mv));
        assert_eq!(board.to_array(), expected.to_array());
        assert_eq!(board.turns(), expected.turns());
        assert_eq!(board.current_color(), expected.current_color());
        assert!(board.undo());
        assert!(expected.undo());
        assert_eq!(board.to_array(), expected.to_array());
    }

    #[test]
    fn single_legal_move_is_played_without_search() {
        let mut board = black_must_pass(Color::White);
        let mut ai = AlphaBetaAI::new();

        let mv = ai.make_move(&mut board);

        assert_eq!(mv, Some(Point::new(1, 1)));
        assert_eq!(ai.nodes(), 0);
        assert_eq!(board.count_disc(Color::White), 64);
    }

    #[test]
    fn no_legal_move_passes() {
        let mut board = black_must_pass(Color::Black);
        let mut ai = AlphaBetaAI::new();

        assert_eq!(ai.make_move(&mut board), None);
        assert_eq!(board.current_color(), Color::White);
        assert!(board.last_was_pass());
    }

    #[test]
    fn evaluate_switches_to_exact_count_near_the_end() {
        let ai = AlphaBetaAI::new();

        let opening = play_line(4);
        assert_eq!(
            ai.evaluate(&opening),
            PointTableEvaluator.evaluate(&opening)
        );

        let endgame = black_must_pass(Color::Black);
        assert_eq!(ai.evaluate(&endgame), -61);
    }

    #[test]
    fn depth_limit_becomes_unlimited_in_the_endgame() {
        let ai = AlphaBetaAI::new();

        assert_eq!(ai.depth_limit(&Board::new()), 5);
        assert_eq!(
            ai.depth_limit(&black_must_pass(Color::White)),
            UNLIMITED_DEPTH
        );
    }

    #[test]
    fn pruning_matches_full_width_negamax() {
        for plies in [6, 18, 30] {
            let mut board = play_line(plies);
            let ai = AlphaBetaAI::new();
            let mut searcher = ai.clone();

            for limit in 1..=3 {
                let expected = negamax(&ai, &mut board, limit);
                let actual = searcher.alphabeta(&mut board, limit, MIN_SCORE, MAX_SCORE);
                assert_eq!(actual, expected, "plies={plies} limit={limit}");
            }
        }
    }

    #[test]
    fn endgame_solve_picks_a_move_with_the_best_exact_result() {
        let mut board = play_line(52);
        assert!(!board.is_game_over());
        assert!(board.movable_pos().len() > 1);

        let ai_ref = AlphaBetaAI::new();
        let mut best = MIN_SCORE;
        let mut scores = Vec::new();
        for mv in board.movable_pos().to_vec() {
            assert!(board.make_move(mv));
            let score = -negamax(&ai_ref, &mut board, UNLIMITED_DEPTH);
            assert!(board.undo());
            best = best.max(score);
            scores.push((mv, score));
        }

        let mut ai = AlphaBetaAI::new();
        let chosen = ai.make_move(&mut board).expect("position has moves");

        let chosen_score = scores
            .iter()
            .find(|(mv, _)| *mv == chosen)
            .map(|(_, score)| *score);
        assert_eq!(chosen_score, Some(best));
    }
}
