use thiserror::Error;
use tracing::{debug, info};

use crate::ai::{AlphaBetaAI, SearchConfig};
use crate::board::Board;
use crate::types::{Color, GameResult, GameState, ParseCoordError, Point};

pub const PLAYER_COLOR: Color = Color::Black;
pub const AI_COLOR: Color = Color::White;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game is already over")]
    GameOver,
    #[error("it is not the player's turn")]
    NotPlayersTurn,
    #[error("it is not AI's turn")]
    NotAisTurn,
    #[error("illegal move at {0}")]
    IllegalMove(Point),
    #[error("cannot pass while a legal move exists")]
    PassNotAllowed,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("game is not over yet")]
    NotOver,
    #[error(transparent)]
    Parse(#[from] ParseCoordError),
}

/// Human (black) versus AI (white) session over one board.
#[derive(Debug, Clone, Default)]
pub struct GameInstance {
    board: Board,
    ai: AlphaBetaAI,
}

impl GameInstance {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            board: Board::new(),
            ai: AlphaBetaAI::with_config(config),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    pub fn is_players_turn(&self) -> bool {
        self.board.current_color() == PLAYER_COLOR
    }

    pub fn place(&mut self, point: Point) -> Result<(), GameError> {
        self.ensure_turn(PLAYER_COLOR, GameError::NotPlayersTurn)?;

        if !self.board.make_move(point) {
            return Err(GameError::IllegalMove(point));
        }

        debug!(mv = %point, turns = self.board.turns(), "player moved");
        self.log_if_finished();
        Ok(())
    }

    /// Parses Reversi notation such as `f5` and plays it.
    pub fn place_str(&mut self, coord: &str) -> Result<(), GameError> {
        let point = coord.parse::<Point>()?;
        self.place(point)
    }

    pub fn pass(&mut self) -> Result<(), GameError> {
        self.ensure_turn(PLAYER_COLOR, GameError::NotPlayersTurn)?;

        if !self.board.pass_turn() {
            return Err(GameError::PassNotAllowed);
        }

        debug!(turns = self.board.turns(), "player passed");
        Ok(())
    }

    /// Lets the AI commit one action. `None` means it passed.
    pub fn do_ai_move(&mut self) -> Result<Option<Point>, GameError> {
        self.ensure_turn(AI_COLOR, GameError::NotAisTurn)?;

        let played = self.ai.make_move(&mut self.board);
        match played {
            Some(point) => debug!(mv = %point, turns = self.board.turns(), "ai moved"),
            None => debug!(turns = self.board.turns(), "ai passed"),
        }
        self.log_if_finished();
        Ok(played)
    }

    /// Takes back the last committed action, whoever made it.
    pub fn undo(&mut self) -> Result<(), GameError> {
        if self.board.undo() {
            Ok(())
        } else {
            Err(GameError::NothingToUndo)
        }
    }

    pub fn legal_moves(&self) -> Vec<Point> {
        self.board.movable_pos().to_vec()
    }

    pub fn to_game_state(&self) -> GameState {
        GameState {
            board: self.board.to_array(),
            current_player: self.board.current_color().sign() as i8,
            black_count: self.board.count_disc(Color::Black) as u8,
            white_count: self.board.count_disc(Color::White) as u8,
            turns: self.board.turns() as u8,
            is_game_over: self.board.is_game_over(),
            is_pass: self.board.last_was_pass(),
            updated: self.board.update().to_vec(),
        }
    }

    pub fn to_game_result(&self) -> GameResult {
        let black_count = self.board.count_disc(Color::Black);
        let white_count = self.board.count_disc(Color::White);
        GameResult {
            winner: (black_count - white_count).signum() as i8,
            black_count: black_count as u8,
            white_count: white_count as u8,
        }
    }

    /// Final score, only available once the game has ended.
    pub fn final_result(&self) -> Result<GameResult, GameError> {
        if !self.board.is_game_over() {
            return Err(GameError::NotOver);
        }
        Ok(self.to_game_result())
    }

    fn ensure_turn(&self, color: Color, wrong_turn: GameError) -> Result<(), GameError> {
        if self.board.is_game_over() {
            return Err(GameError::GameOver);
        }
        if self.board.current_color() != color {
            return Err(wrong_turn);
        }
        Ok(())
    }

    fn log_if_finished(&self) {
        if self.board.is_game_over() {
            let result = self.to_game_result();
            info!(
                black = result.black_count,
                white = result.white_count,
                winner = result.winner,
                "game over"
            );
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board) {
        self.board = board;
    }
}
