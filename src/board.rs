use std::ops::{BitOr, BitOrAssign};

use crate::types::{BOARD_SIZE, Color, ColorStorage, Disc, MAX_TURNS, Point};

/// Playable cells plus a one-cell wall ring on every side.
const GRID_SIZE: usize = BOARD_SIZE + 2;

type Grid<T> = [[T; GRID_SIZE]; GRID_SIZE];

/// Set of compass directions in which a placed disc would capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Directions(u8);

impl Directions {
    pub const NONE: Self = Self(0);
    pub const UPPER: Self = Self(1);
    pub const UPPER_LEFT: Self = Self(2);
    pub const LEFT: Self = Self(4);
    pub const LOWER_LEFT: Self = Self(8);
    pub const LOWER: Self = Self(16);
    pub const LOWER_RIGHT: Self = Self(32);
    pub const RIGHT: Self = Self(64);
    pub const UPPER_RIGHT: Self = Self(128);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for Directions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Directions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Scan order shared by mobility checks and flipping: (direction, dx, dy).
const SCAN_ORDER: [(Directions, isize, isize); 8] = [
    (Directions::UPPER, 0, -1),
    (Directions::UPPER_LEFT, -1, -1),
    (Directions::LEFT, -1, 0),
    (Directions::LOWER_LEFT, -1, 1),
    (Directions::LOWER, 0, 1),
    (Directions::LOWER_RIGHT, 1, 1),
    (Directions::RIGHT, 1, 0),
    (Directions::UPPER_RIGHT, 1, -1),
];

/// One committed ply on the undo log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRecord {
    Pass,
    /// Placed disc first, then the flipped discs in scan order.
    Place(Vec<Disc>),
}

/// Reversi board on a walled 10x10 grid with per-ply legal move caches
/// and an undo log.
///
/// `make_move`, `pass_turn` and `undo` must be used in strict LIFO order
/// during search; every cache slot is indexed by `turns`.
#[derive(Debug, Clone)]
pub struct Board {
    raw: Grid<Color>,
    turns: usize,
    current_color: Color,
    update_log: Vec<UpdateRecord>,
    movable_pos: Vec<Vec<Point>>,
    movable_dir: Vec<Grid<Directions>>,
    discs: ColorStorage,
}

impl Board {
    /// Creates a board in the opening position with Black to move.
    pub fn new() -> Self {
        let mut board = Self {
            raw: [[Color::Empty; GRID_SIZE]; GRID_SIZE],
            turns: 0,
            current_color: Color::Black,
            update_log: Vec::new(),
            movable_pos: vec![Vec::new(); MAX_TURNS + 1],
            movable_dir: vec![[[Directions::NONE; GRID_SIZE]; GRID_SIZE]; MAX_TURNS + 1],
            discs: ColorStorage::default(),
        };
        board.init();
        board
    }

    /// Resets to the opening position:
    /// d4=white, e5=white, e4=black, d5=black.
    pub fn init(&mut self) {
        for x in 1..=BOARD_SIZE {
            for y in 1..=BOARD_SIZE {
                self.raw[x][y] = Color::Empty;
            }
        }

        for i in 0..GRID_SIZE {
            self.raw[0][i] = Color::Wall;
            self.raw[BOARD_SIZE + 1][i] = Color::Wall;
            self.raw[i][0] = Color::Wall;
            self.raw[i][BOARD_SIZE + 1] = Color::Wall;
        }

        self.raw[4][4] = Color::White;
        self.raw[5][5] = Color::White;
        self.raw[4][5] = Color::Black;
        self.raw[5][4] = Color::Black;

        self.discs.set(Color::Black, 2);
        self.discs.set(Color::White, 2);
        self.discs.set(Color::Empty, (BOARD_SIZE * BOARD_SIZE - 4) as i32);

        self.turns = 0;
        self.current_color = Color::Black;
        self.update_log.clear();

        self.init_movable();
    }

    /// Places a disc for the side to move.
    /// Returns `false` without touching the board when the move is illegal.
    pub fn make_move(&mut self, point: Point) -> bool {
        if !point.is_on_board() {
            return false;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if self.movable_dir[self.turns][x][y].is_none() {
            return false;
        }

        self.flip_discs(x, y);

        self.turns += 1;
        self.current_color = self.current_color.opponent();
        self.init_movable();

        true
    }

    /// Passes the turn. Only legal when the side to move has no move and
    /// the game is not over.
    pub fn pass_turn(&mut self) -> bool {
        if !self.movable_pos[self.turns].is_empty() {
            return false;
        }
        if self.is_game_over() {
            return false;
        }

        self.current_color = self.current_color.opponent();
        self.update_log.push(UpdateRecord::Pass);
        self.init_movable();

        true
    }

    /// Reverts the last move or pass. Returns `false` at the initial state.
    pub fn undo(&mut self) -> bool {
        if self.turns == 0 {
            return false;
        }
        let Some(update) = self.update_log.pop() else {
            return false;
        };

        self.current_color = self.current_color.opponent();

        match update {
            UpdateRecord::Pass => {
                // A pass never advanced `turns`; the restored side had no moves.
                self.movable_pos[self.turns].clear();
                self.movable_dir[self.turns] = [[Directions::NONE; GRID_SIZE]; GRID_SIZE];
            }
            UpdateRecord::Place(discs) => {
                self.turns -= 1;

                let mut changed = discs.iter();
                if let Some(placed) = changed.next() {
                    self.raw[placed.point.x as usize][placed.point.y as usize] = Color::Empty;
                }
                let previous_owner = self.current_color.opponent();
                for disc in changed {
                    self.raw[disc.point.x as usize][disc.point.y as usize] = previous_owner;
                }

                let diff = discs.len() as i32;
                self.discs.add(self.current_color, -diff);
                self.discs.add(self.current_color.opponent(), diff - 1);
                self.discs.add(Color::Empty, 1);
            }
        }

        true
    }

    /// Game ends at ply 60 or when neither side can move.
    pub fn is_game_over(&self) -> bool {
        if self.turns == MAX_TURNS {
            return true;
        }
        if !self.movable_pos[self.turns].is_empty() {
            return false;
        }

        let other = self.current_color.opponent();
        for x in 1..=BOARD_SIZE {
            for y in 1..=BOARD_SIZE {
                if !self.check_mobility(x, y, other).is_none() {
                    return false;
                }
            }
        }
        true
    }

    /// Color at `point`. Anything outside the walled grid reads as a wall.
    pub fn color_at(&self, point: Point) -> Color {
        self.raw
            .get(point.x as usize)
            .and_then(|column| column.get(point.y as usize))
            .copied()
            .unwrap_or(Color::Wall)
    }

    /// Legal moves for the side to move, in row-major scan order.
    pub fn movable_pos(&self) -> &[Point] {
        &self.movable_pos[self.turns]
    }

    /// Capturing directions for a move at `point` this ply.
    pub fn movable_dir(&self, point: Point) -> Directions {
        if !point.is_on_board() {
            return Directions::NONE;
        }
        self.movable_dir[self.turns][point.x as usize][point.y as usize]
    }

    /// Cells changed by the last committed action; empty after a pass or at the start.
    pub fn update(&self) -> &[Disc] {
        match self.update_log.last() {
            Some(UpdateRecord::Place(discs)) => discs,
            Some(UpdateRecord::Pass) | None => &[],
        }
    }

    pub fn last_was_pass(&self) -> bool {
        matches!(self.update_log.last(), Some(UpdateRecord::Pass))
    }

    pub fn count_disc(&self, color: Color) -> i32 {
        self.discs.get(color)
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn current_color(&self) -> Color {
        self.current_color
    }

    /// Converts the playable area to row-major signs: 1 black, -1 white, 0 empty.
    pub fn to_array(&self) -> Vec<i8> {
        let mut cells = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        for y in 1..=BOARD_SIZE {
            for x in 1..=BOARD_SIZE {
                cells.push(self.raw[x][y].sign() as i8);
            }
        }
        cells
    }

    fn check_mobility(&self, x: usize, y: usize, color: Color) -> Directions {
        if self.raw[x][y] != Color::Empty {
            return Directions::NONE;
        }

        let other = color.opponent();
        let mut dir = Directions::NONE;

        for (bit, dx, dy) in SCAN_ORDER {
            let (mut cx, mut cy) = step(x, y, dx, dy);
            if self.raw[cx][cy] != other {
                continue;
            }
            while self.raw[cx][cy] == other {
                (cx, cy) = step(cx, cy, dx, dy);
            }
            if self.raw[cx][cy] == color {
                dir |= bit;
            }
        }

        dir
    }

    fn init_movable(&mut self) {
        let turns = self.turns;
        let color = self.current_color;
        let mut positions = Vec::new();

        for y in 1..=BOARD_SIZE {
            for x in 1..=BOARD_SIZE {
                let dir = self.check_mobility(x, y, color);
                if !dir.is_none() {
                    positions.push(Point::new(x as u8, y as u8));
                }
                self.movable_dir[turns][x][y] = dir;
            }
        }

        self.movable_pos[turns] = positions;
    }

    fn flip_discs(&mut self, x: usize, y: usize) {
        let color = self.current_color;
        let dir = self.movable_dir[self.turns][x][y];

        self.raw[x][y] = color;
        let mut update = vec![Disc::new(x as u8, y as u8, color)];

        for (bit, dx, dy) in SCAN_ORDER {
            if !dir.contains(bit) {
                continue;
            }
            let (mut cx, mut cy) = step(x, y, dx, dy);
            while self.raw[cx][cy] != color {
                self.raw[cx][cy] = color;
                update.push(Disc::new(cx as u8, cy as u8, color));
                (cx, cy) = step(cx, cy, dx, dy);
            }
        }

        let diff = update.len() as i32;
        self.discs.add(color, diff);
        self.discs.add(color.opponent(), -(diff - 1));
        self.discs.add(Color::Empty, -1);

        self.update_log.push(UpdateRecord::Place(update));
    }

    /// Builds a position from 8 rows of `X` (black), `O` (white) and `.`.
    /// `turns` is derived from the disc count; the undo log starts empty.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: [&str; BOARD_SIZE], to_move: Color) -> Self {
        let mut board = Self::new();
        let mut counts = ColorStorage::default();

        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let color = match ch {
                    'X' => Color::Black,
                    'O' => Color::White,
                    _ => Color::Empty,
                };
                board.raw[col + 1][row + 1] = color;
                counts.add(color, 1);
            }
        }

        let occupied = (counts.get(Color::Black) + counts.get(Color::White)) as usize;
        board.discs = counts;
        board.turns = occupied.saturating_sub(4).min(MAX_TURNS);
        board.current_color = to_move;
        board.update_log.clear();
        board.init_movable();
        board
    }

    /// Moves the position to another ply slot, recomputing its caches.
    #[cfg(test)]
    pub(crate) fn with_turns(mut self, turns: usize) -> Self {
        self.turns = turns.min(MAX_TURNS);
        self.init_movable();
        self
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn step(x: usize, y: usize, dx: isize, dy: isize) -> (usize, usize) {
    (x.wrapping_add_signed(dx), y.wrapping_add_signed(dy))
}
