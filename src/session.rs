use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::cell::CellState;
use crate::error::Result;
use crate::grid::Grid;
use crate::types::{CellCount, Coord, Coord2, Score, nd};

/// Points awarded for every safe cell opened, including cells opened by the
/// flood-fill cascade.
pub const POINTS_PER_CELL: Score = 5;

/// Countdown length of a session, in seconds.
pub const TIME_LIMIT_SECS: u32 = 300;

/// Valid transitions:
/// - Active -> Won
/// - Active -> Lost
///
/// `Won` and `Lost` are terminal; the only way out is a fresh session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Change description returned by [`GameSession::reveal`], for the
/// presentation layer to render from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealResult {
    /// Safe cells opened by this call, each with the adjacency count now
    /// visible in it.
    pub opened: Vec<(Coord2, u8)>,
    /// Mine that ended the game, if one was hit.
    pub mine_hit: Option<Coord2>,
    /// Whether this reveal completed the grid.
    pub won: bool,
    /// Score after the reveal.
    pub score: Score,
}

impl RevealResult {
    /// Whether this outcome changed anything worth re-rendering.
    pub fn has_update(&self) -> bool {
        !self.opened.is_empty() || self.mine_hit.is_some()
    }
}

/// Countdown snapshot returned by [`GameSession::tick`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_secs: u32,
    /// True only when the countdown itself ran out, not on other losses.
    pub expired: bool,
}

impl TimerState {
    pub const fn elapsed_secs(self) -> u32 {
        TIME_LIMIT_SECS - self.remaining_secs
    }
}

impl fmt::Display for TimerState {
    /// Renders the remaining time as `MM:SS`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}

/// Represents one game from start to finish.
///
/// All state lives in this one value; mutation happens only through
/// [`reveal`](Self::reveal), [`toggle_flag`](Self::toggle_flag) and
/// [`tick`](Self::tick), each of which returns a description of what changed.
/// Once the session is `Won` or `Lost` every operation becomes a no-op
/// (out-of-bounds coordinates still error).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    grid: Grid,
    board: Array2<CellState>,
    player: String,
    score: Score,
    open_count: CellCount,
    flag_count: CellCount,
    remaining_secs: u32,
    state: SessionState,
    triggered_mine: Option<Coord2>,
}

impl GameSession {
    /// Starts an `Active` session over the given grid with a full countdown.
    pub fn new(grid: Grid, player: impl Into<String>) -> Self {
        let size = grid.size() as usize;
        Self {
            grid,
            board: Array2::default((size, size)),
            player: player.into(),
            score: 0,
            open_count: 0,
            flag_count: 0,
            remaining_secs: TIME_LIMIT_SECS,
            state: SessionState::Active,
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn size(&self) -> Coord {
        self.grid.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.grid.mine_count()
    }

    /// State of one cell. `coords` must be in bounds.
    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.board[nd(coords)]
    }

    /// Mine that ended the game, if the loss came from a reveal.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// How many mines have not been flagged yet; negative when the player
    /// over-flags.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.grid.mine_count()) - i32::from(self.flag_count)
    }

    /// Positions of every mine, for endgame rendering.
    pub fn mine_positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.grid.mine_positions()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u32 {
        TIME_LIMIT_SECS - self.remaining_secs
    }

    /// Opens a closed, unflagged cell.
    ///
    /// A mined cell ends the game immediately, with no cascade and no points.
    /// A safe cell awards [`POINTS_PER_CELL`] and, when its adjacency count
    /// is zero, flood-fills the connected zero region and its numbered rim.
    /// Revealing on a finished session, or a cell that is already open or
    /// flagged, changes nothing.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealResult> {
        let coords = self.grid.check_bounds(coords)?;

        if self.state.is_finished() || self.board[nd(coords)] != CellState::Closed {
            return Ok(self.unchanged());
        }

        if self.grid.has_mine(coords) {
            self.board[nd(coords)] = CellState::Mine;
            self.triggered_mine = Some(coords);
            log::debug!("mine hit at {:?}", coords);
            self.finish(SessionState::Lost);
            return Ok(RevealResult {
                opened: Vec::new(),
                mine_hit: Some(coords),
                won: false,
                score: self.score,
            });
        }

        let opened = self.open_cascade(coords);

        let won = self.open_count == self.grid.safe_cell_count();
        if won {
            self.finish(SessionState::Won);
        }

        Ok(RevealResult {
            opened,
            mine_hit: None,
            won,
            score: self.score,
        })
    }

    /// Opens `start` and, when it has no adjacent mines, flood-fills through
    /// every connected zero-adjacency cell and the numbered rim around the
    /// region. Explicit worklist, no recursion. Flagged cells are never
    /// opened; mined cells cannot enter the queue because zero-adjacency
    /// cells have no mined neighbors.
    fn open_cascade(&mut self, start: Coord2) -> Vec<(Coord2, u8)> {
        let mut opened = Vec::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            // the queue may hold a cell twice; the first visit opens it
            if self.board[nd(coords)] != CellState::Closed {
                continue;
            }

            let count = self.grid.adjacent_mines(coords);
            self.board[nd(coords)] = CellState::Open(count);
            self.open_count += 1;
            self.score += POINTS_PER_CELL;
            opened.push((coords, count));
            log::trace!("opened {:?}, adjacent mines: {}", coords, count);

            if count == 0 {
                to_visit.extend(
                    self.grid
                        .neighbors(coords)
                        .filter(|&pos| self.board[nd(pos)] == CellState::Closed),
                );
            }
        }

        opened
    }

    /// Flips the flag on a closed cell and returns the new flagged state.
    /// Flagging never touches the score or the win condition. Open cells and
    /// finished sessions are left alone.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.grid.check_bounds(coords)?;

        let cell = self.board[nd(coords)];
        if self.state.is_finished() {
            return Ok(cell.is_flagged());
        }

        Ok(match cell {
            CellState::Closed => {
                self.board[nd(coords)] = CellState::Flagged;
                self.flag_count += 1;
                true
            }
            CellState::Flagged => {
                self.board[nd(coords)] = CellState::Closed;
                self.flag_count -= 1;
                false
            }
            CellState::Open(_) | CellState::Mine => false,
        })
    }

    /// Advances the countdown by one second. Expected once per second while
    /// the session is `Active`; ticks delivered after the game ended change
    /// nothing. Reaching zero loses the game.
    pub fn tick(&mut self) -> TimerState {
        if !self.state.is_finished() {
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                log::debug!("countdown expired");
                self.finish(SessionState::Lost);
            }
        }
        self.timer()
    }

    /// Current countdown snapshot, without advancing it.
    pub fn timer(&self) -> TimerState {
        TimerState {
            remaining_secs: self.remaining_secs,
            expired: self.remaining_secs == 0,
        }
    }

    fn unchanged(&self) -> RevealResult {
        RevealResult {
            opened: Vec::new(),
            mine_hit: None,
            won: false,
            score: self.score,
        }
    }

    fn finish(&mut self, terminal: SessionState) {
        if self.state.is_finished() {
            return;
        }
        self.state = terminal;
        log::debug!("game over: {:?}, final score {}", terminal, self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use alloc::vec::Vec;

    fn session(size: Coord, mines: &[Coord2]) -> GameSession {
        GameSession::new(Grid::with_mines(size, mines).unwrap(), "tester")
    }

    #[test]
    fn revealing_a_mine_loses_and_awards_nothing() {
        let mut game = session(3, &[(1, 1)]);

        let result = game.reveal((1, 1)).unwrap();

        assert_eq!(result.mine_hit, Some((1, 1)));
        assert!(result.opened.is_empty());
        assert_eq!(result.score, 0);
        assert_eq!(game.state(), SessionState::Lost);
        assert_eq!(game.triggered_mine(), Some((1, 1)));
        assert_eq!(game.cell_at((1, 1)), CellState::Mine);
    }

    #[test]
    fn lost_session_ignores_further_moves() {
        let mut game = session(3, &[(1, 1)]);
        game.reveal((1, 1)).unwrap();

        let reveal = game.reveal((0, 0)).unwrap();
        assert!(!reveal.has_update());
        assert_eq!(game.cell_at((0, 0)), CellState::Closed);

        assert_eq!(game.toggle_flag((0, 0)), Ok(false));
        assert_eq!(game.cell_at((0, 0)), CellState::Closed);

        let timer = game.tick();
        assert_eq!(timer.remaining_secs, TIME_LIMIT_SECS);
        assert!(!timer.expired);
    }

    #[test]
    fn numbered_cell_opens_alone() {
        // every safe cell on this grid touches the center mine
        let mut game = session(3, &[(1, 1)]);

        let result = game.reveal((0, 0)).unwrap();

        assert_eq!(result.opened, alloc::vec![((0, 0), 1)]);
        assert_eq!(result.score, POINTS_PER_CELL);
        assert!(!result.won);
        assert_eq!(game.state(), SessionState::Active);
    }

    #[test]
    fn zero_cell_flood_fills_the_whole_safe_region() {
        let mut game = session(3, &[(2, 2)]);

        let result = game.reveal((0, 0)).unwrap();

        // all 8 safe cells open in one cascade, which also wins the game
        assert_eq!(result.opened.len(), 8);
        assert!(result.won);
        assert_eq!(result.score, 8 * POINTS_PER_CELL);
        assert_eq!(game.state(), SessionState::Won);
        assert_eq!(game.cell_at((2, 2)), CellState::Closed);
        assert_eq!(game.cell_at((1, 1)), CellState::Open(1));
        assert_eq!(game.triggered_mine(), None);
    }

    #[test]
    fn cascade_opens_each_cell_exactly_once() {
        let mut game = session(4, &[(3, 3)]);

        let result = game.reveal((0, 0)).unwrap();

        let mut seen: Vec<Coord2> = result.opened.iter().map(|&(pos, _)| pos).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), result.opened.len());
        assert_eq!(result.score, result.opened.len() as Score * POINTS_PER_CELL);
    }

    #[test]
    fn revealing_in_any_order_wins_from_the_same_layout() {
        let mines = [(0, 1), (2, 1)];
        let safe: Vec<Coord2> = (0..3)
            .flat_map(|x| (0..3).map(move |y| (x, y)))
            .filter(|pos| !mines.contains(pos))
            .collect();

        let mut forward = session(3, &mines);
        for &pos in &safe {
            forward.reveal(pos).unwrap();
        }
        assert_eq!(forward.state(), SessionState::Won);

        let mut backward = session(3, &mines);
        for &pos in safe.iter().rev() {
            backward.reveal(pos).unwrap();
        }
        assert_eq!(backward.state(), SessionState::Won);
        assert_eq!(backward.score(), forward.score());
    }

    #[test]
    fn repeat_reveal_never_double_counts() {
        let mut game = session(3, &[(1, 1)]);

        let first = game.reveal((0, 0)).unwrap();
        let second = game.reveal((0, 0)).unwrap();

        assert!(!second.has_update());
        assert_eq!(second.score, first.score);
        assert_eq!(game.score(), POINTS_PER_CELL);
    }

    #[test]
    fn flag_blocks_reveal_until_removed() {
        let mut game = session(3, &[(1, 1)]);

        assert_eq!(game.toggle_flag((0, 0)), Ok(true));
        assert!(!game.reveal((0, 0)).unwrap().has_update());
        assert_eq!(game.cell_at((0, 0)), CellState::Flagged);

        assert_eq!(game.toggle_flag((0, 0)), Ok(false));
        assert!(game.reveal((0, 0)).unwrap().has_update());
    }

    #[test]
    fn double_toggle_restores_the_original_state() {
        let mut game = session(3, &[(1, 1)]);

        assert_eq!(game.cell_at((2, 2)), CellState::Closed);
        game.toggle_flag((2, 2)).unwrap();
        game.toggle_flag((2, 2)).unwrap();
        assert_eq!(game.cell_at((2, 2)), CellState::Closed);
        assert_eq!(game.mines_left(), 1);
    }

    #[test]
    fn flagging_an_open_cell_is_ignored() {
        let mut game = session(3, &[(1, 1)]);
        game.reveal((0, 0)).unwrap();

        assert_eq!(game.toggle_flag((0, 0)), Ok(false));
        assert_eq!(game.cell_at((0, 0)), CellState::Open(1));
    }

    #[test]
    fn cascade_skips_flagged_cells() {
        let mut game = session(3, &[(2, 2)]);
        game.toggle_flag((0, 2)).unwrap();

        let result = game.reveal((0, 0)).unwrap();

        assert_eq!(game.cell_at((0, 2)), CellState::Flagged);
        assert_eq!(result.opened.len(), 7);
        // one safe cell stayed flagged, so the game is not won yet
        assert!(!result.won);
        assert_eq!(game.state(), SessionState::Active);
    }

    #[test]
    fn out_of_bounds_moves_error_without_state_change() {
        let mut game = session(3, &[(1, 1)]);

        assert_eq!(game.reveal((3, 0)), Err(GameError::OutOfBounds(3, 0)));
        assert_eq!(game.toggle_flag((0, 9)), Err(GameError::OutOfBounds(0, 9)));
        assert_eq!(game.state(), SessionState::Active);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn countdown_decrements_and_expires_into_a_loss() {
        let mut game = session(2, &[(0, 0)]);

        let after_one = game.tick();
        assert_eq!(after_one.remaining_secs, TIME_LIMIT_SECS - 1);
        assert_eq!(after_one.elapsed_secs(), 1);
        assert!(!after_one.expired);

        for _ in 1..TIME_LIMIT_SECS - 1 {
            game.tick();
        }
        assert_eq!(game.state(), SessionState::Active);

        let last = game.tick();
        assert!(last.expired);
        assert_eq!(last.remaining_secs, 0);
        assert_eq!(game.state(), SessionState::Lost);
        // no mine was hit, the clock ran out
        assert_eq!(game.triggered_mine(), None);
    }

    #[test]
    fn winning_freezes_the_timer_and_score() {
        let mut game = session(2, &[(0, 0)]);
        game.tick();

        let result = game.reveal((1, 1)).unwrap();
        assert!(!result.won);
        game.reveal((0, 1)).unwrap();
        let result = game.reveal((1, 0)).unwrap();
        assert!(result.won);
        assert_eq!(game.state(), SessionState::Won);

        let score = game.score();
        let timer = game.tick();
        assert_eq!(timer.remaining_secs, TIME_LIMIT_SECS - 1);
        assert_eq!(game.score(), score);
        assert_eq!(score, 3 * POINTS_PER_CELL);
    }

    #[test]
    fn timer_state_formats_as_minutes_and_seconds() {
        let mut game = session(2, &[(0, 0)]);
        assert_eq!(alloc::format!("{}", game.timer()), "05:00");

        game.tick();
        assert_eq!(alloc::format!("{}", game.timer()), "04:59");
    }

    #[test]
    fn session_exposes_player_and_board_metadata() {
        let game = session(3, &[(0, 0), (2, 2)]);

        assert_eq!(game.player(), "tester");
        assert_eq!(game.size(), 3);
        assert_eq!(game.total_mines(), 2);
        assert_eq!(game.mines_left(), 2);
        assert!(!game.is_finished());

        let mut mines: Vec<_> = game.mine_positions().collect();
        mines.sort_unstable();
        assert_eq!(mines, [(0, 0), (2, 2)]);
    }
}
