//! Game state and move execution.
//!
//! This module provides the rules engine proper:
//! - Move validation (bounds, turn, occupancy, game over)
//! - Capture resolution for every adjacent enemy group
//! - Suicide rejection with full rollback of provisional captures
//! - Simple Ko enforcement against the grid before the previous move
//! - Capture-count victory
//!
//! Every rejection leaves the game exactly as it was before the call.

use std::fmt;

use tracing::{debug, info, trace};

use crate::board::{Board, Color, Group, Point, neighbors, to_point};
use crate::constants::CAPTURE_LIMIT;

/// Why a move attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Coordinates are off the board
    OutOfBounds,
    /// Point is not empty
    Occupied,
    /// The requested color is not the side to move
    WrongTurn,
    /// Move would recreate the position before the previous move
    KoViolation,
    /// Move would leave its own group without liberties
    Suicide,
    /// A winner has already been decided
    GameOver,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::OutOfBounds => write!(f, "illegal move: off the board"),
            Rejection::Occupied => write!(f, "illegal move: point not empty"),
            Rejection::WrongTurn => write!(f, "illegal move: not your turn"),
            Rejection::KoViolation => write!(f, "illegal move: retakes ko"),
            Rejection::Suicide => write!(f, "illegal move: suicide"),
            Rejection::GameOver => write!(f, "illegal move: game is over"),
        }
    }
}

impl std::error::Error for Rejection {}

/// Result of a successfully committed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    /// Every stone removed by this move, sorted
    pub captured: Vec<Point>,
    /// Side to move after this move
    pub next_turn: Color,
    pub game_over: bool,
    pub winner: Option<Color>,
}

/// Outcome of [`Game::attempt_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Committed(Committed),
    Rejected(Rejection),
}

impl MoveOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, MoveOutcome::Committed(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            MoveOutcome::Rejected(r) => Some(*r),
            MoveOutcome::Committed(_) => None,
        }
    }

    /// Convert into a `Result`, for callers that prefer `?`.
    pub fn into_result(self) -> Result<Committed, Rejection> {
        match self {
            MoveOutcome::Committed(c) => Ok(c),
            MoveOutcome::Rejected(r) => Err(r),
        }
    }
}

/// A game in progress.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    /// Grid as it stood before the last committed move (Ko reference)
    previous: Board,
    turn: Color,
    /// Black stones removed from the board so far
    captured_black: u32,
    /// White stones removed from the board so far
    captured_white: u32,
    winner: Option<Color>,
    /// Number of committed moves
    move_number: usize,
    last_move: Option<Point>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            previous: Board::new(),
            turn: Color::Black,
            captured_black: 0,
            captured_white: 0,
            winner: None,
            move_number: 0,
            last_move: None,
        }
    }

    /// Return to the initial position: empty board, Black to move.
    /// A game in an arbitrary position, for tests that need shapes no
    /// sequence of legal moves reaches cheaply.
    #[cfg(test)]
    pub(crate) fn with_board(board: Board, turn: Color) -> Self {
        Self {
            previous: board.clone(),
            board,
            turn,
            ..Self::new()
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
        info!("game reset");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Number of stones of `color` that have been captured.
    pub fn captured(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.captured_black,
            Color::White => self.captured_white,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn move_number(&self) -> usize {
        self.move_number
    }

    pub fn last_move(&self) -> Option<Point> {
        self.last_move
    }

    /// The group of `color` through `(x, y)`; empty if the point does not hold `color`.
    pub fn group(&self, x: isize, y: isize, color: Color) -> Group {
        match to_point(x, y) {
            Some(p) => self.board.group(p, color),
            None => Group::empty(color),
        }
    }

    pub fn liberties(&self, group: &Group) -> usize {
        self.board.liberties(group)
    }

    /// Try to play `color` at `(x, y)`.
    ///
    /// The stone is placed provisionally, adjacent enemy groups without
    /// liberties are removed, and the result is checked for suicide and Ko.
    /// Illegal moves are rolled back completely.
    pub fn attempt_move(&mut self, x: isize, y: isize, color: Color) -> MoveOutcome {
        let outcome = self.apply(x, y, color);
        match &outcome {
            MoveOutcome::Rejected(r) => trace!(x, y, %color, reason = %r, "move rejected"),
            MoveOutcome::Committed(c) => {
                debug!(
                    move_number = self.move_number,
                    x,
                    y,
                    %color,
                    captures = c.captured.len(),
                    "move committed"
                );
                if let Some(w) = c.winner {
                    info!(
                        winner = %w,
                        captured_black = self.captured_black,
                        captured_white = self.captured_white,
                        "game over"
                    );
                }
            }
        }
        outcome
    }

    fn apply(&mut self, x: isize, y: isize, color: Color) -> MoveOutcome {
        match self.validate(x, y, color) {
            Ok(pt) => self.play(pt, color),
            Err(r) => MoveOutcome::Rejected(r),
        }
    }

    fn validate(&self, x: isize, y: isize, color: Color) -> Result<Point, Rejection> {
        if self.is_over() {
            return Err(Rejection::GameOver);
        }
        let pt = to_point(x, y).ok_or(Rejection::OutOfBounds)?;
        if color != self.turn {
            return Err(Rejection::WrongTurn);
        }
        if !self.board.is_empty_at(pt) {
            return Err(Rejection::Occupied);
        }
        Ok(pt)
    }

    fn play(&mut self, pt: Point, color: Color) -> MoveOutcome {
        let opp = color.opponent();
        self.board.set(pt, Some(color));

        // Capture every adjacent enemy group left without liberties. A group
        // touching the new stone from several sides is removed once, since
        // after the first removal its other stones read as empty.
        let mut captured: Vec<Point> = Vec::new();
        for n in neighbors(pt) {
            if self.board.get(n) != Some(opp) {
                continue;
            }
            let group = self.board.group(n, opp);
            if self.board.liberties(&group) == 0 {
                for &s in group.stones() {
                    self.board.set(s, None);
                }
                captured.extend(group.into_stones());
            }
        }

        let own = self.board.group(pt, color);
        if self.board.liberties(&own) == 0 {
            self.rollback(pt, opp, &captured);
            return MoveOutcome::Rejected(Rejection::Suicide);
        }

        if self.board == self.previous {
            self.rollback(pt, opp, &captured);
            return MoveOutcome::Rejected(Rejection::KoViolation);
        }

        self.commit(pt, color, captured)
    }

    fn rollback(&mut self, pt: Point, opp: Color, captured: &[Point]) {
        for &s in captured {
            self.board.set(s, Some(opp));
        }
        self.board.set(pt, None);
    }

    fn commit(&mut self, pt: Point, color: Color, mut captured: Vec<Point>) -> MoveOutcome {
        // The grid before this move becomes the Ko reference: it equals the
        // current grid with `pt` emptied and the captured stones restored.
        self.previous.clone_from(&self.board);
        self.previous.set(pt, None);
        for &s in &captured {
            self.previous.set(s, Some(color.opponent()));
        }

        let count = captured.len() as u32;
        match color {
            Color::Black => self.captured_white += count,
            Color::White => self.captured_black += count,
        }
        self.turn = color.opponent();
        self.move_number += 1;
        self.last_move = Some(pt);

        self.winner = if self.captured_black >= CAPTURE_LIMIT {
            Some(Color::White)
        } else if self.captured_white >= CAPTURE_LIMIT {
            Some(Color::Black)
        } else {
            None
        };

        captured.sort_unstable();
        MoveOutcome::Committed(Committed {
            captured,
            next_turn: self.turn,
            game_over: self.winner.is_some(),
            winner: self.winner,
        })
    }

    /// Play `(x, y)` for the side to move on a copy of the game.
    ///
    /// Returns the copy and the outcome; `self` is untouched.
    pub fn preview(&self, x: usize, y: usize) -> (Game, MoveOutcome) {
        let mut copy = self.clone();
        let outcome = copy.apply(x as isize, y as isize, self.turn);
        (copy, outcome)
    }

    pub fn is_legal(&self, x: usize, y: usize) -> bool {
        self.preview(x, y).1.is_committed()
    }

    /// Number of stones the side to move would capture at `(x, y)`.
    ///
    /// Illegal moves capture nothing.
    pub fn would_capture(&self, x: usize, y: usize) -> usize {
        match self.preview(x, y).1 {
            MoveOutcome::Committed(c) => c.captured.len(),
            MoveOutcome::Rejected(_) => 0,
        }
    }

    /// Empty points where the side to move may legally play.
    pub fn legal_moves(&self) -> Vec<Point> {
        if self.is_over() {
            return Vec::new();
        }
        self.board
            .empty_points()
            .filter(|&(x, y)| self.is_legal(x, y))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut Game, x: isize, y: isize) -> MoveOutcome {
        let color = game.turn();
        game.attempt_move(x, y, color)
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.captured(Color::Black), 0);
        assert_eq!(game.captured(Color::White), 0);
        assert!(!game.is_over());
        assert_eq!(game.move_number(), 0);
        assert!(game.last_move().is_none());
    }

    #[test]
    fn test_play_single_stone() {
        let mut game = Game::new();
        let outcome = play(&mut game, 3, 3);
        assert_eq!(
            outcome,
            MoveOutcome::Committed(Committed {
                captured: vec![],
                next_turn: Color::White,
                game_over: false,
                winner: None,
            })
        );
        assert_eq!(game.board().get((3, 3)), Some(Color::Black));
        assert_eq!(game.move_number(), 1);
        assert_eq!(game.last_move(), Some((3, 3)));
    }

    #[test]
    fn test_rejections_in_order() {
        let mut game = Game::new();
        assert_eq!(
            game.attempt_move(-1, 0, Color::Black).rejection(),
            Some(Rejection::OutOfBounds)
        );
        assert_eq!(
            game.attempt_move(0, 0, Color::White).rejection(),
            Some(Rejection::WrongTurn)
        );
        play(&mut game, 0, 0);
        assert_eq!(
            game.attempt_move(0, 0, Color::White).rejection(),
            Some(Rejection::Occupied)
        );
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn test_corner_capture() {
        let mut game = Game::new();
        play(&mut game, 1, 0); // B
        play(&mut game, 0, 0); // W
        let outcome = play(&mut game, 0, 1).into_result().unwrap(); // B captures
        assert_eq!(outcome.captured, vec![(0, 0)]);
        assert!(game.board().is_empty_at((0, 0)));
        assert_eq!(game.captured(Color::White), 1);
        assert_eq!(game.captured(Color::Black), 0);
    }

    #[test]
    fn test_suicide_restores_board() {
        let mut game = Game::new();
        play(&mut game, 1, 0); // B
        play(&mut game, 8, 8); // W
        play(&mut game, 0, 1); // B
        let before = game.board().clone();
        assert_eq!(play(&mut game, 0, 0).rejection(), Some(Rejection::Suicide));
        assert_eq!(game.board(), &before);
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn test_would_capture_and_legal_moves() {
        let mut game = Game::new();
        play(&mut game, 1, 0); // B
        play(&mut game, 0, 0); // W
        assert_eq!(game.would_capture(0, 1), 1);
        assert_eq!(game.would_capture(5, 5), 0);
        let legal = game.legal_moves();
        assert_eq!(legal.len(), game.board().empty_points().count());
        // Preview leaves the real game alone
        assert_eq!(game.board().get((0, 0)), Some(Color::White));
    }

    #[test]
    fn test_group_query_out_of_bounds() {
        let game = Game::new();
        assert!(game.group(-3, 2, Color::Black).is_empty());
        assert!(game.group(2, 2, Color::Black).is_empty());
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::KoViolation.to_string(), "illegal move: retakes ko");
        assert_eq!(Rejection::Suicide.to_string(), "illegal move: suicide");
    }
}
