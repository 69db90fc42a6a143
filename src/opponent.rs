//! Automated opponent move selection.
//!
//! The opponent only proposes a point. Legality is always decided by
//! [`Game::attempt_move`], so a bad suggestion is rejected the same way a
//! bad human move is. Difficulty changes which point is proposed:
//!
//! - `Easy`: any empty point, uniformly at random
//! - `Medium`: a random legal move that does not put its own group in atari
//! - `Hard`: the biggest capture, else rescue a group in atari, else `Medium`

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use tracing::{debug, warn};

use crate::board::{Color, Point};
use crate::constants::{BOARD_AREA, MAX_OPPONENT_ATTEMPTS};
use crate::game::{Game, MoveOutcome};

/// Something that can propose a move for the side to move.
pub trait MoveSelector {
    fn select(&mut self, game: &Game) -> Option<Point>;
}

/// Opponent strength.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => bail!("unknown difficulty: {s} (expected easy, medium or hard)"),
        }
    }
}

/// A computer player with its own random source.
pub struct Opponent {
    pub difficulty: Difficulty,
    rng: fastrand::Rng,
    /// Suggestions tried by [`Opponent::play_turn`] before it falls back
    attempts: usize,
}

impl Opponent {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rng: fastrand::Rng::new(),
            attempts: MAX_OPPONENT_ATTEMPTS,
        }
    }

    /// Create an opponent with a fixed seed for reproducible games.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: fastrand::Rng::with_seed(seed),
            attempts: MAX_OPPONENT_ATTEMPTS,
        }
    }

    /// Limit how many suggestions are tried before picking among legal moves.
    /// Zero goes straight to the legal moves.
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Choose and play a move for the side to move.
    ///
    /// Suggestions go through [`Game::attempt_move`] like any other move.
    /// Once the attempt budget is spent a random legal move is played
    /// instead, so the side to move is only left without a move when it has
    /// no legal move at all. Returns the last point tried and its outcome.
    pub fn play_turn(&mut self, game: &mut Game) -> Option<(Point, MoveOutcome)> {
        let color = game.turn();
        let mut last = None;
        for _ in 0..self.attempts {
            let Some((x, y)) = self.select(game) else {
                break;
            };
            let outcome = game.attempt_move(x as isize, y as isize, color);
            if outcome.is_committed() {
                return Some(((x, y), outcome));
            }
            last = Some(((x, y), outcome));
        }

        let legal = game.legal_moves();
        let Some((x, y)) = self.pick(&legal) else {
            warn!(%color, difficulty = %self.difficulty, "opponent found no legal move");
            return last;
        };
        debug!(
            %color,
            difficulty = %self.difficulty,
            candidates = legal.len(),
            "suggestions refused, playing a random legal move"
        );
        let outcome = game.attempt_move(x as isize, y as isize, color);
        Some(((x, y), outcome))
    }

    fn random_empty(&mut self, game: &Game) -> Option<Point> {
        let empty: Vec<Point> = game.board().empty_points().collect();
        self.pick(&empty)
    }

    fn pick(&mut self, candidates: &[Point]) -> Option<Point> {
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[self.rng.usize(..candidates.len())])
    }

    /// Random legal move, preferring ones that leave the played group with
    /// at least two liberties.
    fn safe_move(&mut self, game: &Game) -> Option<Point> {
        let mut safe = Vec::new();
        let mut risky = Vec::new();
        for (x, y) in game.board().empty_points() {
            let (after, outcome) = game.preview(x, y);
            if !outcome.is_committed() {
                continue;
            }
            let board = after.board();
            let own = board.group((x, y), game.turn());
            if board.liberties(&own) >= 2 {
                safe.push((x, y));
            } else {
                risky.push((x, y));
            }
        }
        self.pick(&safe).or_else(|| self.pick(&risky))
    }

    /// The legal move removing the most stones, if any move captures.
    fn best_capture(&mut self, game: &Game) -> Option<Point> {
        let mut best: Vec<Point> = Vec::new();
        let mut most = 0;
        for (x, y) in game.board().empty_points() {
            let n = match game.preview(x, y).1 {
                MoveOutcome::Committed(c) => c.captured.len(),
                MoveOutcome::Rejected(_) => 0,
            };
            if n == 0 || n < most {
                continue;
            }
            if n > most {
                most = n;
                best.clear();
            }
            best.push((x, y));
        }
        self.pick(&best)
    }

    /// A liberty of an own group in atari that gives it room to breathe.
    fn rescue(&mut self, game: &Game) -> Option<Point> {
        let me = game.turn();
        let board = game.board();
        let mut candidates = Vec::new();
        let size = board.size();
        let mut seen = [false; BOARD_AREA];
        for y in 0..size {
            for x in 0..size {
                if board.get((x, y)) != Some(me) || seen[y * size + x] {
                    continue;
                }
                let group = board.group((x, y), me);
                for &(sx, sy) in group.stones() {
                    seen[sy * size + sx] = true;
                }
                if board.liberties(&group) != 1 {
                    continue;
                }
                for lib in board.liberty_points(&group) {
                    if escapes(game, lib, me) {
                        candidates.push(lib);
                    }
                }
            }
        }
        self.pick(&candidates)
    }
}

/// Whether playing `pt` is legal and leaves the played group with 2+ liberties.
fn escapes(game: &Game, (x, y): Point, me: Color) -> bool {
    let (after, outcome) = game.preview(x, y);
    if !outcome.is_committed() {
        return false;
    }
    let group = after.board().group((x, y), me);
    after.board().liberties(&group) >= 2
}

impl MoveSelector for Opponent {
    fn select(&mut self, game: &Game) -> Option<Point> {
        if game.is_over() {
            return None;
        }
        match self.difficulty {
            Difficulty::Easy => self.random_empty(game),
            Difficulty::Medium => self.safe_move(game),
            Difficulty::Hard => self
                .best_capture(game)
                .or_else(|| self.rescue(game))
                .or_else(|| self.safe_move(game)),
        }
    }
}
