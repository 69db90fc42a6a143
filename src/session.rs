//! Turn sequencing between a front end, the rules engine and the opponent.
//!
//! In computer mode the opponent never replies inside the human's call.
//! A committed human move schedules a [`PendingMove`] instead; the front end
//! renders, waits until [`Session::next_deadline`] and then calls
//! [`Session::poll`]. Resets and mode changes bump a generation counter, so
//! a reply scheduled before them can never touch the new game.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::board::{Color, Point};
use crate::constants::{MAX_OPPONENT_ATTEMPTS, OPPONENT_DELAY_MS};
use crate::game::{Game, MoveOutcome, Rejection};
use crate::opponent::{Difficulty, Opponent};

/// The side played by the computer in [`Mode::Computer`].
pub const COMPUTER_COLOR: Color = Color::White;

/// Who is playing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Two humans share the board
    TwoPlayer,
    /// A human plays Black against the computer
    Computer(Difficulty),
}

/// Runtime settings for a session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Pause between a human move and the computer's reply
    pub delay: Duration,
    /// Seed for the opponent's random choices
    pub seed: Option<u64>,
    /// Opponent suggestions tried before it picks among the legal moves
    pub attempts: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(OPPONENT_DELAY_MS),
            seed: None,
            attempts: MAX_OPPONENT_ATTEMPTS,
        }
    }
}

/// An opponent reply waiting to fire.
#[derive(Copy, Clone, Debug)]
struct PendingMove {
    due: Instant,
    generation: u64,
}

pub struct Session {
    game: Game,
    mode: Mode,
    opponent: Opponent,
    pending: Option<PendingMove>,
    generation: u64,
    delay: Duration,
}

impl Session {
    pub fn new(mode: Mode, config: SessionConfig) -> Self {
        let difficulty = match mode {
            Mode::Computer(d) => d,
            Mode::TwoPlayer => Difficulty::Easy,
        };
        let opponent = match config.seed {
            Some(seed) => Opponent::with_seed(difficulty, seed),
            None => Opponent::new(difficulty),
        }
        .with_attempts(config.attempts);
        Self {
            game: Game::new(),
            mode,
            opponent,
            pending: None,
            generation: 0,
            delay: config.delay,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the scheduled opponent reply becomes due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        if self.pending.take().is_some() {
            debug!(generation = self.generation, "pending opponent move cancelled");
        }
    }

    /// Start a new game in the current mode.
    pub fn reset(&mut self) {
        self.invalidate();
        self.game.reset();
    }

    /// Switch mode. Any reply scheduled under the old mode is dropped; if the
    /// computer is now to move, a fresh reply is scheduled.
    pub fn set_mode(&mut self, mode: Mode, now: Instant) {
        self.invalidate();
        self.mode = mode;
        if let Mode::Computer(d) = mode {
            self.opponent.difficulty = d;
        }
        info!(?mode, "mode changed");
        self.schedule(now);
    }

    fn computer_to_move(&self) -> bool {
        matches!(self.mode, Mode::Computer(_))
            && !self.game.is_over()
            && self.game.turn() == COMPUTER_COLOR
    }

    fn schedule(&mut self, now: Instant) {
        if self.computer_to_move() {
            self.pending = Some(PendingMove {
                due: now + self.delay,
                generation: self.generation,
            });
        }
    }

    /// Play a move on behalf of a human player.
    ///
    /// In computer mode the computer's color cannot be played by hand.
    pub fn play(&mut self, x: isize, y: isize, color: Color, now: Instant) -> MoveOutcome {
        if matches!(self.mode, Mode::Computer(_)) && color == COMPUTER_COLOR && !self.game.is_over()
        {
            return MoveOutcome::Rejected(Rejection::WrongTurn);
        }
        let outcome = self.game.attempt_move(x, y, color);
        if outcome.is_committed() {
            self.schedule(now);
        }
        outcome
    }

    /// Fire the scheduled opponent reply if it is due and still current.
    ///
    /// Returns the point tried and the engine's verdict, or `None` when
    /// nothing was played.
    pub fn poll(&mut self, now: Instant) -> Option<(Point, MoveOutcome)> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        if pending.generation != self.generation || !self.computer_to_move() {
            debug!(generation = pending.generation, "stale opponent move dropped");
            return None;
        }
        self.opponent_move()
    }

    /// Let the opponent choose and play a move for the side to move,
    /// regardless of mode. In computer mode a move generated for the human's
    /// side is answered like a hand-played one.
    pub fn generate(
        &mut self,
        color: Color,
        now: Instant,
    ) -> Result<Option<(Point, MoveOutcome)>, Rejection> {
        if self.game.is_over() {
            return Err(Rejection::GameOver);
        }
        if color != self.game.turn() {
            return Err(Rejection::WrongTurn);
        }
        self.invalidate();
        let played = self.opponent_move();
        self.schedule(now);
        Ok(played)
    }

    fn opponent_move(&mut self) -> Option<(Point, MoveOutcome)> {
        self.opponent.play_turn(&mut self.game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::constants::N;

    fn computer_session() -> Session {
        Session::new(
            Mode::Computer(Difficulty::Medium),
            SessionConfig {
                delay: Duration::from_millis(500),
                seed: Some(9),
                ..SessionConfig::default()
            },
        )
    }

    #[test]
    fn test_reply_is_deferred() {
        let mut s = computer_session();
        let t0 = Instant::now();
        assert!(s.play(3, 3, Color::Black, t0).is_committed());
        assert!(s.has_pending());
        assert_eq!(s.next_deadline(), Some(t0 + Duration::from_millis(500)));

        // Not due yet
        assert!(s.poll(t0 + Duration::from_millis(100)).is_none());
        assert_eq!(s.game().turn(), Color::White);

        let (pt, outcome) = s.poll(t0 + Duration::from_millis(500)).unwrap();
        assert!(outcome.is_committed());
        assert_eq!(s.game().board().get(pt), Some(Color::White));
        assert_eq!(s.game().turn(), Color::Black);
        assert!(!s.has_pending());
    }

    #[test]
    fn test_reset_cancels_pending_reply() {
        let mut s = computer_session();
        let t0 = Instant::now();
        s.play(3, 3, Color::Black, t0);
        s.reset();
        assert!(!s.has_pending());
        assert!(s.poll(t0 + Duration::from_secs(5)).is_none());
        assert_eq!(s.game().move_number(), 0);
        assert_eq!(s.game().turn(), Color::Black);
    }

    #[test]
    fn test_mode_change_cancels_pending_reply() {
        let mut s = computer_session();
        let t0 = Instant::now();
        s.play(3, 3, Color::Black, t0);
        s.set_mode(Mode::TwoPlayer, t0);
        assert!(s.poll(t0 + Duration::from_secs(5)).is_none());
        assert_eq!(s.game().turn(), Color::White);
        // Now a human may play White
        assert!(s.play(4, 4, Color::White, t0).is_committed());
    }

    #[test]
    fn test_switching_to_computer_on_whites_turn_schedules() {
        let mut s = Session::new(Mode::TwoPlayer, SessionConfig::default());
        let t0 = Instant::now();
        s.play(3, 3, Color::Black, t0);
        assert!(!s.has_pending());
        s.set_mode(Mode::Computer(Difficulty::Hard), t0);
        assert!(s.has_pending());
    }

    #[test]
    fn test_human_cannot_play_computer_color() {
        let mut s = computer_session();
        let t0 = Instant::now();
        s.play(3, 3, Color::Black, t0);
        assert_eq!(
            s.play(4, 4, Color::White, t0).rejection(),
            Some(Rejection::WrongTurn)
        );
        assert!(s.has_pending());
    }

    #[test]
    fn test_rejected_human_move_schedules_nothing() {
        let mut s = computer_session();
        let t0 = Instant::now();
        assert!(!s.play(-1, 3, Color::Black, t0).is_committed());
        assert!(!s.has_pending());
    }

    #[test]
    fn test_generate_checks_turn() {
        let mut s = Session::new(Mode::TwoPlayer, SessionConfig::default());
        let t0 = Instant::now();
        assert_eq!(
            s.generate(Color::White, t0).unwrap_err(),
            Rejection::WrongTurn
        );
        let (pt, outcome) = s.generate(Color::Black, t0).unwrap().unwrap();
        assert!(outcome.is_committed());
        assert_eq!(s.game().board().get(pt), Some(Color::Black));
        assert!(!s.has_pending());
    }

    #[test]
    fn test_generated_human_move_gets_a_reply() {
        let mut s = computer_session();
        let t0 = Instant::now();
        s.generate(Color::Black, t0).unwrap().unwrap();
        assert_eq!(s.game().turn(), Color::White);
        assert_eq!(s.next_deadline(), Some(t0 + Duration::from_millis(500)));

        let (_, outcome) = s.poll(t0 + Duration::from_millis(500)).unwrap();
        assert!(outcome.is_committed());
        assert_eq!(s.game().turn(), Color::Black);
    }

    /// White to move with only (0,0)-(2,0) playable; every other empty point
    /// is an isolated hole in a black wall.
    fn crowded_game() -> Game {
        let mut board = Board::new();
        for y in 0..N {
            for x in 0..N {
                let hole = (x % 2 == 0 && y % 2 == 0) || (x, y) == (1, 0);
                if !hole {
                    board.set((x, y), Some(Color::Black));
                }
            }
        }
        Game::with_board(board, Color::White)
    }

    #[test]
    fn test_refused_suggestions_do_not_stall_computer_mode() {
        let t0 = Instant::now();
        let config = SessionConfig {
            delay: Duration::ZERO,
            seed: Some(1),
            attempts: 0,
        };
        let mut s = Session::new(Mode::Computer(Difficulty::Easy), config);
        s.game = crowded_game();
        s.set_mode(Mode::Computer(Difficulty::Easy), t0);
        assert!(s.has_pending());

        let (pt, outcome) = s.poll(t0).unwrap();
        assert!(outcome.is_committed());
        assert!(pt.1 == 0 && pt.0 <= 2);
        assert_eq!(s.game().turn(), Color::Black);
        assert!(!s.has_pending());

        // The human can carry on
        let (x, y) = if pt == (0, 0) { (2, 0) } else { (0, 0) };
        assert!(s.play(x, y, Color::Black, t0).is_committed());
        assert!(s.has_pending());
    }
}
