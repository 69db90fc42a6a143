//! goban-rust: a Go rules engine with capture-count victory.
//!
//! Two players alternate placing stones; groups without liberties are
//! captured, suicide and immediate Ko recaptures are refused, and the first
//! side to capture ten stones wins.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and game tunables
//! - [`board`] - Grid, groups and liberties
//! - [`game`] - Move validation, captures, Ko and victory
//! - [`opponent`] - Computer move selection by difficulty
//! - [`session`] - Turn sequencing and the deferred computer reply
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use goban_rust::board::Color;
//! use goban_rust::game::{Game, MoveOutcome, Rejection};
//!
//! let mut game = Game::new();
//! assert!(game.attempt_move(3, 3, Color::Black).is_committed());
//!
//! // Same point again is refused and nothing changes
//! let outcome = game.attempt_move(3, 3, Color::White);
//! assert_eq!(outcome, MoveOutcome::Rejected(Rejection::Occupied));
//! assert_eq!(game.turn(), Color::White);
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod gtp;
pub mod opponent;
pub mod session;
