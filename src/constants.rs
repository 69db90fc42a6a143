//! Board dimensions and game tunables.
//!
//! # Board Size Configuration
//!
//! The board size is controlled by Cargo features:
//! - `board19x19` (default): 19x19 board
//! - `board13x13`: 13x13 board
//! - `board9x9`: 9x9 board
//!
//! To compile for a specific board size:
//! ```sh
//! cargo build                                            # 19x19 (default)
//! cargo build --no-default-features --features board9x9  # 9x9
//! ```

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
#[cfg(feature = "board19x19")]
pub const N: usize = 19;

#[cfg(feature = "board13x13")]
pub const N: usize = 13;

#[cfg(feature = "board9x9")]
pub const N: usize = 9;

#[cfg(any(
    all(feature = "board19x19", feature = "board13x13"),
    all(feature = "board19x19", feature = "board9x9"),
    all(feature = "board13x13", feature = "board9x9"),
))]
compile_error!("Enable only one of 'board19x19', 'board13x13' or 'board9x9'");

#[cfg(not(any(feature = "board19x19", feature = "board13x13", feature = "board9x9")))]
compile_error!("Must enable exactly one board size feature: 'board19x19', 'board13x13' or 'board9x9'");

/// Number of intersections on the board.
pub const BOARD_AREA: usize = N * N;

/// Orthogonal neighbor offsets as (dx, dy). Order: West, East, North, South.
pub const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// =============================================================================
// Rules
// =============================================================================

/// Number of lost stones that ends the game in favor of the capturer.
pub const CAPTURE_LIMIT: u32 = 10;

// =============================================================================
// Automated Opponent
// =============================================================================

/// Delay between a committed human move and the opponent's reply.
pub const OPPONENT_DELAY_MS: u64 = 500;

/// Opponent suggestions tried before falling back to a random legal move.
pub const MAX_OPPONENT_ATTEMPTS: usize = 16;

// =============================================================================
// Text Rendering
// =============================================================================

/// Black stone.
pub const CHAR_BLACK: char = 'X';

/// White stone.
pub const CHAR_WHITE: char = 'O';

/// Empty point.
pub const CHAR_EMPTY: char = '.';
