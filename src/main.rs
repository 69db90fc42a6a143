//! goban-rust: a Go rules engine with capture-count victory.
//!
//! ## Usage
//!
//! - `goban-rust` - Computer-vs-computer demo game
//! - `goban-rust gtp` - Start a GTP session on stdin/stdout
//! - `goban-rust gtp --opponent hard` - Play Black against the computer

use std::io;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use goban_rust::board::{Color, vertex_name};
use goban_rust::constants::OPPONENT_DELAY_MS;
use goban_rust::game::{Game, MoveOutcome};
use goban_rust::gtp::GtpEngine;
use goban_rust::opponent::{Difficulty, Opponent};
use goban_rust::session::{Mode, SessionConfig};

/// goban-rust: Go with capture-count victory
#[derive(Parser)]
#[command(name = "goban-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info", global = true)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) front end
    Gtp {
        /// Play Black against the computer at this difficulty
        #[arg(long)]
        opponent: Option<Difficulty>,

        /// RNG seed for the computer
        #[arg(long)]
        seed: Option<u64>,

        /// Milliseconds between a human move and the computer's reply
        #[arg(long, default_value_t = OPPONENT_DELAY_MS)]
        delay_ms: u64,
    },
    /// Let two computer players play each other
    Demo {
        /// Difficulty of the Black player
        #[arg(long, default_value = "hard")]
        black: Difficulty,

        /// Difficulty of the White player
        #[arg(long, default_value = "easy")]
        white: Difficulty,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many moves if nobody has won
        #[arg(long, default_value_t = 400)]
        max_moves: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    initialize_logging(cli.log_level);

    match cli.command {
        Some(Commands::Gtp {
            opponent,
            seed,
            delay_ms,
        }) => {
            let mode = opponent.map_or(Mode::TwoPlayer, Mode::Computer);
            let config = SessionConfig {
                delay: Duration::from_millis(delay_ms),
                seed,
                ..SessionConfig::default()
            };
            let mut engine = GtpEngine::new(mode, config);
            engine.run(io::stdin().lock(), &mut io::stdout())
        }
        Some(Commands::Demo {
            black,
            white,
            seed,
            max_moves,
        }) => {
            run_demo(black, white, seed, max_moves);
            Ok(())
        }
        None => {
            run_demo(Difficulty::Hard, Difficulty::Easy, None, 400);
            Ok(())
        }
    }
}

// Logs go to stderr so stdout stays clean for GTP.
fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

fn run_demo(black: Difficulty, white: Difficulty, seed: Option<u64>, max_moves: usize) {
    let seed = seed.unwrap_or_else(|| fastrand::u64(..));
    info!(seed, %black, %white, "starting demo game");

    let mut black_player = Opponent::with_seed(black, seed);
    let mut white_player = Opponent::with_seed(white, seed.wrapping_add(1));
    let mut game = Game::new();

    while !game.is_over() && game.move_number() < max_moves {
        let color = game.turn();
        let player = match color {
            Color::Black => &mut black_player,
            Color::White => &mut white_player,
        };
        let Some((pt, MoveOutcome::Committed(c))) = player.play_turn(&mut game) else {
            info!(%color, "no move available");
            break;
        };
        if !c.captured.is_empty() {
            info!(
                move_number = game.move_number(),
                %color,
                vertex = %vertex_name(pt),
                captures = c.captured.len(),
                "capture"
            );
        }
    }

    println!("{}", game.board());
    println!(
        "Moves: {}  Black lost: {}  White lost: {}",
        game.move_number(),
        game.captured(Color::Black),
        game.captured(Color::White)
    );
    match game.winner() {
        Some(winner) => println!("Winner: {winner}"),
        None => println!("No winner"),
    }
}
