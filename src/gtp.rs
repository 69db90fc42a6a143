//! Go Text Protocol (GTP) front end.
//!
//! Drives a [`Session`] from a line-oriented command stream so the engine
//! can be used from a terminal or a graphical Go client.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Only the compiled board size is accepted
//! - `clear_board` - Reset the game
//! - `play <color> <vertex>` - Play a move
//! - `genmove <color>` - Let the opponent choose and play a move
//! - `showboard` - Print the board
//!
//! Extensions:
//!
//! - `captures` - Black stones lost, then white stones lost
//! - `winner` - `black`, `white` or `none`
//! - `mode human` / `mode computer [easy|medium|hard]`
//!
//! In computer mode the reply to a human move is played after the session's
//! delay, once the response to `play` has been written.
//!
//! ## Example
//!
//! ```ignore
//! use goban_rust::gtp::GtpEngine;
//! use goban_rust::session::{Mode, SessionConfig};
//! let mut engine = GtpEngine::new(Mode::TwoPlayer, SessionConfig::default());
//! engine.run(std::io::stdin().lock(), &mut std::io::stdout())?;
//! ```

use std::io::{BufRead, Write};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use tracing::info;

use crate::board::{Color, parse_vertex, vertex_name};
use crate::constants::N;
use crate::game::MoveOutcome;
use crate::opponent::Difficulty;
use crate::session::{Mode, Session, SessionConfig};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "captures",
    "clear_board",
    "genmove",
    "known_command",
    "list_commands",
    "mode",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
    "winner",
];

/// GTP engine state.
pub struct GtpEngine {
    session: Session,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new(Mode::TwoPlayer, SessionConfig::default())
    }
}

impl GtpEngine {
    pub fn new(mode: Mode, config: SessionConfig) -> Self {
        Self {
            session: Session::new(mode, config),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            let (success, message) = self.execute(&command, args);

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
            self.drain_pending();
        }
        Ok(())
    }

    /// Wait for and play any scheduled opponent reply.
    fn drain_pending(&mut self) {
        while let Some(due) = self.session.next_deadline() {
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
            if let Some((pt, outcome)) = self.session.poll(Instant::now()) {
                match outcome {
                    MoveOutcome::Committed(c) => info!(
                        vertex = %vertex_name(pt),
                        captures = c.captured.len(),
                        "opponent played"
                    ),
                    MoveOutcome::Rejected(r) => info!(
                        vertex = %vertex_name(pt),
                        reason = %r,
                        "opponent move rejected"
                    ),
                }
            }
        }
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<usize>() {
                    Ok(size) if size == N => (true, String::new()),
                    Ok(size) => (
                        false,
                        format!("unacceptable size, only {N} is supported (got {size})"),
                    ),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.session.reset();
                (true, String::new())
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let color = match args[0].parse::<Color>() {
                    Ok(c) => c,
                    Err(e) => return (false, e.to_string()),
                };
                let Some((x, y)) = parse_vertex(args[1]) else {
                    return (false, format!("invalid vertex: {}", args[1]));
                };
                match self
                    .session
                    .play(x as isize, y as isize, color, Instant::now())
                {
                    MoveOutcome::Committed(_) => (true, String::new()),
                    MoveOutcome::Rejected(r) => (false, r.to_string()),
                }
            }

            "genmove" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let color = match args[0].parse::<Color>() {
                    Ok(c) => c,
                    Err(e) => return (false, e.to_string()),
                };
                match self.session.generate(color, Instant::now()) {
                    Ok(Some((pt, MoveOutcome::Committed(_)))) => (true, vertex_name(pt)),
                    Ok(_) => (true, "resign".to_string()),
                    Err(r) => (false, r.to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.session.game().board())),

            "captures" => {
                let game = self.session.game();
                (
                    true,
                    format!(
                        "{} {}",
                        game.captured(Color::Black),
                        game.captured(Color::White)
                    ),
                )
            }

            "winner" => {
                let winner = self.session.game().winner();
                (
                    true,
                    winner.map_or_else(|| "none".to_string(), |c| c.to_string()),
                )
            }

            "mode" => match args {
                ["human"] => {
                    self.session.set_mode(Mode::TwoPlayer, Instant::now());
                    (true, String::new())
                }
                ["computer"] => {
                    self.session
                        .set_mode(Mode::Computer(Difficulty::Easy), Instant::now());
                    (true, String::new())
                }
                ["computer", level] => match level.parse::<Difficulty>() {
                    Ok(d) => {
                        self.session.set_mode(Mode::Computer(d), Instant::now());
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                },
                _ => (false, "usage: mode human|computer [easy|medium|hard]".to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
