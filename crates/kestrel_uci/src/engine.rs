//! Protocol state: the current position, the options and the searcher.
//! Search progress is not written here; it goes to the event channel the
//! engine was created with.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use kestrel_core::{parse_uci_move, perft_divide, Position, SearchLimits};
use kestrel_search::{SearchEvent, Searcher};

use crate::command::{Command, Go};
use crate::config::{EngineOptions, OptionChange};

pub const ENGINE_NAME: &str = concat!("Kestrel ", env!("CARGO_PKG_VERSION"));
pub const ENGINE_AUTHOR: &str = "the Kestrel developers";

pub struct Engine {
    pos: Position,
    options: EngineOptions,
    searcher: Searcher,
    events: Sender<SearchEvent>,
}

impl Engine {
    pub fn new(options: EngineOptions, events: Sender<SearchEvent>) -> Self {
        let searcher = Searcher::new(options.hash_mb, options.threads);
        Self {
            pos: Position::startpos(),
            options,
            searcher,
            events,
        }
    }

    /// Parse and run one input line. Returns false once the engine should
    /// exit. Bad input is logged and otherwise ignored.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        match Command::parse(line) {
            Ok(Some(cmd)) => self.execute(cmd, out),
            Ok(None) => {
                if !line.trim().is_empty() {
                    debug!(line, "ignoring unknown command");
                }
                Ok(true)
            }
            Err(err) => {
                warn!(line, "rejected input: {err:#}");
                Ok(true)
            }
        }
    }

    pub fn execute(&mut self, cmd: Command, out: &mut impl Write) -> io::Result<bool> {
        match cmd {
            Command::Uci => {
                writeln!(out, "id name {ENGINE_NAME}")?;
                writeln!(out, "id author {ENGINE_AUTHOR}")?;
                for option in self.options.describe() {
                    writeln!(out, "{option}")?;
                }
                writeln!(out, "uciok")?;
            }
            Command::IsReady => writeln!(out, "readyok")?,
            Command::UciNewGame => {
                self.searcher.clear();
                self.pos = Position::startpos();
            }
            Command::Position { fen, moves } => match set_position(fen.as_deref(), &moves) {
                Ok(pos) => self.pos = pos,
                Err(err) => warn!("rejected position: {err:#}"),
            },
            Command::Go(Go::Search(params)) => {
                let overhead = Duration::from_millis(self.options.move_overhead_ms);
                let mut limits =
                    SearchLimits::from_go(&params, self.pos.side_to_move(), overhead);
                limits.multi_pv = self.options.multi_pv;
                if let Err(err) = self.searcher.start(&self.pos, limits, self.events.clone()) {
                    warn!("could not start search threads: {err}");
                }
            }
            Command::Go(Go::Perft(depth)) => {
                self.searcher.halt();
                self.perft(depth, out)?;
            }
            Command::Stop => self.searcher.stop(),
            Command::SetOption { name, value } => self.set_option(&name, value.as_deref()),
            Command::Display => writeln!(out, "{}", self.pos)?,
            Command::Quit => {
                self.searcher.halt();
                return Ok(false);
            }
        }
        out.flush()?;
        Ok(true)
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) {
        let change = match self.options.set(name, value) {
            Ok(change) => change,
            Err(err) => {
                warn!("rejected setoption: {err:#}");
                return;
            }
        };

        debug!(?change, "option set");
        match change {
            OptionChange::Hash(mb) => self.searcher.resize_tt(mb),
            OptionChange::Threads(n) => self.searcher.set_threads(n),
            OptionChange::ClearHash => self.searcher.clear_hash(),
            // Read when the next search starts
            OptionChange::MultiPv(_) | OptionChange::MoveOverhead(_) => {}
        }
    }

    fn perft(&self, depth: u8, out: &mut impl Write) -> io::Result<()> {
        let start = Instant::now();
        let divide = perft_divide(&self.pos, depth);
        let total: u64 = divide.iter().map(|(_, n)| n).sum();

        for (mv, nodes) in &divide {
            writeln!(out, "{mv}: {nodes}")?;
        }
        writeln!(out)?;
        writeln!(out, "Nodes searched: {total}")?;
        debug!(depth, total, elapsed = ?start.elapsed(), "perft done");
        Ok(())
    }
}

/// Build the position of a `position` command, playing `moves` in order.
pub fn set_position(fen: Option<&str>, moves: &[String]) -> Result<Position> {
    let mut pos = match fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("bad FEN '{fen}'"))?,
        None => Position::startpos(),
    };

    for txt in moves {
        let mv = parse_uci_move(&pos, txt)?;
        pos.make_move(mv);
    }
    Ok(pos)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
