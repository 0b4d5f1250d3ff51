use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use kestrel_search::SearchEvent;

mod command;
mod config;
mod engine;

use config::EngineOptions;
use engine::Engine;

fn main() -> Result<()> {
    // stdout belongs to the protocol, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    kestrel_core::init();
    let options = EngineOptions::load()?;
    debug!(?options, "starting");

    // Search threads report through the channel; one printer keeps their
    // lines whole
    let (tx, rx) = mpsc::channel::<SearchEvent>();
    let printer = thread::spawn(move || {
        let stdout = io::stdout();
        for event in rx {
            let mut out = stdout.lock();
            writeln!(out, "{event}").ok();
            out.flush().ok();
        }
    });

    let mut engine = Engine::new(options, tx);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if !engine.handle_line(&line, &mut stdout)? {
            break;
        }
    }

    // Dropping the engine joins the search threads and closes the channel
    drop(engine);
    printer.join().ok();
    Ok(())
}
