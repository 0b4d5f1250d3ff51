//! Parsing of protocol lines sent by the GUI.

use anyhow::{bail, Context, Result};

use kestrel_core::GoParams;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Uci,
    IsReady,
    UciNewGame,
    /// `fen` is `None` for `startpos`. Moves are kept as text; they can only
    /// be checked against the position they are played in.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go(Go),
    Stop,
    SetOption {
        name: String,
        value: Option<String>,
    },
    /// Print the current board.
    Display,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Go {
    Search(GoParams),
    Perft(u8),
}

impl Command {
    /// Parse one input line. Blank lines and unknown commands give `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = tokens.collect();

        let cmd = match name {
            "uci" => Command::Uci,
            "isready" => Command::IsReady,
            "ucinewgame" => Command::UciNewGame,
            "position" => parse_position(&rest)?,
            "go" => Command::Go(parse_go(&rest)?),
            "stop" => Command::Stop,
            "setoption" => parse_setoption(&rest)?,
            "d" => Command::Display,
            "quit" => Command::Quit,
            _ => return Ok(None),
        };
        Ok(Some(cmd))
    }
}

fn parse_position(tokens: &[&str]) -> Result<Command> {
    let moves_at = tokens.iter().position(|&t| t == "moves");
    let (setup, moves) = match moves_at {
        Some(i) => (&tokens[..i], &tokens[i + 1..]),
        None => (tokens, &[][..]),
    };

    let fen = match setup {
        ["startpos"] => None,
        ["fen", fields @ ..] if !fields.is_empty() => Some(fields.join(" ")),
        _ => bail!("expected 'startpos' or 'fen <fen>'"),
    };

    Ok(Command::Position {
        fen,
        moves: moves.iter().map(|m| m.to_string()).collect(),
    })
}

fn parse_go(tokens: &[&str]) -> Result<Go> {
    let mut params = GoParams::default();
    let mut iter = tokens.iter();

    while let Some(&key) = iter.next() {
        match key {
            "infinite" => params.infinite = true,
            "ponder" => {}
            "perft" => return Ok(Go::Perft(number(key, iter.next())?)),
            "wtime" => params.wtime = Some(number(key, iter.next())?),
            "btime" => params.btime = Some(number(key, iter.next())?),
            "winc" => params.winc = Some(number(key, iter.next())?),
            "binc" => params.binc = Some(number(key, iter.next())?),
            "movestogo" => params.movestogo = Some(number(key, iter.next())?),
            "movetime" => params.movetime = Some(number(key, iter.next())?),
            "depth" => params.depth = Some(number(key, iter.next())?),
            "nodes" => params.nodes = Some(number(key, iter.next())?),
            _ => bail!("unknown go parameter '{key}'"),
        }
    }

    Ok(Go::Search(params))
}

/// `setoption name <name...> [value <value...>]`. Names may contain spaces.
fn parse_setoption(tokens: &[&str]) -> Result<Command> {
    let ["name", rest @ ..] = tokens else {
        bail!("expected 'name' after setoption");
    };

    let value_at = rest.iter().position(|&t| t == "value");
    let (name, value) = match value_at {
        Some(i) => (&rest[..i], Some(rest[i + 1..].join(" "))),
        None => (rest, None),
    };
    if name.is_empty() {
        bail!("empty option name");
    }

    Ok(Command::SetOption {
        name: name.join(" "),
        value,
    })
}

fn number<T: std::str::FromStr>(key: &str, token: Option<&&str>) -> Result<T> {
    let token = token.with_context(|| format!("missing value for '{key}'"))?;
    token
        .parse()
        .ok()
        .with_context(|| format!("invalid value '{token}' for '{key}'"))
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod command_tests;
