//! The interactive editing shell behind `--interactive`.
//!
//! A line-based loop over one [`Session`]: `open`, `save`, `undo`, `redo`,
//! `histogram`, `help`, `quit`, plus every catalog command by name. Reader
//! and writer are injected so tests can drive the loop with plain buffers.

use crate::command::{self, ParseError};
use crate::output;
use crate::pipeline::StepStatus;
use crate::session::Session;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const PROMPT: &str = "retouch> ";

/// Run the shell until `quit` or end of input. Editing errors are reported
/// and the loop continues; only I/O failures on the streams themselves abort.
pub fn run<R: BufRead, W: Write>(mut input: R, out: &mut W) -> io::Result<()> {
    let mut session = Session::new();
    writeln!(out, "retouch interactive shell. Type 'help' for commands.")?;

    let mut line = String::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // The first token names the command; open and save treat the rest of
        // the line as a single path (no quoting needed for spaces), everything
        // else tokenizes it.
        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name {
            "quit" | "exit" => break,
            "help" => print_help(out)?,
            "open" => {
                if rest.is_empty() {
                    writeln!(out, "open: expected open PATH")?;
                } else {
                    match session.open(Path::new(rest)) {
                        Ok(()) => writeln!(out, "opened {rest}")?,
                        Err(err) => writeln!(out, "error: {err}")?,
                    }
                }
            }
            "save" => {
                let target = (!rest.is_empty()).then(|| PathBuf::from(rest));
                match session.save(target.as_deref(), None) {
                    Ok(written) => writeln!(out, "saved {}", written.display())?,
                    Err(err) => writeln!(out, "error: {err}")?,
                }
            }
            "undo" => match session.undo() {
                Ok(true) => writeln!(out, "undone ({} left)", session.undo_depth())?,
                Ok(false) => writeln!(out, "nothing to undo")?,
                Err(err) => writeln!(out, "error: {err}")?,
            },
            "redo" => match session.redo() {
                Ok(true) => writeln!(out, "redone")?,
                Ok(false) => writeln!(out, "nothing to redo")?,
                Err(err) => writeln!(out, "error: {err}")?,
            },
            "histogram" => match session.histogram() {
                Ok(hist) => writeln!(out, "{}", output::format_histogram(&hist))?,
                Err(err) => writeln!(out, "error: {err}")?,
            },
            _ => {
                let args: Vec<&str> = rest.split_whitespace().collect();
                dispatch_edit(&mut session, name, &args, out)?;
            }
        }
    }
    Ok(())
}

fn dispatch_edit<W: Write>(
    session: &mut Session,
    name: &str,
    args: &[&str],
    out: &mut W,
) -> io::Result<()> {
    let Some(spec) = command::find(name) else {
        writeln!(out, "unknown command '{name}' (try 'help')")?;
        return Ok(());
    };
    let cmd = match (spec.parse)(args) {
        Ok(cmd) => cmd,
        Err(ParseError::WrongArity { usage, .. }) => {
            writeln!(out, "{name}: expected {usage}")?;
            return Ok(());
        }
        Err(err) => {
            writeln!(out, "error: {err}")?;
            return Ok(());
        }
    };
    match session.apply(&cmd) {
        Ok(StepStatus::Applied) => writeln!(out, "applied {name}")?,
        Ok(StepStatus::Skipped(reason)) => writeln!(out, "skipped {name}: {reason}")?,
        Err(err) => writeln!(out, "error: {err}")?,
    }
    Ok(())
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "session commands:")?;
    writeln!(out, "  open PATH")?;
    writeln!(out, "  save [PATH]")?;
    writeln!(out, "  undo")?;
    writeln!(out, "  redo")?;
    writeln!(out, "  histogram")?;
    writeln!(out, "  quit")?;
    writeln!(out, "editing commands:")?;
    for spec in command::catalog() {
        writeln!(out, "  {}", spec.usage)?;
    }
    Ok(())
}
