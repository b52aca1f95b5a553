use anyhow::Result;
use console::Term;
use std::io::{self, IsTerminal};

/// Waits for a key press so a console window opened for the run stays visible.
///
/// Does nothing unless both stdin and stderr are attached to a terminal.
pub fn pause_before_exit() -> Result<()> {
  let term = Term::stderr();
  if !io::stdin().is_terminal() || !term.is_term() {
    return Ok(());
  }

  term.write_str("Press any key to exit...")?;
  term.read_key()?;
  term.write_line("")?;
  Ok(())
}
