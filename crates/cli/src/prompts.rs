use anyhow::{Result, bail};
use std::io::{self, IsTerminal, Write};

/// Whether prompts can be shown.
pub fn is_interactive() -> bool {
  io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Ask for a value, returning `default` on an empty answer.
///
/// With `required`, an empty answer and an empty default re-prompts.
pub fn input(message: &str, default: &str, required: bool) -> Result<String> {
  if !is_interactive() {
    bail!("Cannot prompt for '{}' in non-interactive mode. Use --non-interactive.", message);
  }

  loop {
    if default.is_empty() {
      write!(io::stderr(), "{}: ", message)?;
    } else {
      write!(io::stderr(), "{} [{}]: ", message, default)?;
    }
    io::stderr().flush()?;

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer)? == 0 {
      bail!("Input closed while prompting for '{}'", message);
    }

    let answer = answer.trim();
    let value = if answer.is_empty() { default } else { answer };
    if !value.is_empty() || !required {
      return Ok(value.to_string());
    }
    writeln!(io::stderr(), "A value is required.")?;
  }
}
