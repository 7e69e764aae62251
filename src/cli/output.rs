//! Colored terminal output for the CLI.
//!
//! Progress and results go to stdout, errors to stderr. Color is
//! only used when the stream is a terminal.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes user-facing messages honoring `--verbose` and `--quiet`.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Whether quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn stdout() -> StandardStream {
        StandardStream::stdout(choice(io::stdout().is_terminal()))
    }

    fn stderr() -> StandardStream {
        StandardStream::stderr(choice(io::stderr().is_terminal()))
    }

    /// Dimmed detail line, verbose mode only
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        let mut out = Self::stdout();
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(out, "  {message}")?;
        out.reset()
    }

    /// Stage start message
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = Self::stdout();
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(out, "==>")?;
        out.reset()?;
        writeln!(out, " {message}")
    }

    /// Bold header line
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = Self::stdout();
        out.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(out, "{title}")?;
        out.reset()
    }

    /// Green success line
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = Self::stdout();
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        writeln!(out, "{message}")?;
        out.reset()
    }

    /// Indented plain line
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(Self::stdout(), "    {message}")
    }

    /// Red error on stderr, printed even in quiet mode
    pub fn error(&self, message: &str) -> io::Result<()> {
        let mut err = Self::stderr();
        err.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(err, "Error:")?;
        err.reset()?;
        writeln!(err, " {message}")
    }
}

fn choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
