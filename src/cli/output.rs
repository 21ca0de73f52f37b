//! Colored terminal output for user-facing messages.
//!
//! Success and progress go to stdout, errors to stderr. Colors are only used
//! when the stream is a terminal.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Which standard stream a message goes to.
#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes prefixed, optionally colored status lines.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates a new output manager.
    ///
    /// `quiet` suppresses everything except errors; `verbose` enables
    /// [`OutputManager::verbose`] lines.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Detail line, shown only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose && !self.quiet {
            self.write(Stream::Stdout, None, "", message)
        } else {
            Ok(())
        }
    }

    /// Green check mark line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write(Stream::Stdout, Some(Color::Green), "✓ ", message)
    }

    /// Red error line on stderr. Never suppressed.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write(Stream::Stderr, Some(Color::Red), "✗ ", message)
    }

    /// Cyan step line.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write(Stream::Stdout, Some(Color::Cyan), "→ ", message)
    }

    /// Indented plain line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write(Stream::Stdout, None, "  ", message)
    }

    fn write(&self, stream: Stream, color: Option<Color>, prefix: &str, message: &str) -> io::Result<()> {
        let (mut out, is_terminal) = match stream {
            Stream::Stdout => (
                StandardStream::stdout(ColorChoice::Auto),
                io::stdout().is_terminal(),
            ),
            Stream::Stderr => (
                StandardStream::stderr(ColorChoice::Auto),
                io::stderr().is_terminal(),
            ),
        };

        if let Some(color) = color.filter(|_| is_terminal) {
            out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
            write!(out, "{prefix}")?;
            out.reset()?;
        } else {
            write!(out, "{prefix}")?;
        }
        writeln!(out, "{message}")?;
        out.flush()
    }
}
