//! Terminal rendering of command progress.

use std::io::Write;

use seedbed_engine::Reporter;
use tracing::warn;

const SEPARATOR_WIDTH: usize = 80;

/// Writes messages one per line and statements indented by a tab.
pub struct TerminalReporter<W: Write> {
    out: W,
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            warn!(error = %err, "failed to write output");
        }
    }
}

impl<W: Write> Reporter for TerminalReporter<W> {
    fn separator(&mut self) {
        self.line(&"-".repeat(SEPARATOR_WIDTH));
    }

    fn message(&mut self, message: &str) {
        self.line(message);
    }

    fn statement(&mut self, statement: &str) {
        for line in statement.lines() {
            self.line(&format!("\t{line}"));
        }
    }
}
