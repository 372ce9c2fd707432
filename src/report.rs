//! Per-record progress output

use crate::error::RecordError;
use crate::resource::Resource;
use console::style;
use std::io::{self, Write};

/// What happened to a record that was written successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl Summary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

pub struct Reporter<W: Write> {
    out: W,
    styled: bool,
    summary: Summary,
}

impl Reporter<io::Stdout> {
    /// Report to stdout, with colors when stdout is a terminal.
    pub fn stdout() -> Self {
        let styled = console::Term::stdout().features().colors_supported();
        Self { out: io::stdout(), styled, summary: Summary::default() }
    }
}

impl<W: Write> Reporter<W> {
    /// Plain, uncolored output.
    pub fn new(out: W) -> Self {
        Self { out, styled: false, summary: Summary::default() }
    }

    pub fn record(&mut self, resource: Resource, label: &str, outcome: Outcome) -> io::Result<()> {
        let word = match outcome {
            Outcome::Created => {
                self.summary.created += 1;
                style("created").green()
            }
            Outcome::Updated => {
                self.summary.updated += 1;
                style("updated").cyan()
            }
        };
        writeln!(self.out, "{} {} {}", word.force_styling(self.styled), resource, label)
    }

    pub fn failure(&mut self, resource: Resource, label: &str, error: &RecordError) -> io::Result<()> {
        self.summary.failed += 1;
        let word = style("failed").red().force_styling(self.styled);
        writeln!(self.out, "{} {} {}: {}", word, resource, label, error)
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        self.summary.warnings += 1;
        let word = style("warning:").yellow().force_styling(self.styled);
        writeln!(self.out, "{} {}", word, message)
    }

    /// Print the totals line and return them.
    pub fn finish(&mut self) -> io::Result<Summary> {
        let s = self.summary;
        writeln!(
            self.out,
            "summary: {} created, {} updated, {} failed, {} warnings",
            s.created, s.updated, s.failed, s.warnings
        )?;
        self.out.flush()?;
        Ok(s)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
