//! Keeping score across rounds.

use std::{fmt::Display, io::Write};

use comfy_table::{presets, Cell, CellAlignment, Row, Table};

use crate::{Difficulty, Result, Session, State};

/// How one finished round went.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Outcome {
    pub difficulty: Difficulty,
    pub won: bool,
    pub attempts: usize,
    pub max_attempts: usize,
}

impl Outcome {
    /// Summarizes a session. Returns `None` while the round is still running.
    pub fn from_session(session: &Session) -> Option<Self> {
        session.state().is_over().then(|| Outcome {
            difficulty: session.difficulty(),
            won: session.state() == State::Won,
            attempts: session.attempts(),
            max_attempts: session.max_attempts(),
        })
    }
}

/// Every finished round of one process, in the order they were played.
///
/// A round abandoned with `quit` is never recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Record {
    rounds: Vec<Outcome>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a finished session. Unfinished sessions are ignored and `false`
    /// is returned.
    pub fn push(&mut self, session: &Session) -> bool {
        match Outcome::from_session(session) {
            Some(outcome) => {
                self.rounds.push(outcome);
                true
            }
            None => false,
        }
    }

    pub fn rounds(&self) -> &[Outcome] {
        &self.rounds
    }

    /// Gets the number of rounds played to the end.
    pub fn num_played(&self) -> u32 {
        self.rounds.len() as u32
    }

    /// Gets the number of rounds won.
    pub fn num_won(&self) -> u32 {
        self.rounds.iter().filter(|o| o.won).count() as u32
    }

    /// Gets the number of rounds that ran out of attempts.
    ///
    /// This function always returns a number less than or equal to
    /// [`num_played()`](Self::num_played()).
    pub fn num_lost(&self) -> u32 {
        self.num_played() - self.num_won()
    }

    /// Gets the fraction of rounds won, or zero before any round is played.
    pub fn frac_won(&self) -> f32 {
        if self.rounds.is_empty() {
            0.
        } else {
            (self.num_won() as f32) / (self.num_played() as f32)
        }
    }

    /// Gets the average number of guesses needed to win.
    ///
    /// Lost rounds are not included. Returns `None` if nothing was won.
    pub fn mean_attempts(&self) -> Option<f32> {
        let won = self.num_won();
        if won == 0 {
            return None;
        }
        let total: usize = self
            .rounds
            .iter()
            .filter(|o| o.won)
            .map(|o| o.attempts)
            .sum();
        Some(total as f32 / won as f32)
    }

    /// Counts wins by the number of guesses they took. Index `i` holds the
    /// wins that took `i + 1` guesses.
    pub fn histogram(&self) -> Vec<u32> {
        let longest = self.rounds.iter().map(|o| o.max_attempts).max().unwrap_or(0);
        let mut bins = vec![0; longest];

        self.rounds
            .iter()
            .filter(|o| o.won)
            .for_each(|o| bins[o.attempts - 1] += 1);

        debug_assert_eq!(bins.iter().sum::<u32>(), self.num_won());
        bins
    }

    /// Builds a table of the guess histogram, one row per attempt count.
    pub fn table(&self) -> Table {
        let bins = self.histogram();
        let widest = bins.iter().copied().max().unwrap_or(0).max(1);

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_header(vec!["guesses", "wins", ""]);
        for (i, &n) in bins.iter().enumerate() {
            let bar = "#".repeat((n * 20 / widest) as usize);
            let mut row = Row::new();
            row.add_cell(Cell::new(i + 1).set_alignment(CellAlignment::Right))
                .add_cell(Cell::new(n).set_alignment(CellAlignment::Right))
                .add_cell(Cell::new(bar));
            table.add_row(row);
        }
        table
    }

    /// Writes the summary line followed by the histogram table.
    pub fn print(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "{}", self)?;
        if self.num_won() > 0 {
            writeln!(out, "{}", self.table())?;
        }
        Ok(())
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Played {}, won {}, lost {} ({:.0}% won)",
            self.num_played(),
            self.num_won(),
            self.num_lost(),
            self.frac_won() * 100.
        )?;
        if let Some(mean) = self.mean_attempts() {
            write!(f, ", {:.2} guesses per win", mean)?;
        }
        Ok(())
    }
}
