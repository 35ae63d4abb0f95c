#![doc = include_str!("../README.md")]

// Required to rename serde
#[cfg(feature = "serde")]
extern crate serde_crate as serde;

use thiserror::Error;

pub mod code;
pub use code::{validate, Code, Guess, Secret};

pub mod score;
pub use score::{score, Score};

pub mod generate;
pub use generate::{generate, generate_with, Difficulty, UnknownDifficulty};

pub mod session;
pub use session::{Game, Hint, Session, State, Turn};

pub mod command;
pub use command::Command;

pub mod record;
pub use record::{Outcome, Record};

pub mod console;
pub use console::Console;

/// The number of digits in every code.
pub const CODE_LEN: usize = 4;

/// The attempt budget a [`Game`] uses unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

pub type Result<T> = std::result::Result<T, BullsError>;

/// The errors that `bulls_rs` can produce.
#[derive(Debug, Error)]
pub enum BullsError {
    #[error("guess was rejected")]
    Guess {
        #[from]
        kind: GuessError,
    },

    #[error("the session refused the request")]
    Session {
        #[from]
        kind: SessionError,
    },

    #[error("general IO error")]
    Io(#[from] std::io::Error),
}

/// Reasons a raw guess is not a well-formed code.
///
/// Every variant is recoverable: the player is told what was wrong and asked
/// again without losing an attempt.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuessError {
    /// The input was not exactly four characters long.
    #[error("a guess must be exactly 4 digits long, but that was {0} characters")]
    InvalidLength(usize),

    /// The input contained a character that is not a decimal digit.
    #[error("'{0}' is not a digit, use only 0-9")]
    InvalidDigit(char),

    /// A numeric digit outside of 0-9 was handed to [`Code::new()`].
    #[error("{0} is not a single decimal digit")]
    DigitOutOfRange(u8),

    /// The same digit appeared more than once.
    #[error("the digit {0} appears more than once, every digit must be different")]
    DuplicateDigit(u8),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionError {
    /// The round is over, so no more guesses are scored.
    #[error("the round is already over ({0})")]
    Finished(State),
}
