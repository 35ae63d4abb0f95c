//! Generating secrets.

use std::{fmt::Display, str::FromStr};

use log::debug;
use rand::{seq::SliceRandom, Rng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Code, CODE_LEN};

/// How constrained the secret is.
///
/// The difficulty only changes which codes can be chosen as the secret.
/// Guesses are never restricted by it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum Difficulty {
    /// Any four distinct digits, including a leading zero.
    #[default]
    Easy,

    /// The first digit is never zero.
    Medium,

    /// Zero never appears.
    Hard,
}

impl Difficulty {
    /// Every difficulty, in menu order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Returns true if `digit` may sit at `position` in a secret.
    pub fn allows(&self, position: usize, digit: u8) -> bool {
        match self {
            Difficulty::Easy => true,
            Difficulty::Medium => position != 0 || digit != 0,
            Difficulty::Hard => digit != 0,
        }
    }

    /// Returns true if every digit of `code` is allowed where it sits.
    pub fn admits(&self, code: &Code) -> bool {
        code.iter().enumerate().all(|(i, &d)| self.allows(i, d))
    }

    /// The number used to pick this difficulty from the menu.
    pub fn menu_key(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    /// A short description of the rule.
    pub fn describe(&self) -> &'static str {
        match self {
            Difficulty::Easy => "any digits, a leading zero is allowed",
            Difficulty::Medium => "the first digit is never zero",
            Difficulty::Hard => "zero never appears",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty \"{0}\", choose 1, 2 or 3")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "easy" => Ok(Difficulty::Easy),
            "2" | "medium" => Ok(Difficulty::Medium),
            "3" | "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

/// Generates a secret with the thread-local random number generator.
pub fn generate(difficulty: Difficulty) -> Code {
    generate_with(&mut rand::thread_rng(), difficulty)
}

/// Generates a secret that satisfies `difficulty` using `rng`.
///
/// Each position, left to right, draws uniformly from the digits that are
/// still unused and allowed there, so this always finishes in four draws.
///
/// # Examples
///
/// ```rust
/// # use bulls_rs::{generate_with, Difficulty};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let secret = generate_with(&mut rng, Difficulty::Hard);
/// assert!(!secret.contains(0));
/// ```
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> Code {
    let mut digits = [0_u8; CODE_LEN];
    let mut used = [false; 10];

    for (position, slot) in digits.iter_mut().enumerate() {
        let legal: Vec<u8> = (0..=9)
            .filter(|&d| !used[d as usize] && difficulty.allows(position, d))
            .collect();
        // At least six digits stay legal at every position, even on hard.
        let &digit = legal
            .choose(rng)
            .unwrap_or_else(|| unreachable!("no legal digit for position {}", position));
        used[digit as usize] = true;
        *slot = digit;
    }

    debug!("generated a {} secret", difficulty);
    Code { digits }
}
