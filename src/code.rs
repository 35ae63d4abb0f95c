//! Four digit codes and the rules for building them.

use std::{fmt::Display, ops::Deref, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{GuessError, CODE_LEN};

/// A code of four distinct decimal digits.
///
/// Both the hidden secret and every guess are codes. Construction is
/// validated, so every instance holds exactly [`CODE_LEN`] digits in `0..=9`
/// with no digit repeated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", try_from = "[u8; 4]", into = "[u8; 4]")
)]
pub struct Code {
    pub(crate) digits: [u8; CODE_LEN],
}

/// The hidden code of a round.
pub type Secret = Code;

/// A code the player submitted.
pub type Guess = Code;

impl Code {
    /// Creates a new [`Code`] from four numeric digits.
    ///
    /// Returns an error if any value is above nine or if a digit repeats.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bulls_rs::{Code, GuessError};
    /// #
    /// let code = Code::new([9, 0, 4, 1])?;
    /// assert_eq!(code.to_string(), "9041");
    ///
    /// assert_eq!(Code::new([1, 1, 2, 3]), Err(GuessError::DuplicateDigit(1)));
    /// #
    /// # Ok::<_, GuessError>(())
    /// ```
    pub fn new(digits: [u8; CODE_LEN]) -> Result<Self, GuessError> {
        if let Some(&d) = digits.iter().find(|&&d| d > 9) {
            return Err(GuessError::DigitOutOfRange(d));
        }
        check_unique(&digits)?;

        Ok(Code { digits })
    }

    /// Returns the digits in order, leftmost first.
    pub fn digits(&self) -> [u8; CODE_LEN] {
        self.digits
    }

    /// Returns true if `digit` appears anywhere in the code.
    pub fn contains(&self, digit: u8) -> bool {
        self.digits.contains(&digit)
    }
}

/// Validates a raw guess and parses it into a [`Code`].
///
/// The checks run in a fixed order, so the first problem found is the one
/// reported:
///
/// 1. the input must be exactly four characters,
/// 2. every character must be an ASCII digit,
/// 3. no digit may repeat.
///
/// The input is not trimmed; strip line endings before calling this.
///
/// # Examples
///
/// ```rust
/// # use bulls_rs::{validate, GuessError};
/// #
/// assert_eq!(validate("1234")?.digits(), [1, 2, 3, 4]);
///
/// assert_eq!(validate("123"), Err(GuessError::InvalidLength(3)));
/// assert_eq!(validate("12a4"), Err(GuessError::InvalidDigit('a')));
/// assert_eq!(validate("1123"), Err(GuessError::DuplicateDigit(1)));
/// #
/// # Ok::<_, GuessError>(())
/// ```
pub fn validate(raw: &str) -> Result<Code, GuessError> {
    let len = raw.chars().count();
    if len != CODE_LEN {
        return Err(GuessError::InvalidLength(len));
    }

    let mut digits = [0_u8; CODE_LEN];
    for (slot, c) in digits.iter_mut().zip(raw.chars()) {
        *slot = c.to_digit(10).ok_or(GuessError::InvalidDigit(c))? as u8;
    }
    check_unique(&digits)?;

    Ok(Code { digits })
}

fn check_unique(digits: &[u8; CODE_LEN]) -> Result<(), GuessError> {
    let mut seen = [false; 10];
    for &d in digits {
        if std::mem::replace(&mut seen[d as usize], true) {
            return Err(GuessError::DuplicateDigit(d));
        }
    }
    Ok(())
}

impl FromStr for Code {
    type Err = GuessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

impl TryFrom<[u8; CODE_LEN]> for Code {
    type Error = GuessError;

    fn try_from(digits: [u8; CODE_LEN]) -> Result<Self, Self::Error> {
        Code::new(digits)
    }
}

impl From<Code> for [u8; CODE_LEN] {
    fn from(code: Code) -> Self {
        code.digits
    }
}

impl Deref for Code {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.digits
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for d in self.digits {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}
