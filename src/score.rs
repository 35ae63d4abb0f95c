//! Scoring guesses against a secret.

use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Code, CODE_LEN};

/// The feedback for one guess.
///
/// `bulls` counts digits in the right place. `cows` counts digits that are in
/// the secret but somewhere else. The two never add up to more than
/// [`CODE_LEN`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Score {
    pub bulls: u8,
    pub cows: u8,
}

impl Score {
    /// Returns true if every digit is a bull.
    pub fn is_win(&self) -> bool {
        self.bulls as usize == CODE_LEN
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plural = |n: u8| if n == 1 { "" } else { "s" };
        write!(
            f,
            "{} bull{}, {} cow{}",
            self.bulls,
            plural(self.bulls),
            self.cows,
            plural(self.cows)
        )
    }
}

/// Scores `guess` against `secret`.
///
/// # Examples
///
/// ```rust
/// # use bulls_rs::{score, Code};
/// #
/// let secret: Code = "5678".parse()?;
///
/// let result = score(&secret, &"8765".parse()?);
/// assert_eq!((result.bulls, result.cows), (0, 4));
///
/// assert!(score(&secret, &secret).is_win());
/// #
/// # Ok::<_, bulls_rs::BullsError>(())
/// ```
pub fn score(secret: &Code, guess: &Code) -> Score {
    score_digits(&secret.digits(), &guess.digits())
}

/// Scores raw digit arrays, which may contain repeats.
///
/// Cows are the multiset intersection of the digits left over once bulls are
/// removed, so each secret digit is matched at most once. For codes with
/// distinct digits this is the number of guess digits found anywhere in the
/// secret minus the bulls.
pub fn score_digits(secret: &[u8; CODE_LEN], guess: &[u8; CODE_LEN]) -> Score {
    let mut bulls = 0;
    let mut secret_left = [0_u8; 10];
    let mut guess_left = [0_u8; 10];

    for (&s, &g) in secret.iter().zip(guess.iter()) {
        if s == g {
            bulls += 1;
        } else {
            secret_left[s as usize] += 1;
            guess_left[g as usize] += 1;
        }
    }

    let cows = secret_left
        .iter()
        .zip(guess_left.iter())
        .map(|(s, g)| s.min(g))
        .sum();

    Score { bulls, cows }
}
