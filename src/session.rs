//! Rounds of the game and the rules that drive them.

use std::fmt::Display;

use itertools::Itertools;
use log::{debug, trace};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    code::validate, generate::generate_with, score, Code, Difficulty, Result, Score, SessionError,
    CODE_LEN, DEFAULT_MAX_ATTEMPTS,
};

/// The configuration that every new round is started from.
///
/// Create one with [`new()`](Game::new()) and adjust it with the builder
/// methods. Like the rest of the builders here, these consume the existing
/// [`Game`] and return a new one.
///
/// # Examples
///
/// ```rust
/// # use bulls_rs::{Code, Difficulty, Game, State};
/// #
/// let game = Game::new().max_attempts(12).difficulty(Difficulty::Hard);
///
/// let mut session = game.start_from("1234".parse()?);
/// let turn = session.submit("1324")?;
/// assert_eq!((turn.score.bulls, turn.score.cows), (2, 2));
/// assert_eq!(session.remaining(), 11);
///
/// session.submit("1234")?;
/// assert_eq!(session.state(), State::Won);
/// #
/// # Ok::<_, bulls_rs::BullsError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Game {
    max_attempts: usize,
    difficulty: Difficulty,
}

impl Default for Game {
    fn default() -> Self {
        Game {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            difficulty: Difficulty::default(),
        }
    }
}

impl Game {
    /// Creates a new configuration.
    ///
    /// Defaults:
    /// 1. [`DEFAULT_MAX_ATTEMPTS`] attempts per round
    /// 2. [`Difficulty::Easy`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many scored guesses a round allows. At least one is always
    /// allowed.
    pub fn max_attempts(self, n: usize) -> Self {
        Game {
            max_attempts: n.max(1),
            ..self
        }
    }

    /// Sets the difficulty new secrets are generated with.
    pub fn difficulty(self, difficulty: Difficulty) -> Self {
        Game { difficulty, ..self }
    }

    /// Starts a round with a secret from the thread-local generator.
    pub fn start(&self) -> Session {
        self.start_with(&mut rand::thread_rng())
    }

    /// Starts a round with a secret drawn from `rng`.
    pub fn start_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Session {
        self.start_from(generate_with(rng, self.difficulty))
    }

    /// Starts a round with a known secret.
    ///
    /// The secret should satisfy the configured difficulty, otherwise
    /// [`Session::hint()`] will never suggest it.
    pub fn start_from(&self, secret: Code) -> Session {
        debug!(
            "starting {} round with {} attempts",
            self.difficulty, self.max_attempts
        );
        Session {
            secret,
            difficulty: self.difficulty,
            max_attempts: self.max_attempts,
            turns: Vec::with_capacity(self.max_attempts),
            state: State::InProgress,
        }
    }
}

/// Where a round stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum State {
    /// More guesses can be made.
    InProgress,

    /// The last guess matched the secret.
    Won,

    /// Every attempt was used without matching the secret.
    Exhausted,
}

impl State {
    /// Returns true if the round accepts no more guesses.
    pub fn is_over(&self) -> bool {
        !matches!(self, State::InProgress)
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::InProgress => write!(f, "in progress"),
            State::Won => write!(f, "won"),
            State::Exhausted => write!(f, "out of attempts"),
        }
    }
}

/// One scored guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Turn {
    pub guess: Code,
    pub score: Score,
}

/// A suggestion produced by [`Session::hint()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hint {
    /// The first code, in numeric order, that fits every score so far.
    pub suggestion: Code,

    /// How many codes still fit every score so far.
    pub remaining: usize,
}

/// A single round: one secret, a bounded number of guesses.
///
/// The log of turns only ever grows, in the order the guesses were made.
/// Once the state leaves [`State::InProgress`] it never changes again;
/// replaying means starting a fresh session from the [`Game`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Session {
    secret: Code,
    difficulty: Difficulty,
    max_attempts: usize,
    turns: Vec<Turn>,
    state: State,
}

impl Session {
    /// Validates and scores a raw guess.
    ///
    /// Nothing about the session changes when this returns an error. A
    /// malformed guess reports the specific [`GuessError`](crate::GuessError)
    /// and does not use up an attempt.
    pub fn submit(&mut self, raw: &str) -> Result<Turn> {
        self.ensure_running()?;
        let guess = validate(raw)?;
        self.guess(guess)
    }

    /// Scores an already validated guess and advances the round.
    pub fn guess(&mut self, guess: Code) -> Result<Turn> {
        self.ensure_running()?;

        let turn = Turn {
            guess,
            score: score(&self.secret, &guess),
        };
        self.turns.push(turn);
        trace!("attempt {}: {} -> {}", self.turns.len(), guess, turn.score);

        if turn.score.is_win() {
            self.state = State::Won;
        } else if self.turns.len() >= self.max_attempts {
            self.state = State::Exhausted;
        }
        if self.state.is_over() {
            debug!("round {} after {} attempts", self.state, self.turns.len());
        }

        Ok(turn)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state.is_over() {
            Err(SessionError::Finished(self.state).into())
        } else {
            Ok(())
        }
    }

    /// Suggests a code that agrees with every score so far.
    ///
    /// Only codes the session's difficulty could have produced are
    /// considered. This never changes the session and never uses an attempt.
    /// Returns `None` only if the secret itself breaks the difficulty rules.
    pub fn hint(&self) -> Option<Hint> {
        let (first, remaining) = candidates(self.difficulty)
            .filter(|candidate| self.consistent(candidate))
            .fold((None, 0), |(first, n), candidate| {
                (first.or(Some(candidate)), n + 1)
            });
        debug!("hint requested, {} codes remain", remaining);

        first.map(|suggestion| Hint {
            suggestion,
            remaining,
        })
    }

    fn consistent(&self, candidate: &Code) -> bool {
        self.turns
            .iter()
            .all(|turn| score(candidate, &turn.guess) == turn.score)
    }

    /// Every turn so far, oldest first.
    pub fn history(&self) -> &[Turn] {
        self.turns.as_slice()
    }

    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[Turn] {
        &self.turns[self.turns.len().saturating_sub(n)..]
    }

    /// The number of scored guesses.
    pub fn attempts(&self) -> usize {
        self.turns.len()
    }

    /// The number of guesses left before the round is exhausted.
    pub fn remaining(&self) -> usize {
        self.max_attempts - self.turns.len()
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the secret, but only once the round is over.
    pub fn reveal(&self) -> Option<&Code> {
        self.state.is_over().then(|| &self.secret)
    }
}

/// Every code `difficulty` allows, in numeric order.
fn candidates(difficulty: Difficulty) -> impl Iterator<Item = Code> {
    (0..=9_u8)
        .permutations(CODE_LEN)
        .map(|d| Code {
            digits: [d[0], d[1], d[2], d[3]],
        })
        .filter(move |code| difficulty.admits(code))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{BullsError, GuessError};

    fn session(secret: &str, attempts: usize) -> Session {
        Game::new()
            .max_attempts(attempts)
            .start_from(secret.parse().unwrap())
    }

    #[test]
    fn starts_in_progress() {
        let session = session("1234", 10);
        assert_eq!(session.state(), State::InProgress);
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.remaining(), 10);
        assert!(session.history().is_empty());
        assert_eq!(session.reveal(), None);
    }

    #[test]
    fn win_is_terminal() -> Result<()> {
        let mut session = session("1234", 10);
        session.submit("4321")?;
        let turn = session.submit("1234")?;

        assert!(turn.score.is_win());
        assert_eq!(session.state(), State::Won);
        assert_eq!(session.attempts(), 2);
        assert_eq!(session.reveal().map(Code::to_string), Some("1234".into()));

        assert!(matches!(
            session.submit("5678"),
            Err(BullsError::Session {
                kind: SessionError::Finished(State::Won)
            })
        ));
        assert_eq!(session.attempts(), 2);
        Ok(())
    }

    #[test]
    fn exhausts_exactly_at_the_limit() -> Result<()> {
        let mut session = session("1234", 10);
        let misses = [
            "5678", "5679", "5689", "5789", "6789", "5067", "5068", "5069", "5078",
        ];
        for miss in misses {
            session.submit(miss)?;
            assert_eq!(session.state(), State::InProgress);
        }
        assert_eq!(session.attempts(), 9);

        session.submit("5079")?;
        assert_eq!(session.state(), State::Exhausted);
        assert_eq!(session.remaining(), 0);
        assert!(session.reveal().is_some());
        assert!(session.submit("1234").is_err());
        assert_eq!(session.attempts(), 10);
        Ok(())
    }

    #[test]
    fn winning_on_the_last_attempt_is_a_win() -> Result<()> {
        let mut session = session("1234", 2);
        session.submit("5678")?;
        session.submit("1234")?;
        assert_eq!(session.state(), State::Won);
        Ok(())
    }

    #[test]
    fn invalid_guesses_cost_nothing() {
        let mut session = session("1234", 3);
        for (raw, expected) in [
            ("123", GuessError::InvalidLength(3)),
            ("12a4", GuessError::InvalidDigit('a')),
            ("1123", GuessError::DuplicateDigit(1)),
        ] {
            match session.submit(raw) {
                Err(BullsError::Guess { kind }) => assert_eq!(kind, expected),
                other => panic!("expected {:?}, got {:?}", expected, other),
            }
        }
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.state(), State::InProgress);
    }

    #[test]
    fn zero_attempts_is_clamped() {
        assert_eq!(session("1234", 0).max_attempts(), 1);
    }

    #[test]
    fn history_keeps_order() -> Result<()> {
        let mut session = session("1234", 10);
        for raw in ["5678", "1243", "2134"] {
            session.submit(raw)?;
        }
        let guesses: Vec<String> = session
            .history()
            .iter()
            .map(|t| t.guess.to_string())
            .collect();
        assert_eq!(guesses, ["5678", "1243", "2134"]);

        let recent: Vec<String> = session
            .recent(2)
            .iter()
            .map(|t| t.guess.to_string())
            .collect();
        assert_eq!(recent, ["1243", "2134"]);
        assert_eq!(session.recent(10).len(), 3);
        Ok(())
    }

    #[test]
    fn hint_before_guessing_is_the_smallest_code() {
        let easy = session("1234", 10).hint().unwrap();
        assert_eq!(easy.suggestion.to_string(), "0123");
        assert_eq!(easy.remaining, 5040);

        let hard = Game::new()
            .difficulty(Difficulty::Hard)
            .start_from("5678".parse().unwrap())
            .hint()
            .unwrap();
        assert_eq!(hard.suggestion.to_string(), "1234");
        assert_eq!(hard.remaining, 3024);

        let medium = Game::new()
            .difficulty(Difficulty::Medium)
            .start_from("5678".parse().unwrap())
            .hint()
            .unwrap();
        assert_eq!(medium.suggestion.to_string(), "1023");
        assert_eq!(medium.remaining, 4536);
    }

    #[test]
    fn hint_fits_every_score_and_costs_nothing() -> Result<()> {
        let mut session = session("7013", 10);
        for raw in ["0123", "4567", "7031"] {
            session.submit(raw)?;
        }
        let before = session.clone();

        let hint = session.hint().unwrap();
        assert!(hint.remaining >= 1);
        for turn in session.history() {
            assert_eq!(score(&hint.suggestion, &turn.guess), turn.score);
        }
        assert_eq!(session, before);
        Ok(())
    }

    #[test]
    fn hint_narrows_to_the_secret() -> Result<()> {
        let mut session = session("1234", 10);
        session.submit("1243")?;
        session.submit("2134")?;
        session.submit("1324")?;
        session.submit("4231")?;

        let hint = session.hint().unwrap();
        assert_eq!(hint.remaining, 1);
        assert_eq!(hint.suggestion.to_string(), "1234");
        Ok(())
    }
}
