//! The text interface for playing rounds interactively.

use std::io::{BufRead, Write};

use comfy_table::{presets, Cell, CellAlignment, Table};
use log::{debug, info};
use owo_colors::{AnsiColors, OwoColorize, Stream};
use rand::Rng;

use crate::{
    BullsError, Command, Difficulty, Game, Record, Result, Session, State, Turn, CODE_LEN,
};

/// How many turns the `history` command shows.
const RECENT_TURNS: usize = 10;

/// Drives rounds over any line-based reader and writer.
///
/// The console owns the random number generator and a [`Record`] of every
/// finished round. Each round gets a fresh [`Session`], and declining to
/// replay ends [`run()`](Console::run()).
///
/// # Examples
///
/// ```rust
/// # use std::io::Cursor;
/// use bulls_rs::{Console, Difficulty};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let input = Cursor::new("quit\n");
/// let mut output = Vec::new();
///
/// let record = Console::new(input, &mut output, StdRng::seed_from_u64(0))
///     .difficulty(Difficulty::Medium)
///     .run()?;
///
/// assert_eq!(record.num_played(), 0);
/// assert!(String::from_utf8(output).unwrap().contains("Goodbye"));
/// #
/// # Ok::<_, bulls_rs::BullsError>(())
/// ```
#[derive(Debug)]
pub struct Console<R, W, G> {
    input: R,
    output: W,
    rng: G,
    game: Game,
    preset: Option<Difficulty>,
    color: bool,
    record: Record,
}

enum Round {
    Over,
    Quit,
}

impl<R: BufRead, W: Write, G: Rng> Console<R, W, G> {
    /// Creates a console with the default [`Game`], a difficulty prompt at
    /// the start of every round and plain output.
    pub fn new(input: R, output: W, rng: G) -> Self {
        Console {
            input,
            output,
            rng,
            game: Game::new(),
            preset: None,
            color: false,
            record: Record::new(),
        }
    }

    /// Sets the configuration new rounds start from.
    pub fn game(self, game: Game) -> Self {
        Console { game, ..self }
    }

    /// Uses `difficulty` for every round instead of asking.
    pub fn difficulty(self, difficulty: impl Into<Option<Difficulty>>) -> Self {
        Console {
            preset: difficulty.into(),
            ..self
        }
    }

    /// Colors feedback when the terminal supports it.
    ///
    /// Support is detected on stdout, whatever writer the console was given,
    /// so leave this off when writing anywhere else.
    pub fn color(self, color: bool) -> Self {
        Console { color, ..self }
    }

    /// Plays rounds until the player quits, declines a replay or the input
    /// runs out, then returns the record of finished rounds.
    pub fn run(mut self) -> Result<Record> {
        writeln!(self.output, "Welcome to Bulls and Cows!")?;
        self.rules(self.preset)?;

        loop {
            let preset = self.preset;
            let difficulty = match preset {
                Some(d) => d,
                None => match self.ask_difficulty()? {
                    Some(d) => d,
                    None => return self.goodbye(),
                },
            };

            let mut session = self.game.difficulty(difficulty).start_with(&mut self.rng);
            writeln!(
                self.output,
                "\nA new {} secret is ready. You have {} attempts.",
                difficulty,
                session.max_attempts()
            )?;

            match self.play(&mut session)? {
                Round::Quit => return self.goodbye(),
                Round::Over => {
                    self.record.push(&session);
                    self.announce(&session)?;
                }
            }

            if !self.ask_replay()? {
                break;
            }
        }

        writeln!(self.output)?;
        self.record.print(&mut self.output)?;
        Ok(self.record)
    }

    fn play(&mut self, session: &mut Session) -> Result<Round> {
        while !session.state().is_over() {
            let prompt = format!(
                "\nGuess {}/{}: ",
                session.attempts() + 1,
                session.max_attempts()
            );
            let line = match self.prompt(&prompt)? {
                Some(line) => line,
                None => return Ok(Round::Quit),
            };

            match Command::parse(&line) {
                Command::Quit => return Ok(Round::Quit),
                Command::Rules => self.rules(Some(session.difficulty()))?,
                Command::History => self.history(session)?,
                Command::Hint => self.hint(session)?,
                Command::Guess(raw) => match session.submit(raw) {
                    Ok(turn) => self.feedback(&turn)?,
                    Err(BullsError::Guess { kind }) => {
                        writeln!(self.output, "Invalid guess: {}.", kind)?;
                    }
                    Err(e) => return Err(e),
                },
            }
        }

        Ok(Round::Over)
    }

    fn feedback(&mut self, turn: &Turn) -> Result<()> {
        let bulls = self.paint(
            format!("Bulls: {}", turn.score.bulls),
            AnsiColors::Green,
        );
        let cows = self.paint(format!("Cows: {}", turn.score.cows), AnsiColors::Yellow);
        writeln!(self.output, "{}, {}", bulls, cows)?;
        Ok(())
    }

    fn announce(&mut self, session: &Session) -> Result<()> {
        match (session.state(), session.reveal()) {
            (State::Won, _) => {
                let n = session.attempts();
                let text = format!(
                    "Congratulations! You guessed the number in {} {}.",
                    n,
                    if n == 1 { "try" } else { "tries" }
                );
                let text = self.paint(text, AnsiColors::Green);
                writeln!(self.output, "\n{}", text)?;
            }
            (State::Exhausted, Some(secret)) => {
                let text = format!("You've used all attempts. The correct number was: {}", secret);
                let text = self.paint(text, AnsiColors::Red);
                writeln!(self.output, "\n{}", text)?;
            }
            (state, _) => debug!("nothing to announce for a round that is {}", state),
        }
        Ok(())
    }

    fn history(&mut self, session: &Session) -> Result<()> {
        let recent = session.recent(RECENT_TURNS);
        if recent.is_empty() {
            writeln!(self.output, "No guesses yet.")?;
            return Ok(());
        }

        let first = session.attempts() - recent.len() + 1;
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_header(vec!["#", "guess", "bulls", "cows"]);
        for (i, turn) in recent.iter().enumerate() {
            table.add_row(vec![
                Cell::new(first + i).set_alignment(CellAlignment::Right),
                Cell::new(turn.guess),
                Cell::new(turn.score.bulls).set_alignment(CellAlignment::Right),
                Cell::new(turn.score.cows).set_alignment(CellAlignment::Right),
            ]);
        }

        if first > 1 {
            writeln!(
                self.output,
                "Showing the last {} of {} guesses.",
                recent.len(),
                session.attempts()
            )?;
        }
        writeln!(self.output, "{}", table)?;
        Ok(())
    }

    fn hint(&mut self, session: &Session) -> Result<()> {
        match session.hint() {
            Some(hint) => writeln!(
                self.output,
                "Hint: try {}. {} {} still fit every score so far.",
                hint.suggestion,
                hint.remaining,
                if hint.remaining == 1 { "code" } else { "codes" }
            )?,
            None => writeln!(self.output, "No hint is available for this round.")?,
        }
        Ok(())
    }

    fn rules(&mut self, difficulty: Option<Difficulty>) -> Result<()> {
        writeln!(
            self.output,
            "Guess the {}-digit number. No digit appears twice.",
            CODE_LEN
        )?;
        writeln!(
            self.output,
            "Bulls = correct digit in the correct position, Cows = correct digit in the wrong position."
        )?;
        if let Some(difficulty) = difficulty {
            writeln!(
                self.output,
                "Difficulty is {}: {}.",
                difficulty,
                difficulty.describe()
            )?;
        }
        writeln!(
            self.output,
            "Type hint, history, rules or quit at any time. They never use up an attempt."
        )?;
        Ok(())
    }

    fn ask_difficulty(&mut self) -> Result<Option<Difficulty>> {
        writeln!(self.output, "\nSelect difficulty:")?;
        for d in Difficulty::ALL {
            writeln!(self.output, "  {}) {} ({})", d.menu_key(), d, d.describe())?;
        }

        loop {
            let line = match self.prompt("Choice: ")? {
                Some(line) => line,
                None => return Ok(None),
            };
            if let Command::Quit = Command::parse(&line) {
                return Ok(None);
            }
            match line.trim().parse() {
                Ok(difficulty) => return Ok(Some(difficulty)),
                Err(e) => writeln!(self.output, "{}.", e)?,
            }
        }
    }

    fn ask_replay(&mut self) -> Result<bool> {
        let answer = self.prompt("\nPlay again? (y/n): ")?;
        let again = matches!(
            answer.as_deref().map(|a| a.trim().to_ascii_lowercase()).as_deref(),
            Some("y" | "yes")
        );
        info!("replay {}", if again { "accepted" } else { "declined" });
        Ok(again)
    }

    fn goodbye(mut self) -> Result<Record> {
        debug!("player quit");
        writeln!(self.output, "\nGoodbye!")?;
        Ok(self.record)
    }

    /// Writes `text` and reads one line. `None` means the input ended.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        // Bytes that are not UTF-8 become U+FFFD and fail validation like any
        // other bad character.
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    fn paint(&self, text: String, color: AnsiColors) -> String {
        if self.color {
            text.if_supports_color(Stream::Stdout, |t| t.color(color))
                .to_string()
        } else {
            text
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{generate_with, Code};

    const SEED: u64 = 0x5eed;

    /// The secrets a console seeded with [`SEED`] will generate, in order.
    fn secrets(difficulties: &[Difficulty]) -> Vec<Code> {
        let mut rng = StdRng::seed_from_u64(SEED);
        difficulties
            .iter()
            .map(|&d| generate_with(&mut rng, d))
            .collect()
    }

    /// Codes that are valid guesses but not `secret`.
    fn misses(secret: &Code, n: usize) -> Vec<String> {
        ["0123", "4567", "8901", "2345", "6789", "1357", "2468"]
            .iter()
            .filter(|raw| **raw != secret.to_string())
            .take(n)
            .map(|raw| raw.to_string())
            .collect()
    }

    fn play(console_input: String, game: Game, preset: Option<Difficulty>) -> (Record, String) {
        let mut output = Vec::new();
        let record = Console::new(
            Cursor::new(console_input),
            &mut output,
            StdRng::seed_from_u64(SEED),
        )
        .game(game)
        .difficulty(preset)
        .run()
        .unwrap();
        (record, String::from_utf8(output).unwrap())
    }

    #[test]
    fn first_try_win() {
        let secret = secrets(&[Difficulty::Easy])[0];
        let (record, out) = play(format!("1\n{}\nn\n", secret), Game::new(), None);

        assert!(out.contains("Select difficulty:"));
        assert!(out.contains("Bulls: 4, Cows: 0"));
        assert!(out.contains("You guessed the number in 1 try."));
        assert_eq!(record.num_won(), 1);
        assert!(out.contains("Played 1, won 1, lost 0"));
    }

    #[test]
    fn invalid_guesses_are_explained_and_free() {
        let secret = secrets(&[Difficulty::Medium])[0];
        let input = format!("2\n123\n12a4\n1123\n{}\nn\n", secret);
        let (record, out) = play(input, Game::new(), None);

        assert!(out.contains("Invalid guess: a guess must be exactly 4 digits long"));
        assert!(out.contains("Invalid guess: 'a' is not a digit"));
        assert!(out.contains("Invalid guess: the digit 1 appears more than once"));
        assert!(out.contains("in 1 try."));
        assert_eq!(record.rounds()[0].attempts, 1);
    }

    #[test]
    fn exhausting_reveals_the_secret_and_replays_fresh() {
        let secrets = secrets(&[Difficulty::Easy, Difficulty::Hard]);
        let mut input = String::from("1\n");
        for miss in misses(&secrets[0], 3) {
            input.push_str(&miss);
            input.push('\n');
        }
        input.push_str("y\n3\nhistory\nquit\n");

        let (record, out) = play(input, Game::new().max_attempts(3), None);

        assert!(out.contains(&format!(
            "You've used all attempts. The correct number was: {}",
            secrets[0]
        )));
        assert!(out.contains("A new hard secret is ready. You have 3 attempts."));
        assert!(out.contains("Guess 1/3"));
        // the replayed round starts with an empty log
        assert!(out.contains("No guesses yet."));
        assert!(out.contains("Goodbye!"));
        assert_eq!(record.num_played(), 1);
        assert_eq!(record.num_lost(), 1);
    }

    #[test]
    fn side_channel_commands_cost_nothing() {
        let secret = secrets(&[Difficulty::Easy])[0];
        let miss = &misses(&secret, 1)[0];
        let input = format!("{}\nhint\nHISTORY\nrules\nHint\n{}\nno\n", miss, secret);
        let (record, out) = play(input, Game::new(), Some(Difficulty::Easy));

        assert!(!out.contains("Select difficulty:"));
        assert!(out.contains("Hint: try "));
        assert!(out.contains(&format!(" {} ", miss)));
        assert!(out.contains("Difficulty is easy"));
        assert!(out.contains("in 2 tries."));
        assert_eq!(record.rounds()[0].attempts, 2);
    }

    #[test]
    fn history_shows_only_recent_turns() {
        let secret = secrets(&[Difficulty::Easy])[0];
        let mut input = String::new();
        let misses = misses(&secret, 6);
        for _ in 0..2 {
            for miss in &misses {
                input.push_str(miss);
                input.push('\n');
            }
        }
        input.push_str("history\nquit\n");

        let (_, out) = play(input, Game::new().max_attempts(20), Some(Difficulty::Easy));
        assert!(out.contains("Showing the last 10 of 12 guesses."));
    }

    #[test]
    fn unknown_difficulty_is_asked_again() {
        let (record, out) = play("9\nquit\n".into(), Game::new(), None);
        assert!(out.contains("unknown difficulty \"9\", choose 1, 2 or 3."));
        assert!(out.contains("Goodbye!"));
        assert_eq!(record.num_played(), 0);
    }

    #[test]
    fn quit_mid_round_records_nothing() {
        let (record, out) = play("1\n0123\nQUIT\n".into(), Game::new(), None);
        assert!(out.contains("Goodbye!"));
        assert!(!out.contains("Played"));
        assert_eq!(record.num_played(), 0);
    }

    #[test]
    fn undecodable_lines_are_asked_again() {
        let secret = secrets(&[Difficulty::Easy])[0];
        let mut input = b"\xff\xfe\n1\n\xe9\xe9\n".to_vec();
        input.extend_from_slice(format!("{}\nn\n", secret).as_bytes());

        let mut output = Vec::new();
        let record = Console::new(
            Cursor::new(input),
            &mut output,
            StdRng::seed_from_u64(SEED),
        )
        .run()
        .unwrap();
        let out = String::from_utf8(output).unwrap();

        assert!(out.contains("unknown difficulty \"\u{FFFD}\u{FFFD}\""));
        assert!(out.contains("Invalid guess: a guess must be exactly 4 digits long"));
        assert!(out.contains("in 1 try."));
        assert_eq!(record.num_won(), 1);
    }

    #[test]
    fn plain_output_has_no_escapes() {
        let secret = secrets(&[Difficulty::Easy])[0];
        let (_, out) = play(format!("1\n{}\nn\n", secret), Game::new(), None);
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn end_of_input_is_a_quit() {
        let (record, out) = play(String::new(), Game::new(), None);
        assert!(out.contains("Goodbye!"));
        assert_eq!(record.num_played(), 0);
    }
}
