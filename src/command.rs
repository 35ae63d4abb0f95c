//! Classifying lines typed during a round.

/// What a line of input asks for.
///
/// Anything that is not one of the reserved words is treated as a guess and
/// left for [`Session::submit()`](crate::Session::submit()) to validate, so
/// the player hears exactly what was wrong with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command<'a> {
    Guess(&'a str),
    Hint,
    History,
    Rules,
    Quit,
}

impl<'a> Command<'a> {
    /// Parses one line. Surrounding whitespace is ignored and the reserved
    /// words match in any case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bulls_rs::Command;
    /// #
    /// assert_eq!(Command::parse(" Hint\n"), Command::Hint);
    /// assert_eq!(Command::parse("1234\r\n"), Command::Guess("1234"));
    /// ```
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "hint" => Command::Hint,
            "history" => Command::History,
            "rules" => Command::Rules,
            "quit" => Command::Quit,
            _ => Command::Guess(line),
        }
    }

    /// Returns true for commands that never use up an attempt.
    pub fn is_side_channel(&self) -> bool {
        !matches!(self, Command::Guess(_))
    }
}
