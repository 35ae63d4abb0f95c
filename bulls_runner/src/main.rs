use std::io;

use anyhow::Context;
use bulls_rs::{Console, Difficulty, Game, DEFAULT_MAX_ATTEMPTS};
use clap::Parser;
use log::info;
use rand::{rngs::StdRng, SeedableRng};

/// Find the hidden 4-digit number. No digit appears twice.
#[derive(Parser, Debug)]
#[command(name = "bulls", version, about)]
struct Args {
    /// Scored guesses allowed per round
    #[arg(long, short, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    attempts: usize,

    /// Play every round on this difficulty instead of asking
    /// (1 or easy, 2 or medium, 3 or hard)
    #[arg(long, short)]
    difficulty: Option<Difficulty>,

    /// Seed the secret generator for a repeatable game
    #[arg(long)]
    seed: Option<u64>,

    /// Never color the output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let record = Console::new(stdin.lock(), stdout.lock(), rng)
        .game(Game::new().max_attempts(args.attempts))
        .difficulty(args.difficulty)
        .color(!args.no_color)
        .run()
        .context("the game stopped unexpectedly")?;

    info!(
        "finished {} rounds, {} won",
        record.num_played(),
        record.num_won()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["bulls"]).unwrap();
        assert_eq!(args.attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(args.difficulty, None);
        assert!(!args.no_color);
    }

    #[test]
    fn difficulty_by_number_or_name() {
        let args = Args::try_parse_from(["bulls", "-d", "3", "--attempts", "12"]).unwrap();
        assert_eq!(args.difficulty, Some(Difficulty::Hard));
        assert_eq!(args.attempts, 12);

        let args = Args::try_parse_from(["bulls", "--difficulty", "Medium"]).unwrap();
        assert_eq!(args.difficulty, Some(Difficulty::Medium));

        assert!(Args::try_parse_from(["bulls", "--difficulty", "4"]).is_err());
    }
}
