use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use minefield_core::{DEFAULT_MINE_COUNT, GameSession, GeneratorKind, Outcome};

mod command;
mod render;

use command::{Command, HELP};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Generator {
    /// Shuffle every cell and keep the first ones
    Shuffle,
    /// Sample random cells until enough distinct ones are found
    Rejection,
}

impl From<Generator> for GeneratorKind {
    fn from(generator: Generator) -> Self {
        match generator {
            Generator::Shuffle => GeneratorKind::Shuffle,
            Generator::Rejection => GeneratorKind::Rejection,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Difficulty of the first game: easy, medium or hard
    #[arg(short, long, default_value = "medium")]
    difficulty: String,

    /// How many mines every field gets
    #[arg(short, long, default_value_t = DEFAULT_MINE_COUNT)]
    mines: u16,

    /// Force a seed instead of random, decimal or 0x-prefixed hex
    #[arg(short, long, value_parser = parse_seed)]
    seed: Option<u64>,

    /// How mines are placed
    #[arg(short, long, value_enum, default_value_t = Generator::Shuffle)]
    generator: Generator,
}

fn parse_seed(value: &str) -> Result<u64, std::num::ParseIntError> {
    match value.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    }
}

enum Flow {
    Continue,
    Quit,
}

fn run_command(
    session: &mut GameSession,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<Flow> {
    match command {
        Command::Reveal(coords) => match session.activate(coords) {
            Ok(Outcome::Lost) => writeln!(out, "You hit a mine!")?,
            Ok(Outcome::Won) => writeln!(out, "Field cleared!")?,
            Ok(Outcome::Continuing) => {}
            Err(err) => writeln!(out, "{err}")?,
        },
        Command::Flag(coords) => {
            if let Err(err) = session.toggle_flag(coords) {
                writeln!(out, "{err}")?;
            }
        }
        Command::NewGame(difficulty) => {
            let difficulty = difficulty.unwrap_or_else(|| session.difficulty().to_string());
            if let Err(err) = session.start(&difficulty) {
                writeln!(out, "Could not start a game: {err}")?;
            }
        }
        Command::Snapshot => {
            if let Some(engine) = session.engine() {
                let json = serde_json::to_string_pretty(engine).context("serializing game")?;
                writeln!(out, "{json}")?;
            }
            return Ok(Flow::Continue);
        }
        Command::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(Flow::Continue);
        }
        Command::Quit => return Ok(Flow::Quit),
    }

    draw(session, out)?;
    Ok(Flow::Continue)
}

fn draw(session: &GameSession, out: &mut impl Write) -> io::Result<()> {
    if let Some(engine) = session.engine() {
        write!(out, "{}", render::board(engine))?;
    }
    writeln!(out, "{}", render::status(session))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {:#x}", seed);

    let mut session =
        GameSession::with_mine_count(seed, args.mines).with_generator(args.generator.into());
    session
        .start(&args.difficulty)
        .context("Could not start the first game")?;

    let mut out = io::stdout().lock();
    draw(&session, &mut out)?;
    writeln!(out, "type h for help")?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read command")?;
        let flow = match Command::parse(&line) {
            Ok(command) => run_command(&mut session, command, &mut out)?,
            Err(err) => {
                writeln!(out, "{err}")?;
                Flow::Continue
            }
        };
        if let Flow::Quit = flow {
            break;
        }
    }

    log::debug!("Quit with high score {}", session.high_score());
    Ok(())
}
