use minefield_core::{Coord, Coord2};
use thiserror::Error;

pub(crate) const HELP: &str = "\
commands:
  r <row> <col>   reveal a cell
  f <row> <col>   toggle a flag
  n [difficulty]  new game (easy, medium, hard)
  s               print the game as JSON
  h               show this help
  q               quit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    NewGame(Option<String>),
    Snapshot,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("Empty command, type h for help")]
    Empty,
    #[error("Unknown command {0:?}, type h for help")]
    Unknown(String),
    #[error("Expected a row and a column")]
    MissingCoords,
    #[error("Not a valid coordinate: {0:?}")]
    InvalidCoord(String),
    #[error("Unexpected argument {0:?}")]
    TrailingInput(String),
}

impl Command {
    pub(crate) fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Self::Reveal(parse_coords(&mut words)?),
            "f" | "flag" => Self::Flag(parse_coords(&mut words)?),
            "n" | "new" => Self::NewGame(words.next().map(str::to_owned)),
            "s" | "snapshot" => Self::Snapshot,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(name.to_owned())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::TrailingInput(extra.to_owned())),
            None => Ok(command),
        }
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2, CommandError> {
    let row = parse_coord(words.next())?;
    let col = parse_coord(words.next())?;
    Ok((row, col))
}

fn parse_coord(word: Option<&str>) -> Result<Coord, CommandError> {
    let word = word.ok_or(CommandError::MissingCoords)?;
    word.parse()
        .map_err(|_| CommandError::InvalidCoord(word.to_owned()))
}
