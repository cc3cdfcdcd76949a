use std::fmt::Write;

use minefield_core::{FieldEngine, GameSession, Outcome, Tile};

fn tile_char(tile: Tile) -> char {
    match tile {
        Tile::Closed => '#',
        Tile::Flag => 'F',
        Tile::Open(0) => '.',
        Tile::Open(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        Tile::Mine => '*',
        Tile::Exploded => 'X',
        Tile::IncorrectFlag => 'x',
    }
}

/// Draws the field with row numbers on the left and column numbers on top.
pub(crate) fn board(engine: &FieldEngine) -> String {
    let side = engine.side();
    let mut out = String::from("   ");

    for col in 0..side {
        let _ = write!(out, "{col:>2}");
    }
    out.push('\n');

    for row in 0..side {
        let _ = write!(out, "{row:>2} ");
        for col in 0..side {
            let _ = write!(out, " {}", tile_char(engine.tile_at((row, col))));
        }
        out.push('\n');
    }

    out
}

pub(crate) fn status(session: &GameSession) -> String {
    let Some(engine) = session.engine() else {
        return format!("no game, high score: {}", session.high_score());
    };

    let outcome = match engine.outcome() {
        Outcome::Continuing => "playing",
        Outcome::Won => "you won!",
        Outcome::Lost => "boom, game over",
    };

    format!(
        "{} | score: {}/{} | high score: {} | mines left: {} | {}",
        session.difficulty(),
        engine.current_score(),
        engine.winning_score(),
        session.high_score(),
        engine.mines_left(),
        outcome
    )
}
