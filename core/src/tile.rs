use serde::{Deserialize, Serialize};

/// What a front end should draw for a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Closed,
    Flag,
    Open(u8),
    // only shown after the game ended:
    Mine,
    Exploded,
    IncorrectFlag,
}
