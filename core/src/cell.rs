use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// One grid position and its player-visible state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    x: Coord,
    y: Coord,
    revealed: bool,
    flagged: bool,
    annotation: Option<u8>,
    mine_shown: bool,
}

impl Cell {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self {
            x,
            y,
            revealed: false,
            flagged: false,
            annotation: None,
            mine_shown: false,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }

    pub fn is_mine(&self, mines: &MineSet) -> bool {
        mines.contains(self.coords())
    }

    /// Marks the cell revealed, returns whether it changed.
    ///
    /// Flagged cells stay hidden, the flag has to be cleared first.
    pub fn reveal(&mut self) -> bool {
        if self.revealed || self.flagged {
            return false;
        }
        self.revealed = true;
        true
    }

    pub fn toggle_flag(&mut self) -> MarkOutcome {
        if self.revealed {
            return MarkOutcome::NoChange;
        }
        self.flagged = !self.flagged;
        MarkOutcome::Changed
    }

    /// Records how many of the neighbors are mines, only non-zero counts are kept.
    pub fn annotate(&mut self, nearby_mines: u8) {
        debug_assert!(nearby_mines <= 8, "a cell has at most 8 neighbors");
        if nearby_mines > 0 {
            self.annotation = Some(nearby_mines);
        }
    }

    /// Nearby mine count, 0 when the cell was never annotated.
    pub fn annotation(&self) -> u8 {
        self.annotation.unwrap_or(0)
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Visual-only mark for mines uncovered when a game ends, does not count as revealed.
    pub fn show_mine(&mut self) {
        self.mine_shown = true;
    }

    pub const fn is_mine_shown(&self) -> bool {
        self.mine_shown
    }
}
