use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Number of mines placed on every standard field.
pub const DEFAULT_MINE_COUNT: CellCount = 16;

/// Difficulty tiers. Fewer cells with the same number of mines is harder.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Hard,
    #[default]
    Medium,
    Easy,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Hard, Self::Medium, Self::Easy];

    /// Resolves a difficulty name. Unknown names fall back to [`Difficulty::Medium`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("hard") {
            Self::Hard
        } else if name.eq_ignore_ascii_case("easy") {
            Self::Easy
        } else {
            if !name.eq_ignore_ascii_case("medium") {
                log::debug!("Unknown difficulty {name:?}, using medium");
            }
            Self::Medium
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Medium => "medium",
            Self::Easy => "easy",
        }
    }

    pub const fn side(self) -> Coord {
        match self {
            Self::Hard => 7,
            Self::Medium => 9,
            Self::Easy => 10,
        }
    }

    pub const fn cell_count(self) -> CellCount {
        mult(self.side(), self.side())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of a square minefield and how many mines it holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub side: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn custom(side: Coord, mines: CellCount) -> Self {
        Self { side, mines }
    }

    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::with_mines(difficulty, DEFAULT_MINE_COUNT)
    }

    pub const fn with_mines(difficulty: Difficulty, mines: CellCount) -> Self {
        Self::custom(difficulty.side(), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.side, self.side)
    }

    pub const fn winning_score(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// At least one safe cell must remain, otherwise mine placement could never finish.
    pub fn validate(&self) -> Result<Self> {
        if self.side == 0 {
            return Err(GameError::EmptyField);
        }

        let cells = self.total_cells();
        if self.mines >= cells {
            log::warn!(
                "Rejected configuration, requested {} mines but the field only has {} cells",
                self.mines,
                cells
            );
            return Err(GameError::TooManyMines {
                mines: self.mines,
                cells,
            });
        }

        Ok(*self)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        Self::for_difficulty(difficulty)
    }
}
