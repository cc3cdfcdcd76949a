use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Position of a single mine. Immutable once placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mine {
    pub x: Coord,
    pub y: Coord,
}

impl Mine {
    /// Bounds are the caller's responsibility.
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub const fn coords(self) -> Coord2 {
        (self.x, self.y)
    }

    /// Whether some mine in `mines` already occupies this position.
    pub fn is_duplicate(&self, mines: &[Mine]) -> bool {
        mines.iter().any(|mine| mine == self)
    }
}

impl From<Coord2> for Mine {
    fn from((x, y): Coord2) -> Self {
        Self::new(x, y)
    }
}

/// The mines of one game, shared by every cell of its grid.
///
/// Keeps placement order for display plus an occupancy mask so membership checks don't scan the list.
/// At least one cell is always left free of mines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMineSet")]
pub struct MineSet {
    mines: Vec<Mine>,
    mask: Array2<bool>,
}

/// Unchecked form of a [`MineSet`] as it appears in a snapshot.
#[derive(Deserialize)]
struct RawMineSet {
    mines: Vec<Mine>,
    mask: Array2<bool>,
}

impl TryFrom<RawMineSet> for MineSet {
    type Error = GameError;

    fn try_from(raw: RawMineSet) -> Result<Self> {
        let (rows, cols) = raw.mask.dim();
        let side = Coord::try_from(rows).map_err(|_| GameError::InvalidCoords)?;
        if rows != cols {
            return Err(GameError::InvalidCoords);
        }

        let set = Self::from_mines(side, raw.mines)?;
        if set.mask != raw.mask {
            return Err(GameError::InconsistentSnapshot);
        }
        Ok(set)
    }
}

impl MineSet {
    pub fn from_coords(side: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        Self::from_mines(side, mine_coords.iter().copied().map(Mine::from))
    }

    pub(crate) fn from_mines(side: Coord, mines: impl IntoIterator<Item = Mine>) -> Result<Self> {
        if side == 0 {
            return Err(GameError::EmptyField);
        }
        let mut set = Self {
            mines: Vec::new(),
            mask: Array2::default((side, side).to_nd_index()),
        };

        for mine in mines {
            set.insert(mine)?;
        }

        let cells = set.total_cells();
        if set.len() >= cells {
            return Err(GameError::TooManyMines {
                mines: set.len(),
                cells,
            });
        }
        Ok(set)
    }

    fn insert(&mut self, mine: Mine) -> Result<()> {
        let coords = self.validate_coords(mine.coords())?;
        let slot = &mut self.mask[coords.to_nd_index()];
        if *slot {
            return Err(GameError::DuplicateMine(mine.x, mine.y));
        }
        *slot = true;
        self.mines.push(mine);
        Ok(())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let side = self.side();
        if coords.0 < side && coords.1 < side {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn side(&self) -> Coord {
        Coord::try_from(self.mask.nrows()).unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.side(), self.side())
    }

    pub fn len(&self) -> CellCount {
        CellCount::try_from(self.mines.len()).unwrap_or(CellCount::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.mines.is_empty()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mine> {
        self.mines.iter()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.mask
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors, always fits
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineSet {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mask[coords.to_nd_index()]
    }
}

impl<'a> IntoIterator for &'a MineSet {
    type Item = &'a Mine;
    type IntoIter = core::slice::Iter<'a, Mine>;

    fn into_iter(self) -> Self::IntoIter {
        self.mines.iter()
    }
}
