use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Continuing -> Won
/// - Continuing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Continuing,
    Won,
    Lost,
}

impl Outcome {
    /// The game ended and no moves are accepted anymore.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub score: CellCount,
    pub winning_score: CellCount,
    pub outcome: Outcome,
}

impl GameState {
    const fn new(winning_score: CellCount) -> Self {
        Self {
            score: 0,
            winning_score,
            outcome: Outcome::Continuing,
        }
    }
}

/// Owns one game: its grid, its mines and the score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldEngine")]
pub struct FieldEngine {
    mines: MineSet,
    grid: Array2<Cell>,
    state: GameState,
    flag_count: CellCount,
    exploded: Option<Coord2>,
}

/// Unchecked form of a [`FieldEngine`] as it appears in a snapshot.
#[derive(Deserialize)]
struct RawFieldEngine {
    mines: MineSet,
    grid: Array2<Cell>,
    state: GameState,
    flag_count: CellCount,
    exploded: Option<Coord2>,
}

impl TryFrom<RawFieldEngine> for FieldEngine {
    type Error = GameError;

    fn try_from(raw: RawFieldEngine) -> Result<Self> {
        let side = usize::from(raw.mines.side());
        if raw.grid.dim() != (side, side) {
            return Err(GameError::InconsistentSnapshot);
        }

        let mut flagged = 0;
        let mut revealed = 0;
        for ((x, y), cell) in raw.grid.indexed_iter() {
            let (cx, cy) = cell.coords();
            if (usize::from(cx), usize::from(cy)) != (x, y)
                || (cell.is_revealed() && cell.is_mine(&raw.mines))
            {
                return Err(GameError::InconsistentSnapshot);
            }
            flagged += CellCount::from(cell.is_flagged());
            revealed += CellCount::from(cell.is_revealed());
        }

        let exploded_ok = raw.exploded.is_none_or(|pos| raw.mines.contains(pos));
        if flagged != raw.flag_count
            || revealed != raw.state.score
            || raw.state.winning_score != raw.mines.safe_cell_count()
            || !exploded_ok
        {
            return Err(GameError::InconsistentSnapshot);
        }

        Ok(Self {
            mines: raw.mines,
            grid: raw.grid,
            state: raw.state,
            flag_count: raw.flag_count,
            exploded: raw.exploded,
        })
    }
}

impl FieldEngine {
    pub fn generate(config: GameConfig, generator: impl MineGenerator) -> Result<Self> {
        let mines = generator.generate(config)?;
        Ok(Self::new(mines))
    }

    pub fn new(mines: MineSet) -> Self {
        let side = mines.side();
        // shape is side x side so both indices fit in a coordinate
        let grid = Array2::from_shape_fn((side, side).to_nd_index(), |(x, y)| {
            Cell::new(x as Coord, y as Coord)
        });
        let state = GameState::new(mines.safe_cell_count());

        Self {
            mines,
            grid,
            state,
            flag_count: 0,
            exploded: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome
    }

    pub fn current_score(&self) -> CellCount {
        self.state.score
    }

    pub fn winning_score(&self) -> CellCount {
        self.state.winning_score
    }

    /// Cells stop reacting to input once the game is over.
    pub fn is_frozen(&self) -> bool {
        self.state.outcome.is_final()
    }

    pub fn side(&self) -> Coord {
        self.mines.side()
    }

    pub fn mines(&self) -> &MineSet {
        &self.mines
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Negative when more flags than mines are placed.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.mines.len()) - i32::from(self.flag_count)
    }

    /// Mine that ended the game, if it was lost.
    pub fn exploded(&self) -> Option<Coord2> {
        self.exploded
    }

    /// # Panics
    ///
    /// Panics if `coords` is outside the field.
    pub fn cell_at(&self, coords: Coord2) -> &Cell {
        &self.grid[coords.to_nd_index()]
    }

    pub fn is_mine(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_mine(&self.mines)
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_revealed()
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_flagged()
    }

    pub fn annotation(&self, coords: Coord2) -> u8 {
        self.cell_at(coords).annotation()
    }

    pub fn tile_at(&self, coords: Coord2) -> Tile {
        let cell = self.cell_at(coords);

        if self.exploded == Some(coords) {
            Tile::Exploded
        } else if cell.is_revealed() {
            Tile::Open(cell.annotation())
        } else if cell.is_flagged() {
            if self.state.outcome == Outcome::Lost && !cell.is_mine(&self.mines) {
                Tile::IncorrectFlag
            } else {
                Tile::Flag
            }
        } else if cell.is_mine_shown() {
            Tile::Mine
        } else {
            Tile::Closed
        }
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter()
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.mines.validate_coords(coords)?;
        if self.is_frozen() {
            return Ok(MarkOutcome::NoChange);
        }

        let cell = &mut self.grid[coords.to_nd_index()];
        let outcome = cell.toggle_flag();
        if outcome.has_update() {
            if cell.is_flagged() {
                self.flag_count += 1;
            } else {
                self.flag_count -= 1;
            }
        }
        Ok(outcome)
    }

    /// Opens a cell on player request and returns the outcome once the cascade settled.
    ///
    /// Flagged or already revealed cells and finished games are left untouched.
    pub fn activate(&mut self, coords: Coord2) -> Result<Outcome> {
        let coords = self.mines.validate_coords(coords)?;

        if self.is_frozen() {
            log::trace!("Ignoring {:?}, game already ended", coords);
            return Ok(self.state.outcome);
        }

        let cell = self.grid[coords.to_nd_index()];
        if cell.is_flagged() || cell.is_revealed() {
            return Ok(self.state.outcome);
        }

        if cell.is_mine(&self.mines) {
            self.exploded = Some(coords);
            self.end_game(Outcome::Lost);
            return Ok(self.state.outcome);
        }

        let opened = self.cascade(coords);
        self.state.score += opened;
        log::debug!(
            "Opened {} cells from {:?}, score: {}/{}",
            opened,
            coords,
            self.state.score,
            self.state.winning_score
        );

        if self.state.score == self.state.winning_score {
            self.end_game(Outcome::Won);
        }
        Ok(self.state.outcome)
    }

    /// Flood-fills from `start`, returns how many cells were newly revealed.
    fn cascade(&mut self, start: Coord2) -> CellCount {
        let mut opened = 0;
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            let cell = &mut self.grid[coords.to_nd_index()];

            // a cascade never walks into a mine, even if one got queued
            if cell.is_mine(&self.mines) || !cell.reveal() {
                continue;
            }
            opened += 1;

            let nearby_mines = self.mines.adjacent_mine_count(coords);
            if nearby_mines > 0 {
                cell.annotate(nearby_mines);
                log::trace!("Opened {:?}, nearby mines: {}", coords, nearby_mines);
                continue;
            }

            log::trace!("Opened {:?}, spreading to neighbors", coords);
            let grid = &self.grid;
            let mines = &self.mines;
            to_visit.extend(mines.iter_neighbors(coords).filter(|&pos| {
                let neighbor = &grid[pos.to_nd_index()];
                !neighbor.is_revealed() && !neighbor.is_flagged() && !mines.contains(pos)
            }));
        }

        opened
    }

    /// Freezes the field and uncovers every mine.
    fn end_game(&mut self, outcome: Outcome) {
        if self.state.outcome.is_final() {
            return;
        }
        self.state.outcome = outcome;

        for mine in &self.mines {
            self.grid[mine.coords().to_nd_index()].show_mine();
        }

        log::debug!(
            "Game ended {:?} with score {}/{}",
            outcome,
            self.state.score,
            self.state.winning_score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(side: Coord, mines: &[Coord2]) -> FieldEngine {
        FieldEngine::new(MineSet::from_coords(side, mines).unwrap())
    }

    fn revealed_count(engine: &FieldEngine) -> usize {
        engine.cells().filter(|cell| cell.is_revealed()).count()
    }

    #[test]
    fn generate_resets_state() {
        let config = GameConfig::for_difficulty(Difficulty::Medium);
        let engine = FieldEngine::generate(config, ShuffleMineGenerator::new(5)).unwrap();

        assert_eq!(engine.side(), 9);
        assert_eq!(engine.mines().len(), 16);
        assert_eq!(
            engine.state(),
            GameState {
                score: 0,
                winning_score: 65,
                outcome: Outcome::Continuing,
            }
        );
        assert_eq!(revealed_count(&engine), 0);
    }

    #[test]
    fn generate_propagates_config_errors() {
        let config = GameConfig::custom(2, 4);

        assert_eq!(
            FieldEngine::generate(config, ShuffleMineGenerator::new(5)),
            Err(GameError::TooManyMines { mines: 4, cells: 4 })
        );
    }

    #[test]
    fn grid_cells_know_their_coords() {
        let engine = engine(3, &[]);

        assert_eq!(engine.cell_at((2, 1)).coords(), (2, 1));
    }

    #[test]
    fn zero_cell_cascades_to_win() {
        let mut engine = engine(3, &[(0, 0)]);

        assert_eq!(engine.activate((2, 2)).unwrap(), Outcome::Won);
        assert_eq!(engine.current_score(), 8);
        assert_eq!(revealed_count(&engine), 8);
        assert_eq!(engine.annotation((1, 1)), 1);
        assert_eq!(engine.annotation((2, 2)), 0);
        assert!(!engine.is_revealed((0, 0)));
        assert_eq!(engine.tile_at((0, 0)), Tile::Mine);
    }

    #[test]
    fn activating_mine_loses_without_scoring() {
        let mut engine = engine(3, &[(0, 0)]);

        assert_eq!(engine.activate((0, 0)).unwrap(), Outcome::Lost);
        assert_eq!(engine.current_score(), 0);
        assert_eq!(engine.exploded(), Some((0, 0)));
        assert_eq!(engine.tile_at((0, 0)), Tile::Exploded);
        assert!(!engine.is_revealed((0, 0)));
    }

    #[test]
    fn numbered_cell_stops_cascade() {
        let mut engine = engine(3, &[(0, 0), (0, 2)]);

        assert_eq!(engine.activate((0, 1)).unwrap(), Outcome::Continuing);
        assert_eq!(engine.annotation((0, 1)), 2);
        assert_eq!(engine.tile_at((0, 1)), Tile::Open(2));
        assert_eq!(engine.current_score(), 1);
        assert_eq!(revealed_count(&engine), 1);
    }

    #[test]
    fn cascade_stays_inside_its_region() {
        // a wall of mines in column 2 splits the field
        let mut engine = engine(4, &[(0, 2), (1, 2), (2, 2), (3, 2)]);

        assert_eq!(engine.activate((0, 0)).unwrap(), Outcome::Continuing);
        assert_eq!(engine.current_score(), 8);
        for row in 0..4 {
            assert_eq!(engine.tile_at((row, 0)), Tile::Open(0));
            assert!(engine.is_revealed((row, 1)));
            assert!(!engine.is_revealed((row, 3)));
        }
        assert_eq!(engine.annotation((0, 1)), 2);
        assert_eq!(engine.annotation((1, 1)), 3);
        assert_eq!(engine.annotation((2, 1)), 3);
        assert_eq!(engine.annotation((3, 1)), 2);
    }

    #[test]
    fn cascade_never_detonates() {
        let mut engine = engine(5, &[(0, 4), (4, 0), (2, 4)]);

        assert_ne!(engine.activate((2, 0)).unwrap(), Outcome::Lost);
        assert_eq!(engine.exploded(), None);
        for mine in engine.mines() {
            assert!(!engine.is_revealed(mine.coords()));
        }
        assert_eq!(engine.current_score() as usize, revealed_count(&engine));
    }

    #[test]
    fn activating_revealed_cell_is_noop() {
        let mut engine = engine(3, &[(0, 0), (0, 2)]);

        engine.activate((1, 1)).unwrap();
        let before = engine.clone();

        assert_eq!(engine.activate((1, 1)).unwrap(), Outcome::Continuing);
        assert_eq!(engine, before);
    }

    #[test]
    fn flagged_cell_ignores_activation() {
        let mut engine = engine(3, &[(0, 0)]);

        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.activate((0, 0)).unwrap(), Outcome::Continuing);
        assert_eq!(engine.exploded(), None);
        assert_eq!(engine.flag_count(), 1);
        assert_eq!(engine.mines_left(), 0);

        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.activate((0, 0)).unwrap(), Outcome::Lost);
    }

    #[test]
    fn cascade_skips_flagged_cells() {
        let mut engine = engine(3, &[(0, 0)]);
        engine.toggle_flag((2, 0)).unwrap();

        assert_eq!(engine.activate((2, 2)).unwrap(), Outcome::Continuing);
        assert_eq!(engine.current_score(), 7);
        assert!(engine.is_flagged((2, 0)));
        assert!(!engine.is_revealed((2, 0)));

        engine.toggle_flag((2, 0)).unwrap();
        assert_eq!(engine.activate((2, 0)).unwrap(), Outcome::Won);
        assert_eq!(engine.current_score(), 8);
    }

    #[test]
    fn revealed_cell_cannot_be_flagged() {
        let mut engine = engine(3, &[(0, 0)]);
        engine.activate((0, 1)).unwrap();

        assert_eq!(engine.toggle_flag((0, 1)).unwrap(), MarkOutcome::NoChange);
        assert!(!engine.is_flagged((0, 1)));
        assert_eq!(engine.flag_count(), 0);
    }

    #[test]
    fn finished_game_is_frozen() {
        let mut engine = engine(3, &[(0, 0), (2, 2)]);
        engine.activate((0, 0)).unwrap();

        assert!(engine.is_frozen());
        assert_eq!(engine.activate((1, 0)).unwrap(), Outcome::Lost);
        assert!(!engine.is_revealed((1, 0)));
        assert_eq!(engine.toggle_flag((1, 0)).unwrap(), MarkOutcome::NoChange);
    }

    #[test]
    fn loss_uncovers_mines_and_wrong_flags() {
        let mut engine = engine(3, &[(0, 0), (2, 2)]);
        engine.toggle_flag((1, 1)).unwrap();
        engine.toggle_flag((2, 2)).unwrap();
        engine.activate((0, 0)).unwrap();

        assert_eq!(engine.tile_at((0, 0)), Tile::Exploded);
        assert_eq!(engine.tile_at((1, 1)), Tile::IncorrectFlag);
        assert_eq!(engine.tile_at((2, 2)), Tile::Flag);
        assert_eq!(engine.tile_at((0, 1)), Tile::Closed);
    }

    #[test]
    fn win_by_opening_numbered_cells() {
        let mut engine = engine(2, &[(0, 0)]);

        assert_eq!(engine.activate((1, 1)).unwrap(), Outcome::Continuing);
        assert_eq!(engine.activate((0, 1)).unwrap(), Outcome::Continuing);
        assert_eq!(engine.activate((1, 0)).unwrap(), Outcome::Won);
        assert_eq!(engine.current_score(), engine.winning_score());
        assert_eq!(engine.tile_at((0, 0)), Tile::Mine);
        assert_eq!(engine.exploded(), None);
    }

    #[test]
    fn mine_free_field_opens_at_once() {
        let mut engine = engine(3, &[]);

        assert_eq!(engine.activate((1, 1)).unwrap(), Outcome::Won);
        assert_eq!(engine.current_score(), 9);
    }

    #[test]
    fn out_of_range_coords_are_rejected() {
        let mut engine = engine(3, &[(0, 0)]);

        assert_eq!(engine.activate((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.toggle_flag((0, 3)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn mine_set_must_leave_a_safe_cell() {
        assert_eq!(
            MineSet::from_coords(2, &[(0, 0), (0, 1), (1, 0), (1, 1)]),
            Err(GameError::TooManyMines { mines: 4, cells: 4 })
        );

        let mut engine = engine(2, &[(0, 0), (0, 1), (1, 0)]);
        assert_eq!(engine.winning_score(), 1);
        assert_eq!(engine.activate((1, 1)).unwrap(), Outcome::Won);
    }

    #[test]
    fn mines_left_goes_negative_with_extra_flags() {
        let mut engine = engine(3, &[(0, 0)]);
        engine.toggle_flag((1, 1)).unwrap();
        engine.toggle_flag((2, 2)).unwrap();

        assert_eq!(engine.mines_left(), -1);
    }

    #[test]
    fn snapshot_with_mismatched_field_is_rejected() {
        let small = engine(2, &[(0, 0)]);
        let large = engine(4, &[(3, 3)]);
        let mut json = serde_json::to_value(&small).unwrap();
        json["mines"] = serde_json::to_value(large.mines()).unwrap();

        assert!(serde_json::from_value::<FieldEngine>(json).is_err());
    }

    #[test]
    fn snapshot_with_wrong_counters_is_rejected() {
        let mut engine = engine(3, &[(0, 0)]);
        engine.activate((0, 1)).unwrap();
        engine.toggle_flag((2, 2)).unwrap();
        let json = serde_json::to_value(&engine).unwrap();

        let mut flags = json.clone();
        flags["flag_count"] = serde_json::json!(0);
        assert!(serde_json::from_value::<FieldEngine>(flags).is_err());

        let mut score = json.clone();
        score["state"]["score"] = serde_json::json!(5);
        assert!(serde_json::from_value::<FieldEngine>(score).is_err());

        let mut exploded = json;
        exploded["exploded"] = serde_json::json!([2, 2]);
        assert!(serde_json::from_value::<FieldEngine>(exploded).is_err());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut engine = engine(3, &[(0, 0), (0, 2)]);
        engine.activate((2, 0)).unwrap();
        engine.toggle_flag((0, 0)).unwrap();

        let json = serde_json::to_string(&engine).unwrap();
        let restored: FieldEngine = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, engine);
    }
}
