use alloc::vec::Vec;

use super::*;

/// Shuffles every cell position and keeps the first ones as mines.
///
/// Runs in time linear to the field size no matter how dense it is.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleMineGenerator {
    seed: u64,
}

impl ShuffleMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for ShuffleMineGenerator {
    fn generate(self, config: GameConfig) -> Result<MineSet> {
        use rand::prelude::*;

        let config = config.validate()?;
        let side = CellCount::from(config.side);

        let mut positions: Vec<CellCount> = (0..config.total_cells()).collect();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let (chosen, _) = positions.partial_shuffle(&mut rng, usize::from(config.mines));

        // positions are below side * side so both parts fit in a coordinate
        let mines = chosen
            .iter()
            .map(|&pos| Mine::new((pos / side) as Coord, (pos % side) as Coord));
        let mines = MineSet::from_mines(config.side, mines)?;

        log::debug!(
            "Generated {} mines on a {}x{} field with seed {:#x}",
            mines.len(),
            config.side,
            config.side,
            self.seed
        );
        Ok(mines)
    }
}
