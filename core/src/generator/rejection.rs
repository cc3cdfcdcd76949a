use alloc::vec::Vec;

use super::*;

/// Samples uniform coordinates and throws away the ones already taken.
///
/// Gets slow as the field fills up, prefer [`ShuffleMineGenerator`] for dense fields.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectionMineGenerator {
    seed: u64,
}

impl RejectionMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RejectionMineGenerator {
    fn generate(self, config: GameConfig) -> Result<MineSet> {
        use rand::prelude::*;

        // must happen before sampling, a full field would never terminate
        let config = config.validate()?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines: Vec<Mine> = Vec::with_capacity(usize::from(config.mines));
        let mut rejected = 0usize;

        while mines.len() < usize::from(config.mines) {
            let mine = Mine::new(
                rng.random_range(0..config.side),
                rng.random_range(0..config.side),
            );
            if mine.is_duplicate(&mines) {
                rejected += 1;
                continue;
            }
            mines.push(mine);
        }

        let mines = MineSet::from_mines(config.side, mines)?;
        log::debug!(
            "Generated {} mines on a {}x{} field with seed {:#x}, {} samples rejected",
            mines.len(),
            config.side,
            config.side,
            self.seed,
            rejected
        );
        Ok(mines)
    }
}
