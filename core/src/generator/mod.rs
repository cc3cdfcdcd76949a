use crate::*;
pub use rejection::*;
pub use shuffle::*;

mod rejection;
mod shuffle;

/// Strategy for placing the mines of a new game.
pub trait MineGenerator {
    fn generate(self, config: GameConfig) -> Result<MineSet>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    #[default]
    Shuffle,
    Rejection,
}

impl GeneratorKind {
    pub fn seeded(self, seed: u64) -> AnyMineGenerator {
        match self {
            Self::Shuffle => AnyMineGenerator::Shuffle(ShuffleMineGenerator::new(seed)),
            Self::Rejection => AnyMineGenerator::Rejection(RejectionMineGenerator::new(seed)),
        }
    }
}

/// Generator picked at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyMineGenerator {
    Shuffle(ShuffleMineGenerator),
    Rejection(RejectionMineGenerator),
}

impl MineGenerator for AnyMineGenerator {
    fn generate(self, config: GameConfig) -> Result<MineSet> {
        match self {
            Self::Shuffle(generator) => generator.generate(config),
            Self::Rejection(generator) => generator.generate(config),
        }
    }
}
