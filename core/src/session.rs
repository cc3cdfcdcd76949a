use rand::prelude::*;

use crate::*;

/// Front-end facing wrapper: picks difficulties, restarts games and keeps the high score.
#[derive(Clone, Debug)]
pub struct GameSession {
    rng: SmallRng,
    mines: CellCount,
    generator: GeneratorKind,
    difficulty: Difficulty,
    engine: Option<FieldEngine>,
    high_score: CellCount,
}

impl GameSession {
    pub fn new(seed: u64) -> Self {
        Self::with_mine_count(seed, DEFAULT_MINE_COUNT)
    }

    pub fn with_mine_count(seed: u64, mines: CellCount) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            mines,
            generator: GeneratorKind::default(),
            difficulty: Difficulty::default(),
            engine: None,
            high_score: 0,
        }
    }

    pub fn with_generator(mut self, generator: GeneratorKind) -> Self {
        self.generator = generator;
        self
    }

    /// Starts a new game, unknown difficulty names fall back to medium.
    pub fn start(&mut self, difficulty: &str) -> Result<&FieldEngine> {
        self.start_with(Difficulty::from_name(difficulty))
    }

    pub fn start_with(&mut self, difficulty: Difficulty) -> Result<&FieldEngine> {
        // the previous field is gone even if the new one can't be generated
        self.engine = None;
        self.difficulty = difficulty;

        let config = GameConfig::with_mines(difficulty, self.mines);
        let seed = self.rng.next_u64();
        let engine = FieldEngine::generate(config, self.generator.seeded(seed))?;
        log::debug!("Started {} game, seed: {:#x}", difficulty, seed);

        Ok(&*self.engine.insert(engine))
    }

    pub fn activate(&mut self, coords: Coord2) -> Result<Outcome> {
        let engine = self.engine.as_mut().ok_or(GameError::NoActiveGame)?;
        let outcome = engine.activate(coords)?;

        if outcome.is_final() && engine.current_score() > self.high_score {
            self.high_score = engine.current_score();
            log::info!("New high score: {}", self.high_score);
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.engine
            .as_mut()
            .ok_or(GameError::NoActiveGame)?
            .toggle_flag(coords)
    }

    pub fn engine(&self) -> Option<&FieldEngine> {
        self.engine.as_ref()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.engine.as_ref().map(FieldEngine::outcome)
    }

    /// Score of the current game, 0 when none was started.
    pub fn current_score(&self) -> CellCount {
        self.engine.as_ref().map_or(0, FieldEngine::current_score)
    }

    pub fn high_score(&self) -> CellCount {
        self.high_score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn mine_count(&self) -> CellCount {
        self.mines
    }
}
