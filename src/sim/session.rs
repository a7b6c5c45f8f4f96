//! Game session state
//!
//! Everything needed to continue or replay a game lives here and is
//! serializable, including the random source.

use serde::{Deserialize, Serialize};

use super::grid::{Grid, GridDims, create_grid};
use super::rng::SeededRng;
use super::scoring::StreakState;
use super::snapshot::{BoardSnapshot, check_win_condition, is_game_over, total_energy};
use super::swipe::Compass;
use super::telemetry::TurnEvent;
use super::turn::{TurnContext, TurnOutcome, execute_turn};
use crate::config::{DifficultyConfig, EngineConfig, FeatureFlags};
use crate::error::EngineError;

/// Counters recorded for every committed turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnMetrics {
    pub turn_number: u32,
    pub moved: bool,
    pub merges: u32,
    pub births: u32,
    pub deaths: u32,
    pub dormancy_conversions: u32,
    pub decays: u32,
    pub blight_conversions: u32,
    pub blight_spawns: u32,
    pub catalyst_spawns: u32,
    pub catalyst_uses: u32,
    pub turn_score: f64,
    pub total_energy: u64,
    pub stability_incremented: bool,
}

impl TurnMetrics {
    fn from_outcome(turn_number: u32, outcome: &TurnOutcome) -> Self {
        Self {
            turn_number,
            moved: outcome.moved,
            merges: outcome.merges,
            births: outcome.births,
            deaths: outcome.deaths,
            dormancy_conversions: outcome.dormancy_conversions,
            decays: outcome.decays,
            blight_conversions: outcome.blight_conversions,
            blight_spawns: outcome.blight_spawns,
            catalyst_spawns: outcome.catalyst_spawns,
            catalyst_uses: outcome.catalyst_uses,
            turn_score: outcome.turn_score,
            total_energy: outcome.total_energy,
            stability_incremented: outcome.stability_incremented,
        }
    }
}

/// A running game (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Random source shared by seeding and hazard spawns
    pub rng: SeededRng,
    pub grid: Grid,
    pub score: f64,
    pub streak: StreakState,
    /// Energy held by alive cells after the last committed turn
    pub total_energy: u64,
    /// Committed turns so far
    pub turn_number: u32,
    pub is_game_over: bool,
    pub has_won: bool,
    pub difficulty: DifficultyConfig,
    pub flags: FeatureFlags,
    pub config: EngineConfig,
    /// Metrics for every committed turn, oldest first
    pub metrics: Vec<TurnMetrics>,
    /// Telemetry record of the last committed turn
    #[serde(default)]
    pub last_event: Option<TurnEvent>,
}

impl GameSession {
    /// Start a new game on a freshly seeded board
    pub fn new(difficulty: DifficultyConfig, flags: FeatureFlags, seed: u64) -> Self {
        let mut rng = SeededRng::new(seed);
        let grid = create_grid(GridDims::square(difficulty.board_size), &mut rng);
        let config = EngineConfig::from_difficulty(&difficulty, &flags);

        log::info!(
            "New game: difficulty={} board={}x{} seed={}",
            difficulty.name,
            grid.rows(),
            grid.cols(),
            seed
        );

        Self {
            seed,
            rng,
            total_energy: total_energy(&grid),
            grid,
            score: 0.0,
            streak: StreakState::default(),
            turn_number: 0,
            is_game_over: false,
            has_won: false,
            difficulty,
            flags,
            config,
            metrics: Vec::new(),
            last_event: None,
        }
    }

    /// Play one swipe
    ///
    /// Returns the committed turn's metrics, or `None` when the game is over
    /// or the swipe moved nothing (the session is left untouched).
    pub fn swipe(&mut self, heading: Compass) -> Result<Option<TurnMetrics>, EngineError> {
        if self.is_game_over {
            log::debug!("Ignoring swipe {heading:?}: game over");
            return Ok(None);
        }

        let ctx = TurnContext {
            grid: &self.grid,
            direction: heading.into(),
            config: &self.config,
            streak: self.streak,
            score: self.score,
        };
        // Scratch copy so a no-op swipe leaves the session's random source untouched
        let mut rng = self.rng.clone();
        let outcome = execute_turn(&ctx, Some(&mut rng))?;
        if !outcome.moved {
            return Ok(None);
        }

        self.rng = rng;
        Ok(Some(self.commit(outcome)))
    }

    fn commit(&mut self, outcome: TurnOutcome) -> TurnMetrics {
        self.turn_number += 1;
        let metrics = TurnMetrics::from_outcome(self.turn_number, &outcome);
        self.last_event = Some(TurnEvent::from_outcome(&outcome));

        self.grid = outcome.grid;
        self.score = outcome.score;
        self.streak = outcome.streak;
        self.total_energy = total_energy(&self.grid);

        if !self.has_won
            && check_win_condition(
                self.total_energy,
                outcome.stability_incremented,
                self.difficulty.stabilize_threshold,
            )
        {
            self.has_won = true;
            log::info!("Board stabilized at turn {} (energy {})", self.turn_number, self.total_energy);
        }

        if is_game_over(&self.grid) {
            self.is_game_over = true;
            log::info!("Game over at turn {} with score {:.2}", self.turn_number, self.score);
        }

        self.metrics.push(metrics.clone());
        metrics
    }

    /// Restart with the same seed, difficulty and flags
    pub fn reset(&mut self) {
        *self = Self::new(self.difficulty.clone(), self.flags, self.seed);
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_grid(&self.grid)
    }

    pub fn last_metrics(&self) -> Option<&TurnMetrics> {
        self.metrics.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::cell::Cell;
    use crate::sim::grid::Position;

    fn session(seed: u64) -> GameSession {
        GameSession::new(DifficultyConfig::early(), FeatureFlags::default(), seed)
    }

    #[test]
    fn test_new_session_seeds_board() {
        let game = session(42);
        assert_eq!(game.grid.rows(), 6);
        assert_eq!(game.grid.cols(), 6);
        assert!((2..=4).contains(&game.grid.count_where(Cell::is_alive)));
        assert_eq!(game.turn_number, 0);
        assert!(!game.is_game_over);
    }

    #[test]
    fn test_no_op_swipe_is_not_committed() {
        let mut game = session(1);
        game.grid = Grid::from_rows(vec![vec![Cell::alive(2), Cell::Empty]]);
        game.config.catalyst = None;
        let before = game.clone();

        let result = game.swipe(Compass::W).unwrap();

        assert!(result.is_none());
        assert_eq!(game.grid, before.grid);
        assert_eq!(game.rng, before.rng);
        assert_eq!(game.turn_number, 0);
        assert!(game.metrics.is_empty());
    }

    #[test]
    fn test_committed_swipe_updates_state() {
        let mut game = session(1);
        game.config.catalyst = None;
        let mut grid = Grid::new(GridDims::square(4));
        grid.set(Position::new(0, 3), Cell::alive(2));
        game.grid = grid;

        let metrics = game.swipe(Compass::W).unwrap().expect("cell slides left");

        assert_eq!(metrics.turn_number, 1);
        assert_eq!(game.turn_number, 1);
        assert_eq!(game.metrics.len(), 1);
        assert_eq!(game.last_event.as_ref().map(|e| e.deaths), Some(1));
        // Lone cell dies in the life tick
        assert_eq!(metrics.deaths, 1);
        assert_eq!(game.streak, StreakState::default());
    }

    #[test]
    fn test_full_board_ends_game_and_blocks_swipes() {
        let mut game = session(9);
        game.config.catalyst = None;
        game.grid = Grid::from_rows(vec![
            vec![Cell::blight(5), Cell::blight(5)],
            vec![Cell::Empty, Cell::alive(1)],
        ]);
        game.config.life = crate::config::LifeRules::new(&[0, 1, 2], &[0, 1, 2]);

        let metrics = game.swipe(Compass::W).unwrap();
        assert!(metrics.is_some());
        assert!(game.is_game_over);

        assert!(game.swipe(Compass::E).unwrap().is_none());
        assert_eq!(game.turn_number, 1);
    }

    #[test]
    fn test_reset_restores_initial_board() {
        let mut game = session(77);
        let initial = game.grid.clone();
        for heading in [Compass::N, Compass::E, Compass::S, Compass::W] {
            let _ = game.swipe(heading).unwrap();
        }
        game.reset();
        assert_eq!(game.grid, initial);
        assert_eq!(game.turn_number, 0);
        assert_eq!(game.score, 0.0);
    }
}
