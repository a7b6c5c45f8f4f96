//! Turn orchestrator
//!
//! One swipe runs the full pipeline in a fixed order:
//! catalyst spawn, blight spawn, swipe, life tick, dormancy, blight step,
//! isolation decay, scoring, streak update. Each stage reads the previous
//! stage's grid and nothing is observable until the whole turn completes.

use serde::{Deserialize, Serialize};

use super::decay::apply_isolation_decay;
use super::dormancy::update_dormancy;
use super::grid::Grid;
use super::hazards::{apply_blight, spawn_blight, spawn_catalyst};
use super::life::life_tick;
use super::rng::RandomSource;
use super::scoring::{StreakState, tally_score, update_streak};
use super::swipe::{Direction, apply_swipe};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Inputs for one turn
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub grid: &'a Grid,
    pub direction: Direction,
    pub config: &'a EngineConfig,
    pub streak: StreakState,
    pub score: f64,
}

/// Everything a turn changed
///
/// `moved == false` marks a no-op swipe; callers must not commit the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub grid: Grid,
    pub score: f64,
    pub streak: StreakState,
    pub turn_score: f64,
    pub total_energy: u64,
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
    pub stability_incremented: bool,
}

/// Run one complete turn
///
/// Fails with [`EngineError::MissingRng`] before touching anything when the
/// config enables hazards but no random source is given.
pub fn execute_turn(
    ctx: &TurnContext<'_>,
    mut rng: Option<&mut dyn RandomSource>,
) -> Result<TurnOutcome, EngineError> {
    let config = ctx.config;
    if config.has_hazards() && rng.is_none() {
        return Err(EngineError::MissingRng);
    }

    let mut grid = ctx.grid.clone();
    let mut catalyst_spawns = 0;
    let mut blight_spawns = 0;

    if let Some(rng) = rng.as_deref_mut() {
        if let Some(catalyst) = &config.catalyst {
            let spawn = spawn_catalyst(&grid, catalyst, rng);
            catalyst_spawns += u32::from(spawn.spawned);
            grid = spawn.grid;
        }
        if let Some(blight) = &config.blight {
            let spawn = spawn_blight(&grid, blight, rng);
            blight_spawns += u32::from(spawn.spawned);
            grid = spawn.grid;
        }
    }

    let swipe = apply_swipe(&grid, ctx.direction, &config.swipe_options())?;
    let life = life_tick(&swipe.grid, &config.life);
    let dormancy = update_dormancy(&life.grid, config.dormancy_threshold, &life.born);
    let blight = apply_blight(&dormancy.grid, &config.life);

    let (grid, decays) = match &config.decay {
        Some(decay) => {
            let result = apply_isolation_decay(&blight.grid, decay);
            (result.grid, result.decays)
        }
        None => (blight.grid, 0),
    };

    let had_birth_or_death = life.births > 0 || life.deaths > 0;
    let tally = tally_score(&grid, had_birth_or_death);
    let streak = update_streak(&ctx.streak, tally.stability_incremented);
    let turn_score = tally.total_energy as f64 * streak.multiplier;

    log::debug!(
        "turn {:?}: moved={} merges={} births={} deaths={} dormant={} blighted={} energy={} streak={}",
        ctx.direction,
        swipe.moved,
        swipe.merges,
        life.births,
        life.deaths,
        dormancy.converted,
        blight.conversions,
        tally.total_energy,
        streak.streak
    );

    Ok(TurnOutcome {
        grid,
        score: ctx.score + turn_score,
        streak,
        turn_score,
        total_energy: tally.total_energy,
        moved: swipe.moved,
        merges: swipe.merges,
        births: life.births,
        deaths: life.deaths,
        dormancy_conversions: dormancy.converted,
        decays,
        blight_conversions: blight.conversions,
        blight_spawns,
        catalyst_spawns,
        catalyst_uses: swipe.catalyst_uses,
        stability_incremented: tally.stability_incremented,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlightConfig, CatalystConfig};
    use crate::sim::cell::Cell;
    use crate::sim::grid::{GridDims, Position};
    use crate::sim::rng::SeededRng;
    use crate::sim::rng::testing::ScriptedRng;

    fn context<'a>(grid: &'a Grid, direction: Direction, config: &'a EngineConfig) -> TurnContext<'a> {
        TurnContext {
            grid,
            direction,
            config,
            streak: StreakState::default(),
            score: 0.0,
        }
    }

    #[test]
    fn test_blinker_turn_scores_births_and_deaths() {
        let mut grid = Grid::new(GridDims::square(5));
        for col in 1..=3 {
            grid.set(Position::new(2, col), Cell::alive(1));
        }
        grid.set(Position::new(0, 0), Cell::alive(1));
        let config = EngineConfig::default();

        let outcome = execute_turn(&context(&grid, Direction::Down, &config), None).unwrap();

        assert!(outcome.moved);
        assert!(outcome.births > 0);
        assert!(outcome.deaths > 0);
        assert!(!outcome.stability_incremented);
        assert_eq!(outcome.streak, StreakState::default());
        assert_eq!(outcome.score, outcome.turn_score);
    }

    #[test]
    fn test_stable_turn_extends_streak() {
        // Two columns of three collapse upward into a 2x2 block
        let mut grid = Grid::new(GridDims::square(4));
        for row in 1..=3 {
            grid.set(Position::new(row, 1), Cell::alive(2));
            grid.set(Position::new(row, 2), Cell::alive(2));
        }
        let config = EngineConfig::default();
        let ctx = TurnContext {
            streak: StreakState {
                streak: 1,
                multiplier: 1.0,
            },
            score: 10.0,
            ..context(&grid, Direction::Up, &config)
        };

        let outcome = execute_turn(&ctx, None).unwrap();

        assert!(outcome.moved);
        assert_eq!(outcome.merges, 2);
        assert_eq!(outcome.grid.cell(Position::new(0, 1)), &Cell::alive(3));
        assert_eq!(outcome.grid.cell(Position::new(1, 1)), &Cell::alive(2));
        assert!(outcome.stability_incremented);
        assert_eq!(outcome.streak.streak, 2);
        assert_eq!(outcome.total_energy, 10);
        assert_eq!(outcome.turn_score, 12.5);
        assert_eq!(outcome.score, 22.5);
    }

    #[test]
    fn test_missing_rng_fails_before_work() {
        let grid = Grid::from_rows(vec![vec![Cell::Empty, Cell::alive(1)]]);
        let config = EngineConfig {
            catalyst: Some(CatalystConfig {
                spawn_chance: 1.0,
                max_count: 1,
            }),
            ..EngineConfig::default()
        };

        let err = execute_turn(&context(&grid, Direction::Left, &config), None).unwrap_err();
        assert_eq!(err, EngineError::MissingRng);
    }

    #[test]
    fn test_catalyst_spawns_before_swipe() {
        let grid = Grid::from_rows(vec![vec![Cell::Empty, Cell::Empty, Cell::alive(2)]]);
        let config = EngineConfig {
            e_cap: 10,
            catalyst: Some(CatalystConfig {
                spawn_chance: 1.0,
                max_count: 1,
            }),
            ..EngineConfig::default()
        };
        // Chance draw, then index 1 of the two empties
        let mut rng = ScriptedRng::new(&[0.0, 0.6]);

        let outcome =
            execute_turn(&context(&grid, Direction::Left, &config), Some(&mut rng)).unwrap();

        assert_eq!(outcome.catalyst_spawns, 1);
        assert_eq!(outcome.catalyst_uses, 1);
        // Lone E=4 cell dies in the life tick
        assert_eq!(outcome.deaths, 1);
    }

    #[test]
    fn test_blight_step_runs_every_turn() {
        let grid = Grid::from_rows(vec![
            vec![Cell::blight(1), Cell::alive(3), Cell::alive(3)],
            vec![Cell::Empty, Cell::alive(1), Cell::Empty],
        ]);
        let config = EngineConfig {
            blight: Some(BlightConfig {
                spawn_chance: 0.0,
                linger: 1,
                max_tokens: None,
            }),
            ..EngineConfig::default()
        };
        let mut rng = SeededRng::new(3);

        let outcome =
            execute_turn(&context(&grid, Direction::Right, &config), Some(&mut rng)).unwrap();

        assert_eq!(outcome.blight_spawns, 0);
        assert!(!outcome.grid.cells().iter().any(Cell::is_blight));
    }

    #[test]
    fn test_outcome_does_not_mutate_input() {
        let grid = Grid::from_rows(vec![vec![Cell::alive(1), Cell::Empty, Cell::alive(1)]]);
        let before = grid.clone();
        let config = EngineConfig::default();
        let _ = execute_turn(&context(&grid, Direction::Left, &config), None).unwrap();
        assert_eq!(grid, before);
    }
}
