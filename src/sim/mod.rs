//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Every stage takes a snapshot and returns a new one
//! - Seeded RNG only
//! - Stable iteration order (row-major cells, field-order particles)
//! - No rendering, input or platform dependencies

pub mod autoplay;
pub mod cell;
pub mod decay;
pub mod dormancy;
pub mod grid;
pub mod hazards;
pub mod life;
pub mod merge;
pub mod neighbors;
pub mod particle;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod swipe;
pub mod telemetry;
pub mod turn;

pub use autoplay::{AutoplayReport, direction_script, play};
pub use cell::{Cell, CellKind};
pub use decay::{DecayResult, apply_isolation_decay};
pub use dormancy::{DormancyResult, update_dormancy};
pub use grid::{CellMarks, Grid, GridDims, Position, create_grid};
pub use hazards::{BlightResult, SpawnResult, apply_blight, is_shielded, spawn_blight, spawn_catalyst};
pub use life::{LifeTickResult, life_tick};
pub use merge::{MergeContext, apply_catalyst, merge_cells, merged_energy};
pub use neighbors::NeighborCache;
pub use rng::{RandomSource, SeededRng, pick_index};
pub use scoring::{ScoreResult, StreakState, streak_multiplier, tally_score, update_streak};
pub use session::{GameSession, TurnMetrics};
pub use snapshot::{BoardSnapshot, SerializedCell, check_win_condition, is_game_over, total_energy};
pub use swipe::{Compass, Direction, SwipeOptions, SwipeResult, apply_swipe};
pub use telemetry::{MemorySink, TelemetrySink, TelemetryTracker, TurnEvent};
pub use turn::{TurnContext, TurnOutcome, execute_turn};
