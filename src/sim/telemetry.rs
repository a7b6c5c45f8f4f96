//! Per-turn telemetry records
//!
//! The core only assembles events. Transport and storage belong to whatever
//! [`TelemetrySink`] the caller installs.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::neighbors::NeighborCache;
use super::turn::TurnOutcome;

/// Flat per-turn record consumed by telemetry collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnEvent {
    pub births: u32,
    pub deaths: u32,
    pub merges: u32,
    pub average_energy: f64,
    pub isolated_cells: u32,
    pub blight_hits: u32,
    pub catalyst_uses: u32,
    pub stability_streak: u32,
}

impl TurnEvent {
    pub fn from_outcome(outcome: &TurnOutcome) -> Self {
        let alive = outcome.grid.count_where(|cell| cell.is_alive());
        let alive_energy: u64 = outcome
            .grid
            .cells()
            .iter()
            .filter(|cell| cell.is_alive())
            .map(|cell| u64::from(cell.energy()))
            .sum();
        let average_energy = if alive == 0 {
            0.0
        } else {
            alive_energy as f64 / alive as f64
        };

        Self {
            births: outcome.births,
            deaths: outcome.deaths,
            merges: outcome.merges,
            average_energy,
            isolated_cells: isolated_cells(&outcome.grid),
            blight_hits: outcome.blight_conversions,
            catalyst_uses: outcome.catalyst_uses,
            stability_streak: outcome.streak.streak,
        }
    }
}

/// Alive cells with at most one alive neighbor
pub fn isolated_cells(grid: &Grid) -> u32 {
    let cache = NeighborCache::new(grid);
    grid.iter()
        .filter(|(pos, cell)| cell.is_alive() && cache.at(*pos) <= 1)
        .count() as u32
}

/// Receives assembled turn events
pub trait TelemetrySink {
    fn record(&mut self, event: &TurnEvent);
}

/// Sink that keeps every event in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub events: Vec<TurnEvent>,
}

impl TelemetrySink for MemorySink {
    fn record(&mut self, event: &TurnEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards events to a sink when telemetry is enabled
pub struct TelemetryTracker<S: TelemetrySink> {
    sink: S,
    enabled: bool,
    emitted: u64,
}

impl<S: TelemetrySink> TelemetryTracker<S> {
    pub fn new(sink: S, enabled: bool) -> Self {
        Self {
            sink,
            enabled,
            emitted: 0,
        }
    }

    /// Build an event from `outcome` and forward it; returns the event when sent
    pub fn track(&mut self, outcome: &TurnOutcome) -> Option<TurnEvent> {
        if !self.enabled {
            return None;
        }
        let event = TurnEvent::from_outcome(outcome);
        self.emit(&event);
        Some(event)
    }

    pub fn emit(&mut self, event: &TurnEvent) {
        if !self.enabled {
            return;
        }
        self.sink.record(event);
        self.emitted += 1;
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::cell::Cell;
    use crate::sim::scoring::StreakState;

    fn outcome(grid: Grid) -> TurnOutcome {
        TurnOutcome {
            grid,
            score: 12.0,
            streak: StreakState {
                streak: 4,
                multiplier: 1.75,
            },
            turn_score: 7.0,
            total_energy: 4,
            moved: true,
            merges: 2,
            births: 1,
            deaths: 0,
            dormancy_conversions: 0,
            decays: 0,
            blight_conversions: 3,
            blight_spawns: 0,
            catalyst_spawns: 1,
            catalyst_uses: 1,
            stability_incremented: false,
        }
    }

    #[test]
    fn test_event_from_outcome() {
        let grid = Grid::from_rows(vec![
            vec![Cell::alive(3), Cell::alive(1), Cell::Empty],
            vec![Cell::Empty, Cell::Empty, Cell::Empty],
            vec![Cell::dormant(5), Cell::Empty, Cell::alive(2)],
        ]);
        let event = TurnEvent::from_outcome(&outcome(grid));

        assert_eq!(event.births, 1);
        assert_eq!(event.merges, 2);
        assert_eq!(event.average_energy, 2.0);
        assert_eq!(event.isolated_cells, 3);
        assert_eq!(event.blight_hits, 3);
        assert_eq!(event.catalyst_uses, 1);
        assert_eq!(event.stability_streak, 4);
    }

    #[test]
    fn test_empty_board_average_is_zero() {
        let event = TurnEvent::from_outcome(&outcome(Grid::from_rows(vec![vec![Cell::Empty]])));
        assert_eq!(event.average_energy, 0.0);
        assert_eq!(event.isolated_cells, 0);
    }

    #[test]
    fn test_tracker_respects_enabled_flag() {
        let grid = Grid::from_rows(vec![vec![Cell::alive(1)]]);

        let mut tracker = TelemetryTracker::new(MemorySink::default(), true);
        assert!(tracker.track(&outcome(grid.clone())).is_some());
        assert_eq!(tracker.emitted(), 1);
        assert_eq!(tracker.sink().events.len(), 1);

        let mut muted = TelemetryTracker::new(MemorySink::default(), false);
        assert!(muted.track(&outcome(grid)).is_none());
        assert!(muted.into_sink().events.is_empty());
    }

    #[test]
    fn test_event_json_is_camel_case() {
        let event = TurnEvent::from_outcome(&outcome(Grid::from_rows(vec![vec![Cell::alive(2)]])));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["averageEnergy"], 2.0);
        assert_eq!(json["stabilityStreak"], 4);
    }
}
