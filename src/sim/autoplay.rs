//! Reproducible swipe scripts for headless play and replay tests

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::session::{GameSession, TurnMetrics};
use super::swipe::Compass;
use crate::error::EngineError;

const HEADINGS: [Compass; 4] = [Compass::N, Compass::E, Compass::S, Compass::W];

/// A fixed list of swipes derived from a seed
pub fn direction_script(seed: u64, turns: usize) -> Vec<Compass> {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..turns)
        .map(|_| HEADINGS[rng.random_range(0..HEADINGS.len())])
        .collect()
}

/// Summary of a scripted run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoplayReport {
    /// Swipes taken from the script (including no-ops)
    pub attempted: usize,
    /// Swipes that moved something and were committed
    pub committed: Vec<TurnMetrics>,
    pub final_score: f64,
    pub game_over: bool,
}

/// Feed `script` to `session`, stopping early if the game ends
pub fn play(session: &mut GameSession, script: &[Compass]) -> Result<AutoplayReport, EngineError> {
    let mut committed = Vec::new();
    let mut attempted = 0;

    for &heading in script {
        if session.is_game_over {
            break;
        }
        attempted += 1;
        if let Some(metrics) = session.swipe(heading)? {
            committed.push(metrics);
        }
    }

    log::debug!(
        "autoplay: {attempted} swipes, {} committed, score {:.2}",
        committed.len(),
        session.score
    );

    Ok(AutoplayReport {
        attempted,
        committed,
        final_score: session.score,
        game_over: session.is_game_over,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DifficultyConfig, FeatureFlags};

    #[test]
    fn test_script_is_reproducible() {
        assert_eq!(direction_script(5, 32), direction_script(5, 32));
        assert_eq!(direction_script(5, 32).len(), 32);
        assert_ne!(direction_script(5, 32), direction_script(6, 32));
    }

    #[test]
    fn test_play_counts_swipes() {
        let mut session = GameSession::new(DifficultyConfig::early(), FeatureFlags::default(), 11);
        let script = direction_script(11, 20);

        let report = play(&mut session, &script).unwrap();

        assert!(report.attempted <= script.len());
        assert_eq!(report.committed.len(), session.turn_number as usize);
        assert_eq!(report.final_score, session.score);
    }
}
