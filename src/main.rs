//! Lifemerge headless runner
//!
//! Plays a seeded autoplay game and prints one JSON line per committed turn
//! (telemetry events) followed by the final board snapshot.
//!
//! Usage: `lifemerge [seed] [turns]`

#[cfg(not(target_arch = "wasm32"))]
use lifemerge::sim::{TelemetrySink, TurnEvent};

/// Writes each event as a JSON line on stdout
#[cfg(not(target_arch = "wasm32"))]
struct StdoutSink;

#[cfg(not(target_arch = "wasm32"))]
impl TelemetrySink for StdoutSink {
    fn record(&mut self, event: &TurnEvent) {
        print_json(event);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lifemerge::sim::{GameSession, TelemetryTracker, direction_script};
    use lifemerge::{DifficultyConfig, FeatureFlags};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345u64);
    let turns = args.next().and_then(|s| s.parse().ok()).unwrap_or(50usize);

    log::info!("Lifemerge (native) starting: seed={seed} turns={turns}");

    let flags = FeatureFlags::default();
    let mut session = GameSession::new(DifficultyConfig::early(), flags, seed);
    let mut tracker = TelemetryTracker::new(StdoutSink, flags.telemetry);

    for heading in direction_script(seed, turns) {
        if session.is_game_over {
            break;
        }
        match session.swipe(heading) {
            Ok(Some(_)) => {
                if let Some(event) = &session.last_event {
                    tracker.emit(event);
                }
            }
            Ok(None) => log::trace!("Swipe {heading:?} moved nothing"),
            Err(e) => {
                log::error!("Autoplay aborted: {e}");
                std::process::exit(1);
            }
        }
    }

    print_json(&session.snapshot());
    log::info!(
        "Finished: {} turns, score {:.2}, streak {}, {} events, game over: {}",
        session.turn_number,
        session.score,
        session.streak.streak,
        tracker.emitted(),
        session.is_game_over
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(e) => log::warn!("Failed to serialize output: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
