//! Runs the learning statistical machine over real-valued readings.
//!
//! Usage: `cargo run --example statistical_walk -- [seed] [reading...]`
//! Per-step events are emitted through `tracing` at DEBUG level.

use qstm::{AdaptiveConfig, AutomatonError, StatisticalMachine, TracingObserver};
use qstm::machines::threshold_walk;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), AutomatonError> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(7);
    let mut readings: Vec<f64> = args.filter_map(|s| s.parse().ok()).collect();
    if readings.is_empty() {
        readings = vec![0.7, 0.3, 0.8, 0.2];
    }

    let adaptive = AdaptiveConfig::default().with_confidence_threshold(0.5);
    let mut machine = StatisticalMachine::statistical(readings, threshold_walk, adaptive)?;
    let outcome = machine.run(&mut StdRng::seed_from_u64(seed), &mut TracingObserver)?;

    println!("{}", outcome);
    match outcome.is_confident() {
        Some(true) => println!("Observed pattern is stable."),
        Some(false) => println!("Observed pattern is not yet stable."),
        None => {}
    }
    Ok(())
}
