//! Steps the amplitude-weighted parity machine and prints the branch set
//! after every symbol, then collapses it once.
//!
//! Usage: `cargo run --example quantum_parity -- [input] [seed]`
//! Set `RUST_LOG`-style verbosity by editing the subscriber level below.

use qstm::{Amplitude, QuantumMachine, StepEvent, StepObserver, StepStatus, TracingObserver};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "1010".to_string());
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(42);

    let mut machine = match QuantumMachine::quantum_parity(&input) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to build machine: {}", e);
            return;
        }
    };

    println!("Input: '{}'  Seed: {}", input, seed);
    let mut console = |event: &StepEvent<'_, char, Amplitude>| {
        println!("Step {}: tape {}", event.step_index, event.tape);
        println!("  {}", event.branches);
    };

    // Drive the run by hand to show the lifecycle.
    machine.start();
    loop {
        match machine.step(&mut console) {
            Ok(StepStatus::Continue) => {}
            Ok(StepStatus::Halted) => break,
            Err(e) => {
                eprintln!("Run aborted: {}", e);
                return;
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    match machine.finish(&mut rng) {
        Ok(outcome) => {
            StepObserver::<char, Amplitude>::on_finish(&mut TracingObserver, &outcome);
            println!("{}", outcome);
        }
        Err(e) => eprintln!("Measurement failed: {}", e),
    }
}
