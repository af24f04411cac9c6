//! Runs the deterministic even-parity recognizer over a few inputs.
//!
//! Usage: `cargo run --example classical_parity -- 1010 111 0`

use qstm::{AutomatonError, ClassicalMachine, NoopObserver};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), AutomatonError> {
    let mut inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        inputs = vec!["1010".to_string(), "10101".to_string(), String::new()];
    }

    // The table never branches, so the seed has no influence on the verdict.
    let mut rng = StdRng::seed_from_u64(0);
    for input in &inputs {
        let mut machine = ClassicalMachine::classical_parity(input)?;
        let outcome = machine.run(&mut rng, &mut NoopObserver)?;
        println!("{:>8} -> {} after {} steps", format!("'{}'", input), outcome.verdict(), outcome.steps());
    }
    Ok(())
}
