use std::time::Duration;

use swarmopt::prelude::*;
use swarmopt::{DVector, Float};
use tracing_subscriber::EnvFilter;

const N_PARTICLES: usize = 20;
const MAX_ITERATIONS: usize = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let optimizer = Optimizer::new();

    // Every evaluation finishes on its own task after a random delay, so completions arrive out
    // of order
    optimizer.set_async_objective_function(|x: &DVector<Float>, done: Completion| {
        let fitness = -x[0].powi(2);
        let delay = Duration::from_millis(fastrand::u64(20..820));
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            print!("x");
            done.complete(fitness);
        });
    });

    optimizer.init(N_PARTICLES, vec![Interval::new(-5.0, 5.0)]);

    println!("Starting optimizer");
    for iteration in 1..=MAX_ITERATIONS {
        print!("\nIteration {iteration}/{MAX_ITERATIONS} ");
        if !optimizer.step_async().await? {
            println!("\nThe step did not complete");
            break;
        }
    }
    println!("\n--- ---\nOptimization done");
    println!("Best value found: {}", optimizer.best_fitness());
    Ok(())
}
