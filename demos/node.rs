use swarmopt::prelude::*;
use swarmopt::{DVector, Float};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Create the optimizer and maximize the negated distance from the origin
    let optimizer = Optimizer::new();
    optimizer.set_objective_function(|x: &DVector<Float>| -(x[0] * x[0] + x[1] * x[1]));

    // Define the search space and initialize 20 particles in it
    let domain = vec![Interval::new(-10.0, 10.0), Interval::new(-10.0, 10.0)];
    optimizer.init(20, domain);

    // Run the optimizer for 40 iterations
    for _ in 0..40 {
        optimizer.step()?;
    }

    println!("Best solution found {}", optimizer.best_fitness());
    if let Some(best) = optimizer.best_position() {
        println!("at {:?}", best.as_slice());
    }
    Ok(())
}
