use swarmopt::prelude::*;
use swarmopt::test_functions::{CosineWell, DistantPeak, InvertedParabola};
use swarmopt::Float;
use tracing_subscriber::EnvFilter;

const N_PARTICLES: usize = 20;
const MAX_ITERATIONS: usize = 20;

fn run<F: ObjectiveFunction + 'static>(
    name: &str,
    function: F,
    domain: Vec<Interval>,
) -> Result<(), StepError<std::convert::Infallible>> {
    let optimizer = Optimizer::new();
    optimizer.seed(0);
    optimizer.set_options(PartialOptions::default().with_pressure(0.8));
    optimizer.set_objective_function(function);
    optimizer.init(N_PARTICLES, domain);
    for _ in 0..MAX_ITERATIONS {
        optimizer.step()?;
    }
    let best = optimizer
        .best_position()
        .map_or(Float::NAN, |position| position[0]);
    println!(
        "{name:<18} best f(x) = {:>9.5} at x = {best:>8.5} (mean {:.5})",
        optimizer.best_fitness(),
        optimizer.mean_fitness()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    run("cosine well", CosineWell, CosineWell::domain())?;
    run("distant peak", DistantPeak, DistantPeak::domain())?;
    run("inverted parabola", InvertedParabola, InvertedParabola::domain())?;
    Ok(())
}
