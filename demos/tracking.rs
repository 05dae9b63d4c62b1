use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use swarmopt::core::CtrlCAbortSignal;
use swarmopt::observers::{DebugObserver, TrackingSwarmObserver};
use swarmopt::prelude::*;
use swarmopt::test_functions::Rastrigin;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Construct the optimizer, seed it and set some hyperparameters
    let optimizer = Optimizer::new();
    optimizer.seed(0);
    optimizer.set_options(
        PartialOptions::default()
            .with_social(0.1)
            .with_personal(0.1)
            .with_inertia_weight(0.8),
    );
    optimizer.set_objective_function(Rastrigin { n: 2 });
    optimizer.init(50, vec![Interval::new(-20.0, 20.0); 2]);

    // Create a tracker to record swarm history
    let tracker = TrackingSwarmObserver::build();

    // Run the swarm until 200 steps have passed or Ctrl-C is pressed
    let abort_signal = CtrlCAbortSignal::new()?;
    let mut runner = Runner::new(optimizer).setup(|r| {
        r.with_max_steps(200)
            .with_abort_signal(abort_signal)
            .with_observer(tracker.clone())
            .with_observer(DebugObserver::build())
    });
    let summary = runner.run()?;

    println!("{summary}");

    // Export the results to a Python .pkl file to visualize via matplotlib
    let mut writer = BufWriter::new(File::create(Path::new("data.pkl"))?);
    tracker.read().write_pickle(&mut writer)?;
    Ok(())
}
