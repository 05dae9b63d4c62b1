use std::{collections::HashMap, time::Duration};

use futures::channel::oneshot;
use swarmopt::{
    core::{Completion, Interval, Optimizer, StepError, SwarmOptions},
    test_functions::{hypercube, Rastrigin, Sphere},
    DVector, Float,
};

fn seeded_run(seed: u64, steps: usize) -> Optimizer {
    let optimizer = Optimizer::new();
    optimizer.seed(seed);
    optimizer.set_objective_function(Rastrigin { n: 3 });
    optimizer.init(15, hypercube(3, 5.12));
    for _ in 0..steps {
        optimizer.step().unwrap();
    }
    optimizer
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let a = seeded_run(42, 30);
    let b = seeded_run(42, 30);
    assert_eq!(a.particles(), b.particles());
    assert_eq!(a.best_position(), b.best_position());
    assert_eq!(a.best_fitness(), b.best_fitness());

    let c = seeded_run(43, 30);
    assert_ne!(a.particle_positions(), c.particle_positions());
}

#[test]
fn test_best_fitness_is_monotonic() {
    let optimizer = Optimizer::new();
    optimizer.seed(7);
    optimizer.set_objective_function(Rastrigin { n: 2 });
    optimizer.init(12, hypercube(2, 5.12));
    let mut best = optimizer.best_fitness();
    let mut personal = vec![Float::NEG_INFINITY; 12];
    for _ in 0..50 {
        optimizer.step().unwrap();
        assert!(optimizer.best_fitness() >= best);
        best = optimizer.best_fitness();
        for (previous, particle) in personal.iter_mut().zip(optimizer.particles()) {
            assert!(particle.best_fitness >= *previous);
            assert!(particle.best_fitness <= best);
            *previous = particle.best_fitness;
        }
    }
}

#[test]
fn test_initial_positions_lie_in_domain() {
    let domain: Vec<Interval> = vec![
        (-3.0, 1.0).into(),
        (10.0, 10.5).into(),
        (-0.25, 0.0).into(),
    ];
    for seed in 0..10 {
        for n in [1, 2, 17] {
            let optimizer = Optimizer::new();
            optimizer.seed(seed);
            optimizer.init(n, domain.clone());
            assert_eq!(optimizer.len(), n);
            assert_eq!(optimizer.best_position(), None);
            assert_eq!(optimizer.best_fitness(), Float::NEG_INFINITY);
            for position in optimizer.particle_positions() {
                for (value, interval) in position.iter().zip(&domain) {
                    assert!(interval.contains(*value), "{value} not in {interval}");
                }
            }
        }
    }
}

#[test]
fn test_converges_on_sphere() {
    let problem = Sphere { n: 3 };
    let optimizer = Optimizer::new();
    optimizer.seed(0);
    optimizer.init(40, problem.domain(5.0));
    optimizer.set_objective_function(problem);
    for _ in 0..200 {
        optimizer.step().unwrap();
    }
    assert!(optimizer.best_fitness() > -0.1);
    let summary = optimizer.summary();
    assert_eq!(summary.x.len(), 3);
    assert_eq!(summary.fitness_evals, 8000);
}

#[test]
fn test_options_fill_missing_keys_from_defaults() {
    let mut partial = HashMap::new();
    partial.insert("social".to_string(), 0.7);
    let bytes = serde_pickle::to_vec(&partial, serde_pickle::SerOptions::new()).unwrap();
    let options: SwarmOptions =
        serde_pickle::from_slice(&bytes, serde_pickle::DeOptions::new()).unwrap();
    assert_eq!(options, SwarmOptions::default().with_social(0.7));
}

#[tokio::test]
async fn test_async_step_with_timer() {
    let optimizer = Optimizer::new();
    optimizer.init(2, vec![Interval::new(0.0, 1.0)]);
    optimizer.set_async_objective_function(|_: &DVector<Float>, done: Completion| {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(4)).await;
            done.complete(123.0);
        });
    });
    let (sender, receiver) = oneshot::channel();
    optimizer
        .step_then(move || {
            let _ = sender.send(());
        })
        .unwrap();
    assert_eq!(optimizer.best_fitness(), Float::NEG_INFINITY);
    assert!(matches!(optimizer.step(), Err(StepError::InProgress)));
    receiver.await.unwrap();
    assert_eq!(optimizer.best_fitness(), 123.0);
    assert_eq!(optimizer.iteration(), 1);

    assert!(optimizer.step_async().await.unwrap());
    assert_eq!(optimizer.iteration(), 2);
}
