//! Roll out one seeded episode with random hunter actions and print the grid.
//!
//! ```bash
//! cargo run --example random_rollout
//! ```

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pursuit_rl::prelude::*;

fn main() -> Result<()> {
    let config = PursuitConfig {
        rows: 8,
        cols: 8,
        n_hunters: 4,
        n_preys: 2,
        n_catch: 2,
        max_steps: 60,
        prey_behavior: Behavior::Greedy,
        ..Default::default()
    };
    let n_hunters = config.n_hunters;

    let mut env = PursuitEnv::new(config)?;
    let mut rng = StdRng::seed_from_u64(7);
    let (_, mut info) = env.reset(Some(7))?;

    println!("tick 0\n{}", env.render());

    loop {
        let actions: Vec<i64> = (0..n_hunters)
            .map(|_| rng.gen_range(0..5))
            .chain(std::iter::repeat(4).take(info.preys_left))
            .collect();

        let outcome = env.step(&actions)?;
        info = outcome.info;
        println!("tick {} | preys left {}\n{}", info.timestep, info.preys_left, env.render());

        if outcome.terminated {
            println!("all preys captured");
            break;
        }
        if outcome.timed_out {
            println!("episode timed out with {} preys alive", info.preys_left);
            break;
        }
    }
    Ok(())
}
