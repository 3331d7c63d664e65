//! Drive the built-in synthetic environment with a random agent.
//!
//! Run with `RUST_LOG=debug` to see resets and polygon commits.

use polyseg_gym::registry::synthetic_env;
use polyseg_gym::{Env, KwArgs, RecordEpisodeStatistics, Space, TimeLimit};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> polyseg_gym::Result<()> {
    env_logger::init();

    let kwargs: KwArgs = [("height", "64"), ("width", "64"), ("seed", "7")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let base = synthetic_env(&kwargs)?;
    let space = base.action_space();
    let mut env = RecordEpisodeStatistics::new(TimeLimit::new(base, 100));
    let mut rng = StdRng::seed_from_u64(0);

    for episode in 0..5 {
        env.reset(Some(episode))?;
        loop {
            let step = env.step(space.sample(&mut rng))?;
            if step.done() {
                println!(
                    "episode {episode}: return {:?}, length {:?}, polygons {:?}",
                    step.info.get("episode_return"),
                    step.info.get("episode_length"),
                    step.info.get("polygons"),
                );
                break;
            }
        }
    }
    env.close();
    Ok(())
}
