use clap::Parser;
use rayon::prelude::*;
use turret_simulator::snapshot::Snapshot;
use turret_simulator::{scenario, simulation};

#[derive(Parser, Debug)]
#[clap()]
struct Arguments {
    scenario: String,

    #[clap(short, long, default_value = "0")]
    seed: u32,

    /// Number of consecutive seeds to check, starting at --seed.
    #[clap(short = 'n', long, default_value = "1")]
    seeds: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Arguments::parse();
    turret_tools::check_scenario(&args.scenario)?;

    let failures: Vec<u32> = (args.seed..args.seed + args.seeds)
        .into_par_iter()
        .filter(|&seed| !check(&args.scenario, seed))
        .collect();

    if failures.is_empty() {
        log::info!("{} seeds deterministic", args.seeds);
        Ok(())
    } else {
        anyhow::bail!("Nondeterministic seeds: {:?}", failures)
    }
}

fn check(scenario_name: &str, seed: u32) -> bool {
    let mut sims = [0, 1]
        .iter()
        .map(|_| simulation::Simulation::new(scenario_name, seed))
        .collect::<Vec<_>>();
    while sims[0].status() == scenario::Status::Running && sims[0].tick() < scenario::MAX_TICKS {
        let hashes = sims.iter().map(|sim| sim.hash()).collect::<Vec<_>>();
        if hashes[0] != hashes[1] {
            println!("seed {} hashes differ at tick {}", seed, sims[0].tick());
            diff_snapshots(&sims[0].snapshot(0), &sims[1].snapshot(0));
            return false;
        }
        sims.iter_mut().for_each(|sim| sim.step());
    }
    true
}

fn diff_snapshots(a: &Snapshot, b: &Snapshot) {
    if a.actors.len() != b.actors.len() {
        println!("actor count differs");
        println!("  a: {}", a.actors.len());
        println!("  b: {}", b.actors.len());
    }

    for (i, (a, b)) in a.actors.iter().zip(b.actors.iter()).enumerate() {
        if a.position != b.position {
            println!("actor {} position differs", i);
            println!("  a: {:?}", a.position);
            println!("  b: {:?}", b.position);
        }
    }

    if a.bullets.len() != b.bullets.len() {
        println!("bullet count differs");
        println!("  a: {}", a.bullets.len());
        println!("  b: {}", b.bullets.len());
    }

    for (i, (a, b)) in a.turrets.iter().zip(b.turrets.iter()).enumerate() {
        if a.heading != b.heading {
            println!("turret {} heading differs", i);
            println!("  a: {:?}", a.heading);
            println!("  b: {:?}", b.heading);
        }

        if a.kills != b.kills {
            println!("turret {} kills differ", i);
            println!("  a: {:?}", a.kills);
            println!("  b: {:?}", b.kills);
        }

        if a.target != b.target {
            println!("turret {} target differs", i);
            println!("  a: {:?}", a.target);
            println!("  b: {:?}", b.target);
        }
    }
}
