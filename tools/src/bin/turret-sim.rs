use clap::Parser;
use std::path::PathBuf;
use turret_simulator::{scenario, simulation};

#[derive(Parser, Debug)]
#[clap()]
struct Arguments {
    scenario: String,

    #[clap(short, long, default_value = "0")]
    seed: u32,

    #[clap(short, long, default_value_t = scenario::MAX_TICKS)]
    ticks: u32,

    /// JSON file with turret settings.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Sandbox commands, one per line, issued before the first step.
    #[clap(long)]
    commands: Option<PathBuf>,

    /// Simulate a click every N ticks.
    #[clap(long)]
    click_every: Option<u32>,

    #[clap(long)]
    gizmos: bool,

    /// Print the final snapshot as JSON.
    #[clap(long)]
    snapshot: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Arguments::parse();
    turret_tools::check_scenario(&args.scenario)?;
    let config = turret_tools::load_config(args.config.as_deref())?;

    log::info!(
        "Running {} with seed {}",
        scenario::load(&args.scenario).human_name(),
        args.seed
    );
    let mut sim = simulation::Simulation::with_config(&args.scenario, args.seed, config);
    sim.gizmos = args.gizmos;
    if let Some(path) = args.commands.as_deref() {
        for cmd in turret_tools::load_commands(path)? {
            sim.command(cmd);
        }
    }

    let mut elapsed = 0.0;
    while sim.status() == scenario::Status::Running && sim.tick() < args.ticks {
        if let Some(n) = args.click_every {
            if n > 0 && sim.tick() > 0 && sim.tick() % n == 0 {
                sim.click();
            }
        }
        sim.step();
        elapsed += sim.timing().total();
    }

    log::info!(
        "{:?} after {} ticks ({:.2}s)",
        sim.status(),
        sim.tick(),
        sim.time()
    );
    for &handle in sim.turrets.iter() {
        let turret = sim.turret(handle);
        log::info!(
            "turret {:?} kills {} color {:08x}",
            handle,
            turret.kills(),
            turret.color()
        );
    }
    log::info!("{} enemies remaining", scenario::count_enemies(&sim));
    if sim.tick() > 0 {
        log::info!(
            "{:.3}s simulating, {:.1}us per tick",
            elapsed,
            elapsed * 1e6 / sim.tick() as f64
        );
    }

    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&sim.snapshot(0))?);
    }

    Ok(())
}
