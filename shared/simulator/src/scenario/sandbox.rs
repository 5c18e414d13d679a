use super::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;

/// Empty world populated by text commands, one per line:
///
/// ```text
/// spawn turret position (0, 0) heading 90
/// spawn enemy position (3, 0) velocity (-0.5, 0)
/// spawn obstacle position (1.5, 0)
/// click
/// ```
///
/// Headings are in degrees and only apply to turrets. Velocities only apply
/// to enemies and obstacles.
pub struct Sandbox {}

impl Sandbox {
    pub fn new() -> Self {
        Self {}
    }
}

pub fn handle_command(sim: &mut Simulation, cmd: &str) -> anyhow::Result<()> {
    lazy_static! {
        static ref SPAWN_RE: Regex = Regex::new(
            r"^spawn (\w+) position (\(.+?\))(?: heading ([\-\d.]+))?(?: velocity (\(.+?\)))?$"
        )
        .unwrap();
    }
    let cmd = cmd.trim();
    if cmd.is_empty() || cmd.starts_with('#') {
        return Ok(());
    }
    if cmd == "click" {
        sim.click();
        return Ok(());
    }
    if let Some(cap) = SPAWN_RE.captures(cmd) {
        let kind = cap.get(1).unwrap().as_str();
        let position: Vector2<f64> = parse_vec2(cap.get(2).unwrap().as_str())?;
        let heading: f64 = match cap.get(3) {
            Some(m) => m.as_str().parse::<f64>()?.to_radians(),
            None => 0.0,
        };
        let velocity: Vector2<f64> = match cap.get(4) {
            Some(m) => parse_vec2(m.as_str())?,
            None => vector![0.0, 0.0],
        };
        if kind == "turret" {
            if cap.get(4).is_some() {
                anyhow::bail!("Turrets are stationary: {:?}", cmd);
            }
            let config = sim.config().clone();
            turret::create(sim, position, heading, config);
            return Ok(());
        }
        if cap.get(3).is_some() {
            anyhow::bail!("Only turrets have a heading: {:?}", cmd);
        }
        let data = match kind.parse::<ActorKind>()? {
            ActorKind::Enemy => enemy(),
            ActorKind::Obstacle => obstacle(),
        };
        actor::create(sim, position, velocity, data);
    } else {
        anyhow::bail!("Unknown command {:?}", cmd);
    }
    Ok(())
}

impl Scenario for Sandbox {
    fn name(&self) -> String {
        "sandbox".into()
    }

    fn init(&mut self, _sim: &mut Simulation, _seed: u32) {}

    fn tick(&mut self, sim: &mut Simulation) {
        for line in sim.take_commands() {
            if let Err(e) = handle_command(sim, &line) {
                log::warn!("Failed to parse sandbox command {:?}: {:?}", line, e);
            }
        }
    }

    fn status(&self, _: &Simulation) -> Status {
        Status::Running
    }
}

fn parse_vec2(s: &str) -> anyhow::Result<Vector2<f64>> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"\(([\-\d.]+), *([\-\d.]+)\)").unwrap();
    }
    let cap = RE
        .captures(s)
        .ok_or_else(|| anyhow::anyhow!("Failed to parse {:?}", s))?;
    let x: f64 = cap.get(1).unwrap().as_str().parse()?;
    let y: f64 = cap.get(2).unwrap().as_str().parse()?;
    Ok(vector![x, y])
}
