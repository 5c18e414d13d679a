use super::prelude::*;

/// Enemies walk in from a ring around a lone turret.
pub struct Waves {
    rng: Option<SeededRng>,
    turret: Option<TurretHandle>,
    next_spawn: u32,
    spawned: u32,
    breached: bool,
}

impl Waves {
    const SPAWN_RADIUS: f64 = 8.0;
    const SPAWN_PERIOD: u32 = 120;
    const MAX_ENEMIES: u32 = 16;
    const KILLS_TO_WIN: u32 = 10;
    const BREACH_DISTANCE: f64 = 0.75;

    pub fn new() -> Self {
        Self {
            rng: None,
            turret: None,
            next_spawn: 0,
            spawned: 0,
            breached: false,
        }
    }

    fn spawn_enemy(&mut self, sim: &mut Simulation) {
        let rng = match self.rng.as_mut() {
            Some(rng) => rng,
            None => return,
        };
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(0.4..0.8);
        let rot = Rotation2::new(angle);
        let position = rot.transform_vector(&vector![Self::SPAWN_RADIUS, 0.0]);
        let velocity = -position.normalize() * speed;
        actor::create(sim, position, velocity, enemy());
        self.spawned += 1;
    }
}

impl Scenario for Waves {
    fn name(&self) -> String {
        "waves".into()
    }

    fn human_name(&self) -> String {
        "Waves".into()
    }

    fn init(&mut self, sim: &mut Simulation, seed: u32) {
        self.rng = Some(new_rng(seed));
        let config = sim.config().clone();
        self.turret = Some(turret::create(sim, vector![0.0, 0.0], 0.0, config));
        self.next_spawn = 0;
    }

    fn tick(&mut self, sim: &mut Simulation) {
        if sim.tick() >= self.next_spawn && self.spawned < Self::MAX_ENEMIES {
            self.spawn_enemy(sim);
            self.next_spawn = sim.tick() + Self::SPAWN_PERIOD;
        }

        if let Some(handle) = self.turret {
            let center = sim.turret(handle).position().vector;
            let breached = sim.actors.iter().any(|&actor| {
                let actor = sim.actor(actor);
                actor.data().kind == ActorKind::Enemy
                    && (actor.position().vector - center).magnitude() < Self::BREACH_DISTANCE
            });
            if breached && !self.breached {
                log::info!("enemy reached the turret at tick {}", sim.tick());
            }
            self.breached |= breached;
        }
    }

    fn status(&self, sim: &Simulation) -> Status {
        let kills = self.turret.map(|h| sim.turret(h).kills()).unwrap_or(0);
        if self.breached {
            Status::Failed
        } else if kills >= Self::KILLS_TO_WIN {
            Status::Victory
        } else if sim.tick() >= MAX_TICKS
            || (self.spawned >= Self::MAX_ENEMIES && count_enemies(sim) == 0)
        {
            Status::Failed
        } else {
            Status::Running
        }
    }

    fn lines(&self) -> Vec<Line> {
        crate::debug::circle(
            point![0.0, 0.0],
            Self::SPAWN_RADIUS,
            crate::color::from_u32(0x808080ff),
        )
    }
}
