mod sandbox;
mod waves;

use crate::actor::ActorKind;
use crate::simulation::{Line, Simulation};
use serde::{Deserialize, Serialize};

pub mod prelude {
    pub use super::Scenario;
    pub use super::Status;
    pub use super::{count_enemies, MAX_TICKS};
    pub use crate::actor::{self, enemy, obstacle, ActorHandle, ActorKind};
    pub use crate::rng::{new_rng, SeededRng};
    pub use crate::simulation::{Line, Simulation};
    pub use crate::turret::{self, TurretHandle};
    pub use nalgebra::{point, vector, Point2, Rotation2, Vector2};
    pub use rand::Rng;
    pub use std::f64::consts::{PI, TAU};
}

pub const MAX_TICKS: u32 = 60 * 60 * 5;

#[derive(PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Copy, Clone)]
pub enum Status {
    Running,
    Victory,
    Failed,
}

pub trait Scenario {
    fn name(&self) -> String;

    fn human_name(&self) -> String {
        self.name()
    }

    fn init(&mut self, sim: &mut Simulation, seed: u32);

    fn tick(&mut self, _: &mut Simulation) {}

    fn status(&self, _: &Simulation) -> Status {
        Status::Running
    }

    fn lines(&self) -> Vec<Line> {
        vec![]
    }
}

pub fn load_safe(name: &str) -> Option<Box<dyn Scenario>> {
    let scenario: Option<Box<dyn Scenario>> = match name {
        "single_turret" => Some(Box::new(test::SingleTurret::new())),
        "waves" => Some(Box::new(waves::Waves::new())),
        "sandbox" => Some(Box::new(sandbox::Sandbox::new())),
        // Testing
        "test" => Some(Box::new(test::TestScenario {})),
        _ => None,
    };
    if let Some(scenario) = scenario.as_ref() {
        assert_eq!(scenario.name(), name);
    }
    scenario
}

pub fn load(name: &str) -> Box<dyn Scenario> {
    match load_safe(name) {
        Some(scenario) => scenario,
        None => panic!("Unknown scenario {:?}", name),
    }
}

pub fn list() -> Vec<String> {
    vec!["single_turret", "waves", "sandbox"]
        .iter()
        .map(|x| x.to_string())
        .collect()
}

pub fn count_enemies(sim: &Simulation) -> usize {
    sim.actors
        .iter()
        .filter(|&&handle| sim.actor(handle).data().kind == ActorKind::Enemy)
        .count()
}

pub use sandbox::handle_command;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for name in list() {
            let scenario = load(&name);
            assert_eq!(scenario.name(), name);
            assert!(!scenario.human_name().is_empty());
        }
        assert_eq!(load("waves").human_name(), "Waves");
        assert_eq!(load("sandbox").human_name(), "sandbox");
        assert!(load_safe("test").is_some());
        assert!(load_safe("no_such_scenario").is_none());
    }
}
