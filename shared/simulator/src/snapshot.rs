use crate::actor::ActorKind;
use crate::scenario::Status;
use crate::simulation::Line;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Snapshot {
    pub nonce: u32,
    pub time: f64,
    pub status: Status,
    pub turrets: Vec<TurretSnapshot>,
    pub actors: Vec<ActorSnapshot>,
    pub bullets: Vec<BulletSnapshot>,
    pub scenario_lines: Vec<Line>,
    pub debug_lines: Vec<(u64, Vec<Line>)>,
    pub timing: Timing,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TurretSnapshot {
    pub id: u64,
    pub position: Point2<f64>,
    pub heading: f64,
    pub color: u32,
    pub kills: u32,
    pub kill_text: Option<String>,
    pub target: Option<u64>,
    pub firing: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ActorSnapshot {
    pub id: u64,
    pub kind: ActorKind,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub radius: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BulletSnapshot {
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub color: u32,
    pub ttl: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Timing {
    pub frame: f64,
    pub physics: f64,
    pub collision: f64,
    pub turret: f64,
    pub scenario: f64,
    pub bullet: f64,
}

impl Timing {
    pub fn total(&self) -> f64 {
        self.frame + self.physics + self.collision + self.turret + self.scenario + self.bullet
    }
}
