//! Independently simulated entities the turret reacts to.

use crate::collision;
use crate::index_set::{HasIndex, Index};
use crate::simulation::Simulation;
use nalgebra::Vector2;
use rapier2d_f64::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RADIUS: f64 = 0.5;

#[derive(Hash, PartialEq, Eq, Copy, Clone, Debug)]
pub struct ActorHandle(pub Index);

impl HasIndex for ActorHandle {
    fn index(self) -> Index {
        self.0
    }
}

impl From<ActorHandle> for u64 {
    fn from(handle: ActorHandle) -> u64 {
        let (idx, gen) = handle.0.into_raw_parts();
        ((gen as u64) << 32) | idx as u64
    }
}

impl From<ActorHandle> for RigidBodyHandle {
    fn from(handle: ActorHandle) -> Self {
        RigidBodyHandle(handle.index())
    }
}

#[derive(Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub enum ActorKind {
    /// Targeted by turrets and destroyed by projectiles.
    Enemy,
    /// Shows up in overlap queries but is neither targeted nor hit.
    Obstacle,
}

impl ActorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActorKind::Enemy => "enemy",
            ActorKind::Obstacle => "obstacle",
        }
    }
}

impl std::str::FromStr for ActorKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enemy" => Ok(ActorKind::Enemy),
            "obstacle" => Ok(ActorKind::Obstacle),
            _ => Err(crate::error::Error::new(format!("Unknown actor kind {:?}", s))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActorData {
    pub kind: ActorKind,
    pub radius: f64,
}

pub fn enemy() -> ActorData {
    ActorData {
        kind: ActorKind::Enemy,
        radius: DEFAULT_RADIUS,
    }
}

pub fn obstacle() -> ActorData {
    ActorData {
        kind: ActorKind::Obstacle,
        radius: DEFAULT_RADIUS,
    }
}

pub fn create(
    sim: &mut Simulation,
    position: Vector2<f64>,
    velocity: Vector2<f64>,
    data: ActorData,
) -> ActorHandle {
    let rigid_body = RigidBodyBuilder::dynamic()
        .translation(position)
        .linvel(velocity)
        .can_sleep(false)
        .build();
    let body_handle = sim.bodies.insert(rigid_body);
    let handle = ActorHandle(body_handle.0);
    let collider = ColliderBuilder::ball(data.radius)
        .collision_groups(collision::actor_interaction_groups())
        .build();
    sim.colliders
        .insert_with_parent(collider, body_handle, &mut sim.bodies);
    log::debug!(
        "created {} at ({:.2}, {:.2})",
        data.kind.name(),
        position.x,
        position.y
    );
    sim.actors.insert(handle);
    sim.actor_data.insert(handle, data);
    handle
}

/// Removes the actor immediately. Removing an actor twice is a no-op.
pub fn destroy(sim: &mut Simulation, handle: ActorHandle) {
    if !sim.actors.remove(handle) {
        return;
    }
    sim.actor_data.remove(&handle);
    sim.bodies.remove(
        handle.into(),
        &mut sim.island_manager,
        &mut sim.colliders,
        &mut sim.impulse_joints,
        &mut sim.multibody_joints,
        /*remove_attached_colliders=*/ true,
    );
}

pub struct ActorAccessor<'a> {
    pub(crate) simulation: &'a Simulation,
    pub(crate) handle: ActorHandle,
}

impl<'a> ActorAccessor<'a> {
    pub fn exists(&self) -> bool {
        self.simulation.actor_data.contains_key(&self.handle)
    }

    pub fn body(&self) -> &'a RigidBody {
        self.simulation.bodies.get(self.handle.into()).unwrap()
    }

    pub fn position(&self) -> Translation<Real> {
        self.body().position().translation
    }

    pub fn velocity(&self) -> Vector<Real> {
        *self.body().linvel()
    }

    pub fn data(&self) -> &'a ActorData {
        self.simulation.actor_data.get(&self.handle).unwrap()
    }
}
