use crate::collision;
use crate::error::Error;
use crate::index_set::{HasIndex, Index};
use crate::simulation::{Simulation, PHYSICS_TICK_LENGTH};
use crate::turret::TurretHandle;
use nalgebra::Vector2;
use rapier2d_f64::prelude::*;

#[derive(Hash, PartialEq, Eq, Copy, Clone, Debug)]
pub struct BulletHandle(pub Index);

impl HasIndex for BulletHandle {
    fn index(self) -> Index {
        self.0
    }
}

impl From<BulletHandle> for RigidBodyHandle {
    fn from(handle: BulletHandle) -> Self {
        RigidBodyHandle(handle.index())
    }
}

#[derive(Default, Clone, Debug)]
pub struct BulletData {
    /// Turret credited with kills. Never used to control the bullet's lifetime.
    pub owner: Option<TurretHandle>,
    pub color: u32,
    /// Tick at which the bullet is swept if it hasn't hit anything.
    pub expires_at: u32,
}

pub fn body(sim: &Simulation, handle: BulletHandle) -> &RigidBody {
    sim.bodies.get(handle.into()).unwrap()
}

pub fn data(sim: &Simulation, handle: BulletHandle) -> &BulletData {
    sim.bullet_data.get(&handle).unwrap()
}

pub fn ttl_ticks(ttl: f64) -> u32 {
    (ttl / PHYSICS_TICK_LENGTH).round().max(1.0) as u32
}

pub fn create(
    sim: &mut Simulation,
    position: Vector2<f64>,
    velocity: Vector2<f64>,
    radius: f64,
    color: u32,
    ttl: f64,
) -> BulletHandle {
    let rigid_body = RigidBodyBuilder::dynamic()
        .translation(position)
        .linvel(velocity)
        .ccd_enabled(true)
        .build();
    let body_handle = sim.bodies.insert(rigid_body);
    let handle = BulletHandle(body_handle.0);
    let collider = ColliderBuilder::ball(radius)
        .collision_groups(collision::bullet_interaction_groups())
        .active_events(ActiveEvents::COLLISION_EVENTS)
        .sensor(true)
        .build();
    sim.colliders
        .insert_with_parent(collider, body_handle, &mut sim.bodies);
    let data = BulletData {
        owner: None,
        color,
        expires_at: sim.tick().saturating_add(ttl_ticks(ttl)),
    };
    sim.bullet_data.insert(handle, data);
    sim.bullets.insert(handle);
    handle
}

/// Records the turret that fired this bullet. The owner can only be set once.
pub fn set_owner(
    sim: &mut Simulation,
    handle: BulletHandle,
    turret: TurretHandle,
) -> Result<(), Error> {
    let data = sim
        .bullet_data
        .get_mut(&handle)
        .ok_or_else(|| Error::new("No such bullet"))?;
    match data.owner {
        Some(owner) if owner != turret => Err(Error::new("Bullet already has an owner")),
        _ => {
            data.owner = Some(turret);
            Ok(())
        }
    }
}

pub fn owner(sim: &Simulation, handle: BulletHandle) -> Option<TurretHandle> {
    sim.bullet_data.get(&handle).and_then(|data| data.owner)
}

pub fn destroy(sim: &mut Simulation, handle: BulletHandle) {
    if !sim.bullets.remove(handle) {
        return;
    }
    remove_body(sim, handle);
}

fn remove_body(sim: &mut Simulation, handle: BulletHandle) {
    sim.bullet_data.remove(&handle);
    sim.bodies.remove(
        handle.into(),
        &mut sim.island_manager,
        &mut sim.colliders,
        &mut sim.impulse_joints,
        &mut sim.multibody_joints,
        /*remove_attached_colliders=*/ true,
    );
}

/// Sweeps bullets whose time-to-live has run out.
pub fn tick(sim: &mut Simulation) {
    let now = sim.tick();
    let bullet_data = &sim.bullet_data;
    let expired = sim
        .bullets
        .retain(|handle| bullet_data.get(&handle).map_or(false, |d| d.expires_at > now));
    for handle in expired {
        remove_body(sim, handle);
    }
}
