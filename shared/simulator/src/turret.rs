//! Stationary turret that tracks the nearest enemy and fires at it.
//!
//! Two scheduled tasks run per turret. The scan task re-evaluates the nearest
//! enemy every `check_interval` for the turret's whole lifetime. The firing
//! loop exists only while there is a target: it fires as soon as it starts,
//! then resumes every `shoot_interval` and ends itself when it finds no target.

use crate::actor::{ActorHandle, ActorKind};
use crate::bullet;
use crate::color;
use crate::config::TurretConfig;
use crate::index_set::{HasIndex, Index};
use crate::simulation::Simulation;
use nalgebra::{vector, UnitComplex, Vector2};
use rapier2d_f64::prelude::*;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Slack for accumulated floating point error in countdowns.
const TIMER_EPSILON: f64 = 1e-9;

#[derive(Hash, PartialEq, Eq, Copy, Clone, Debug)]
pub struct TurretHandle(pub Index);

impl HasIndex for TurretHandle {
    fn index(self) -> Index {
        self.0
    }
}

impl From<TurretHandle> for u64 {
    fn from(handle: TurretHandle) -> u64 {
        let (idx, gen) = handle.0.into_raw_parts();
        ((gen as u64) << 32) | idx as u64
    }
}

impl From<TurretHandle> for RigidBodyHandle {
    fn from(handle: TurretHandle) -> Self {
        RigidBodyHandle(handle.index())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FiringLoop {
    /// Seconds until the loop resumes.
    pub next_shot: f64,
    pub shots: u32,
}

#[derive(Debug, Clone)]
pub struct TurretData {
    pub config: TurretConfig,
    pub color_index: usize,
    /// Non-owning. The actor may have been destroyed since it was selected.
    pub target: Option<ActorHandle>,
    pub kills: u32,
    /// Text sink for the kill counter; `None` when nothing is bound.
    pub kill_display: Option<String>,
    /// Seconds until the next scan.
    pub scan_timer: f64,
    pub firing_loop: Option<FiringLoop>,
}

impl TurretData {
    pub fn new(config: TurretConfig) -> TurretData {
        TurretData {
            config,
            color_index: 0,
            target: None,
            kills: 0,
            kill_display: Some(String::new()),
            scan_timer: 0.0,
            firing_loop: None,
        }
    }
}

pub fn create(
    sim: &mut Simulation,
    position: Vector2<f64>,
    heading: f64,
    config: TurretConfig,
) -> TurretHandle {
    let rigid_body = RigidBodyBuilder::fixed()
        .translation(position)
        .rotation(heading)
        .build();
    let body_handle = sim.bodies.insert(rigid_body);
    let handle = TurretHandle(body_handle.0);
    sim.turrets.insert(handle);
    sim.turret_data.insert(handle, TurretData::new(config));
    sim.turret_mut(handle).refresh_kill_display();
    handle
}

pub fn destroy(sim: &mut Simulation, handle: TurretHandle) {
    if !sim.turrets.remove(handle) {
        return;
    }
    sim.turret_data.remove(&handle);
    sim.bodies.remove(
        handle.into(),
        &mut sim.island_manager,
        &mut sim.colliders,
        &mut sim.impulse_joints,
        &mut sim.multibody_joints,
        /*remove_attached_colliders=*/ true,
    );
}

/// Nearest enemy overlapping the circle, first encountered on ties.
pub fn find_nearest_enemy(
    sim: &Simulation,
    center: Vector2<f64>,
    radius: f64,
) -> Option<ActorHandle> {
    let mut nearest_distance = f64::INFINITY;
    let mut nearest = None;
    for &handle in sim.actors.iter() {
        let actor = sim.actor(handle);
        let data = actor.data();
        let distance = (actor.position().vector - center).magnitude();
        if distance - data.radius > radius {
            continue;
        }
        if data.kind != ActorKind::Enemy {
            continue;
        }
        if distance < nearest_distance {
            nearest_distance = distance;
            nearest = Some(handle);
        }
    }
    nearest
}

/// Advances the scan task and the firing loop by one step.
pub fn tick(sim: &mut Simulation, handle: TurretHandle, dt: f64) {
    let scan_due = sim.turret(handle).data().scan_timer <= TIMER_EPSILON;
    if scan_due {
        let mut turret = sim.turret_mut(handle);
        let interval = turret.data().config.check_interval;
        turret.data_mut().scan_timer += interval;
        turret.scan();
    }

    let mut turret = sim.turret_mut(handle);
    let resume = matches!(&turret.data().firing_loop, Some(l) if l.next_shot <= TIMER_EPSILON);
    if resume {
        if turret.readonly().target().is_some() {
            turret.fire();
            let interval = turret.data().config.shoot_interval;
            if let Some(firing_loop) = turret.data_mut().firing_loop.as_mut() {
                firing_loop.next_shot += interval;
                firing_loop.shots += 1;
            }
        } else {
            log::debug!("firing loop ended, target lost");
            turret.data_mut().firing_loop = None;
        }
    }

    let data = turret.data_mut();
    data.scan_timer -= dt;
    if let Some(firing_loop) = data.firing_loop.as_mut() {
        firing_loop.next_shot -= dt;
    }
}

pub struct TurretAccessor<'a> {
    pub(crate) simulation: &'a Simulation,
    pub(crate) handle: TurretHandle,
}

impl<'a> TurretAccessor<'a> {
    pub fn exists(&self) -> bool {
        self.simulation.turret_data.contains_key(&self.handle)
    }

    pub fn body(&self) -> &'a RigidBody {
        self.simulation.bodies.get(self.handle.into()).unwrap()
    }

    pub fn position(&self) -> Translation<Real> {
        self.body().position().translation
    }

    pub fn heading(&self) -> Real {
        self.body().rotation().angle().rem_euclid(TAU)
    }

    /// Unit vector the barrel points along.
    pub fn forward(&self) -> Vector2<f64> {
        self.body().rotation().transform_vector(&vector![0.0, 1.0])
    }

    pub fn data(&self) -> &'a TurretData {
        self.simulation.turret_data.get(&self.handle).unwrap()
    }

    /// Current target, or `None` if there is none or it has been destroyed.
    pub fn target(&self) -> Option<ActorHandle> {
        self.data()
            .target
            .filter(|&target| self.simulation.actors.contains(target))
    }

    pub fn kills(&self) -> u32 {
        self.data().kills
    }

    pub fn kill_text(&self) -> Option<&'a str> {
        self.data().kill_display.as_deref()
    }

    pub fn color(&self) -> u32 {
        color::palette(self.data().color_index)
    }

    pub fn is_firing(&self) -> bool {
        self.data().firing_loop.is_some()
    }
}

pub struct TurretAccessorMut<'a> {
    pub(crate) simulation: &'a mut Simulation,
    pub(crate) handle: TurretHandle,
}

impl<'a> TurretAccessorMut<'a> {
    pub fn readonly(&self) -> TurretAccessor {
        TurretAccessor {
            simulation: self.simulation,
            handle: self.handle,
        }
    }

    pub fn body(&mut self) -> &mut RigidBody {
        self.simulation.bodies.get_mut(self.handle.into()).unwrap()
    }

    pub fn data(&self) -> &TurretData {
        self.simulation.turret_data.get(&self.handle).unwrap()
    }

    pub fn data_mut(&mut self) -> &mut TurretData {
        self.simulation.turret_data.get_mut(&self.handle).unwrap()
    }

    /// Re-selects the nearest enemy and starts or stops the firing loop.
    pub fn scan(&mut self) {
        let (center, radius) = {
            let turret = self.readonly();
            (turret.position().vector, turret.data().config.detection_radius)
        };
        let nearest = find_nearest_enemy(self.simulation, center, radius);
        let current = self.readonly().target();

        if nearest != current {
            match nearest {
                Some(target) => log::debug!("acquired target {:?}", target),
                None => log::debug!("lost target"),
            }
            self.data_mut().target = nearest;
            if nearest.is_some() && self.data().firing_loop.is_none() {
                log::debug!("firing loop started");
                self.data_mut().firing_loop = Some(FiringLoop {
                    next_shot: 0.0,
                    shots: 0,
                });
            }
        }

        if nearest.is_none() && self.data().firing_loop.is_some() {
            log::debug!("firing loop cancelled");
            self.data_mut().firing_loop = None;
        }
    }

    /// Spawns a bullet along the barrel. Does nothing without a live target.
    pub fn fire(&mut self) {
        if self.readonly().target().is_none() {
            return;
        }
        let (position, velocity, radius, color, ttl) = {
            let turret = self.readonly();
            let config = &turret.data().config;
            let offset = vector![config.bullet_spawn_offset[0], config.bullet_spawn_offset[1]];
            let position =
                turret.position().vector + turret.body().rotation().transform_vector(&offset);
            (
                position,
                turret.forward() * config.bullet_speed,
                config.bullet_radius,
                turret.color(),
                config.bullet_ttl,
            )
        };
        let handle = self.handle;
        let bullet = bullet::create(self.simulation, position, velocity, radius, color, ttl);
        if let Err(e) = bullet::set_owner(self.simulation, bullet, handle) {
            log::warn!("Failed to set bullet owner: {}", e);
        }
    }

    /// Rotates toward the target by a fraction of the remaining angle.
    pub fn face_target(&mut self, dt: f64) {
        let target = match self.readonly().target() {
            Some(target) => target,
            None => return,
        };
        let rotation_speed = self.data().config.rotation_speed;
        let target_position = self.simulation.actor(target).position().vector;
        let body = self.body();
        let position = body.position().translation.vector;
        let direction = target_position - position;
        let target_rotation = UnitComplex::new(direction.y.atan2(direction.x) - FRAC_PI_2);
        let t = (dt * rotation_speed).clamp(0.0, 1.0);
        let rotation = body.rotation().slerp(&target_rotation, t);
        body.set_position(Isometry::from_parts(position.into(), rotation), false);
    }

    pub fn cycle_color(&mut self) {
        let data = self.data_mut();
        data.color_index = color::next_index(data.color_index);
    }

    pub fn increment_enemies_destroyed(&mut self) {
        self.data_mut().kills += 1;
        log::debug!("kill reported, total {}", self.data().kills);
        self.refresh_kill_display();
    }

    pub fn bind_kill_display(&mut self) {
        self.data_mut().kill_display = Some(String::new());
        self.refresh_kill_display();
    }

    pub fn unbind_kill_display(&mut self) {
        self.data_mut().kill_display = None;
    }

    fn refresh_kill_display(&mut self) {
        let data = self.data_mut();
        let kills = data.kills;
        if let Some(text) = data.kill_display.as_mut() {
            *text = format!(" {}", kills);
        }
    }
}
