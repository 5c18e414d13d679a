use crate::actor::{ActorAccessor, ActorData, ActorHandle};
use crate::bullet::{self, BulletData, BulletHandle};
use crate::collision;
use crate::config::TurretConfig;
pub use crate::debug::Line;
use crate::debug;
use crate::index_set::IndexSet;
use crate::scenario::{self, Scenario};
use crate::snapshot::*;
use crate::turret::{self, TurretAccessor, TurretAccessorMut, TurretData, TurretHandle};
use crossbeam::channel::Sender;
use instant::Instant;
use rapier2d_f64::prelude::*;
use std::collections::HashMap;

pub const PHYSICS_TICK_LENGTH: f64 = 1.0 / 60.0;

pub struct Simulation {
    scenario: Option<Box<dyn Scenario>>,
    config: TurretConfig,
    pub turrets: IndexSet<TurretHandle>,
    pub(crate) turret_data: HashMap<TurretHandle, TurretData>,
    pub actors: IndexSet<ActorHandle>,
    pub(crate) actor_data: HashMap<ActorHandle, ActorData>,
    pub bullets: IndexSet<BulletHandle>,
    pub(crate) bullet_data: HashMap<BulletHandle, BulletData>,
    pub(crate) bodies: RigidBodySet,
    pub(crate) impulse_joints: ImpulseJointSet,
    pub(crate) multibody_joints: MultibodyJointSet,
    pub(crate) colliders: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    pub(crate) island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    event_collector: CollisionEventHandler,
    contact_recv: crossbeam::channel::Receiver<CollisionEvent>,
    pub(crate) events: SimEvents,
    click_pending: bool,
    commands: Vec<String>,
    tick: u32,
    pub gizmos: bool,
    seed: u32,
    timing: Timing,
}

impl Simulation {
    pub fn new(scenario_name: &str, seed: u32) -> Box<Simulation> {
        Simulation::with_config(scenario_name, seed, TurretConfig::default())
    }

    pub fn with_config(scenario_name: &str, seed: u32, config: TurretConfig) -> Box<Simulation> {
        log::info!("scenario {scenario_name} seed {seed}");
        let (contact_send, contact_recv) = crossbeam::channel::unbounded();
        let mut sim = Box::new(Simulation {
            scenario: None,
            config,
            turrets: IndexSet::new(),
            turret_data: HashMap::new(),
            actors: IndexSet::new(),
            actor_data: HashMap::new(),
            bullets: IndexSet::new(),
            bullet_data: HashMap::new(),
            bodies: RigidBodySet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            colliders: ColliderSet::new(),
            integration_parameters: IntegrationParameters {
                dt: PHYSICS_TICK_LENGTH,
                max_ccd_substeps: 2,
                ..Default::default()
            },
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            event_collector: CollisionEventHandler::new(contact_send),
            contact_recv,
            events: SimEvents::new(),
            click_pending: false,
            commands: Vec::new(),
            tick: 0,
            gizmos: false,
            seed,
            timing: Default::default(),
        });

        let mut scenario = scenario::load(scenario_name);
        scenario.init(&mut sim, seed);
        sim.scenario = Some(scenario);

        sim
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn time(&self) -> f64 {
        self.tick as f64 * PHYSICS_TICK_LENGTH
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Wall-clock cost of each phase of the last step.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn config(&self) -> &TurretConfig {
        &self.config
    }

    pub fn status(&self) -> scenario::Status {
        match self.scenario.as_ref() {
            Some(scenario) => scenario.status(self),
            None => scenario::Status::Running,
        }
    }

    pub fn turret(self: &Simulation, handle: TurretHandle) -> TurretAccessor {
        TurretAccessor {
            simulation: self,
            handle,
        }
    }

    pub fn turret_mut(self: &mut Simulation, handle: TurretHandle) -> TurretAccessorMut {
        TurretAccessorMut {
            simulation: self,
            handle,
        }
    }

    pub fn actor(self: &Simulation, handle: ActorHandle) -> ActorAccessor {
        ActorAccessor {
            simulation: self,
            handle,
        }
    }

    /// Registers a primary-button press, seen by every turret on the next step.
    pub fn click(&mut self) {
        self.click_pending = true;
    }

    /// Queues a text command for the scenario to consume on the next step.
    /// Commands the scenario does not consume are dropped.
    pub fn command(&mut self, cmd: impl Into<String>) {
        self.commands.push(cmd.into());
    }

    pub(crate) fn take_commands(&mut self) -> Vec<String> {
        std::mem::take(&mut self.commands)
    }

    pub fn step(self: &mut Simulation) {
        self.events.clear();
        let dt = PHYSICS_TICK_LENGTH;

        let frame_start_time = Instant::now();
        let click = std::mem::take(&mut self.click_pending);
        let turrets: Vec<TurretHandle> = self.turrets.iter().cloned().collect();
        for &handle in turrets.iter() {
            let mut turret = self.turret_mut(handle);
            if click {
                turret.cycle_color();
            }
            turret.face_target(dt);
        }
        self.timing.frame = (Instant::now() - frame_start_time).as_secs_f64();

        let physics_start_time = Instant::now();
        let gravity = vector![0.0, 0.0];
        let physics_hooks = ();
        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &physics_hooks,
            &self.event_collector,
        );
        self.timing.physics = (Instant::now() - physics_start_time).as_secs_f64();

        let collision_start_time = Instant::now();
        let collision_events: Vec<CollisionEvent> = self.contact_recv.try_iter().collect();
        collision::handle_collisions(self, &collision_events);
        self.timing.collision = (Instant::now() - collision_start_time).as_secs_f64();

        let turret_start_time = Instant::now();
        for &handle in turrets.iter() {
            if self.turrets.contains(handle) {
                turret::tick(self, handle, dt);
            }
        }
        self.timing.turret = (Instant::now() - turret_start_time).as_secs_f64();

        let scenario_start_time = Instant::now();
        let mut scenario = std::mem::take(&mut self.scenario);
        if let Some(scenario) = scenario.as_mut() {
            scenario.tick(self);
        }
        self.scenario = scenario;
        if !self.commands.is_empty() {
            log::warn!("dropping {} unhandled commands", self.commands.len());
            self.commands.clear();
        }
        self.timing.scenario = (Instant::now() - scenario_start_time).as_secs_f64();

        self.tick += 1;

        let bullet_start_time = Instant::now();
        bullet::tick(self);
        self.timing.bullet = (Instant::now() - bullet_start_time).as_secs_f64();

        if self.gizmos {
            let turrets: Vec<TurretHandle> = self.turrets.iter().cloned().collect();
            for handle in turrets {
                debug::emit_turret(self, handle);
            }
        }
    }

    pub fn events(&self) -> &SimEvents {
        &self.events
    }

    pub fn emit_debug_lines(&mut self, turret: TurretHandle, lines: Vec<Line>) {
        self.events.debug_lines.push((turret.into(), lines));
    }

    pub fn hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher;
        let fixedpoint = |v: f64| (v * 1e9) as i64;
        let mut s = DefaultHasher::new();
        for &handle in self.turrets.iter() {
            let turret = self.turret(handle);
            s.write_i64(fixedpoint(turret.heading()));
            s.write_u32(turret.kills());
            s.write_usize(turret.data().color_index);
        }
        for &handle in self.actors.iter() {
            let actor = self.actor(handle);
            s.write_i64(fixedpoint(actor.position().x));
            s.write_i64(fixedpoint(actor.position().y));
        }
        for &handle in self.bullets.iter() {
            let position = bullet::body(self, handle).position().translation.vector;
            s.write_i64(fixedpoint(position.x));
            s.write_i64(fixedpoint(position.y));
        }
        s.finish()
    }

    pub fn snapshot(&self, nonce: u32) -> Snapshot {
        let mut snapshot = Snapshot {
            nonce,
            time: self.time(),
            status: self.status(),
            turrets: vec![],
            actors: vec![],
            bullets: vec![],
            scenario_lines: self
                .scenario
                .as_ref()
                .map(|scenario| scenario.lines())
                .unwrap_or_default(),
            debug_lines: self.events.debug_lines.clone(),
            timing: self.timing.clone(),
        };

        for &handle in self.turrets.iter() {
            let turret = self.turret(handle);
            snapshot.turrets.push(TurretSnapshot {
                id: handle.into(),
                position: turret.position().vector.into(),
                heading: turret.heading(),
                color: turret.color(),
                kills: turret.kills(),
                kill_text: turret.kill_text().map(|s| s.to_string()),
                target: turret.target().map(|x| x.into()),
                firing: turret.is_firing(),
            });
        }

        for &handle in self.actors.iter() {
            let actor = self.actor(handle);
            snapshot.actors.push(ActorSnapshot {
                id: handle.into(),
                kind: actor.data().kind,
                position: actor.position().vector.into(),
                velocity: actor.velocity(),
                radius: actor.data().radius,
            });
        }

        for &handle in self.bullets.iter() {
            let body = bullet::body(self, handle);
            let data = bullet::data(self, handle);
            snapshot.bullets.push(BulletSnapshot {
                position: body.position().translation.vector.into(),
                velocity: *body.linvel(),
                color: data.color,
                ttl: data.expires_at.saturating_sub(self.tick) as f64 * PHYSICS_TICK_LENGTH,
            });
        }

        snapshot
    }
}

pub struct CollisionEventHandler {
    collision_event_sender: Sender<CollisionEvent>,
}

impl CollisionEventHandler {
    pub fn new(collision_event_sender: Sender<CollisionEvent>) -> CollisionEventHandler {
        CollisionEventHandler {
            collision_event_sender,
        }
    }
}

impl EventHandler for CollisionEventHandler {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let _ = self.collision_event_sender.send(event);
    }

    // Contact force events are never enabled on our colliders.
    fn handle_contact_force_event(
        &self,
        _: f64,
        _: &RigidBodySet,
        _: &ColliderSet,
        _: &ContactPair,
        _: f64,
    ) {
    }
}

pub struct SimEvents {
    pub debug_lines: Vec<(u64, Vec<Line>)>,
}

impl SimEvents {
    pub fn new() -> Self {
        Self {
            debug_lines: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.debug_lines.clear();
    }
}

impl Default for SimEvents {
    fn default() -> Self {
        SimEvents::new()
    }
}
