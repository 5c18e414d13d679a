use crate::actor::{self, ActorHandle, ActorKind};
use crate::bullet::{self, BulletHandle};
use crate::simulation::Simulation;
use crate::turret::TurretHandle;
use rapier2d_f64::prelude::*;

const ACTOR_COLLISION_GROUP: Group = Group::GROUP_1;
const BULLET_COLLISION_GROUP: Group = Group::GROUP_2;

pub fn actor_interaction_groups() -> InteractionGroups {
    InteractionGroups::new(ACTOR_COLLISION_GROUP, BULLET_COLLISION_GROUP)
}

pub fn bullet_interaction_groups() -> InteractionGroups {
    InteractionGroups::new(BULLET_COLLISION_GROUP, ACTOR_COLLISION_GROUP)
}

pub fn handle_collisions(sim: &mut Simulation, events: &[CollisionEvent]) {
    for event in events {
        if let CollisionEvent::Started(h1, h2, _flags) = event {
            let get_index = |h| sim.colliders.get(h).and_then(|x| x.parent()).map(|x| x.0);
            if let (Some(idx1), Some(idx2)) = (get_index(*h1), get_index(*h2)) {
                enum Collider {
                    Bullet(BulletHandle),
                    Actor(ActorHandle),
                    Unknown,
                }
                // Either side may already be gone if an earlier event in this
                // step removed it.
                let classify_collider = |idx| {
                    if sim.bullets.contains(BulletHandle(idx)) {
                        Collider::Bullet(BulletHandle(idx))
                    } else if sim.actors.contains(ActorHandle(idx)) {
                        Collider::Actor(ActorHandle(idx))
                    } else {
                        Collider::Unknown
                    }
                };
                match (classify_collider(idx1), classify_collider(idx2)) {
                    (Collider::Bullet(b), Collider::Actor(a))
                    | (Collider::Actor(a), Collider::Bullet(b)) => handle_hit(sim, b, a),
                    _ => {}
                }
            }
        }
    }
}

fn handle_hit(sim: &mut Simulation, bullet: BulletHandle, actor: ActorHandle) {
    match sim.actor(actor).data().kind {
        ActorKind::Enemy => {
            let owner = bullet::owner(sim, bullet);
            actor::destroy(sim, actor);
            report_kill(sim, owner);
            bullet::destroy(sim, bullet);
        }
        ActorKind::Obstacle => {}
    }
}

fn report_kill(sim: &mut Simulation, owner: Option<TurretHandle>) {
    match owner {
        Some(turret) if sim.turrets.contains(turret) => {
            sim.turret_mut(turret).increment_enemies_destroyed();
        }
        _ => log::debug!("kill without a registered owner"),
    }
}
