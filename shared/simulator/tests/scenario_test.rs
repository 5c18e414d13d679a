use std::f64::consts::FRAC_PI_2;
use test_log::test;
use turret_simulator::actor::ActorKind;
use turret_simulator::config::TurretConfig;
use turret_simulator::scenario::{self, Status};
use turret_simulator::simulation::{Simulation, PHYSICS_TICK_LENGTH};
use turret_simulator::snapshot::Snapshot;

fn run(sim: &mut Simulation, max_ticks: u32) {
    while sim.status() == Status::Running && sim.tick() < max_ticks {
        sim.step();
    }
}

#[test]
fn test_single_turret_victory() {
    let mut sim = Simulation::new("single_turret", 0);
    run(&mut sim, 600);
    assert_eq!(sim.status(), Status::Victory);
    assert_eq!(scenario::count_enemies(&sim), 0);
    let turret0 = sim.turrets.iter().cloned().next().unwrap();
    assert_eq!(sim.turret(turret0).kills(), 1);
}

#[test]
fn test_waves_spawns_enemies() {
    let mut sim = Simulation::new("waves", 1);
    assert_eq!(sim.turrets.len(), 1);
    sim.step();
    assert_eq!(scenario::count_enemies(&sim), 1);
    for _ in 0..120 {
        sim.step();
    }
    assert_eq!(scenario::count_enemies(&sim), 2);
    assert!(!sim.snapshot(0).scenario_lines.is_empty());
}

#[test]
fn test_waves_determinism() {
    let mut sim0 = Simulation::new("waves", 7);
    let mut sim1 = Simulation::new("waves", 7);
    for _ in 0..1200 {
        sim0.step();
        sim1.step();
        assert_eq!(sim0.hash(), sim1.hash(), "diverged at tick {}", sim0.tick());
    }
}

#[test]
fn test_waves_finishes() {
    let mut sim = Simulation::new("waves", 0);
    run(&mut sim, scenario::MAX_TICKS);
    assert_ne!(sim.status(), Status::Running);
}

#[test]
fn test_custom_config() {
    let config = TurretConfig::from_json(r#"{"detection_radius": 1.0}"#).unwrap();
    let mut sim = Simulation::with_config("single_turret", 0, config);
    for _ in 0..120 {
        sim.step();
    }
    // The enemy three units away is out of range.
    let turret0 = sim.turrets.iter().cloned().next().unwrap();
    assert_eq!(sim.turret(turret0).target(), None);
    assert!(sim.bullets.is_empty());
    assert_eq!(sim.status(), Status::Running);
}

#[test]
fn test_sandbox_commands() {
    let mut sim = Simulation::new("sandbox", 0);
    assert!(sim.turrets.is_empty());
    sim.command("spawn turret position (0, 0) heading 90");
    sim.command("spawn enemy position (-3, 0)");
    sim.command("spawn obstacle position (0, 2) velocity (0.5, 0)");
    sim.command("# comment");
    sim.command("bogus");
    sim.step();

    assert_eq!(sim.turrets.len(), 1);
    assert_eq!(sim.actors.len(), 2);
    assert_eq!(scenario::count_enemies(&sim), 1);
    let turret0 = sim.turrets.iter().cloned().next().unwrap();
    approx::assert_abs_diff_eq!(sim.turret(turret0).heading(), FRAC_PI_2, epsilon = 1e-9);

    let snapshot = sim.snapshot(0);
    let obstacle = snapshot
        .actors
        .iter()
        .find(|a| a.kind == ActorKind::Obstacle)
        .unwrap();
    approx::assert_abs_diff_eq!(obstacle.velocity.x, 0.5, epsilon = 1e-9);

    sim.command("click");
    sim.step();
    sim.step();
    assert_eq!(sim.turret(turret0).data().color_index, 1);
}

#[test]
fn test_sandbox_rejects_bad_commands() {
    let mut sim = Simulation::new("sandbox", 0);
    assert!(scenario::handle_command(&mut sim, "spawn dragon position (0, 0)").is_err());
    assert!(scenario::handle_command(&mut sim, "spawn enemy position (a, b)").is_err());
    assert!(
        scenario::handle_command(&mut sim, "spawn turret position (0, 0) velocity (1, 0)")
            .is_err()
    );
    assert!(scenario::handle_command(&mut sim, "fly away").is_err());
    assert!(
        scenario::handle_command(&mut sim, "spawn enemy position (1, 1) heading 45").is_err()
    );
    assert!(
        scenario::handle_command(&mut sim, "spawn obstacle position (1, 1) heading 0").is_err()
    );
    assert!(sim.actors.is_empty());
    assert!(scenario::handle_command(&mut sim, "spawn enemy position (1, 1)").is_ok());
    assert_eq!(sim.actors.len(), 1);
}

#[test]
fn test_snapshot() {
    let mut sim = Simulation::new("single_turret", 0);
    sim.gizmos = true;
    sim.step();
    let snapshot = sim.snapshot(42);
    assert_eq!(snapshot.nonce, 42);
    assert_eq!(snapshot.status, Status::Running);
    assert_eq!(snapshot.turrets.len(), 1);
    assert_eq!(snapshot.actors.len(), 1);
    assert_eq!(snapshot.bullets.len(), 1);
    assert_eq!(snapshot.debug_lines.len(), 1);
    assert!(snapshot.turrets[0].firing);
    assert_eq!(snapshot.turrets[0].target, Some(snapshot.actors[0].id));
    assert_eq!(snapshot.turrets[0].kill_text.as_deref(), Some(" 0"));
    // One tick has elapsed since the bullet was fired.
    approx::assert_abs_diff_eq!(
        snapshot.bullets[0].ttl,
        5.0 - PHYSICS_TICK_LENGTH,
        epsilon = 1e-9
    );

    let json = serde_json::to_string(&snapshot).unwrap();
    let decoded: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.turrets[0].kills, 0);
}

#[test]
fn test_unconsumed_commands_dropped() {
    let mut sim = Simulation::new("single_turret", 0);
    let actors = sim.actors.len();
    sim.command("spawn enemy position (1, 0)");
    sim.step();
    assert_eq!(sim.actors.len(), actors);

    // The command was discarded, not deferred.
    for _ in 0..10 {
        sim.step();
    }
    assert_eq!(sim.actors.len(), actors);

    scenario::handle_command(&mut sim, "spawn enemy position (1, 0)").unwrap();
    sim.step();
    assert_eq!(sim.actors.len(), actors + 1);
}

#[test]
fn test_sandbox_commands_run_once() {
    let mut sim = Simulation::new("sandbox", 0);
    sim.command("spawn obstacle position (1, 0)");
    for _ in 0..5 {
        sim.step();
    }
    assert_eq!(sim.actors.len(), 1);
}

#[test]
fn test_timing() {
    let mut sim = Simulation::new("single_turret", 0);
    sim.step();
    let timing = sim.timing();
    assert!(timing.total() >= timing.physics);
    assert!(timing.total() >= 0.0);
}
