use crate::color;
use crate::simulation::Simulation;
use crate::turret::TurretHandle;
use nalgebra::{point, Point2, Vector4};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

const CIRCLE_SEGMENTS: usize = 32;

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Line {
    pub a: Point2<f64>,
    pub b: Point2<f64>,
    pub color: Vector4<f32>,
}

/// Outline of a circle as a closed loop of line segments.
pub fn circle(center: Point2<f64>, radius: f64, color: Vector4<f32>) -> Vec<Line> {
    let vertex = |i: usize| {
        let angle = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
        point![
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin()
        ]
    };
    (0..CIRCLE_SEGMENTS)
        .map(|i| Line {
            a: vertex(i),
            b: vertex(i + 1),
            color,
        })
        .collect()
}

pub fn detection_circle(sim: &Simulation, handle: TurretHandle) -> Vec<Line> {
    let turret = sim.turret(handle);
    circle(
        turret.position().vector.into(),
        turret.data().config.detection_radius,
        color::from_u32(color::YELLOW),
    )
}

pub fn emit_turret(sim: &mut Simulation, handle: TurretHandle) {
    let lines = detection_circle(sim, handle);
    sim.emit_debug_lines(handle, lines);
}
