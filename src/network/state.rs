use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

/// Fractional position of the focal node's resting point on the surface.
const FOCAL_ANCHOR: Vec2 = vec2(0.75, 0.40);

const ORBIT_COUNT: usize = 3;
const ORBIT_BASE_RADIUS: f32 = 35.0;
const ORBIT_RADIUS_STEP: f32 = 8.0;
const ORBIT_FLATTENING: f32 = 0.35;
const ORBIT_BASE_SPEED: f32 = 0.015;
const ORBIT_SPEED_STEP: f32 = 0.004;
const INITIAL_SPEED: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_drawable(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn anchor(self) -> Vec2 {
        vec2(self.width * FOCAL_ANCHOR.x, self.height * FOCAL_ANCHOR.y)
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }
}

impl From<Vec2> for SurfaceSize {
    fn from(size: Vec2) -> Self {
        Self::new(size.x, size.y)
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub position: Vec2,
    pub velocity: Vec2,
    pub is_focal: bool,
    /// Neighbours found by the last connectivity pass. Only valid for that frame.
    pub connections: Vec<usize>,
}

impl Node {
    fn focal(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            is_focal: true,
            connections: Vec::new(),
        }
    }

    fn drifting(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            is_focal: false,
            connections: Vec::new(),
        }
    }
}

/// A decorative particle circling the focal node on a flattened, rotated ellipse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitParticle {
    pub angle: f32,
    pub speed: f32,
    pub radius_x: f32,
    pub radius_y: f32,
    /// Fixed orientation that tells the three ellipses apart.
    pub rotation: f32,
    /// Extra orientation accumulated while the pointer is near the focal node.
    pub path_rotation: f32,
    pub path_speed: f32,
}

impl OrbitParticle {
    fn staggered(index: usize) -> Self {
        let step = index as f32;
        let radius_x = ORBIT_BASE_RADIUS + step * ORBIT_RADIUS_STEP;

        Self {
            angle: (step * 120.0).to_radians(),
            speed: ORBIT_BASE_SPEED + step * ORBIT_SPEED_STEP,
            radius_x,
            radius_y: radius_x * ORBIT_FLATTENING,
            rotation: (step * 60.0).to_radians(),
            path_rotation: 0.0,
            path_speed: 0.0,
        }
    }

    pub fn total_rotation(&self) -> f32 {
        self.rotation + self.path_rotation
    }

    /// Point on this orbit's ellipse at `angle`, rotated into place around `center`.
    pub fn point_at(&self, center: Vec2, angle: f32) -> Vec2 {
        rotated_ellipse_point(
            center,
            self.radius_x,
            self.radius_y,
            self.total_rotation(),
            angle,
        )
    }

    pub fn position(&self, center: Vec2) -> Vec2 {
        self.point_at(center, self.angle)
    }
}

pub(crate) fn rotated_ellipse_point(
    center: Vec2,
    radius_x: f32,
    radius_y: f32,
    rotation: f32,
    angle: f32,
) -> Vec2 {
    let local = vec2(angle.cos() * radius_x, angle.sin() * radius_y);
    let (sin, cos) = rotation.sin_cos();
    center + vec2(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
}

/// Folds an angle into `[0, 2π)`.
pub(crate) fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Everything one frame of the animation reads and writes.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
    pub nodes: Vec<Node>,
    pub orbits: Vec<OrbitParticle>,
    /// Last pointer position in surface coordinates. Last write wins.
    pub pointer: Vec2,
    focal_index: Option<usize>,
}

impl Simulation {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a fresh node set for `surface`. Nothing is allocated when `count` is zero
    /// or the surface has no area.
    pub fn initialize(surface: SurfaceSize, count: usize, rng: &mut impl Rng) -> Self {
        let pointer = surface.center();
        if count == 0 || !surface.is_drawable() {
            return Self {
                pointer,
                ..Self::default()
            };
        }

        let mut nodes = Vec::with_capacity(count);
        nodes.push(Node::focal(surface.anchor()));
        for _ in 1..count {
            let position = vec2(
                rng.gen_range(0.0..surface.width),
                rng.gen_range(0.0..surface.height),
            );
            let velocity = vec2(
                rng.gen_range(-INITIAL_SPEED..=INITIAL_SPEED),
                rng.gen_range(-INITIAL_SPEED..=INITIAL_SPEED),
            );
            nodes.push(Node::drifting(position, velocity));
        }

        let orbits = (0..ORBIT_COUNT).map(OrbitParticle::staggered).collect();

        Self {
            nodes,
            orbits,
            pointer,
            focal_index: Some(0),
        }
    }

    /// Wraps hand-placed nodes without orbits; the first tagged node becomes focal.
    #[cfg(test)]
    pub(crate) fn with_nodes(nodes: Vec<Node>) -> Self {
        let focal_index = nodes.iter().position(|node| node.is_focal);
        Self {
            nodes,
            focal_index,
            ..Self::default()
        }
    }

    pub fn focal_index(&self) -> Option<usize> {
        self.focal_index.filter(|&index| index < self.nodes.len())
    }

    pub fn focal(&self) -> Option<&Node> {
        self.focal_index().map(|index| &self.nodes[index])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
