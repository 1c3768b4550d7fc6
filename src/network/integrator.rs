use eframe::egui::{Vec2, vec2};
use rand::Rng;

use super::state::{Node, OrbitParticle, Simulation, SurfaceSize, wrap_angle};

const FOCAL_DRIFT: f32 = 0.01;
const FOCAL_WOBBLE_X: f32 = 0.3;
const FOCAL_WOBBLE_Y: f32 = 0.2;
const POINTER_PULL: f32 = 0.01;
const FRICTION: f32 = 0.99;
const BOUNCE_DAMPING: f32 = -0.8;
const JITTER_PROBABILITY: f64 = 0.1;
const JITTER_AMPLITUDE: f32 = 0.005;
const MAX_SPEED: f32 = 2.0;
const ORBIT_PATH_SPIN: f32 = 0.02;

/// Advances every node and orbit particle by one frame.
///
/// `time_secs` only feeds the focal node's wobble; the step itself is frame based.
pub(super) fn step(
    simulation: &mut Simulation,
    surface: SurfaceSize,
    mouse_influence: f32,
    time_secs: f64,
    rng: &mut impl Rng,
) {
    let pointer = simulation.pointer;
    let influence_sq = mouse_influence * mouse_influence;
    let focal_pointer_distance_sq = simulation
        .focal()
        .map(|focal| (pointer - focal.position).length_sq());

    for node in &mut simulation.nodes {
        if node.is_focal {
            drift_focal(node, surface, time_secs);
        } else {
            step_node(node, pointer, surface, mouse_influence, influence_sq, rng);
        }
    }

    step_orbits(
        &mut simulation.orbits,
        focal_pointer_distance_sq,
        mouse_influence,
    );
}

fn drift_focal(node: &mut Node, surface: SurfaceSize, time_secs: f64) {
    node.position += (surface.anchor() - node.position) * FOCAL_DRIFT;
    node.position += vec2(
        (time_secs * 0.5).sin() as f32 * FOCAL_WOBBLE_X,
        (time_secs * 0.3).cos() as f32 * FOCAL_WOBBLE_Y,
    );
}

fn step_node(
    node: &mut Node,
    pointer: Vec2,
    surface: SurfaceSize,
    mouse_influence: f32,
    influence_sq: f32,
    rng: &mut impl Rng,
) {
    node.position += node.velocity;

    let delta = pointer - node.position;
    let distance_sq = delta.length_sq();
    if distance_sq < influence_sq {
        let force = 1.0 - distance_sq.sqrt() / mouse_influence;
        let angle = delta.y.atan2(delta.x);
        node.velocity += vec2(angle.cos(), angle.sin()) * (force * POINTER_PULL);
    }

    node.velocity *= FRICTION;
    reflect_at_bounds(&mut node.position, &mut node.velocity, surface);

    if rng.gen_bool(JITTER_PROBABILITY) {
        node.velocity += vec2(
            rng.gen_range(-JITTER_AMPLITUDE..=JITTER_AMPLITUDE),
            rng.gen_range(-JITTER_AMPLITUDE..=JITTER_AMPLITUDE),
        );
    }

    clamp_speed(&mut node.velocity, MAX_SPEED);
}

/// Inelastic bounce: the escaping axis flips and loses a fifth of its speed, and the
/// position is pulled back onto the edge.
fn reflect_at_bounds(position: &mut Vec2, velocity: &mut Vec2, surface: SurfaceSize) {
    if position.x < 0.0 || position.x > surface.width {
        velocity.x *= BOUNCE_DAMPING;
        position.x = position.x.clamp(0.0, surface.width);
    }
    if position.y < 0.0 || position.y > surface.height {
        velocity.y *= BOUNCE_DAMPING;
        position.y = position.y.clamp(0.0, surface.height);
    }
}

fn clamp_speed(velocity: &mut Vec2, max_speed: f32) {
    let speed_sq = velocity.length_sq();
    if speed_sq > max_speed * max_speed {
        *velocity *= max_speed / speed_sq.sqrt();
    }
}

fn step_orbits(
    orbits: &mut [OrbitParticle],
    focal_pointer_distance_sq: Option<f32>,
    mouse_influence: f32,
) {
    let path_speed = match focal_pointer_distance_sq {
        Some(distance_sq) if distance_sq < mouse_influence * mouse_influence => {
            (1.0 - distance_sq.sqrt() / mouse_influence) * ORBIT_PATH_SPIN
        }
        _ => 0.0,
    };

    for orbit in orbits {
        orbit.angle = wrap_angle(orbit.angle + orbit.speed);
        orbit.path_speed = path_speed;
        orbit.path_rotation = wrap_angle(orbit.path_rotation + path_speed);
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn surface() -> SurfaceSize {
        SurfaceSize::new(400.0, 300.0)
    }

    #[test]
    fn nodes_stay_inside_surface_and_under_speed_limit() {
        let mut rng = StdRng::seed_from_u64(42);
        let surface = surface();
        let mut simulation = Simulation::initialize(surface, 120, &mut rng);

        for frame in 0..600 {
            // Sweep the pointer around so attraction kicks in for many nodes.
            let t = frame as f32 * 0.05;
            simulation.pointer = vec2(200.0 + 180.0 * t.cos(), 150.0 + 130.0 * t.sin());
            step(&mut simulation, surface, 150.0, frame as f64 / 60.0, &mut rng);

            for node in simulation.nodes.iter().filter(|node| !node.is_focal) {
                assert!((0.0..=surface.width).contains(&node.position.x));
                assert!((0.0..=surface.height).contains(&node.position.y));
                assert!(node.velocity.length() <= MAX_SPEED + 1e-4);
            }
        }
    }

    #[test]
    fn fast_node_is_clamped_to_max_speed_preserving_direction() {
        let mut velocity = vec2(3.0, 4.0);
        clamp_speed(&mut velocity, MAX_SPEED);

        assert!((velocity.length() - MAX_SPEED).abs() < 1e-5);
        assert!((velocity.x / velocity.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn bounce_flips_and_damps_escaping_axis() {
        let mut position = vec2(-5.0, 10.0);
        let mut velocity = vec2(-5.0, 0.0);
        reflect_at_bounds(&mut position, &mut velocity, surface());

        assert_eq!(position.x, 0.0);
        assert!((velocity.x - 4.0).abs() < 1e-5);
        assert_eq!(position.y, 10.0);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn node_crossing_left_edge_ends_on_it_moving_inward() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut node = Node {
            position: vec2(3.0, 10.0),
            velocity: vec2(-5.0, 0.0),
            is_focal: false,
            connections: Vec::new(),
        };

        step_node(
            &mut node,
            vec2(1_000.0, 1_000.0),
            surface(),
            150.0,
            150.0 * 150.0,
            &mut rng,
        );

        assert_eq!(node.position.x, 0.0);
        assert!(node.velocity.x > 0.0);
        assert!(node.velocity.length() <= MAX_SPEED + 1e-5);
    }

    #[test]
    fn pointer_pulls_nearby_node() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut node = Node {
            position: vec2(100.0, 100.0),
            velocity: Vec2::ZERO,
            is_focal: false,
            connections: Vec::new(),
        };

        step_node(
            &mut node,
            vec2(150.0, 100.0),
            surface(),
            150.0,
            150.0 * 150.0,
            &mut rng,
        );

        // (1 - 50/150) * 0.01 * 0.99 toward +x, give or take the jitter.
        assert!((node.velocity.x - 0.0066).abs() < 0.006);
        assert!(node.velocity.x > 0.0);
    }

    #[test]
    fn focal_node_hovers_near_anchor() {
        let mut rng = StdRng::seed_from_u64(1);
        let surface = SurfaceSize::new(800.0, 600.0);
        let mut simulation = Simulation::initialize(surface, 10, &mut rng);
        simulation.pointer = vec2(-10_000.0, -10_000.0);

        for frame in 0..100 {
            step(&mut simulation, surface, 150.0, 12.0 + frame as f64 / 60.0, &mut rng);
        }

        // The wobble feeds a 1% leaky integrator, so the offset is bounded by wobble / drift.
        let focal = simulation.focal().expect("focal node");
        assert!((focal.position.x - 600.0).abs() <= FOCAL_WOBBLE_X / FOCAL_DRIFT);
        assert!((focal.position.y - 240.0).abs() <= FOCAL_WOBBLE_Y / FOCAL_DRIFT);
    }

    #[test]
    fn orbit_angles_wrap() {
        let mut rng = StdRng::seed_from_u64(2);
        let surface = surface();
        let mut simulation = Simulation::initialize(surface, 5, &mut rng);

        for _ in 0..2_000 {
            // Keep the pointer on the focal node so the path keeps spinning.
            simulation.pointer = simulation.focal().expect("focal node").position;
            step(&mut simulation, surface, 150.0, 0.0, &mut rng);
            for orbit in &simulation.orbits {
                assert!((0.0..TAU).contains(&orbit.angle));
                assert!((0.0..TAU).contains(&orbit.path_rotation));
            }
        }
    }

    #[test]
    fn orbit_path_holds_still_when_pointer_is_far() {
        let mut rng = StdRng::seed_from_u64(4);
        let surface = surface();
        let mut simulation = Simulation::initialize(surface, 5, &mut rng);
        simulation.pointer = vec2(5_000.0, 5_000.0);
        let before = simulation.orbits.clone();

        for _ in 0..30 {
            step(&mut simulation, surface, 150.0, 0.0, &mut rng);
        }

        for (start, orbit) in before.iter().zip(&simulation.orbits) {
            assert_eq!(orbit.path_rotation, start.path_rotation);
            assert_eq!(orbit.path_speed, 0.0);
            let expected = wrap_angle(start.angle + start.speed * 30.0);
            assert!((orbit.angle - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn orbit_path_spins_faster_closer_to_focal_node() {
        let mut orbits = vec![OrbitParticle {
            angle: 0.0,
            speed: 0.0,
            radius_x: 35.0,
            radius_y: 12.25,
            rotation: 0.0,
            path_rotation: 0.0,
            path_speed: 0.0,
        }];

        step_orbits(&mut orbits, Some(75.0 * 75.0), 150.0);
        assert!((orbits[0].path_speed - 0.01).abs() < 1e-6);

        step_orbits(&mut orbits, Some(0.0), 150.0);
        assert!((orbits[0].path_speed - 0.02).abs() < 1e-6);
    }

    #[test]
    fn zero_influence_never_pulls() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut node = Node {
            position: vec2(50.0, 50.0),
            velocity: Vec2::ZERO,
            is_focal: false,
            connections: Vec::new(),
        };

        step_node(&mut node, vec2(50.0, 50.0), surface(), 0.0, 0.0, &mut rng);
        assert!(node.velocity.length() <= JITTER_AMPLITUDE * 2.0);
    }
}
