use eframe::egui::{Color32, Pos2, Rect, Shape, Stroke, Vec2};

use super::state::{Node, OrbitParticle, Simulation, rotated_ellipse_point};

const BACKGROUND: Color32 = Color32::from_rgb(15, 23, 42);
const NODE_RGB: [u8; 3] = [59, 130, 246];
const FOCAL_RGB: [u8; 3] = [147, 51, 234];

const NODE_GRADIENT: &[(f32, f32)] = &[(0.0, 0.9), (0.5, 0.6), (1.0, 0.1)];
const ORBIT_GRADIENT: &[(f32, f32)] = &[(0.0, 1.0), (0.3, 0.9), (0.7, 0.4), (1.0, 0.1)];
const FOCAL_GRADIENT: &[(f32, f32)] = &[(0.0, 1.0), (0.3, 0.9), (0.6, 0.5), (1.0, 0.1)];

const GLOW_RINGS: usize = 3;
const SHADOW_LAYERS: usize = 3;
const ELLIPSE_SEGMENTS: usize = 48;
const TRAIL_LENGTH: usize = 4;
const TRAIL_SPACING: f32 = 0.06;

fn tint(rgb: [u8; 3], alpha: f32) -> Color32 {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(rgb[0], rgb[1], rgb[2], alpha)
}

fn to_screen(origin: Pos2, position: Vec2) -> Pos2 {
    origin + position
}

/// Clears the display list down to a bare background fill.
pub(super) fn render_static(shapes: &mut Vec<Shape>, rect: Rect) {
    shapes.clear();
    shapes.push(Shape::rect_filled(rect, 0.0, BACKGROUND));
}

/// Paints a complete frame: background, links, orbits, regular nodes, focal node.
pub(super) fn render_frame(
    shapes: &mut Vec<Shape>,
    simulation: &Simulation,
    rect: Rect,
    connection_distance: f32,
    time_secs: f64,
) {
    render_static(shapes, rect);

    let origin = rect.min;
    paint_links(shapes, &simulation.nodes, origin, connection_distance);

    let Some(focal) = simulation.focal() else {
        return;
    };
    let focal_position = to_screen(origin, focal.position);

    for orbit in &simulation.orbits {
        paint_orbit(shapes, orbit, focal_position);
    }

    for node in simulation.nodes.iter().filter(|node| !node.is_focal) {
        paint_node(shapes, to_screen(origin, node.position));
    }

    let pulse = 0.7 + 0.3 * (time_secs * 3.0).sin() as f32;
    paint_focal(shapes, focal_position, pulse);
}

fn paint_links(shapes: &mut Vec<Shape>, nodes: &[Node], origin: Pos2, connection_distance: f32) {
    for (index, node) in nodes.iter().enumerate() {
        for &other in &node.connections {
            if other <= index {
                continue;
            }

            let peer = &nodes[other];
            let distance = (node.position - peer.position).length();
            let opacity = (1.0 - distance / connection_distance).max(0.0);
            let stroke = if node.is_focal || peer.is_focal {
                Stroke::new(2.0, tint(FOCAL_RGB, opacity * 0.8))
            } else {
                Stroke::new(1.0, tint(NODE_RGB, opacity * 0.4))
            };

            shapes.push(Shape::line_segment(
                [
                    to_screen(origin, node.position),
                    to_screen(origin, peer.position),
                ],
                stroke,
            ));
        }
    }
}

fn paint_orbit(shapes: &mut Vec<Shape>, orbit: &OrbitParticle, center: Pos2) {
    let rotation = orbit.total_rotation();

    ellipse_band(
        shapes,
        center,
        orbit.radius_x + 1.0,
        orbit.radius_y + 1.0,
        rotation,
        3.0,
        (0.15, 0.4),
    );
    ellipse_band(
        shapes,
        center,
        orbit.radius_x,
        orbit.radius_y,
        rotation,
        2.0,
        (0.6, 0.9),
    );
    let highlight = (0..ELLIPSE_SEGMENTS)
        .map(|segment| {
            let angle = segment as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
            rotated_ellipse_point(
                center.to_vec2(),
                orbit.radius_x - 0.5,
                orbit.radius_y - 0.5,
                rotation,
                angle,
            )
            .to_pos2()
        })
        .collect::<Vec<_>>();
    shapes.push(Shape::closed_line(
        highlight,
        Stroke::new(1.0, tint(FOCAL_RGB, 0.95)),
    ));

    let position = center + orbit.position(Vec2::ZERO);
    radial_glow(shapes, position, 3.0, 6.0, ORBIT_GRADIENT, FOCAL_RGB);

    let pulse = 0.8 + 0.2 * (orbit.angle * 3.0).sin();
    soft_shadow(shapes, position, 1.5, 12.0, tint(FOCAL_RGB, pulse * 0.8));
    shapes.push(Shape::circle_filled(position, 1.5, tint(FOCAL_RGB, pulse)));

    // The last trail step has zero size, so it is never drawn.
    for step in 1..TRAIL_LENGTH {
        let fade = (TRAIL_LENGTH - step) as f32 / TRAIL_LENGTH as f32;
        let trail = center + orbit.point_at(Vec2::ZERO, orbit.angle - step as f32 * TRAIL_SPACING);
        shapes.push(Shape::circle_filled(
            trail,
            1.5 * fade,
            tint(FOCAL_RGB, fade * 0.3),
        ));
    }
}

/// Strokes a rotated ellipse whose opacity runs from `edge` at the ends of its major
/// axis to `middle` across the minor axis.
fn ellipse_band(
    shapes: &mut Vec<Shape>,
    center: Pos2,
    radius_x: f32,
    radius_y: f32,
    rotation: f32,
    width: f32,
    (edge, middle): (f32, f32),
) {
    let point = |segment: usize| {
        let angle = segment as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
        rotated_ellipse_point(center.to_vec2(), radius_x, radius_y, rotation, angle).to_pos2()
    };

    for segment in 0..ELLIPSE_SEGMENTS {
        let mid_angle = (segment as f32 + 0.5) / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
        let alpha = middle + (edge - middle) * mid_angle.cos().abs();
        shapes.push(Shape::line_segment(
            [point(segment), point(segment + 1)],
            Stroke::new(width, tint(FOCAL_RGB, alpha)),
        ));
    }
}

fn paint_node(shapes: &mut Vec<Shape>, position: Pos2) {
    radial_glow(shapes, position, 3.0, 6.0, NODE_GRADIENT, NODE_RGB);
    shapes.push(Shape::circle_filled(position, 1.5, tint(NODE_RGB, 0.8)));
}

fn paint_focal(shapes: &mut Vec<Shape>, position: Pos2, pulse: f32) {
    radial_glow(shapes, position, 8.0, 12.0, FOCAL_GRADIENT, FOCAL_RGB);
    soft_shadow(shapes, position, 4.0, 20.0, tint(FOCAL_RGB, pulse));
    shapes.push(Shape::circle_filled(position, 4.0, tint(FOCAL_RGB, pulse)));
}

fn sample_gradient(stops: &[(f32, f32)], t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    for pair in stops.windows(2) {
        let (start, from) = pair[0];
        let (end, to) = pair[1];
        if t <= end {
            let span = (end - start).max(f32::EPSILON);
            return from + (to - from) * ((t - start) / span);
        }
    }
    stops.last().map_or(0.0, |&(_, alpha)| alpha)
}

/// Concentric discs standing in for a radial gradient that fades out at
/// `gradient_radius`, clipped to `radius`.
fn radial_glow(
    shapes: &mut Vec<Shape>,
    center: Pos2,
    radius: f32,
    gradient_radius: f32,
    stops: &[(f32, f32)],
    rgb: [u8; 3],
) {
    for ring in (1..=GLOW_RINGS).rev() {
        let ring_radius = radius * ring as f32 / GLOW_RINGS as f32;
        let alpha = sample_gradient(stops, ring_radius / gradient_radius) * 0.5;
        shapes.push(Shape::circle_filled(center, ring_radius, tint(rgb, alpha)));
    }
}

fn soft_shadow(shapes: &mut Vec<Shape>, center: Pos2, radius: f32, blur: f32, color: Color32) {
    for layer in (1..=SHADOW_LAYERS).rev() {
        let spread = blur * layer as f32 / (2.0 * SHADOW_LAYERS as f32);
        shapes.push(Shape::circle_filled(
            center,
            radius + spread,
            color.gamma_multiply(0.12),
        ));
    }
}
