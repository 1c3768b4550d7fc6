use std::f32::consts::SQRT_2;

use eframe::egui::{Align2, Color32, FontId, Mesh, Painter, Pos2, Rect, vec2};

const STATUS_COLOR: Color32 = Color32::from_rgb(148, 163, 184);

/// Darkens the surface towards its edges so overlaid content stays readable.
pub(super) fn draw_vignette(painter: &Painter, rect: Rect) {
    painter.add(vignette_mesh(rect));
}

pub(super) fn draw_status(painter: &Painter, rect: Rect, text: &str) {
    painter.text(
        rect.left_top() + vec2(12.0, 10.0),
        Align2::LEFT_TOP,
        text,
        FontId::monospace(13.0),
        STATUS_COLOR,
    );
}

fn vignette_mesh(rect: Rect) -> Mesh {
    let edge = Color32::from_rgba_unmultiplied(15, 23, 42, 77);
    let ring = [
        rect.left_top(),
        rect.center_top(),
        rect.right_top(),
        rect.right_center(),
        rect.right_bottom(),
        rect.center_bottom(),
        rect.left_bottom(),
        rect.left_center(),
    ];

    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.center(), Color32::TRANSPARENT);
    for point in ring {
        mesh.colored_vertex(point, edge.gamma_multiply(elliptical_reach(rect, point)));
    }

    let count = ring.len() as u32;
    for index in 0..count {
        mesh.add_triangle(0, 1 + index, 1 + (index + 1) % count);
    }
    mesh
}

/// 0 at the centre, 1 in the corners, measured on an ellipse fitted to `rect`.
fn elliptical_reach(rect: Rect, point: Pos2) -> f32 {
    let half = rect.size() * 0.5;
    if half.x <= 0.0 || half.y <= 0.0 {
        return 0.0;
    }
    let offset = point - rect.center();
    let normalized = vec2(offset.x / half.x, offset.y / half.y);
    (normalized.length() / SQRT_2).min(1.0)
}
