//! Shape generation for 2D primitives
//!
//! Everything is emitted as plain triangle lists in canvas pixels.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;
use crate::direction;

fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

fn push_quad(
    out: &mut Vec<Vertex>,
    a: Vec2,
    b: Vec2,
    c: Vec2,
    d: Vec2,
    ca: [f32; 4],
    cc: [f32; 4],
) {
    // a-b on one edge (color ca), c-d on the other (color cc)
    out.push(Vertex::new(a.x, a.y, ca));
    out.push(Vertex::new(b.x, b.y, ca));
    out.push(Vertex::new(c.x, c.y, cc));

    out.push(Vertex::new(c.x, c.y, cc));
    out.push(Vertex::new(b.x, b.y, ca));
    out.push(Vertex::new(d.x, d.y, cc));
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        let p1 = center + direction(theta1) * radius;
        let p2 = center + direction(theta2) * radius;
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    arc(center, inner_radius, outer_radius, 0.0, TAU, color, segments)
}

/// Thick arc band from `start` sweeping `sweep` radians
pub fn arc(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    start: f32,
    sweep: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * sweep;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * sweep;

        let (d1, d2) = (direction(theta1), direction(theta2));
        push_quad(
            &mut vertices,
            center + d1 * inner_radius,
            center + d1 * outer_radius,
            center + d2 * inner_radius,
            center + d2 * outer_radius,
            color,
            color,
        );
    }

    vertices
}

/// Filled disc whose color blends through `stops` (offset 0 = center,
/// 1 = edge). Returns `None` if the parameters cannot describe a gradient.
pub fn radial_gradient(
    center: Vec2,
    radius: f32,
    stops: &[(f32, [f32; 4])],
    segments: u32,
) -> Option<Vec<Vertex>> {
    if !center.is_finite() || !radius.is_finite() || radius <= 0.0 || stops.len() < 2 {
        return None;
    }
    if stops.windows(2).any(|w| !(w[0].0 <= w[1].0)) {
        return None;
    }

    let mut vertices = Vec::with_capacity(segments as usize * 6 * stops.len());
    for band in stops.windows(2) {
        let (t0, c0) = band[0];
        let (t1, c1) = band[1];
        let (r0, r1) = (radius * t0, radius * t1);
        for i in 0..segments {
            let d1 = direction((i as f32 / segments as f32) * TAU);
            let d2 = direction(((i + 1) as f32 / segments as f32) * TAU);
            push_quad(
                &mut vertices,
                center + d1 * r0,
                center + d2 * r0,
                center + d1 * r1,
                center + d2 * r1,
                c0,
                c1,
            );
        }
    }
    Some(vertices)
}

/// Straight line of the given width
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = dir.perp() * (width / 2.0);
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        from + perp,
        from - perp,
        to + perp,
        to - perp,
        color,
        color,
    );
    vertices
}

/// Line broken into `dash`-long pieces separated by `gap`
pub fn dashed_line(
    from: Vec2,
    to: Vec2,
    width: f32,
    dash: f32,
    gap: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let length = from.distance(to);
    if length <= 0.0 || dash <= 0.0 {
        return Vec::new();
    }
    let dir = (to - from) / length;
    let mut vertices = Vec::new();
    let mut t = 0.0;
    while t < length {
        let end = (t + dash).min(length);
        vertices.extend(line(from + dir * t, from + dir * end, width, color));
        t = end + gap.max(0.0);
    }
    vertices
}

/// Dashed circle outline
pub fn dashed_circle(
    center: Vec2,
    radius: f32,
    width: f32,
    dash: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    if radius <= 0.0 || dash <= 0.0 {
        return Vec::new();
    }
    let dash_angle = dash / radius;
    let count = (TAU / (2.0 * dash_angle)).floor() as u32;
    let mut vertices = Vec::new();
    for i in 0..count {
        let start = i as f32 * 2.0 * dash_angle;
        vertices.extend(arc(
            center,
            radius - width / 2.0,
            radius + width / 2.0,
            start,
            dash_angle,
            color,
            2,
        ));
    }
    vertices
}

/// Connected line segments through `points`
pub fn polyline(points: &[Vec2], closed: bool, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for pair in points.windows(2) {
        vertices.extend(line(pair[0], pair[1], width, color));
    }
    if closed && points.len() > 2 {
        vertices.extend(line(points[points.len() - 1], points[0], width, color));
    }
    vertices
}

/// Quadratic Bezier stroke
pub fn quad_curve(
    from: Vec2,
    control: Vec2,
    to: Vec2,
    width: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let points: Vec<Vec2> = (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            from * (u * u) + control * (2.0 * u * t) + to * (t * t)
        })
        .collect();
    polyline(&points, false, width, color)
}

/// Rotated ellipse outline
pub fn ellipse(
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    width: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let (sin, cos) = rotation.sin_cos();
    let points: Vec<Vec2> = (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * TAU;
            let local = Vec2::new(radii.x * theta.cos(), radii.y * theta.sin());
            center + Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
        })
        .collect();
    polyline(&points, true, width, color)
}

/// Five-pointed star (outer radius `radius`, inner `radius / 2`), point up
pub fn star(center: Vec2, radius: f32, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    const POINTS: u32 = 5;
    let corners: Vec<Vec2> = (0..POINTS * 2)
        .map(|i| {
            let angle = (i as f32 * 4.0 * PI) / (POINTS * 2) as f32 - PI / 2.0;
            let r = if i % 2 == 0 { radius } else { radius / 2.0 };
            center + direction(angle) * r
        })
        .collect();
    polyline(&corners, true, width, color)
}

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let max = min + size;
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        min,
        Vec2::new(min.x, max.y),
        Vec2::new(max.x, min.y),
        max,
        color,
        color,
    );
    vertices
}

/// Blend between two colors (0 = `a`, 1 = `b`)
pub fn blend(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    lerp_color(a, b, t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_circle_vertex_count() {
        let v = circle(Vec2::new(10.0, 10.0), 5.0, RED, 16);
        assert_eq!(v.len(), 48);
        let center = Vec2::new(10.0, 10.0);
        assert!(
            v.iter()
                .all(|v| (Vec2::from(v.position) - center).length() <= 5.0001)
        );
    }

    #[test]
    fn test_gradient_rejects_bad_input() {
        let stops = [(0.0, RED), (1.0, [1.0, 0.0, 0.0, 0.0])];
        assert!(radial_gradient(Vec2::new(f32::NAN, 0.0), 10.0, &stops, 8).is_none());
        assert!(radial_gradient(Vec2::ZERO, 0.0, &stops, 8).is_none());
        assert!(radial_gradient(Vec2::ZERO, f32::INFINITY, &stops, 8).is_none());
        assert!(radial_gradient(Vec2::ZERO, 10.0, &stops[..1], 8).is_none());
        assert!(radial_gradient(Vec2::ZERO, 10.0, &[(1.0, RED), (0.0, RED)], 8).is_none());
    }

    #[test]
    fn test_gradient_colors_run_center_to_edge() {
        let clear = [1.0, 0.0, 0.0, 0.0];
        let v = radial_gradient(Vec2::ZERO, 10.0, &[(0.0, RED), (1.0, clear)], 8).unwrap();
        assert_eq!(v.len(), 48);
        for vert in &v {
            let r = Vec2::from(vert.position).length();
            if r < 1e-3 {
                assert_eq!(vert.color, RED);
            } else {
                assert_eq!(vert.color, clear);
            }
        }
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, RED).is_empty());
        assert_eq!(line(Vec2::ZERO, Vec2::X, 2.0, RED).len(), 6);
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let solid = line(Vec2::ZERO, Vec2::new(100.0, 0.0), 2.0, RED).len();
        let dashed = dashed_line(Vec2::ZERO, Vec2::new(100.0, 0.0), 2.0, 5.0, 5.0, RED);
        assert_eq!(dashed.len(), solid * 10);
    }

    #[test]
    fn test_star_is_closed_ten_segment_outline() {
        let v = star(Vec2::ZERO, 50.0, 2.0, RED);
        assert_eq!(v.len(), 10 * 6);
    }

    #[test]
    fn test_rect_empty_when_zero_width() {
        assert!(rect(Vec2::ZERO, Vec2::new(0.0, 3.0), RED).is_empty());
        assert_eq!(rect(Vec2::ZERO, Vec2::new(20.0, 3.0), RED).len(), 6);
    }
}
