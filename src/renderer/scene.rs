//! Particle views -> triangle list
//!
//! Pure translation: nothing here mutates the simulation. Visuals whose
//! parameters come out unusable (non-finite, zero radius) are skipped and
//! the rest of the frame is still drawn.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::{PI, TAU};

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::{MAX_HEALTH, SUPERNOVA_RANGE, TIME_WARP_RANGE};
use crate::direction;
use crate::sim::ParticleView;

const SEGMENTS: u32 = 24;
const PENTAGRAM_RADIUS: f32 = 50.0;
const HEALTH_BAR_WIDTH: f32 = 20.0;
const HEALTH_BAR_HEIGHT: f32 = 3.0;
/// Max sideways kink of a lightning bolt
const LIGHTNING_JITTER: f32 = 30.0;

/// Builds one frame of vertices from particle views
pub struct SceneBuilder {
    atom_radius: f32,
    /// Lightning jitter only; never touches simulation randomness
    rng: Pcg32,
    vertices: Vec<Vertex>,
    skipped: usize,
}

impl SceneBuilder {
    pub fn new(atom_radius: f32, seed: u64) -> Self {
        Self {
            atom_radius,
            rng: Pcg32::seed_from_u64(seed),
            vertices: Vec::new(),
            skipped: 0,
        }
    }

    /// Build the triangle list for a frame
    pub fn build(&mut self, views: &[ParticleView]) -> &[Vertex] {
        self.vertices.clear();
        self.skipped = 0;
        for view in views {
            if !view.pos.is_finite() {
                self.skipped += 1;
                continue;
            }
            self.particle(view);
        }
        if self.skipped > 0 {
            log::debug!("Skipped {} visuals this frame", self.skipped);
        }
        &self.vertices
    }

    /// Visuals dropped during the last `build`
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn gradient(&mut self, center: Vec2, radius: f32, stops: &[(f32, [f32; 4])]) {
        match shapes::radial_gradient(center, radius, stops, SEGMENTS) {
            Some(vertices) => self.vertices.extend(vertices),
            None => self.skipped += 1,
        }
    }

    fn particle(&mut self, p: &ParticleView) {
        let black = [0.0, 0.0, 0.0, 0.8];
        let clear_black = [0.0, 0.0, 0.0, 0.0];

        if p.black_hole_radius > 0.0 {
            self.gradient(p.pos, p.black_hole_radius, &[(0.0, black), (1.0, clear_black)]);
        }

        if p.shield_active {
            self.vertices.extend(shapes::ring(
                p.pos,
                p.size + 4.0,
                p.size + 6.0,
                colors::SHIELD,
                SEGMENTS,
            ));
        } else {
            self.vertices
                .extend(shapes::circle(p.pos, p.size, colors::for_type(p.kind), SEGMENTS));
        }

        if p.pentagram_progress > 0.0 {
            self.pentagram(p.pos, p.pentagram_progress);
        }

        // Healers leave a trail, shield casters glow
        if p.kind == 1 {
            let tail = p.pos - p.vel * 5.0;
            self.vertices.extend(shapes::line(
                p.pos,
                tail,
                1.0,
                colors::with_alpha(colors::WHITE, 0.2),
            ));
        }
        if p.kind == 3 {
            self.gradient(
                p.pos,
                p.size * 2.0,
                &[
                    (0.0, colors::with_alpha(colors::WHITE, 0.8)),
                    (1.0, colors::with_alpha(colors::WHITE, 0.0)),
                ],
            );
        }
        if p.magic_cooldown > 0 {
            self.gradient(
                p.pos,
                p.size * 3.0,
                &[
                    (0.0, colors::with_alpha(colors::WHITE, 0.0)),
                    (1.0, colors::with_alpha(colors::WHITE, 0.2)),
                ],
            );
        }

        if let Some(target) = p.lightning_to {
            self.lightning(p.pos, target);
        }

        self.health_bar(p.pos, p.health);

        if let Some(progress) = p.supernova_progress {
            if progress > 0.0 {
                self.gradient(
                    p.pos,
                    progress * SUPERNOVA_RANGE,
                    &[
                        (0.0, [1.0, 1.0, 1.0, 1.0]),
                        (0.3, [1.0, 0.78, 0.39, 0.8]),
                        (0.7, [1.0, 0.39, 0.2, 0.5]),
                        (1.0, [1.0, 0.2, 0.0, 0.0]),
                    ],
                );
            }
        }
        if p.time_warp_active {
            self.time_warp(p.pos);
        }
        if let Some(partner) = p.entangled_with {
            self.entanglement(p.pos, partner);
        }
        if p.atom_active {
            self.atom(p.pos, p.atom_progress, p.atom_angle);
        }

        for point in &p.fractal_points {
            self.vertices
                .extend(shapes::circle(*point, 1.5, colors::FRACTAL, 6));
        }
        for (i, burst) in p.chain_explosions.iter().enumerate() {
            // Later bursts drawn fainter
            let fade = 1.0 / (i + 1) as f32;
            let color = shapes::blend(
                colors::with_alpha(colors::CHAIN_BURST, 0.0),
                colors::CHAIN_BURST,
                fade,
            );
            self.vertices
                .extend(shapes::ring(*burst, 8.0, 10.0, color, SEGMENTS));
        }
    }

    fn pentagram(&mut self, center: Vec2, progress: f32) {
        self.vertices.extend(shapes::arc(
            center,
            PENTAGRAM_RADIUS - 0.5,
            PENTAGRAM_RADIUS + 0.5,
            0.0,
            TAU * progress.min(1.0),
            colors::PENTAGRAM_ARC,
            SEGMENTS,
        ));
        if progress >= 1.0 {
            self.vertices
                .extend(shapes::star(center, PENTAGRAM_RADIUS, 2.0, colors::PENTAGRAM_STAR));
            self.gradient(
                center,
                PENTAGRAM_RADIUS * 1.2,
                &[
                    (0.0, [1.0, 0.0, 0.0, 0.5]),
                    (1.0, [1.0, 0.0, 0.0, 0.0]),
                ],
            );
        }
    }

    fn lightning(&mut self, from: Vec2, to: Vec2) {
        if !to.is_finite() {
            self.skipped += 1;
            return;
        }
        let jitter = Vec2::new(
            self.rng.random::<f32>() - 0.5,
            self.rng.random::<f32>() - 0.5,
        ) * LIGHTNING_JITTER;
        let control = (from + to) / 2.0 + jitter;
        self.vertices
            .extend(shapes::quad_curve(from, control, to, 2.0, colors::LIGHTNING, 12));
    }

    fn health_bar(&mut self, pos: Vec2, health: f32) {
        let origin = Vec2::new(pos.x - HEALTH_BAR_WIDTH / 2.0, pos.y - 10.0);
        self.vertices.extend(shapes::rect(
            origin,
            Vec2::new(HEALTH_BAR_WIDTH, HEALTH_BAR_HEIGHT),
            colors::HEALTH_BACK,
        ));
        let fill = (health / MAX_HEALTH).clamp(0.0, 1.0);
        self.vertices.extend(shapes::rect(
            origin,
            Vec2::new(HEALTH_BAR_WIDTH * fill, HEALTH_BAR_HEIGHT),
            colors::HEALTH_FILL,
        ));
    }

    fn time_warp(&mut self, center: Vec2) {
        self.vertices.extend(shapes::dashed_circle(
            center,
            TIME_WARP_RANGE,
            2.0,
            5.0,
            colors::TIME_WARP_RING,
        ));
        for i in 0..12 {
            let dir = direction(i as f32 / 12.0 * TAU);
            self.vertices.extend(shapes::line(
                center + dir * (TIME_WARP_RANGE - 10.0),
                center + dir * (TIME_WARP_RANGE + 10.0),
                2.0,
                colors::TIME_WARP_TICK,
            ));
        }
    }

    fn entanglement(&mut self, from: Vec2, to: Vec2) {
        if !to.is_finite() {
            self.skipped += 1;
            return;
        }
        self.vertices.extend(shapes::dashed_line(
            from,
            to,
            2.0,
            5.0,
            5.0,
            colors::ENTANGLE_LINE,
        ));
        self.vertices.extend(shapes::circle(
            (from + to) / 2.0,
            10.0,
            colors::ENTANGLE_NODE,
            SEGMENTS,
        ));
    }

    fn atom(&mut self, center: Vec2, progress: f32, angle: f32) {
        let radius = self.atom_radius * progress;
        if radius > 0.0 {
            self.vertices.extend(shapes::ring(
                center,
                radius - 1.0,
                radius + 1.0,
                colors::ATOM_SHELL,
                SEGMENTS,
            ));
            for i in 0..3 {
                let i = i as f32;
                self.vertices.extend(shapes::ellipse(
                    center,
                    Vec2::new(radius * 0.8, radius * 0.5),
                    i * PI / 3.0 + angle,
                    2.0,
                    colors::ATOM_ORBIT,
                    SEGMENTS,
                ));
                let electron_angle = angle + i * (TAU / 3.0);
                let electron = center
                    + Vec2::new(
                        electron_angle.cos() * radius * 0.8,
                        electron_angle.sin() * radius * 0.5,
                    );
                self.vertices
                    .extend(shapes::circle(electron, 3.0, colors::ATOM_ELECTRON, 8));
            }
        }
        self.vertices
            .extend(shapes::circle(center, 5.0, colors::ATOM_NUCLEUS, 12));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::{Magic, Simulation};

    fn quiet_sim() -> Simulation {
        let config = SimConfig {
            particle_count: 0,
            max_force: 0.0,
            cast_chance: 0.0,
            ..SimConfig::default()
        };
        Simulation::empty(config, 5).unwrap()
    }

    #[test]
    fn test_plain_particle_draws_body_and_health_bar() {
        let mut sim = quiet_sim();
        sim.spawn_particle(Vec2::new(100.0, 100.0), 0).unwrap();
        let views = sim.render_views();
        let mut scene = SceneBuilder::new(60.0, 1);
        let count = scene.build(&views).len();
        // Body circle plus two health bar rects
        assert_eq!(count, (SEGMENTS * 3) as usize + 12);
        assert_eq!(scene.skipped(), 0);
    }

    #[test]
    fn test_effects_add_geometry() {
        let mut sim = quiet_sim();
        sim.spawn_particle(Vec2::new(100.0, 100.0), 0).unwrap();
        sim.spawn_particle(Vec2::new(150.0, 100.0), 0).unwrap();
        let mut scene = SceneBuilder::new(60.0, 1);
        let base = scene.build(&sim.render_views()).len();

        for magic in [
            Magic::BlackHole,
            Magic::TimeWarp,
            Magic::QuantumEntanglement,
            Magic::CreateAtom,
        ] {
            assert!(sim.cast_effect(0, magic));
        }
        let with_effects = scene.build(&sim.render_views()).len();
        assert!(with_effects > base);
    }

    #[test]
    fn test_bad_view_is_skipped_not_fatal() {
        let mut sim = quiet_sim();
        sim.spawn_particle(Vec2::new(100.0, 100.0), 6).unwrap();
        let mut views = sim.render_views();
        views[0].black_hole_radius = f32::NAN;
        views.push(ParticleView {
            pos: Vec2::new(f32::NAN, 0.0),
            ..views[0].clone()
        });
        views[0].black_hole_radius = f32::INFINITY;

        let mut scene = SceneBuilder::new(60.0, 1);
        let count = scene.build(&views).len();
        assert!(count > 0);
        assert_eq!(scene.skipped(), 2);
    }

    #[test]
    fn test_shielded_particle_drawn_as_ring() {
        let mut sim = quiet_sim();
        sim.spawn_particle(Vec2::new(100.0, 100.0), 2).unwrap();
        sim.cast_effect(0, Magic::Shield);
        let views = sim.render_views();
        let mut scene = SceneBuilder::new(60.0, 1);
        let count = scene.build(&views).len();
        assert_eq!(count, (SEGMENTS * 6) as usize + 12);
    }
}
