//! Read-only particle snapshot handed to the presentation adapter

use glam::Vec2;

use super::particle::{Particle, ParticleId};

/// Everything needed to draw one living particle
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleView {
    pub id: ParticleId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Type index, doubles as the color index
    pub kind: usize,
    pub health: f32,
    pub magic_cooldown: u32,
    pub shield_active: bool,
    pub black_hole_radius: f32,
    pub pentagram_progress: f32,
    pub supernova_progress: Option<f32>,
    pub time_warp_active: bool,
    pub atom_active: bool,
    pub atom_progress: f32,
    pub atom_angle: f32,
    /// Where this frame's lightning bolt lands, if one was cast
    pub lightning_to: Option<Vec2>,
    /// Position of the entangled partner, if any
    pub entangled_with: Option<Vec2>,
    pub fractal_points: Vec<Vec2>,
    pub chain_explosions: Vec<Vec2>,
}

impl ParticleView {
    pub(crate) fn new(
        p: &Particle,
        lightning_to: Option<Vec2>,
        entangled_with: Option<Vec2>,
    ) -> Self {
        Self {
            id: p.id,
            pos: p.pos,
            vel: p.vel,
            size: p.size,
            kind: p.kind,
            health: p.health,
            magic_cooldown: p.magic_cooldown,
            shield_active: p.shield_active,
            black_hole_radius: p.black_hole_radius,
            pentagram_progress: p.pentagram_progress,
            supernova_progress: p.supernova_progress,
            time_warp_active: p.time_warp_active,
            atom_active: p.atom_active,
            atom_progress: p.atom_progress,
            atom_angle: p.atom_angle,
            lightning_to,
            entangled_with,
            fractal_points: p.fractal_points.clone(),
            chain_explosions: p.chain_explosions.clone(),
        }
    }
}
