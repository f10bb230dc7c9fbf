//! Spell Life - a particle-life toy with magic
//!
//! Core modules:
//! - `sim`: Deterministic simulation (forces, effects, scheduling)
//! - `renderer`: Presentation adapter (particle state -> triangle lists)
//! - `config`: Immutable tunables, loaded from JSON

pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::{AttractionMatrix, SimConfig};
pub use error::ConfigError;

use glam::Vec2;

/// Fixed effect constants (time values in clock milliseconds)
pub mod consts {
    /// Starting (and maximum healable) health
    pub const MAX_HEALTH: f32 = 10.0;

    /// Number of distinct particle types with a magic effect
    pub const MAX_TYPES: usize = 15;

    pub const FIREBALL_RANGE: f32 = 100.0;
    /// Knockback per pixel of separation
    pub const FIREBALL_PUSH: f32 = 0.1;
    pub const HEAL_RANGE: f32 = 50.0;
    pub const RAID_RANGE: f32 = 30.0;
    pub const LIGHTNING_RANGE: f32 = 150.0;
    pub const LIGHTNING_DAMAGE_MULT: f32 = 1.5;

    pub const SHIELD_DURATION_MS: u64 = 5000;

    pub const BLACK_HOLE_RADIUS: f32 = 100.0;
    pub const BLACK_HOLE_DELAY_MS: u64 = 3000;
    /// Side of the square that swallowed particles land in
    pub const BLACK_HOLE_SCATTER: f32 = 10.0;

    pub const PENTAGRAM_RANGE: f32 = 100.0;
    pub const PENTAGRAM_STEPS: u32 = 20;

    pub const VORTEX_RADIUS: f32 = 100.0;
    pub const VORTEX_FORCE: f32 = 0.1;
    pub const VORTEX_DURATION_MS: u64 = 3000;

    pub const CHAIN_RADIUS: f32 = 50.0;
    pub const CHAIN_MAX_DEPTH: u32 = 3;
    pub const CHAIN_STAGGER_MS: u64 = 200;
    pub const CHAIN_CLEAR_MS: u64 = 3000;

    pub const FRACTAL_MAX_DEPTH: u32 = 5;
    pub const FRACTAL_BRANCH_LENGTH: f32 = 20.0;
    pub const FRACTAL_DURATION_MS: u64 = 3000;

    pub const SUPERNOVA_RANGE: f32 = 200.0;
    pub const SUPERNOVA_STEPS: u32 = 20;

    pub const TIME_WARP_RANGE: f32 = 150.0;
    pub const TIME_WARP_DELAY_MS: u64 = 3000;
    pub const TIME_WARP_AGE_SHIFT: u32 = 100;

    pub const ENTANGLE_RANGE: f32 = 100.0;
    pub const ENTANGLE_DURATION_MS: u64 = 5000;

    pub const ATOM_STEPS: u32 = 50;
    pub const ATOM_ANGLE_STEP: f32 = 0.1;

    /// Period of every progress-driven effect
    pub const CHANNEL_STEP_MS: u64 = 50;

    /// Population cap multiplier for the split growth policy
    pub const SPLIT_CAP_FACTOR: f32 = 1.5;
}

/// Wrap a coordinate into [0, extent)
#[inline]
pub fn wrap_coord(value: f32, extent: f32) -> f32 {
    let wrapped = (value % extent + extent) % extent;
    // (-tiny + extent) can round up to extent itself
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Unit direction at `angle` radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_coord() {
        assert_eq!(wrap_coord(5.0, 100.0), 5.0);
        assert_eq!(wrap_coord(105.0, 100.0), 5.0);
        assert!((wrap_coord(-5.0, 100.0) - 95.0).abs() < 1e-4);
        assert!((wrap_coord(-250.0, 100.0) - 50.0).abs() < 1e-4);
        assert_eq!(wrap_coord(100.0, 100.0), 0.0);
        assert_eq!(wrap_coord(-1e-9, 100.0), 0.0);
    }
}
