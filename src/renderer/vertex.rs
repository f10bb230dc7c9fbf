//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (canvas pixels) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for particles and effects
pub mod colors {
    /// One color per particle type
    pub const PALETTE: [[f32; 4]; 15] = [
        [1.0, 0.0, 0.0, 1.0],    // red
        [0.0, 0.5, 0.0, 1.0],    // green
        [0.0, 0.0, 1.0, 1.0],    // blue
        [1.0, 1.0, 0.0, 1.0],    // yellow
        [0.5, 0.0, 0.5, 1.0],    // purple
        [0.0, 1.0, 1.0, 1.0],    // cyan
        [1.0, 0.0, 1.0, 1.0],    // magenta
        [1.0, 0.65, 0.0, 1.0],   // orange
        [0.5, 1.0, 0.0, 1.0],    // chartreuse
        [0.25, 0.88, 0.82, 1.0], // turquoise
        [1.0, 0.75, 0.8, 1.0],   // pink
        [1.0, 0.84, 0.0, 1.0],   // gold
        [0.53, 0.81, 0.92, 1.0], // sky
        [0.93, 0.51, 0.93, 1.0], // violet
        [0.6, 1.0, 0.6, 1.0],    // mint
    ];

    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SHIELD: [f32; 4] = [0.0, 1.0, 1.0, 0.5];
    pub const PENTAGRAM_ARC: [f32; 4] = [1.0, 0.0, 0.0, 0.5];
    pub const PENTAGRAM_STAR: [f32; 4] = [1.0, 0.0, 0.0, 0.8];
    pub const LIGHTNING: [f32; 4] = [1.0, 1.0, 0.0, 0.8];
    pub const HEALTH_BACK: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const HEALTH_FILL: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
    pub const TIME_WARP_RING: [f32; 4] = [0.0, 1.0, 1.0, 0.5];
    pub const TIME_WARP_TICK: [f32; 4] = [0.0, 1.0, 1.0, 0.8];
    pub const ENTANGLE_LINE: [f32; 4] = [1.0, 0.0, 1.0, 0.5];
    pub const ENTANGLE_NODE: [f32; 4] = [1.0, 0.0, 1.0, 0.8];
    pub const ATOM_SHELL: [f32; 4] = [0.0, 1.0, 0.0, 0.5];
    pub const ATOM_ORBIT: [f32; 4] = [0.0, 0.78, 1.0, 0.7];
    pub const ATOM_ELECTRON: [f32; 4] = [0.0, 0.78, 1.0, 1.0];
    pub const ATOM_NUCLEUS: [f32; 4] = [1.0, 0.4, 0.4, 1.0];
    pub const CHAIN_BURST: [f32; 4] = [1.0, 0.5, 0.1, 0.6];
    pub const FRACTAL: [f32; 4] = [0.8, 0.9, 1.0, 0.7];

    /// Palette color for a type (wraps for out-of-range types)
    pub fn for_type(kind: usize) -> [f32; 4] {
        PALETTE[kind % PALETTE.len()]
    }

    /// Same color with a different alpha
    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }
}
