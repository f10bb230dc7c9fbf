//! Particle state and the type -> magic table

use glam::Vec2;
use rand::Rng;

use crate::consts::MAX_HEALTH;
use crate::wrap_coord;

/// Stable particle identity (never reused within a simulation)
pub type ParticleId = u32;

/// The magic effects a particle can cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Magic {
    Fireball,
    Heal,
    Teleport,
    Shield,
    Raid,
    Lightning,
    BlackHole,
    Pentagram,
    Vortex,
    ExplosiveChain,
    Fractalize,
    Supernova,
    TimeWarp,
    QuantumEntanglement,
    CreateAtom,
}

impl Magic {
    pub const ALL: [Magic; 15] = [
        Magic::Fireball,
        Magic::Heal,
        Magic::Teleport,
        Magic::Shield,
        Magic::Raid,
        Magic::Lightning,
        Magic::BlackHole,
        Magic::Pentagram,
        Magic::Vortex,
        Magic::ExplosiveChain,
        Magic::Fractalize,
        Magic::Supernova,
        Magic::TimeWarp,
        Magic::QuantumEntanglement,
        Magic::CreateAtom,
    ];

    /// Effect cast by a particle of the given type.
    ///
    /// Types 9 and 12 both warp time; explosive chain has no type and is
    /// only reachable through `Simulation::cast_effect`.
    pub fn for_type(kind: usize) -> Option<Self> {
        match kind {
            0 => Some(Magic::Fireball),
            1 => Some(Magic::Heal),
            2 => Some(Magic::Teleport),
            3 => Some(Magic::Shield),
            4 => Some(Magic::Raid),
            5 => Some(Magic::Lightning),
            6 => Some(Magic::BlackHole),
            7 => Some(Magic::Pentagram),
            8 => Some(Magic::Vortex),
            9 => Some(Magic::TimeWarp),
            10 => Some(Magic::Fractalize),
            11 => Some(Magic::Supernova),
            12 => Some(Magic::TimeWarp),
            13 => Some(Magic::QuantumEntanglement),
            14 => Some(Magic::CreateAtom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Magic::Fireball => "fireball",
            Magic::Heal => "heal",
            Magic::Teleport => "teleport",
            Magic::Shield => "shield",
            Magic::Raid => "raid",
            Magic::Lightning => "lightning",
            Magic::BlackHole => "black hole",
            Magic::Pentagram => "pentagram",
            Magic::Vortex => "vortex",
            Magic::ExplosiveChain => "explosive chain",
            Magic::Fractalize => "fractalize",
            Magic::Supernova => "supernova",
            Magic::TimeWarp => "time warp",
            Magic::QuantumEntanglement => "quantum entanglement",
            Magic::CreateAtom => "atom",
        }
    }
}

/// A particle entity
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: ParticleId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Type index (attraction matrix row/column and magic selector)
    pub kind: usize,
    pub size: f32,
    pub health: f32,
    pub alive: bool,
    pub age: u32,
    /// Ticks until the next cast is allowed
    pub magic_cooldown: u32,

    // === Effect state (owned by this particle's own effects) ===
    pub shield_active: bool,
    pub black_hole_radius: f32,
    pub pentagram_progress: f32,
    pub vortex_active: bool,
    /// Burst centers of the current explosive chain
    pub chain_explosions: Vec<Vec2>,
    pub fractal_points: Vec<Vec2>,
    /// `None` when no supernova is charging
    pub supernova_progress: Option<f32>,
    pub time_warp_active: bool,
    pub atom_active: bool,
    pub atom_progress: f32,
    pub atom_angle: f32,
    /// Lightning victim, valid for a single draw
    pub lightning_target: Option<ParticleId>,
}

impl Particle {
    pub fn new(id: ParticleId, pos: Vec2, kind: usize, size: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            kind,
            size,
            health: MAX_HEALTH,
            alive: true,
            age: 0,
            magic_cooldown: 0,
            shield_active: false,
            black_hole_radius: 0.0,
            pentagram_progress: 0.0,
            vortex_active: false,
            chain_explosions: Vec::new(),
            fractal_points: Vec::new(),
            supernova_progress: None,
            time_warp_active: false,
            atom_active: false,
            atom_progress: 0.0,
            atom_angle: 0.0,
            lightning_target: None,
        }
    }

    /// Move to `pos`, replacing any non-finite component with a random one
    pub fn set_position<R: Rng + ?Sized>(&mut self, pos: Vec2, bounds: Vec2, rng: &mut R) {
        self.pos.x = if pos.x.is_finite() {
            pos.x
        } else {
            rng.random::<f32>() * bounds.x
        };
        self.pos.y = if pos.y.is_finite() {
            pos.y
        } else {
            rng.random::<f32>() * bounds.y
        };
    }

    /// Accumulate a force into velocity, capped at `max_speed`
    pub fn apply_force(&mut self, force: Vec2, max_speed: f32) {
        self.vel += force;
        let speed = self.vel.length();
        if speed > max_speed {
            self.vel = self.vel / speed * max_speed;
        }
        if !self.vel.is_finite() {
            self.vel = Vec2::ZERO;
        }
    }

    /// Advance one tick: move, wrap into `bounds`, age, cool down
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        bounds: Vec2,
        size_range: (f32, f32),
        rng: &mut R,
    ) {
        if !self.alive {
            return;
        }

        self.pos += self.vel;
        self.pos.x = wrap_coord(self.pos.x, bounds.x);
        self.pos.y = wrap_coord(self.pos.y, bounds.y);

        if !self.pos.is_finite() {
            log::warn!("Particle {} left the plane, re-placing", self.id);
            self.set_position(Vec2::NAN, bounds, rng);
            self.vel = Vec2::ZERO;
        }

        self.age = self.age.saturating_add(1);
        self.size = self.size.max(size_range.0).min(size_range.1);
        if self.magic_cooldown > 0 {
            self.magic_cooldown -= 1;
        }
    }

    /// Lose health; dying is permanent
    pub fn take_damage(&mut self, amount: f32) {
        if !self.alive {
            return;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.alive = false;
        }
    }

    /// Restore health up to `MAX_HEALTH`
    pub fn heal(&mut self, amount: f32) {
        if self.alive {
            self.health = (self.health + amount).min(MAX_HEALTH);
        }
    }

    #[inline]
    pub fn distance_to(&self, other: &Particle) -> f32 {
        self.pos.distance(other.pos)
    }

    /// Start a cast if allowed, returning the effect to run.
    ///
    /// Puts the particle on cooldown even when its type has no effect.
    pub fn begin_cast(&mut self, cooldown: u32) -> Option<Magic> {
        if self.magic_cooldown > 0 || !self.alive {
            return None;
        }
        self.magic_cooldown = cooldown;
        Magic::for_type(self.kind)
    }
}
