//! Deterministic simulation module
//!
//! All particle and magic logic lives here. This module must be pure and
//! deterministic:
//! - Seeded RNG only
//! - Effect time comes from the simulation clock, never wall time
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod entangle;
pub mod input;
pub mod magic;
pub mod particle;
pub mod schedule;
pub mod simulation;
pub mod view;

pub use entangle::Entanglements;
pub use input::{InputEvent, spawn_type_for_key};
pub use particle::{Magic, Particle, ParticleId};
pub use schedule::{Channel, ChannelKind, Clock, Deferred, Scheduler};
pub use simulation::{SimStats, Simulation, interact};
pub use view::ParticleView;
