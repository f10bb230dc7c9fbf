//! The simulation: particle population, tick loop and effect clock

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entangle::Entanglements;
use super::input::{InputEvent, spawn_type_for_key};
use super::magic::{self, EffectContext};
use super::particle::{Magic, Particle, ParticleId};
use super::schedule::{Channel, Clock, Scheduler};
use super::view::ParticleView;
use crate::config::SimConfig;
use crate::consts::{CHANNEL_STEP_MS, SPLIT_CAP_FACTOR};
use crate::error::ConfigError;

/// Population and effect counters, mostly for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub ticks: u64,
    pub now_ms: u64,
    pub population: usize,
    pub alive: usize,
    pub pending_tasks: usize,
    pub active_channels: usize,
    pub entangled_pairs: usize,
}

/// Pairwise attraction between two particles within interaction range.
///
/// The force is `matrix[p1][p2] * max_force` along the line between them,
/// applied equally and oppositely. Coincident particles get no force, and
/// a pair with a dead member is skipped.
pub fn interact(p1: &mut Particle, p2: &mut Particle, config: &SimConfig) {
    if !p1.alive || !p2.alive {
        return;
    }
    let delta = p2.pos - p1.pos;
    let distance = delta.length();
    if distance >= config.interaction_radius {
        return;
    }
    let strength = config.attraction_matrix.get(p1.kind, p2.kind) * config.max_force;
    let force = delta / distance.max(config.min_interaction_distance) * strength;
    p1.apply_force(force, config.max_speed);
    p2.apply_force(-force, config.max_speed);
}

pub struct Simulation {
    config: SimConfig,
    /// Insertion-ordered population
    particles: Vec<Particle>,
    bounds: Vec2,
    paused: bool,
    /// Last known pointer position (spawn point for number keys)
    pointer: Vec2,
    clock: Clock,
    scheduler: Scheduler,
    channels: Vec<Channel>,
    entanglements: Entanglements,
    rng: Pcg32,
    next_id: ParticleId,
    ticks: u64,
}

impl Simulation {
    /// Create a simulation filled to `particle_count`
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut sim = Self::empty(config, seed)?;
        sim.init_particles();
        Ok(sim)
    }

    /// Create a simulation with no particles
    pub fn empty(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let bounds = Vec2::new(config.canvas_width, config.canvas_height);
        Ok(Self {
            config,
            particles: Vec::new(),
            bounds,
            paused: false,
            pointer: Vec2::ZERO,
            clock: Clock::default(),
            scheduler: Scheduler::new(),
            channels: Vec::new(),
            entanglements: Entanglements::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            ticks: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn entangled_partner(&self, id: ParticleId) -> Option<ParticleId> {
        self.entanglements.partner(id)
    }

    pub fn entanglements(&self) -> &Entanglements {
        &self.entanglements
    }

    fn next_particle_id(&mut self) -> ParticleId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn make_particle(&mut self, pos: Vec2, kind: usize) -> Particle {
        let id = self.next_particle_id();
        let mut particle = Particle::new(id, Vec2::ZERO, kind, self.config.particle_min_size);
        particle.set_position(pos, self.bounds, &mut self.rng);
        particle
    }

    /// Fill the population up to `particle_count` with random particles
    pub fn init_particles(&mut self) {
        let target = self.config.particle_count;
        while self.particles.len() < target {
            let pos = Vec2::new(
                self.rng.random::<f32>() * self.bounds.x,
                self.rng.random::<f32>() * self.bounds.y,
            );
            let kind = self.rng.random_range(0..self.config.particle_types);
            let particle = self.make_particle(pos, kind);
            self.particles.push(particle);
        }
        log::info!(
            "Initialized {} particles of {} types",
            self.particles.len(),
            self.config.particle_types
        );
    }

    /// Add one particle; `None` if `kind` is not a configured type
    pub fn spawn_particle(&mut self, pos: Vec2, kind: usize) -> Option<ParticleId> {
        if kind >= self.config.particle_types {
            return None;
        }
        let particle = self.make_particle(pos, kind);
        let id = particle.id;
        self.particles.push(particle);
        Some(id)
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Change the wrap bounds; particles outside wrap on their next update
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.bounds = Vec2::new(width, height);
        log::info!("Resized to {}x{}", width, height);
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(' ') => self.toggle_pause(),
            InputEvent::Key(key) => {
                if let Some(kind) = spawn_type_for_key(key) {
                    if let Some(id) = self.spawn_particle(self.pointer, kind) {
                        log::debug!("Spawned particle {} of type {}", id, kind);
                    }
                }
            }
            InputEvent::PointerMoved(pos) => self.pointer = pos,
            InputEvent::Resized { width, height } => self.resize(width, height),
        }
    }

    /// Split the borrows effects need away from the particle list
    fn effect_parts(&mut self) -> (&mut Vec<Particle>, EffectContext<'_>) {
        (
            &mut self.particles,
            EffectContext {
                config: &self.config,
                bounds: self.bounds,
                now_ms: self.clock.now_ms,
                scheduler: &mut self.scheduler,
                channels: &mut self.channels,
                entanglements: &mut self.entanglements,
                rng: &mut self.rng,
            },
        )
    }

    /// Cast the particle's own magic if it is alive and off cooldown.
    /// Returns whether an effect ran.
    pub fn cast_magic(&mut self, index: usize) -> bool {
        let cooldown = self.config.magic_cooldown;
        let Some(magic) = self
            .particles
            .get_mut(index)
            .and_then(|p| p.begin_cast(cooldown))
        else {
            return false;
        };
        let (particles, mut ctx) = self.effect_parts();
        magic::cast(magic, index, particles, &mut ctx);
        true
    }

    /// Run any effect with `particles[index]` as caster, ignoring its
    /// type and cooldown. Dead or missing casters do nothing.
    pub fn cast_effect(&mut self, index: usize, magic: Magic) -> bool {
        if !self.particles.get(index).is_some_and(|p| p.alive) {
            return false;
        }
        let (particles, mut ctx) = self.effect_parts();
        magic::cast(magic, index, particles, &mut ctx);
        true
    }

    /// Fire deferred tasks and channel steps that have come due
    fn run_due_effects(&mut self) {
        let now = self.clock.now_ms;
        {
            let (particles, mut ctx) = self.effect_parts();
            while let Some(task) = ctx.scheduler.pop_due(now) {
                magic::run_deferred(task, particles, &mut ctx);
            }
        }

        let particles = &mut self.particles;
        let config = &self.config;
        self.channels.retain_mut(|channel| {
            while channel.next_step_ms <= now {
                channel.next_step_ms += CHANNEL_STEP_MS;
                if magic::step_channel(channel, particles, config) {
                    return false;
                }
            }
            true
        });
    }

    /// All unordered pairs, in insertion order
    fn interaction_pass(&mut self) {
        let config = &self.config;
        for i in 0..self.particles.len() {
            let (head, tail) = self.particles.split_at_mut(i + 1);
            let p1 = &mut head[i];
            for p2 in tail.iter_mut() {
                interact(p1, p2, config);
            }
        }
    }

    /// Advance one tick. Does nothing while paused (effect time included).
    pub fn update(&mut self) {
        if self.paused {
            return;
        }
        self.ticks += 1;
        self.clock.advance(u64::from(self.config.tick_ms));

        self.run_due_effects();
        self.interaction_pass();

        let before = self.particles.len();
        self.particles.retain(|p| p.alive);
        let died = before - self.particles.len();
        if died > 0 {
            log::debug!("{} particles died at tick {}", died, self.ticks);
        }

        let size_range = (self.config.particle_min_size, self.config.particle_max_size);
        for i in 0..self.particles.len() {
            self.particles[i].update(self.bounds, size_range, &mut self.rng);
            if self.rng.random_bool(self.config.cast_chance) {
                self.cast_magic(i);
            }
        }

        if self.config.split_each_tick {
            // Only particles that existed before this pass may split
            let parents: Vec<ParticleId> = self.particles.iter().map(|p| p.id).collect();
            for id in parents {
                if let Some(i) = self.particles.iter().position(|p| p.id == id) {
                    self.split_particle(i);
                }
            }
        }
    }

    /// Growth policy: with `split_chance`, duplicate the particle in place.
    /// Past 1.5x the target population the oldest particle is dropped.
    pub fn split_particle(&mut self, index: usize) -> bool {
        let Some(source) = self.particles.get(index) else {
            return false;
        };
        if !source.alive || !self.rng.random_bool(self.config.split_chance) {
            return false;
        }
        let (pos, kind) = (source.pos, source.kind);
        let child = self.make_particle(pos, kind);
        self.particles.push(child);

        let cap = self.config.particle_count as f32 * SPLIT_CAP_FACTOR;
        if self.particles.len() as f32 > cap {
            self.particles.remove(0);
        }
        true
    }

    /// Snapshot of every living particle for drawing.
    ///
    /// Consumes lightning targets, so each bolt is drawn exactly once.
    pub fn render_views(&mut self) -> Vec<ParticleView> {
        let mut strikes = Vec::new();
        for p in self.particles.iter_mut() {
            if let Some(target) = p.lightning_target.take() {
                strikes.push((p.id, target));
            }
        }

        let position_of = |id: ParticleId| {
            self.particles
                .iter()
                .find(|p| p.id == id && p.alive)
                .map(|p| p.pos)
        };

        self.particles
            .iter()
            .filter(|p| p.alive)
            .map(|p| {
                let lightning_to = strikes
                    .iter()
                    .find(|(caster, _)| *caster == p.id)
                    .and_then(|&(_, target)| position_of(target));
                let entangled_with = self.entanglements.partner(p.id).and_then(&position_of);
                ParticleView::new(p, lightning_to, entangled_with)
            })
            .collect()
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            ticks: self.ticks,
            now_ms: self.clock.now_ms,
            population: self.particles.len(),
            alive: self.particles.iter().filter(|p| p.alive).count(),
            pending_tasks: self.scheduler.len(),
            active_channels: self.channels.len(),
            entangled_pairs: self.entanglements.len(),
        }
    }
}
