//! Magic effects
//!
//! Each effect acts on the whole live collection. Immediate effects finish
//! inside `cast`; delayed ones queue a `Deferred` task or start a `Channel`
//! and finish from `run_deferred` / `step_channel` on later ticks.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entangle::Entanglements;
use super::particle::{Magic, Particle, ParticleId};
use super::schedule::{Channel, ChannelKind, Deferred, Scheduler};
use crate::config::SimConfig;
use crate::consts::*;
use crate::direction;

/// Everything an effect may touch besides the particles themselves
pub struct EffectContext<'a> {
    pub config: &'a SimConfig,
    pub bounds: Vec2,
    pub now_ms: u64,
    pub scheduler: &'a mut Scheduler,
    pub channels: &'a mut Vec<Channel>,
    pub entanglements: &'a mut Entanglements,
    pub rng: &'a mut Pcg32,
}

/// Living particles other than `skip` within `range` of `origin`
fn neighbors_mut(
    particles: &mut [Particle],
    skip: usize,
    origin: Vec2,
    range: f32,
) -> impl Iterator<Item = &mut Particle> {
    particles
        .iter_mut()
        .enumerate()
        .filter(move |(i, p)| *i != skip && p.alive && p.pos.distance(origin) < range)
        .map(|(_, p)| p)
}

fn index_of(particles: &[Particle], id: ParticleId) -> Option<usize> {
    particles.iter().position(|p| p.id == id)
}

/// Index of `id` if it is still present and alive
fn living_index(particles: &[Particle], id: ParticleId) -> Option<usize> {
    index_of(particles, id).filter(|&i| particles[i].alive)
}

/// Run `magic` with `particles[caster]` as the caster
pub fn cast(magic: Magic, caster: usize, particles: &mut [Particle], ctx: &mut EffectContext) {
    let Some(source) = particles.get(caster) else {
        return;
    };
    let origin = source.pos;
    let id = source.id;
    let config = ctx.config;
    log::debug!("Particle {} casts {}", id, magic.as_str());

    match magic {
        Magic::Fireball => {
            for p in neighbors_mut(particles, caster, origin, FIREBALL_RANGE) {
                p.apply_force((p.pos - origin) * FIREBALL_PUSH, config.max_speed);
                p.take_damage(config.damage_amount);
            }
        }
        Magic::Heal => {
            for p in neighbors_mut(particles, caster, origin, HEAL_RANGE) {
                p.heal(config.heal_amount);
            }
        }
        Magic::Teleport => {
            let target = Vec2::new(
                ctx.rng.random::<f32>() * ctx.bounds.x,
                ctx.rng.random::<f32>() * ctx.bounds.y,
            );
            particles[caster].set_position(target, ctx.bounds, &mut *ctx.rng);
        }
        Magic::Shield => {
            particles[caster].shield_active = true;
            ctx.scheduler.schedule(
                ctx.now_ms + SHIELD_DURATION_MS,
                Deferred::ClearShield { caster: id },
            );
        }
        Magic::Raid => {
            for p in neighbors_mut(particles, caster, origin, RAID_RANGE) {
                p.take_damage(config.damage_amount * 2.0);
            }
        }
        Magic::Lightning => {
            let targets: Vec<usize> = particles
                .iter()
                .enumerate()
                .filter(|(i, p)| {
                    *i != caster && p.alive && p.pos.distance(origin) < LIGHTNING_RANGE
                })
                .map(|(i, _)| i)
                .collect();
            if !targets.is_empty() {
                let target = targets[ctx.rng.random_range(0..targets.len())];
                particles[target].take_damage(config.damage_amount * LIGHTNING_DAMAGE_MULT);
                particles[caster].lightning_target = Some(particles[target].id);
            }
        }
        Magic::BlackHole => {
            particles[caster].black_hole_radius = BLACK_HOLE_RADIUS;
            ctx.scheduler.schedule(
                ctx.now_ms + BLACK_HOLE_DELAY_MS,
                Deferred::CollapseBlackHole { caster: id },
            );
        }
        Magic::Pentagram => {
            particles[caster].pentagram_progress = 0.0;
            start_channel(ctx, ChannelKind::Pentagram, id);
        }
        Magic::Vortex => {
            for p in neighbors_mut(particles, caster, origin, VORTEX_RADIUS) {
                let offset = p.pos - origin;
                let angle = offset.y.atan2(offset.x);
                let swirl = Vec2::new(-angle.sin(), angle.cos()) * VORTEX_FORCE;
                p.apply_force(swirl, config.max_speed);
            }
            particles[caster].vortex_active = true;
            ctx.scheduler.schedule(
                ctx.now_ms + VORTEX_DURATION_MS,
                Deferred::ClearVortex { caster: id },
            );
        }
        Magic::ExplosiveChain => {
            particles[caster].chain_explosions = vec![origin];
            ctx.scheduler.schedule(
                ctx.now_ms,
                Deferred::ChainBurst {
                    caster: id,
                    origin,
                    depth: 0,
                },
            );
            ctx.scheduler
                .schedule(ctx.now_ms + CHAIN_CLEAR_MS, Deferred::ClearChain { caster: id });
        }
        Magic::Fractalize => {
            let mut points = Vec::with_capacity(64);
            points.push(origin);
            grow_fractal(&mut points, origin, -PI / 2.0, 0);
            particles[caster].fractal_points = points;
            ctx.scheduler.schedule(
                ctx.now_ms + FRACTAL_DURATION_MS,
                Deferred::ClearFractal { caster: id },
            );
        }
        Magic::Supernova => {
            particles[caster].supernova_progress = Some(0.0);
            start_channel(ctx, ChannelKind::Supernova, id);
        }
        Magic::TimeWarp => {
            particles[caster].time_warp_active = true;
            ctx.scheduler.schedule(
                ctx.now_ms + TIME_WARP_DELAY_MS,
                Deferred::ResolveTimeWarp { caster: id },
            );
        }
        Magic::QuantumEntanglement => {
            let partner = particles
                .iter()
                .enumerate()
                .find(|(i, p)| {
                    *i != caster && p.alive && p.pos.distance(origin) < ENTANGLE_RANGE
                })
                .map(|(_, p)| p.id);
            if let Some(partner) = partner {
                ctx.entanglements.link(id, partner);
                ctx.scheduler.schedule(
                    ctx.now_ms + ENTANGLE_DURATION_MS,
                    Deferred::Disentangle { a: id, b: partner },
                );
            }
        }
        Magic::CreateAtom => {
            let source = &mut particles[caster];
            source.atom_active = true;
            source.atom_progress = 0.0;
            start_channel(ctx, ChannelKind::Atom, id);
        }
    }
}

/// Start (or restart) a progress effect for `caster`
fn start_channel(ctx: &mut EffectContext, kind: ChannelKind, caster: ParticleId) {
    ctx.channels
        .retain(|ch| !(ch.kind == kind && ch.caster == caster));
    ctx.channels
        .push(Channel::new(kind, caster, ctx.now_ms + CHANNEL_STEP_MS));
}

/// Binary branching pattern growing from `from`
fn grow_fractal(points: &mut Vec<Vec2>, from: Vec2, angle: f32, depth: u32) {
    if depth > FRACTAL_MAX_DEPTH {
        return;
    }
    let tip = from + direction(angle) * (FRACTAL_BRANCH_LENGTH / (depth + 1) as f32);
    points.push(tip);
    grow_fractal(points, tip, angle - PI / 6.0, depth + 1);
    grow_fractal(points, tip, angle + PI / 6.0, depth + 1);
}

/// Fire a one-shot continuation. Tasks whose caster is gone do nothing.
pub fn run_deferred(task: Deferred, particles: &mut [Particle], ctx: &mut EffectContext) {
    log::debug!("Running deferred {:?} at {} ms", task, ctx.now_ms);

    match task {
        Deferred::ClearShield { caster } => {
            if let Some(i) = index_of(particles, caster) {
                particles[i].shield_active = false;
            }
        }
        Deferred::CollapseBlackHole { caster } => {
            let Some(c) = index_of(particles, caster) else {
                return;
            };
            let origin = particles[c].pos;
            let radius = particles[c].black_hole_radius;
            particles[c].black_hole_radius = 0.0;
            if !particles[c].alive {
                return;
            }
            for p in neighbors_mut(particles, c, origin, radius) {
                let scatter = Vec2::new(
                    ctx.rng.random::<f32>() - 0.5,
                    ctx.rng.random::<f32>() - 0.5,
                ) * BLACK_HOLE_SCATTER;
                p.set_position(origin + scatter, ctx.bounds, &mut *ctx.rng);
                p.vel = Vec2::ZERO;
            }
        }
        Deferred::ClearVortex { caster } => {
            if let Some(i) = index_of(particles, caster) {
                particles[i].vortex_active = false;
            }
        }
        Deferred::ChainBurst {
            caster,
            origin,
            depth,
        } => {
            let Some(c) = living_index(particles, caster) else {
                return;
            };
            particles[c].chain_explosions.push(origin);
            let damage = ctx.config.damage_amount;
            let mut next = Vec::new();
            for p in neighbors_mut(particles, c, origin, CHAIN_RADIUS) {
                p.take_damage(damage);
                next.push(p.pos);
            }
            if depth < CHAIN_MAX_DEPTH {
                let due = ctx.now_ms + u64::from(depth + 1) * CHAIN_STAGGER_MS;
                for origin in next {
                    ctx.scheduler.schedule(
                        due,
                        Deferred::ChainBurst {
                            caster,
                            origin,
                            depth: depth + 1,
                        },
                    );
                }
            }
        }
        Deferred::ClearChain { caster } => {
            if let Some(i) = index_of(particles, caster) {
                particles[i].chain_explosions.clear();
            }
        }
        Deferred::ClearFractal { caster } => {
            if let Some(i) = index_of(particles, caster) {
                particles[i].fractal_points.clear();
            }
        }
        Deferred::ResolveTimeWarp { caster } => {
            let Some(c) = index_of(particles, caster) else {
                return;
            };
            particles[c].time_warp_active = false;
            if !particles[c].alive {
                return;
            }
            let origin = particles[c].pos;
            for p in neighbors_mut(particles, c, origin, TIME_WARP_RANGE) {
                p.age = p.age.saturating_sub(TIME_WARP_AGE_SHIFT);
            }
        }
        Deferred::Disentangle { a, b } => {
            ctx.entanglements.unlink(a, b);
        }
    }
}

/// Advance a progress effect by one step. Returns true once it is finished.
pub fn step_channel(channel: &mut Channel, particles: &mut [Particle], config: &SimConfig) -> bool {
    let Some(c) = living_index(particles, channel.caster) else {
        return true;
    };
    channel.steps += 1;
    let origin = particles[c].pos;
    log::trace!(
        "{:?} of particle {} step {}",
        channel.kind,
        channel.caster,
        channel.steps
    );

    match channel.kind {
        ChannelKind::Pentagram => {
            let done = channel.steps >= PENTAGRAM_STEPS;
            particles[c].pentagram_progress = channel.steps as f32 / PENTAGRAM_STEPS as f32;
            if done {
                for p in neighbors_mut(particles, c, origin, PENTAGRAM_RANGE) {
                    p.take_damage(config.damage_amount * 2.0);
                }
            }
            done
        }
        ChannelKind::Supernova => {
            let done = channel.steps >= SUPERNOVA_STEPS;
            if done {
                for p in neighbors_mut(particles, c, origin, SUPERNOVA_RANGE) {
                    p.take_damage(config.damage_amount * 3.0);
                }
                particles[c].supernova_progress = None;
            } else {
                particles[c].supernova_progress =
                    Some(channel.steps as f32 / SUPERNOVA_STEPS as f32);
            }
            done
        }
        ChannelKind::Atom => {
            let done = channel.steps >= ATOM_STEPS;
            let source = &mut particles[c];
            source.atom_progress = channel.steps as f32 / ATOM_STEPS as f32;
            source.atom_angle += ATOM_ANGLE_STEP;
            if done {
                source.atom_active = false;
            }
            // Inclusive range, unlike the other effects
            for (i, p) in particles.iter_mut().enumerate() {
                if i != c && p.alive && p.pos.distance(origin) <= config.atom_radius {
                    p.take_damage(config.atom_damage);
                }
            }
            done
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Owns everything an `EffectContext` borrows
    struct Rig {
        config: SimConfig,
        scheduler: Scheduler,
        channels: Vec<Channel>,
        entanglements: Entanglements,
        rng: Pcg32,
        now_ms: u64,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                config: SimConfig::default(),
                scheduler: Scheduler::new(),
                channels: Vec::new(),
                entanglements: Entanglements::new(),
                rng: Pcg32::seed_from_u64(3),
                now_ms: 0,
            }
        }

        fn ctx(&mut self) -> EffectContext<'_> {
            EffectContext {
                config: &self.config,
                bounds: Vec2::new(800.0, 600.0),
                now_ms: self.now_ms,
                scheduler: &mut self.scheduler,
                channels: &mut self.channels,
                entanglements: &mut self.entanglements,
                rng: &mut self.rng,
            }
        }

        fn cast(&mut self, magic: Magic, caster: usize, particles: &mut [Particle]) {
            let mut ctx = self.ctx();
            cast(magic, caster, particles, &mut ctx);
        }

        /// Run every task due by `now_ms`
        fn run_until(&mut self, now_ms: u64, particles: &mut [Particle]) {
            self.now_ms = now_ms;
            while let Some(task) = self.scheduler.pop_due(now_ms) {
                let mut ctx = self.ctx();
                run_deferred(task, particles, &mut ctx);
            }
        }
    }

    fn at(id: ParticleId, x: f32, y: f32) -> Particle {
        Particle::new(id, Vec2::new(x, y), 0, 2.0)
    }

    #[test]
    fn test_fireball_pushes_and_damages_in_range_only() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 150.0, 100.0), at(3, 300.0, 100.0)];
        rig.cast(Magic::Fireball, 0, &mut ps);
        assert_eq!(ps[0].health, MAX_HEALTH);
        assert_eq!(ps[1].health, MAX_HEALTH - rig.config.damage_amount);
        assert!(ps[1].vel.x > 0.0);
        assert_eq!(ps[2].health, MAX_HEALTH);
        assert_eq!(ps[2].vel, Vec2::ZERO);
    }

    #[test]
    fn test_heal_neighbor_to_eight() {
        let mut rig = Rig::new();
        rig.config.heal_amount = 5.0;
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 120.0, 100.0)];
        ps[1].health = 3.0;
        ps[0].health = 3.0;
        rig.cast(Magic::Heal, 0, &mut ps);
        assert_eq!(ps[1].health, 8.0);
        assert_eq!(ps[0].health, 3.0);
    }

    #[test]
    fn test_raid_double_damage() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 120.0, 100.0), at(3, 140.0, 100.0)];
        rig.cast(Magic::Raid, 0, &mut ps);
        assert_eq!(ps[1].health, MAX_HEALTH - 2.0 * rig.config.damage_amount);
        assert_eq!(ps[2].health, MAX_HEALTH);
    }

    #[test]
    fn test_teleport_stays_in_bounds() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0)];
        rig.cast(Magic::Teleport, 0, &mut ps);
        assert!(ps[0].pos.x >= 0.0 && ps[0].pos.x < 800.0);
        assert!(ps[0].pos.y >= 0.0 && ps[0].pos.y < 600.0);
    }

    #[test]
    fn test_lightning_hits_one_target_and_records_it() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 150.0, 100.0), at(3, 100.0, 200.0)];
        rig.cast(Magic::Lightning, 0, &mut ps);
        let target = ps[0].lightning_target.unwrap();
        let hit: Vec<_> = ps.iter().filter(|p| p.health < MAX_HEALTH).collect();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].id, target);
        assert_eq!(hit[0].health, MAX_HEALTH - 1.5 * rig.config.damage_amount);
    }

    #[test]
    fn test_lightning_without_targets() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 500.0, 500.0)];
        rig.cast(Magic::Lightning, 0, &mut ps);
        assert_eq!(ps[0].lightning_target, None);
    }

    #[test]
    fn test_shield_clears_after_duration() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0)];
        rig.cast(Magic::Shield, 0, &mut ps);
        assert!(ps[0].shield_active);
        rig.run_until(SHIELD_DURATION_MS - 1, &mut ps);
        assert!(ps[0].shield_active);
        rig.run_until(SHIELD_DURATION_MS, &mut ps);
        assert!(!ps[0].shield_active);
    }

    #[test]
    fn test_black_hole_collapses_neighbors_onto_caster() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 400.0, 300.0), at(2, 460.0, 300.0), at(3, 700.0, 300.0)];
        ps[1].vel = Vec2::new(1.0, 1.0);
        rig.cast(Magic::BlackHole, 0, &mut ps);
        assert_eq!(ps[0].black_hole_radius, BLACK_HOLE_RADIUS);

        rig.run_until(BLACK_HOLE_DELAY_MS, &mut ps);
        assert_eq!(ps[0].black_hole_radius, 0.0);
        assert!(ps[1].pos.distance(ps[0].pos) <= BLACK_HOLE_SCATTER);
        assert_eq!(ps[1].vel, Vec2::ZERO);
        assert_eq!(ps[2].pos, Vec2::new(700.0, 300.0));
    }

    #[test]
    fn test_vortex_pushes_perpendicular() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 150.0, 100.0)];
        rig.cast(Magic::Vortex, 0, &mut ps);
        // Neighbor due east is pushed due south (+y)
        assert!(ps[1].vel.x.abs() < 1e-5);
        assert!((ps[1].vel.y - VORTEX_FORCE).abs() < 1e-5);
        assert!(ps[0].vortex_active);
        rig.run_until(VORTEX_DURATION_MS, &mut ps);
        assert!(!ps[0].vortex_active);
    }

    #[test]
    fn test_explosive_chain_propagates_with_depth_limit() {
        let mut rig = Rig::new();
        // A line of neighbors 40 apart: each burst reaches only the next one
        let mut ps: Vec<Particle> = (0..7)
            .map(|i| at(i + 1, 100.0 + 40.0 * i as f32, 100.0))
            .collect();
        rig.cast(Magic::ExplosiveChain, 0, &mut ps);

        rig.run_until(0, &mut ps);
        assert!(ps[1].health < MAX_HEALTH);
        assert_eq!(ps[2].health, MAX_HEALTH);

        for now_ms in (100..=5000).step_by(100) {
            rig.run_until(now_ms, &mut ps);
        }
        // Depth 0..=3 bursts reach at most four links down the line
        assert_eq!(ps[5].health, MAX_HEALTH);
        assert_eq!(ps[6].health, MAX_HEALTH);
        assert!(ps[4].health < MAX_HEALTH);
        assert!(ps[0].chain_explosions.is_empty());
    }

    #[test]
    fn test_explosive_chain_bursts_are_staggered_by_depth() {
        let mut rig = Rig::new();
        let mut ps: Vec<Particle> = (0..7)
            .map(|i| at(i + 1, 100.0 + 40.0 * i as f32, 100.0))
            .collect();
        rig.cast(Magic::ExplosiveChain, 0, &mut ps);
        rig.run_until(0, &mut ps);
        assert!(ps[1].health < MAX_HEALTH);

        // Burst d lands 200 * d ms after its parent: 200, 600, 1200
        for (link, due_ms) in [(2, 200), (3, 600), (4, 1200)] {
            rig.run_until(due_ms - 1, &mut ps);
            assert_eq!(ps[link].health, MAX_HEALTH, "link {} hit early", link);
            rig.run_until(due_ms, &mut ps);
            assert!(ps[link].health < MAX_HEALTH, "link {} not hit at {}", link, due_ms);
        }
        assert_eq!(ps[5].health, MAX_HEALTH);
    }

    #[test]
    fn test_fractal_points_then_clear() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 110.0, 100.0)];
        rig.cast(Magic::Fractalize, 0, &mut ps);
        assert_eq!(ps[0].fractal_points.len(), 64);
        assert_eq!(ps[0].fractal_points[0], Vec2::new(100.0, 100.0));
        // First branch goes straight up
        assert!((ps[0].fractal_points[1] - Vec2::new(100.0, 80.0)).length() < 1e-3);
        assert_eq!(ps[1].health, MAX_HEALTH);
        rig.run_until(FRACTAL_DURATION_MS, &mut ps);
        assert!(ps[0].fractal_points.is_empty());
    }

    #[test]
    fn test_time_warp_rewinds_age() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 150.0, 100.0), at(3, 160.0, 100.0)];
        ps[1].age = 250;
        ps[2].age = 40;
        rig.cast(Magic::TimeWarp, 0, &mut ps);
        assert!(ps[0].time_warp_active);
        rig.run_until(TIME_WARP_DELAY_MS, &mut ps);
        assert_eq!(ps[1].age, 150);
        assert_eq!(ps[2].age, 0);
        assert!(!ps[0].time_warp_active);
    }

    #[test]
    fn test_entanglement_links_first_neighbor_and_expires() {
        let mut rig = Rig::new();
        let mut ps = vec![
            at(1, 100.0, 100.0),
            at(2, 400.0, 100.0),
            at(3, 150.0, 100.0),
            at(4, 120.0, 100.0),
        ];
        rig.cast(Magic::QuantumEntanglement, 0, &mut ps);
        assert_eq!(rig.entanglements.partner(1), Some(3));
        assert_eq!(rig.entanglements.partner(3), Some(1));

        rig.run_until(ENTANGLE_DURATION_MS - 1, &mut ps);
        assert!(rig.entanglements.is_symmetric());
        assert_eq!(rig.entanglements.len(), 1);

        rig.run_until(ENTANGLE_DURATION_MS, &mut ps);
        assert_eq!(rig.entanglements.partner(1), None);
        assert_eq!(rig.entanglements.partner(3), None);
    }

    #[test]
    fn test_pentagram_completes_after_twenty_steps() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 150.0, 100.0)];
        rig.cast(Magic::Pentagram, 0, &mut ps);
        let mut channel = rig.channels.pop().unwrap();
        for step in 1..PENTAGRAM_STEPS {
            assert!(!step_channel(&mut channel, &mut ps, &rig.config));
            assert_eq!(ps[1].health, MAX_HEALTH, "damaged early at step {}", step);
        }
        assert!(step_channel(&mut channel, &mut ps, &rig.config));
        assert_eq!(ps[0].pentagram_progress, 1.0);
        assert_eq!(ps[1].health, MAX_HEALTH - 2.0 * rig.config.damage_amount);
    }

    #[test]
    fn test_supernova_triple_damage_then_clears() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 250.0, 100.0)];
        rig.cast(Magic::Supernova, 0, &mut ps);
        assert_eq!(ps[0].supernova_progress, Some(0.0));
        let mut channel = rig.channels.pop().unwrap();
        let mut steps = 0;
        while !step_channel(&mut channel, &mut ps, &rig.config) {
            steps += 1;
        }
        assert_eq!(steps + 1, SUPERNOVA_STEPS);
        assert_eq!(ps[0].supernova_progress, None);
        assert_eq!(ps[1].health, MAX_HEALTH - 3.0 * rig.config.damage_amount);
    }

    #[test]
    fn test_atom_damages_every_step() {
        let mut rig = Rig::new();
        rig.config.atom_damage = 0.1;
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 100.0 + rig.config.atom_radius, 100.0)];
        rig.cast(Magic::CreateAtom, 0, &mut ps);
        assert!(ps[0].atom_active);
        let mut channel = rig.channels.pop().unwrap();
        for _ in 0..10 {
            assert!(!step_channel(&mut channel, &mut ps, &rig.config));
        }
        assert!((ps[1].health - (MAX_HEALTH - 1.0)).abs() < 1e-4);
        assert!((ps[0].atom_angle - 1.0).abs() < 1e-4);
        while !step_channel(&mut channel, &mut ps, &rig.config) {}
        assert!(!ps[0].atom_active);
        assert_eq!(channel.steps, ATOM_STEPS);
    }

    #[test]
    fn test_channel_of_dead_caster_stops() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0), at(2, 150.0, 100.0)];
        rig.cast(Magic::Pentagram, 0, &mut ps);
        let mut channel = rig.channels.pop().unwrap();
        ps[0].take_damage(100.0);
        assert!(step_channel(&mut channel, &mut ps, &rig.config));
        assert_eq!(ps[1].health, MAX_HEALTH);
    }

    #[test]
    fn test_recast_restarts_channel() {
        let mut rig = Rig::new();
        let mut ps = vec![at(1, 100.0, 100.0)];
        rig.cast(Magic::Supernova, 0, &mut ps);
        rig.cast(Magic::Supernova, 0, &mut ps);
        assert_eq!(rig.channels.len(), 1);
    }
}
