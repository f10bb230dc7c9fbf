//! Simulation configuration
//!
//! Immutable once handed to a `Simulation`. Every field has a default, so a
//! JSON file only needs to mention what it changes.

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_TYPES;
use crate::error::ConfigError;

/// Seed for the matrix used by `SimConfig::default()`
const DEFAULT_MATRIX_SEED: u64 = 0x5EED_1A11;

/// Square table of signed coefficients indexed by (type, type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttractionMatrix {
    rows: Vec<Vec<f32>>,
}

impl AttractionMatrix {
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        Self { rows }
    }

    /// Matrix with every coefficient set to `value`
    pub fn uniform(types: usize, value: f32) -> Self {
        Self {
            rows: vec![vec![value; types]; types],
        }
    }

    /// Seeded random matrix with coefficients in [-1, 1)
    pub fn random(types: usize, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let rows = (0..types)
            .map(|_| (0..types).map(|_| rng.random_range(-1.0..1.0)).collect())
            .collect();
        Self { rows }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Coefficient of `from` toward `to`; out-of-range types read as 0
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f32 {
        self.rows
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, from: usize, to: usize, value: f32) {
        if let Some(cell) = self.rows.get_mut(from).and_then(|row| row.get_mut(to)) {
            *cell = value;
        }
    }

    fn validate(&self, types: usize) -> Result<(), ConfigError> {
        if self.rows.len() != types {
            return Err(ConfigError::Invalid(format!(
                "attraction matrix has {} rows, expected {}",
                self.rows.len(),
                types
            )));
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != types {
                return Err(ConfigError::Invalid(format!(
                    "attraction matrix row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    types
                )));
            }
            if let Some(v) = row.iter().find(|v| !v.is_finite() || v.abs() > 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "attraction matrix row {} has coefficient {} outside [-1, 1]",
                    i, v
                )));
            }
        }
        Ok(())
    }
}

/// Tunable constants for one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Target population for `init_particles`
    pub particle_count: usize,
    /// Number of particle types (also the attraction matrix size)
    pub particle_types: usize,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub attraction_matrix: AttractionMatrix,
    pub particle_min_size: f32,
    pub particle_max_size: f32,
    /// Velocity magnitude cap
    pub max_speed: f32,
    /// Scale applied to attraction coefficients
    pub max_force: f32,
    pub interaction_radius: f32,
    /// Distance floor used when normalizing the pair direction
    pub min_interaction_distance: f32,
    /// Ticks between casts by the same particle
    pub magic_cooldown: u32,
    /// Per-tick probability that a particle tries to cast
    pub cast_chance: f64,
    pub damage_amount: f32,
    pub heal_amount: f32,
    pub atom_radius: f32,
    pub atom_damage: f32,
    /// Clock milliseconds per `update()`
    pub tick_ms: u32,
    /// Per-particle probability of duplication when splitting is enabled
    pub split_chance: f64,
    /// Run the split growth policy from the tick
    pub split_each_tick: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: 200,
            particle_types: MAX_TYPES,
            canvas_width: 800.0,
            canvas_height: 600.0,
            attraction_matrix: AttractionMatrix::random(MAX_TYPES, DEFAULT_MATRIX_SEED),
            particle_min_size: 2.0,
            particle_max_size: 5.0,
            max_speed: 2.0,
            max_force: 0.1,
            interaction_radius: 80.0,
            min_interaction_distance: 0.001,
            magic_cooldown: 300,
            cast_chance: 0.005,
            damage_amount: 2.0,
            heal_amount: 5.0,
            atom_radius: 60.0,
            atom_damage: 0.1,
            tick_ms: 16,
            split_chance: 0.001,
            split_each_tick: false,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Replace the matrix with a seeded random one of the right size
    pub fn with_random_matrix(mut self, seed: u64) -> Self {
        self.attraction_matrix = AttractionMatrix::random(self.particle_types, seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid =
            |msg: &str| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg.to_string())) };

        if self.particle_types == 0 || self.particle_types > MAX_TYPES {
            return Err(ConfigError::Invalid(format!(
                "particle_types must be in 1..={}, got {}",
                MAX_TYPES, self.particle_types
            )));
        }
        self.attraction_matrix.validate(self.particle_types)?;

        let finite_positive = |v: f32| v > 0.0 && v.is_finite();
        if !(finite_positive(self.canvas_width) && finite_positive(self.canvas_height)) {
            return invalid("canvas dimensions must be positive and finite");
        }
        for (name, value) in [
            ("damage_amount", self.damage_amount),
            ("heal_amount", self.heal_amount),
            ("atom_damage", self.atom_damage),
            ("atom_radius", self.atom_radius),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if !(self.particle_min_size > 0.0 && self.particle_min_size <= self.particle_max_size) {
            return invalid("particle sizes must satisfy 0 < min <= max");
        }
        if !(self.max_speed > 0.0 && self.max_speed.is_finite()) {
            return invalid("max_speed must be positive");
        }
        if !self.max_force.is_finite() {
            return invalid("max_force must be finite");
        }
        if !(self.interaction_radius > 0.0) {
            return invalid("interaction_radius must be positive");
        }
        if !(self.min_interaction_distance > 0.0) {
            return invalid("min_interaction_distance must be positive");
        }
        if !(0.0..=1.0).contains(&self.cast_chance) || !(0.0..=1.0).contains(&self.split_chance) {
            return invalid("probabilities must be in [0, 1]");
        }
        if self.tick_ms == 0 {
            return invalid("tick_ms must be at least 1");
        }
        Ok(())
    }
}
