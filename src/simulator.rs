//! Per-step integration of the velocity field and the star set.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::StarfieldConfig;
use crate::error::Result;
use crate::particle::{spawn_stars, Star};
use crate::recycle::RecycleRule;
use crate::velocity::{Smoothing, VelocityField};

/// Owns the stars and the velocity field they share.
///
/// The RNG is a type parameter so tests can pass a seeded generator; the
/// default is a [`SmallRng`] seeded from entropy.
pub struct Simulator<R: Rng = SmallRng> {
    stars: Vec<Star>,
    velocity: VelocityField,
    smoothing: Smoothing,
    recycle: RecycleRule,
    rng: R,
}

impl Simulator<SmallRng> {
    /// Build a simulator from config, spawning `count` stars over the surface.
    ///
    /// Uses `config.seed` when present. Fails if the config does not validate.
    pub fn from_config(
        config: &StarfieldConfig,
        count: usize,
        width: f32,
        height: f32,
    ) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(Self::with_rng(config, count, width, height, rng))
    }
}

impl<R: Rng> Simulator<R> {
    /// Build a simulator with an explicit RNG.
    ///
    /// The config is taken as already validated.
    pub fn with_rng(
        config: &StarfieldConfig,
        count: usize,
        width: f32,
        height: f32,
        mut rng: R,
    ) -> Self {
        let stars = spawn_stars(&mut rng, count, width, height, config.min_scale);
        Self {
            stars,
            velocity: VelocityField::new(config.base_depth_rate),
            smoothing: Smoothing {
                target_decay: config.target_decay,
                drift: config.drift_smoothing,
                depth: config.depth_smoothing,
            },
            recycle: RecycleRule::new(config.overflow_threshold, config.min_scale),
            rng,
        }
    }

    /// Build a simulator around an existing star set.
    pub fn from_stars(config: &StarfieldConfig, stars: Vec<Star>, rng: R) -> Self {
        let mut sim = Self::with_rng(config, 0, 0.0, 0.0, rng);
        sim.stars = stars;
        sim
    }

    /// Advance the velocity field, then every star, by one step.
    pub fn step(&mut self, width: f32, height: f32) {
        self.velocity.integrate(&self.smoothing);

        let v = self.velocity;
        let center = Vec2::new(width, height) * 0.5;
        let threshold = self.recycle.threshold;

        for star in &mut self.stars {
            star.position += v.drift * star.z;
            star.position += (star.position - center) * v.z * star.z;
            star.z += v.z;

            if !star.in_bounds(width, height, threshold) {
                self.recycle
                    .recycle(star, width, height, &v, &mut self.rng);
            }
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn velocity(&self) -> &VelocityField {
        &self.velocity
    }

    pub fn velocity_mut(&mut self) -> &mut VelocityField {
        &mut self.velocity
    }

}
