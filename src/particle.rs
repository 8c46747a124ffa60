//! Star data and bulk spawning.

use glam::Vec2;
use rand::Rng;

/// A single star.
///
/// `position` is in device pixels. `z` is the depth: it starts in
/// `[min_scale, 1)` and grows every step, which both speeds the star up and
/// thickens its stroke as it "approaches" the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec2,
    pub z: f32,
}

impl Star {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            z,
        }
    }

    /// Whether the star lies within the surface grown by `threshold` on every side.
    #[inline]
    pub fn in_bounds(&self, width: f32, height: f32, threshold: f32) -> bool {
        let p = self.position;
        p.x >= -threshold && p.x <= width + threshold && p.y >= -threshold && p.y <= height + threshold
    }
}

/// Number of stars for a viewport measured in logical pixels.
pub fn star_count(logical_width: f32, logical_height: f32, density_divisor: f32) -> usize {
    ((logical_width + logical_height) / density_divisor).round().max(0.0) as usize
}

/// Uniform depth in `[min_scale, 1)`.
#[inline]
pub fn random_depth<R: Rng + ?Sized>(rng: &mut R, min_scale: f32) -> f32 {
    min_scale + rng.gen::<f32>() * (1.0 - min_scale)
}

/// Spawn `count` stars uniformly over a `width x height` surface.
pub fn spawn_stars<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    width: f32,
    height: f32,
    min_scale: f32,
) -> Vec<Star> {
    (0..count)
        .map(|_| {
            Star::new(
                rng.gen::<f32>() * width,
                rng.gen::<f32>() * height,
                random_depth(rng, min_scale),
            )
        })
        .collect()
}
