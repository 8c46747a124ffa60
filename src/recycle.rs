//! Respawning stars that drifted off the surface.
//!
//! The star set has a fixed size, so a star that leaves the overflow band is
//! reinitialized in place. With negligible drift it reappears anywhere on
//! the surface near the vanishing point. Otherwise it re-enters from the edge
//! the flow is coming from, with the axis picked at random in proportion to
//! the drift on each axis so new stars do not all arrive through one seam.

use rand::Rng;

use crate::particle::{random_depth, Star};
use crate::velocity::VelocityField;

/// Drift magnitude at or below which an axis counts as still.
pub const STILL_DRIFT: f32 = 1.0;

/// Depth given to stars respawned while the field is still.
pub const RESPAWN_DEPTH: f32 = 0.1;

/// Where a recycled star re-enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnEdge {
    /// Anywhere on the surface, at [`RESPAWN_DEPTH`].
    Anywhere,
    Left,
    Right,
    Top,
    Bottom,
}

/// Parameters shared by every recycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecycleRule {
    /// Distance outside the surface where edge spawns are placed.
    pub threshold: f32,
    /// Lower bound of the depth given to edge spawns.
    pub min_scale: f32,
}

impl Default for RecycleRule {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            min_scale: 0.2,
        }
    }
}

impl RecycleRule {
    pub fn new(threshold: f32, min_scale: f32) -> Self {
        Self {
            threshold,
            min_scale,
        }
    }

    /// Reinitialize `star` in place for the current velocity.
    pub fn recycle<R: Rng + ?Sized>(
        &self,
        star: &mut Star,
        width: f32,
        height: f32,
        velocity: &VelocityField,
        rng: &mut R,
    ) {
        let edge = choose_edge(velocity, rng);
        let t = self.threshold;

        if edge == SpawnEdge::Anywhere {
            star.position.x = rng.gen::<f32>() * width;
            star.position.y = rng.gen::<f32>() * height;
            star.z = RESPAWN_DEPTH;
            return;
        }

        star.z = random_depth(rng, self.min_scale);
        match edge {
            SpawnEdge::Left => {
                star.position.x = -t;
                star.position.y = rng.gen::<f32>() * height;
            }
            SpawnEdge::Right => {
                star.position.x = width + t;
                star.position.y = rng.gen::<f32>() * height;
            }
            SpawnEdge::Top => {
                star.position.x = rng.gen::<f32>() * width;
                star.position.y = -t;
            }
            SpawnEdge::Bottom => {
                star.position.x = rng.gen::<f32>() * width;
                star.position.y = height + t;
            }
            SpawnEdge::Anywhere => {}
        }
    }
}

/// Pick the re-entry edge for the current drift.
///
/// The horizontal axis wins with probability `|v.x| / (|v.x| + |v.y|)`.
/// The comparison is written per dominant axis; both branches reduce to
/// that ratio.
pub fn choose_edge<R: Rng + ?Sized>(velocity: &VelocityField, rng: &mut R) -> SpawnEdge {
    let vx = velocity.drift.x.abs();
    let vy = velocity.drift.y.abs();

    if vx <= STILL_DRIFT && vy <= STILL_DRIFT {
        return SpawnEdge::Anywhere;
    }

    let r: f32 = rng.gen();
    let horizontal = if vx > vy {
        r < vx / (vx + vy)
    } else {
        r >= vy / (vx + vy)
    };

    if horizontal {
        if velocity.drift.x > 0.0 {
            SpawnEdge::Left
        } else {
            SpawnEdge::Right
        }
    } else if velocity.drift.y > 0.0 {
        SpawnEdge::Top
    } else {
        SpawnEdge::Bottom
    }
}
