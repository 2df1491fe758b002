//! Arena boundary geometry
//!
//! The arena is a closed convex polygon around a fixed center. Walls are
//! plain line segments; collision response lives in [`super::collision`].

use std::f32::consts::{FRAC_PI_3, FRAC_PI_4, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::collision::resolve_wall_collisions;
use crate::consts::*;
use crate::{direction_to, polar_to_cartesian};

/// Arena outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArenaShape {
    #[default]
    Hexagon,
    Octagon,
    Diamond,
}

impl ArenaShape {
    pub const ALL: [ArenaShape; 3] = [ArenaShape::Hexagon, ArenaShape::Octagon, ArenaShape::Diamond];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArenaShape::Hexagon => "Hexagon",
            ArenaShape::Octagon => "Octagon",
            ArenaShape::Diamond => "Diamond",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// Next/previous shape in menu order (wraps around)
    pub fn cycled(self, direction: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let idx = (self.index() as i32 + direction).rem_euclid(len);
        Self::ALL[idx as usize]
    }

    /// Pick a shape different from `self`
    pub fn random_other(self, rng: &mut impl Rng) -> Self {
        let others: Vec<ArenaShape> = Self::ALL.into_iter().filter(|s| *s != self).collect();
        others[rng.random_range(0..others.len())]
    }
}

/// A straight wall segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub start: Vec2,
    pub end: Vec2,
}

impl Wall {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    /// Closest point on the segment to `p` (clamped to the endpoints)
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let line = self.end - self.start;
        let len_sq = line.length_squared();
        if len_sq < 0.0001 {
            return self.start;
        }
        let t = ((p - self.start).dot(line) / len_sq).clamp(0.0, 1.0);
        self.start + line * t
    }

    /// Unit normal of the wall line pointing toward `center`
    pub fn inward_normal(&self, center: Vec2) -> Vec2 {
        let line = self.end - self.start;
        let perp = Vec2::new(-line.y, line.x).normalize_or_zero();
        if perp.dot(center - self.start) < 0.0 {
            -perp
        } else {
            perp
        }
    }
}

/// The playing field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub shape: ArenaShape,
    pub center: Vec2,
    pub walls: Vec<Wall>,
}

impl Arena {
    pub fn new(shape: ArenaShape) -> Self {
        let mut arena = Self {
            shape,
            center: ARENA_CENTER,
            walls: Vec::new(),
        };
        arena.generate_shape(shape);
        arena
    }

    /// Rebuild the wall list for `shape`. The old walls are replaced in one assignment.
    pub fn generate_shape(&mut self, shape: ArenaShape) {
        let walls = match shape {
            ArenaShape::Hexagon => regular_polygon(self.center, HEXAGON_RADIUS, 6, FRAC_PI_3),
            ArenaShape::Octagon => regular_polygon(self.center, OCTAGON_RADIUS, 8, FRAC_PI_4),
            ArenaShape::Diamond => diamond(self.center, DIAMOND_WIDTH, DIAMOND_HEIGHT),
        };
        self.shape = shape;
        self.walls = walls;
    }

    /// Approximate containment test used for spawning and escape detection
    pub fn is_point_inside(&self, p: Vec2) -> bool {
        let d = p - self.center;
        match self.shape {
            ArenaShape::Hexagon => d.length() < HEXAGON_INSIDE_RADIUS,
            ArenaShape::Octagon => d.length() < OCTAGON_INSIDE_RADIUS,
            ArenaShape::Diamond => {
                d.x.abs() / (DIAMOND_WIDTH / 2.0) + d.y.abs() / (DIAMOND_HEIGHT / 2.0) < 1.0
            }
        }
    }

    /// Resolve wall contacts for one agent. Returns true if any wall was hit.
    pub fn check_collision(&self, agent: &mut Agent, dt: f32) -> bool {
        resolve_wall_collisions(agent, self, dt) > 0
    }

    /// Put an agent that slipped outside back in play.
    ///
    /// The agent is placed on the far side of the center at [`RECOVERY_RADIUS`]
    /// with its velocity halved and inverted.
    pub fn recover_escaped(&self, agent: &mut Agent) -> bool {
        if self.is_point_inside(agent.pos) {
            return false;
        }
        match direction_to(agent.pos, self.center) {
            Some((dir, _)) => {
                agent.pos = self.center + dir * RECOVERY_RADIUS;
                agent.vel *= -0.5;
                true
            }
            None => false,
        }
    }

    /// Random point in a ring around the center that passes [`Self::is_point_inside`].
    ///
    /// Gives up after `attempts` tries.
    pub fn random_point_in_ring(
        &self,
        rng: &mut impl Rng,
        ring: (f32, f32),
        attempts: u32,
    ) -> Option<Vec2> {
        for _ in 0..attempts {
            let theta = rng.random_range(0.0..TAU);
            let r = if ring.1 > ring.0 {
                rng.random_range(ring.0..ring.1)
            } else {
                ring.0
            };
            let p = polar_to_cartesian(self.center, r, theta);
            if self.is_point_inside(p) {
                return Some(p);
            }
        }
        None
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ArenaShape::default())
    }
}

fn regular_polygon(center: Vec2, radius: f32, sides: usize, step: f32) -> Vec<Wall> {
    (0..sides)
        .map(|i| {
            let a1 = i as f32 * step;
            let a2 = (i + 1) as f32 * step;
            Wall::new(
                polar_to_cartesian(center, radius, a1),
                polar_to_cartesian(center, radius, a2),
            )
        })
        .collect()
}

fn diamond(center: Vec2, width: f32, height: f32) -> Vec<Wall> {
    let top = center - Vec2::new(0.0, height / 2.0);
    let right = center + Vec2::new(width / 2.0, 0.0);
    let bottom = center + Vec2::new(0.0, height / 2.0);
    let left = center - Vec2::new(width / 2.0, 0.0);
    vec![
        Wall::new(top, right),
        Wall::new(right, bottom),
        Wall::new(bottom, left),
        Wall::new(left, top),
    ]
}
