//! Global disruptions
//!
//! One disruption fires per configured interval. Active disruptions stack:
//! every agent update applies each of them in turn.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::arena::Arena;
use crate::consts::*;
use crate::direction_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisruptionKind {
    /// Constant downward pull
    GravityFlip,
    /// Pull toward the arena center
    MagneticField,
    /// Velocity grows every tick
    SpeedBoost,
    /// Random impulses
    Chaos,
    /// Arena regenerated as a different shape when fired
    ShapeMorph,
}

impl DisruptionKind {
    pub const ALL: [DisruptionKind; 5] = [
        DisruptionKind::GravityFlip,
        DisruptionKind::MagneticField,
        DisruptionKind::SpeedBoost,
        DisruptionKind::Chaos,
        DisruptionKind::ShapeMorph,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisruptionKind::GravityFlip => "Gravity Flip",
            DisruptionKind::MagneticField => "Magnetic Field",
            DisruptionKind::SpeedBoost => "Speed Surge",
            DisruptionKind::Chaos => "Chaos",
            DisruptionKind::ShapeMorph => "Shape Morph",
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A running disruption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disruption {
    pub kind: DisruptionKind,
    /// Clock time when it fired
    pub start: f32,
    /// Seconds it stays active
    pub duration: f32,
}

impl Disruption {
    pub fn new(kind: DisruptionKind, start: f32, duration: f32) -> Self {
        Self {
            kind,
            start,
            duration,
        }
    }

    /// Fire a disruption of `kind` at `now`.
    ///
    /// ShapeMorph regenerates `arena` immediately as a different shape.
    pub fn trigger(kind: DisruptionKind, now: f32, arena: &mut Arena, rng: &mut impl Rng) -> Self {
        let duration = match kind {
            DisruptionKind::ShapeMorph => {
                let next = arena.shape.random_other(rng);
                arena.generate_shape(next);
                SHAPE_MORPH_DURATION
            }
            _ => rng.random_range(DISRUPTION_MIN_DURATION..=DISRUPTION_MAX_DURATION),
        };
        Self::new(kind, now, duration)
    }

    #[inline]
    pub fn is_active(&self, now: f32) -> bool {
        now - self.start < self.duration
    }

    /// Seconds left before it expires (never negative)
    pub fn remaining(&self, now: f32) -> f32 {
        (self.duration - (now - self.start)).max(0.0)
    }

    /// Apply this tick's force to one agent (no-op once expired)
    pub fn apply_to_agent(
        &self,
        agent: &mut Agent,
        now: f32,
        dt: f32,
        center: Vec2,
        rng: &mut impl Rng,
    ) {
        if !self.is_active(now) {
            return;
        }

        match self.kind {
            DisruptionKind::GravityFlip => {
                agent.vel.y += GRAVITY_FLIP_ACCEL * dt;
            }
            DisruptionKind::MagneticField => {
                if let Some((dir, dist)) = direction_to(agent.pos, center) {
                    agent.vel += dir * (MAGNETIC_STRENGTH / (dist + 1.0)) * dt;
                }
            }
            DisruptionKind::SpeedBoost => {
                agent.vel *= SPEED_SURGE_FACTOR;
            }
            DisruptionKind::Chaos => {
                if rng.random_bool(CHAOS_CHANCE) {
                    agent.vel += Vec2::new(
                        rng.random_range(-CHAOS_IMPULSE..=CHAOS_IMPULSE),
                        rng.random_range(-CHAOS_IMPULSE..=CHAOS_IMPULSE),
                    );
                }
            }
            DisruptionKind::ShapeMorph => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ArenaShape, Element};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn moving_agent(pos: Vec2) -> Agent {
        let mut agent = Agent::new(1, Element::Fire, pos, 20.0);
        agent.vel = Vec2::new(100.0, 0.0);
        agent
    }

    #[test]
    fn test_activity_window() {
        let d = Disruption::new(DisruptionKind::Chaos, 10.0, 5.0);
        assert!(d.is_active(10.0));
        assert!(d.is_active(14.99));
        assert!(!d.is_active(15.0));
        assert_eq!(d.remaining(12.0), 3.0);
        assert_eq!(d.remaining(20.0), 0.0);
    }

    #[test]
    fn test_trigger_durations() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut arena = Arena::new(ArenaShape::Hexagon);
        for kind in DisruptionKind::ALL {
            let d = Disruption::trigger(kind, 2.0, &mut arena, &mut rng);
            assert_eq!(d.start, 2.0);
            if kind == DisruptionKind::ShapeMorph {
                assert_eq!(d.duration, 15.0);
            } else {
                assert!(d.duration >= 4.0 && d.duration <= 10.0);
            }
        }
    }

    #[test]
    fn test_shape_morph_changes_arena() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut arena = Arena::new(ArenaShape::Octagon);
        for _ in 0..10 {
            let before = arena.shape;
            Disruption::trigger(DisruptionKind::ShapeMorph, 0.0, &mut arena, &mut rng);
            assert_ne!(arena.shape, before);
            assert_eq!(arena.walls.len(), Arena::new(arena.shape).walls.len());
        }
    }

    #[test]
    fn test_gravity_and_surge() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut agent = moving_agent(ARENA_CENTER);

        let gravity = Disruption::new(DisruptionKind::GravityFlip, 0.0, 5.0);
        gravity.apply_to_agent(&mut agent, 1.0, 0.5, ARENA_CENTER, &mut rng);
        assert_eq!(agent.vel, Vec2::new(100.0, 150.0));

        let surge = Disruption::new(DisruptionKind::SpeedBoost, 0.0, 5.0);
        surge.apply_to_agent(&mut agent, 1.0, SIM_DT, ARENA_CENTER, &mut rng);
        assert!((agent.vel - Vec2::new(103.0, 154.5)).length() < 1e-3);
    }

    #[test]
    fn test_magnetic_pull_toward_center() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut agent = moving_agent(ARENA_CENTER + Vec2::new(0.0, 149.0));
        agent.vel = Vec2::ZERO;
        let field = Disruption::new(DisruptionKind::MagneticField, 0.0, 5.0);
        field.apply_to_agent(&mut agent, 1.0, 1.0, ARENA_CENTER, &mut rng);
        assert!((agent.vel - Vec2::new(0.0, -1.0)).length() < 1e-4);

        // At the center there's no direction to pull in
        let mut centered = moving_agent(ARENA_CENTER);
        field.apply_to_agent(&mut centered, 1.0, 1.0, ARENA_CENTER, &mut rng);
        assert_eq!(centered.vel, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_expired_disruption_does_nothing() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut agent = moving_agent(ARENA_CENTER);
        let gravity = Disruption::new(DisruptionKind::GravityFlip, 0.0, 5.0);
        gravity.apply_to_agent(&mut agent, 6.0, SIM_DT, ARENA_CENTER, &mut rng);
        assert_eq!(agent.vel, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_chaos_impulses_bounded() {
        let mut rng = Pcg32::seed_from_u64(11);
        let chaos = Disruption::new(DisruptionKind::Chaos, 0.0, 100.0);
        let mut kicks = 0;
        for _ in 0..1000 {
            let mut agent = moving_agent(ARENA_CENTER);
            chaos.apply_to_agent(&mut agent, 1.0, SIM_DT, ARENA_CENTER, &mut rng);
            let delta = agent.vel - Vec2::new(100.0, 0.0);
            assert!(delta.x.abs() <= 100.0 && delta.y.abs() <= 100.0);
            if delta != Vec2::ZERO {
                kicks += 1;
            }
        }
        // ~6% of ticks
        assert!(kicks > 20 && kicks < 120, "{kicks} kicks");
    }
}
