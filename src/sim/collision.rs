//! Collision detection and response for the arena walls
//!
//! The tricky part of the arena: fast agents can skip past a wall in a single
//! step. Every wall is tested against both the current and the predicted
//! next position, and the whole wall list is swept up to
//! [`COLLISION_PASSES`] times per tick.

use glam::Vec2;

use super::agent::Agent;
use super::arena::{Arena, Wall};
use crate::consts::*;
use crate::direction_to;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the wall (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward agent center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a circle at `pos` against one wall segment.
///
/// A hit is reported when the center is within `radius + WALL_DETECT_MARGIN`
/// of the segment. The normal points from the wall toward the center, except
/// when the center sits on the wall or on its outer side: then the wall's
/// inward normal is used so the response always pushes back into the arena.
pub fn agent_wall_collision(pos: Vec2, radius: f32, wall: &Wall, arena_center: Vec2) -> CollisionResult {
    if wall.length() < 0.01 {
        return CollisionResult::miss(); // Degenerate segment
    }

    let closest = wall.closest_point(pos);
    let offset = pos - closest;
    let dist = offset.length();

    if dist > radius + WALL_DETECT_MARGIN {
        return CollisionResult::miss();
    }

    let inward = wall.inward_normal(arena_center);
    let (normal, signed_dist) = match direction_to(closest, pos) {
        Some((dir, d)) if dir.dot(inward) > 0.0 => (dir, d),
        // On the line or beyond it
        _ => (inward, -dist),
    };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: radius - signed_dist,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Limit speed to `max_speed`, keeping direction
#[inline]
pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    velocity.clamp_length_max(max_speed)
}

/// Apply the response for one wall hit: reposition, reflect, bounce, clamp.
///
/// Velocity is only reflected when the agent moves into the wall; an agent
/// already separating keeps its heading.
pub fn apply_wall_response(agent: &mut Agent, hit: &CollisionResult) {
    agent.pos = hit.point + hit.normal * (agent.radius + WALL_SAFETY_MARGIN);

    if agent.vel.dot(hit.normal) < 0.0 {
        agent.vel = reflect_velocity(agent.vel, hit.normal) * WALL_BOUNCE;
    }
    agent.vel = clamp_speed(agent.vel, MAX_SPEED);
}

/// Resolve every wall contact for `agent` this tick.
///
/// Returns the number of contacts resolved. When more than one contact was
/// needed the agent is nudged toward the arena center.
pub fn resolve_wall_collisions(agent: &mut Agent, arena: &Arena, dt: f32) -> usize {
    let mut count = 0;

    for _ in 0..COLLISION_PASSES {
        let mut pass_hit = false;

        for wall in &arena.walls {
            let predicted = agent.pos + agent.vel * dt;
            for sample in [agent.pos, predicted] {
                let hit = agent_wall_collision(sample, agent.radius, wall, arena.center);
                if hit.hit {
                    apply_wall_response(agent, &hit);
                    count += 1;
                    pass_hit = true;
                    break;
                }
            }
        }

        if !pass_hit {
            break;
        }
    }

    if count > 1 {
        if let Some((dir, _)) = direction_to(agent.pos, arena.center) {
            agent.pos += dir * CENTER_NUDGE;
        }
    }

    count
}
