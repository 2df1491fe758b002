//! Collectible pickups
//!
//! Pickups spawn on an interval, sit still, and are consumed by the first
//! agent that touches them. Uncollected pickups expire after
//! [`PICKUP_LIFETIME`] seconds.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use crate::Rgb;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    SpeedBoost,
    HealthKit,
    Shield,
    /// Clones the collecting agent
    Multiply,
    Rage,
    FreezeBlast,
}

impl PickupKind {
    pub const ALL: [PickupKind; 6] = [
        PickupKind::SpeedBoost,
        PickupKind::HealthKit,
        PickupKind::Shield,
        PickupKind::Multiply,
        PickupKind::Rage,
        PickupKind::FreezeBlast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PickupKind::SpeedBoost => "Speed Boost",
            PickupKind::HealthKit => "Health Kit",
            PickupKind::Shield => "Shield",
            PickupKind::Multiply => "Multiply",
            PickupKind::Rage => "Rage",
            PickupKind::FreezeBlast => "Freeze Blast",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            PickupKind::SpeedBoost => [255, 255, 0],
            PickupKind::HealthKit => [0, 255, 0],
            PickupKind::Shield => [0, 150, 255],
            PickupKind::Multiply => [255, 0, 255],
            PickupKind::Rage => [255, 50, 50],
            PickupKind::FreezeBlast => [150, 255, 255],
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// What consuming a pickup asks of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    /// Effect fully applied to the agent
    Applied,
    /// Agent untouched; spawn a clone of it
    CloneRequested,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    /// Clock time when it appeared
    pub spawn_time: f32,
    pub collected: bool,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind, pos: Vec2, now: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            spawn_time: now,
            collected: false,
        }
    }

    #[inline]
    pub fn is_expired(&self, now: f32) -> bool {
        now - self.spawn_time > PICKUP_LIFETIME
    }

    /// Seconds until expiry (never negative)
    pub fn remaining(&self, now: f32) -> f32 {
        (PICKUP_LIFETIME - (now - self.spawn_time)).max(0.0)
    }

    /// Contact test against an agent's circle
    #[inline]
    pub fn touches(&self, agent: &Agent) -> bool {
        self.pos.distance(agent.pos) < agent.radius + PICKUP_RADIUS
    }

    /// Apply this pickup's effect to `agent` and mark it collected
    pub fn apply(&mut self, agent: &mut Agent, now: f32) -> PickupOutcome {
        self.collected = true;

        match self.kind {
            PickupKind::SpeedBoost => {
                agent.vel *= SPEED_BOOST_FACTOR;
                agent.effects.grant_speed_boost(now);
            }
            PickupKind::HealthKit => agent.heal(HEALTH_KIT_AMOUNT),
            PickupKind::Shield => agent.effects.grant_shield(now),
            PickupKind::Multiply => return PickupOutcome::CloneRequested,
            PickupKind::Rage => agent.effects.grant_rage(now),
            PickupKind::FreezeBlast => agent.effects.arm_freeze_blast(),
        }
        PickupOutcome::Applied
    }
}
