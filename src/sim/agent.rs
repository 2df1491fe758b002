//! Agents ("balls") and their per-tick update
//!
//! An agent update reads every other agent for neighbor forces and attack
//! targets, and may write to them (poison, hits, freeze blasts). Agents are
//! updated in list order, so later agents see the already-updated state of
//! earlier ones.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::combat;
use super::disruption::Disruption;
use super::element::{Attraction, Element};
use super::state::GameEvent;
use crate::consts::*;
use crate::{Rgb, direction_to};

/// Timed modifiers granted by pickups.
///
/// Expiry times are simulation-clock seconds; `None` means inactive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub speed_boost_until: Option<f32>,
    pub shield_until: Option<f32>,
    /// Hits the shield can still soften
    pub shield_charges: u32,
    pub rage_until: Option<f32>,
    /// Outgoing damage factor (1.0 unless raging)
    pub damage_multiplier: f32,
    /// Next landed attack triggers a freeze blast
    pub freeze_blast_ready: bool,
}

impl Default for StatusEffects {
    fn default() -> Self {
        Self {
            speed_boost_until: None,
            shield_until: None,
            shield_charges: 0,
            rage_until: None,
            damage_multiplier: 1.0,
            freeze_blast_ready: false,
        }
    }
}

impl StatusEffects {
    pub fn grant_speed_boost(&mut self, now: f32) {
        self.speed_boost_until = Some(now + SPEED_BOOST_DURATION);
    }

    /// Charges are overwritten, never stacked
    pub fn grant_shield(&mut self, now: f32) {
        self.shield_until = Some(now + SHIELD_DURATION);
        self.shield_charges = SHIELD_CHARGES;
    }

    pub fn grant_rage(&mut self, now: f32) {
        self.rage_until = Some(now + RAGE_DURATION);
        self.damage_multiplier = RAGE_MULTIPLIER;
    }

    pub fn arm_freeze_blast(&mut self) {
        self.freeze_blast_ready = true;
    }

    /// Drop every effect whose expiry time has passed
    pub fn expire(&mut self, now: f32) {
        if self.speed_boost_until.is_some_and(|t| now > t) {
            self.speed_boost_until = None;
        }
        if self.shield_until.is_some_and(|t| now > t) {
            self.shield_until = None;
            self.shield_charges = 0;
        }
        if self.rage_until.is_some_and(|t| now > t) {
            self.rage_until = None;
            self.damage_multiplier = 1.0;
        }
    }

    #[inline]
    pub fn speed_boosted(&self) -> bool {
        self.speed_boost_until.is_some()
    }

    #[inline]
    pub fn shielded(&self) -> bool {
        self.shield_charges > 0
    }

    #[inline]
    pub fn raging(&self) -> bool {
        self.rage_until.is_some()
    }
}

/// A combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: u32,
    pub element: Element,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed at spawn
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Clock time of the last landed attack (`None` = never attacked)
    pub last_attack: Option<f32>,
    pub attack_cooldown: f32,
    pub effects: StatusEffects,
}

impl Agent {
    /// Stationary agent with full health
    pub fn new(id: u32, element: Element, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            element,
            pos,
            vel: Vec2::ZERO,
            radius,
            health: AGENT_MAX_HEALTH,
            max_health: AGENT_MAX_HEALTH,
            last_attack: None,
            attack_cooldown: ATTACK_COOLDOWN,
            effects: StatusEffects::default(),
        }
    }

    /// Agent with random radius and launch velocity
    pub fn spawn(id: u32, element: Element, pos: Vec2, rng: &mut impl Rng) -> Self {
        let radius = rng.random_range(AGENT_MIN_RADIUS..=AGENT_MAX_RADIUS);
        let mut agent = Self::new(id, element, pos, radius);
        agent.vel = Vec2::new(
            rng.random_range(-AGENT_START_SPEED..=AGENT_START_SPEED),
            rng.random_range(-AGENT_START_SPEED..=AGENT_START_SPEED),
        );
        agent
    }

    /// Offspring from a Multiply pickup: same element, offset, thrown back the other way
    pub fn spawn_clone(&self, id: u32, rng: &mut impl Rng) -> Self {
        let mut clone = Self::spawn(id, self.element, self.pos + CLONE_OFFSET, rng);
        clone.vel = self.vel * CLONE_VELOCITY_FACTOR;
        clone
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    #[inline]
    pub fn distance_to(&self, other: &Agent) -> f32 {
        self.pos.distance(other.pos)
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.element.color()
    }

    /// Whether the attack cooldown has elapsed at `now`
    pub fn can_attack(&self, now: f32) -> bool {
        match self.last_attack {
            Some(t) => now - t >= self.attack_cooldown,
            None => true,
        }
    }

    /// Subtract health. Returns true if this defeated the agent.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        !self.is_alive()
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Trail tint: boost beats rage beats element color
    pub fn trail_color(&self) -> Rgb {
        if self.effects.speed_boosted() {
            [255, 255, 100]
        } else if self.effects.raging() {
            [255, 100, 100]
        } else {
            self.color()
        }
    }

    /// Particle hint for the explosion when this agent dies
    pub fn explosion_particles(&self) -> u32 {
        if self.effects.raging() {
            RAGE_EXPLOSION_PARTICLES
        } else {
            EXPLOSION_PARTICLES
        }
    }
}

/// Shared inputs for one tick of agent updates
pub struct StepContext<'a> {
    /// Simulation clock (seconds since match start)
    pub now: f32,
    pub dt: f32,
    pub arena: &'a Arena,
    pub disruptions: &'a [Disruption],
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
}

/// Advance agent `index` by one tick
pub fn update_agent(agents: &mut [Agent], index: usize, ctx: &mut StepContext) {
    {
        let agent = &mut agents[index];

        agent.pos += agent.vel * ctx.dt;
        ctx.arena.check_collision(agent, ctx.dt);
        ctx.arena.recover_escaped(agent);

        for disruption in ctx.disruptions {
            disruption.apply_to_agent(agent, ctx.now, ctx.dt, ctx.arena.center, ctx.rng);
        }

        agent.effects.expire(ctx.now);
    }

    apply_element_behavior(agents, index, ctx.dt, ctx.rng);

    combat::attack_nearby(agents, index, ctx.now, ctx.events);

    if ctx.rng.random_bool(TRAIL_CHANCE) {
        let agent = &agents[index];
        let r = agent.radius;
        let jitter = Vec2::new(ctx.rng.random_range(-r..=r), ctx.rng.random_range(-r..=r));
        ctx.events.push(GameEvent::Trail {
            pos: agent.pos + jitter,
            color: agent.trail_color(),
        });
    }
}

/// Continuous per-element behavior, driven by the element's profile row
pub fn apply_element_behavior(agents: &mut [Agent], index: usize, dt: f32, rng: &mut impl Rng) {
    let profile = agents[index].element.profile();

    if let Some(attraction) = profile.attraction {
        let pull = attraction_pull(agents, index, &attraction);
        agents[index].vel += pull * dt;
    }

    if profile.drag != 1.0 {
        agents[index].vel *= profile.drag;
    }

    if let Some(jitter) = profile.jitter {
        if rng.random_bool(jitter.chance) {
            let i = jitter.impulse;
            agents[index].vel += Vec2::new(rng.random_range(-i..=i), rng.random_range(-i..=i));
        }
    }

    if let Some(aura) = profile.aura {
        combat::apply_aura(agents, index, &aura, dt);
    }
}

/// Summed pull toward every living agent of the attraction's target element in range
fn attraction_pull(agents: &[Agent], index: usize, attraction: &Attraction) -> Vec2 {
    let me = &agents[index];
    agents
        .iter()
        .enumerate()
        .filter(|(j, other)| *j != index && other.is_alive() && other.element == attraction.target)
        .filter_map(|(_, other)| direction_to(me.pos, other.pos))
        .filter(|(_, dist)| *dist < attraction.radius)
        .map(|(dir, dist)| dir * (attraction.strength / (dist + 1.0)))
        .sum()
}
