//! Elemental Arena - an elemental battle-royale simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arena, physics, combat, match flow)
//! - `settings`: Match configuration supplied by the menu/presentation layer
//!
//! Rendering, input and audio live outside this crate. A presentation layer
//! drives [`sim::tick`] and reads [`sim::GameState::snapshot`] plus the
//! per-tick [`sim::GameEvent`] list.

pub mod settings;
pub mod sim;

pub use settings::{ConfigField, MatchConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz, the rate the disruption forces were tuned for)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical screen size (portrait)
    pub const SCREEN_WIDTH: f32 = 1080.0;
    pub const SCREEN_HEIGHT: f32 = 1920.0;
    /// Arena center sits 200px below screen center
    pub const ARENA_CENTER: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 + 200.0);

    /// Arena geometry
    pub const HEXAGON_RADIUS: f32 = 400.0;
    pub const OCTAGON_RADIUS: f32 = 380.0;
    pub const DIAMOND_WIDTH: f32 = 600.0;
    pub const DIAMOND_HEIGHT: f32 = 800.0;
    /// Containment radii (slightly inside the walls)
    pub const HEXAGON_INSIDE_RADIUS: f32 = 380.0;
    pub const OCTAGON_INSIDE_RADIUS: f32 = 360.0;
    /// Escaped agents are put back at this distance from center
    pub const RECOVERY_RADIUS: f32 = 200.0;

    /// Wall collision tuning
    pub const WALL_DETECT_MARGIN: f32 = 2.0;
    pub const WALL_SAFETY_MARGIN: f32 = 3.0;
    pub const WALL_BOUNCE: f32 = 1.05;
    pub const MAX_SPEED: f32 = 600.0;
    pub const COLLISION_PASSES: usize = 3;
    pub const CENTER_NUDGE: f32 = 5.0;

    /// Agent defaults
    pub const AGENT_MIN_RADIUS: f32 = 15.0;
    pub const AGENT_MAX_RADIUS: f32 = 25.0;
    pub const AGENT_MAX_HEALTH: f32 = 100.0;
    pub const AGENT_START_SPEED: f32 = 150.0;
    pub const ATTACK_COOLDOWN: f32 = 0.8;
    pub const TRAIL_CHANCE: f64 = 0.4;

    /// Combat
    pub const BASE_DAMAGE: f32 = 25.0;
    pub const ATTACK_REACH: f32 = 15.0;
    pub const SHIELD_DAMAGE_FACTOR: f32 = 0.3;
    pub const FREEZE_RADIUS: f32 = 200.0;
    pub const FREEZE_FACTOR: f32 = 0.1;
    pub const EXPLOSION_PARTICLES: u32 = 25;
    pub const RAGE_EXPLOSION_PARTICLES: u32 = 40;

    /// Pickups
    pub const PICKUP_RADIUS: f32 = 20.0;
    pub const PICKUP_LIFETIME: f32 = 15.0;
    pub const SPEED_BOOST_FACTOR: f32 = 1.5;
    pub const SPEED_BOOST_DURATION: f32 = 5.0;
    pub const HEALTH_KIT_AMOUNT: f32 = 50.0;
    pub const SHIELD_DURATION: f32 = 8.0;
    pub const SHIELD_CHARGES: u32 = 3;
    pub const RAGE_DURATION: f32 = 10.0;
    pub const RAGE_MULTIPLIER: f32 = 3.0;
    pub const CLONE_OFFSET: Vec2 = Vec2::new(30.0, 30.0);
    pub const CLONE_VELOCITY_FACTOR: f32 = -0.8;

    /// Disruptions
    pub const DISRUPTION_MIN_DURATION: f32 = 4.0;
    pub const DISRUPTION_MAX_DURATION: f32 = 10.0;
    pub const SHAPE_MORPH_DURATION: f32 = 15.0;
    pub const GRAVITY_FLIP_ACCEL: f32 = 300.0;
    pub const MAGNETIC_STRENGTH: f32 = 150.0;
    pub const SPEED_SURGE_FACTOR: f32 = 1.03;
    pub const CHAOS_CHANCE: f64 = 0.06;
    pub const CHAOS_IMPULSE: f32 = 100.0;

    /// Spawn rings around the arena center
    pub const AGENT_SPAWN_RING: (f32, f32) = (50.0, 200.0);
    pub const AGENT_SPAWN_ATTEMPTS: u32 = 20;
    pub const PICKUP_SPAWN_RING: (f32, f32) = (80.0, 250.0);
    pub const PICKUP_SPAWN_ATTEMPTS: u32 = 10;
}

/// RGB color hint for the presentation layer
pub type Rgb = [u8; 3];

/// Convert polar (r, theta) around `center` to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit direction and distance from `from` to `to`.
///
/// Returns `None` for coincident points so callers skip the force instead of
/// normalizing a zero vector.
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<(Vec2, f32)> {
    let delta = to - from;
    let dist = delta.length();
    if dist > 0.0 {
        Some((delta / dist, dist))
    } else {
        None
    }
}
