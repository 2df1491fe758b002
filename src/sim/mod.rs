//! Deterministic simulation module
//!
//! All match logic lives here. This module must be pure and deterministic:
//! - Explicit clock (`now`/`dt` passed in, no wall-clock reads)
//! - Seeded RNG only
//! - Stable iteration order (list order, new entities appended)
//! - No rendering or platform dependencies

pub mod agent;
pub mod arena;
pub mod collision;
pub mod combat;
pub mod disruption;
pub mod element;
pub mod pickup;
pub mod state;
pub mod tick;

pub use agent::{Agent, StatusEffects};
pub use arena::{Arena, ArenaShape, Wall};
pub use collision::{CollisionResult, agent_wall_collision, reflect_velocity};
pub use combat::{AttackOutcome, attack_nearby, calculate_damage};
pub use disruption::{Disruption, DisruptionKind};
pub use element::{DamageMatrix, Element, ElementProfile};
pub use pickup::{Pickup, PickupKind, PickupOutcome};
pub use state::{GameEvent, GamePhase, GameState, MatchReport, MatchStats, Snapshot};
pub use tick::{TickInput, tick};
