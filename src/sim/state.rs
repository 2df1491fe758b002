//! Game state and match bookkeeping
//!
//! All state that must be persisted for replay/determinism lives here.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::arena::{Arena, ArenaShape, Wall};
use super::disruption::{Disruption, DisruptionKind};
use super::element::Element;
use super::pickup::{Pickup, PickupKind};
use crate::Rgb;
use crate::consts::*;
use crate::settings::MatchConfig;

/// Current phase of the match state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start command
    #[default]
    Menu,
    /// Active simulation
    Playing,
    /// Frozen mid-match
    Paused,
    /// Match over, report available
    GameOver,
}

/// Something the presentation layer may want to show or play.
///
/// Events are appended during a tick and drained by the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AgentDefeated {
        pos: Vec2,
        color: Rgb,
        /// Particle count hint
        particles: u32,
        /// Combat intensity when it happened (0-1)
        intensity: f32,
    },
    AttackLanded {
        midpoint: Vec2,
        damage: f32,
    },
    PickupConsumed {
        pos: Vec2,
        color: Rgb,
        kind: PickupKind,
    },
    FreezeBlast {
        origin: Vec2,
    },
    Trail {
        pos: Vec2,
        color: Rgb,
    },
    DisruptionStarted {
        kind: DisruptionKind,
    },
    ArenaReshaped {
        shape: ArenaShape,
    },
    /// One per surviving agent and leftover pickup when the match ends
    FinalExplosion {
        pos: Vec2,
        color: Rgb,
    },
}

/// Running counters for the current match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStats {
    pub initial_agents: u32,
    pub explosions: u32,
    pub pickups_collected: u32,
    pub disruptions_triggered: u32,
}

/// End-of-match summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub survivors: u32,
    pub initial_agents: u32,
    /// Agents defeated during the match (clones included)
    pub explosions: u32,
    /// Seconds of simulated play
    pub duration: f32,
    pub pickups_collected: u32,
    pub disruptions_triggered: u32,
    pub survivor_types: BTreeMap<Element, u32>,
}

impl MatchReport {
    /// Most common element among survivors; ties go to the earlier element
    pub fn dominant_element(&self) -> Option<Element> {
        let mut best: Option<(Element, u32)> = None;
        for (&element, &count) in &self.survivor_types {
            if best.is_none_or(|(_, n)| count > n) {
                best = Some((element, count));
            }
        }
        best.map(|(element, _)| element)
    }
}

/// Read-only view of one agent for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub element: Element,
    pub color: Rgb,
    pub health: f32,
    pub max_health: f32,
    pub shielded: bool,
    pub raging: bool,
    pub speed_boosted: bool,
    pub freeze_blast_ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub color: Rgb,
    /// Seconds until it expires
    pub remaining: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisruptionView {
    pub kind: DisruptionKind,
    pub remaining: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub arena_shape: ArenaShape,
    pub walls: Vec<Wall>,
    pub agents: Vec<AgentView>,
    pub pickups: Vec<PickupView>,
    pub disruptions: Vec<DisruptionView>,
    pub combat_intensity: f32,
    /// Match seconds left
    pub remaining_time: f32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Config applied at the last match start (or pending for the next one)
    pub config: MatchConfig,
    pub phase: GamePhase,
    /// Seeded once from the config; drives every random choice
    pub rng: Pcg32,
    /// Match clock in seconds (f32 view of `elapsed`)
    pub time: f32,
    /// Match clock accumulated in f64 so long matches end on the right tick
    pub elapsed: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Clock time of the last disruption
    pub last_disruption: f32,
    /// Clock time of the last pickup spawn attempt
    pub last_pickup: f32,
    pub arena: Arena,
    /// Agents in update order
    pub agents: Vec<Agent>,
    pub pickups: Vec<Pickup>,
    pub disruptions: Vec<Disruption>,
    pub stats: MatchStats,
    /// Set on entering GameOver
    pub report: Option<MatchReport>,
    /// 0-1 activity level for presentation
    pub combat_intensity: f32,
    /// Events produced since the consumer last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a state sitting in the menu with the given config
    pub fn new(config: MatchConfig) -> Self {
        let config = config.clamped();
        Self {
            rng: Pcg32::seed_from_u64(config.seed),
            arena: Arena::new(config.arena_shape),
            config,
            phase: GamePhase::Menu,
            time: 0.0,
            elapsed: 0.0,
            time_ticks: 0,
            last_disruption: 0.0,
            last_pickup: 0.0,
            agents: Vec::new(),
            pickups: Vec::new(),
            disruptions: Vec::new(),
            stats: MatchStats::default(),
            report: None,
            combat_intensity: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Match seconds left (0 outside a match)
    pub fn remaining_time(&self) -> f32 {
        match self.phase {
            GamePhase::Playing | GamePhase::Paused => {
                (self.config.match_duration - self.time).max(0.0)
            }
            GamePhase::Menu | GamePhase::GameOver => 0.0,
        }
    }

    /// Enter Playing with the current config.
    ///
    /// Everything from the previous match is discarded; the RNG keeps its
    /// stream so a replay is a fresh match.
    pub fn start_match(&mut self) {
        self.config = self.config.clamped();
        self.arena.generate_shape(self.config.arena_shape);

        self.agents.clear();
        self.pickups.clear();
        self.disruptions.clear();
        self.time = 0.0;
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.last_disruption = 0.0;
        self.last_pickup = 0.0;
        self.stats = MatchStats::default();
        self.report = None;

        for _ in 0..self.config.ball_count {
            self.spawn_agent();
        }
        self.stats.initial_agents = self.agents.len() as u32;
        self.update_combat_intensity();
        self.phase = GamePhase::Playing;

        log::info!(
            "Match started: {} agents, {} arena, {}s",
            self.agents.len(),
            self.arena.shape.as_str(),
            self.config.match_duration
        );
    }

    /// Enter GameOver: build the report and send off the survivors
    pub fn end_match(&mut self) {
        let mut survivor_types = BTreeMap::new();
        for agent in &self.agents {
            *survivor_types.entry(agent.element).or_insert(0) += 1;
        }

        let report = MatchReport {
            survivors: self.agents.len() as u32,
            initial_agents: self.stats.initial_agents,
            explosions: self.stats.explosions,
            duration: self.time,
            pickups_collected: self.stats.pickups_collected,
            disruptions_triggered: self.stats.disruptions_triggered,
            survivor_types,
        };

        for agent in &self.agents {
            self.events.push(GameEvent::FinalExplosion {
                pos: agent.pos,
                color: agent.color(),
            });
        }
        for pickup in &self.pickups {
            self.events.push(GameEvent::FinalExplosion {
                pos: pickup.pos,
                color: pickup.kind.color(),
            });
        }

        log::info!(
            "Match over after {:.1}s: {} survivors, {} explosions, dominant {}",
            report.duration,
            report.survivors,
            report.explosions,
            report.dominant_element().map_or("none", |e| e.as_str())
        );

        self.report = Some(report);
        self.phase = GamePhase::GameOver;
    }

    /// Back to the menu, dropping every entity
    pub fn return_to_menu(&mut self) {
        self.agents.clear();
        self.pickups.clear();
        self.disruptions.clear();
        self.report = None;
        self.combat_intensity = 0.0;
        self.phase = GamePhase::Menu;
        log::info!("Returned to menu");
    }

    /// Spawn one agent of a random element somewhere near the center.
    /// Returns false if no valid point was found.
    pub fn spawn_agent(&mut self) -> bool {
        let Some(pos) =
            self.arena
                .random_point_in_ring(&mut self.rng, AGENT_SPAWN_RING, AGENT_SPAWN_ATTEMPTS)
        else {
            log::warn!("No room to spawn an agent, skipping");
            return false;
        };

        let id = self.next_entity_id();
        let element = Element::random(&mut self.rng);
        let agent = Agent::spawn(id, element, pos, &mut self.rng);
        log::debug!("Spawned {} agent {} at {:?}", element.as_str(), id, pos);
        self.agents.push(agent);
        true
    }

    /// Spawn a random pickup. Returns false if no valid point was found.
    pub fn spawn_pickup(&mut self) -> bool {
        let Some(pos) =
            self.arena
                .random_point_in_ring(&mut self.rng, PICKUP_SPAWN_RING, PICKUP_SPAWN_ATTEMPTS)
        else {
            log::warn!("No room to spawn a pickup, skipping");
            return false;
        };

        let id = self.next_entity_id();
        let kind = PickupKind::random(&mut self.rng);
        log::debug!("Spawned {} pickup {} at {:?}", kind.as_str(), id, pos);
        self.pickups.push(Pickup::new(id, kind, pos, self.time));
        true
    }

    /// Fire a random disruption now
    pub fn trigger_disruption(&mut self) {
        let kind = DisruptionKind::random(&mut self.rng);
        let disruption = Disruption::trigger(kind, self.time, &mut self.arena, &mut self.rng);

        self.events.push(GameEvent::DisruptionStarted { kind });
        if kind == DisruptionKind::ShapeMorph {
            self.events.push(GameEvent::ArenaReshaped {
                shape: self.arena.shape,
            });
            log::info!("Arena reshaped into {}", self.arena.shape.as_str());
        }
        log::info!(
            "Disruption: {} for {:.1}s",
            kind.as_str(),
            disruption.duration
        );

        self.disruptions.push(disruption);
        self.stats.disruptions_triggered += 1;
    }

    /// Append a clone of `agents[index]`
    pub fn spawn_clone(&mut self, index: usize) {
        let id = self.next_entity_id();
        let clone = self.agents[index].spawn_clone(id, &mut self.rng);
        log::debug!("Agent {} cloned into {}", self.agents[index].id, id);
        self.agents.push(clone);
    }

    /// Recompute the presentation activity level from entity counts
    pub fn update_combat_intensity(&mut self) {
        let activity = self.agents.len() as f32 * 2.0 + self.pickups.len() as f32 * 3.0;
        self.combat_intensity = (activity / 80.0).min(1.0);
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            arena_shape: self.arena.shape,
            walls: self.arena.walls.clone(),
            agents: self
                .agents
                .iter()
                .map(|a| AgentView {
                    id: a.id,
                    pos: a.pos,
                    radius: a.radius,
                    element: a.element,
                    color: a.color(),
                    health: a.health,
                    max_health: a.max_health,
                    shielded: a.effects.shielded(),
                    raging: a.effects.raging(),
                    speed_boosted: a.effects.speed_boosted(),
                    freeze_blast_ready: a.effects.freeze_blast_ready,
                })
                .collect(),
            pickups: self
                .pickups
                .iter()
                .map(|p| PickupView {
                    id: p.id,
                    kind: p.kind,
                    pos: p.pos,
                    color: p.kind.color(),
                    remaining: p.remaining(self.time),
                })
                .collect(),
            disruptions: self
                .disruptions
                .iter()
                .map(|d| DisruptionView {
                    kind: d.kind,
                    remaining: d.remaining(self.time),
                })
                .collect(),
            combat_intensity: self.combat_intensity,
            remaining_time: self.remaining_time(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ball_count: u32, seed: u64) -> MatchConfig {
        MatchConfig {
            ball_count,
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_state_waits_in_menu() {
        let state = GameState::new(config(8, 1));
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.agents.is_empty());
        assert_eq!(state.remaining_time(), 0.0);
    }

    #[test]
    fn test_start_match_spawns_inside() {
        let mut state = GameState::new(config(12, 4));
        state.start_match();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.agents.len(), 12);
        assert_eq!(state.stats.initial_agents, 12);
        for agent in &state.agents {
            assert!(state.arena.is_point_inside(agent.pos));
            let d = agent.pos.distance(state.arena.center);
            assert!((49.9..=200.1).contains(&d));
        }
        // IDs are unique and increasing
        assert!(state.agents.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(state.remaining_time(), 60.0);
    }

    #[test]
    fn test_start_match_resets_previous() {
        let mut state = GameState::new(config(5, 4));
        state.start_match();
        state.time = 20.0;
        state.elapsed = 20.0;
        state.stats.explosions = 3;
        state.spawn_pickup();
        state.trigger_disruption();

        state.start_match();
        assert_eq!(state.time, 0.0);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.stats.explosions, 0);
        assert_eq!(state.stats.disruptions_triggered, 0);
        assert!(state.pickups.is_empty());
        assert!(state.disruptions.is_empty());
        assert_eq!(state.arena.shape, ArenaShape::Hexagon);
    }

    #[test]
    fn test_end_match_report() {
        let mut state = GameState::new(config(3, 2));
        state.start_match();
        state.agents[0].element = Element::Ice;
        state.agents[1].element = Element::Ice;
        state.agents[2].element = Element::Fire;
        state.spawn_pickup();
        state.time = 42.0;
        state.events.clear();

        state.end_match();
        assert_eq!(state.phase, GamePhase::GameOver);
        let report = state.report.as_ref().unwrap();
        assert_eq!(report.survivors, 3);
        assert_eq!(report.duration, 42.0);
        assert_eq!(report.survivor_types.get(&Element::Ice), Some(&2));
        assert_eq!(report.dominant_element(), Some(Element::Ice));

        let finals = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::FinalExplosion { .. }))
            .count();
        assert_eq!(finals, 3 + state.pickups.len());
    }

    #[test]
    fn test_dominant_element_ties_and_empty() {
        let mut report = MatchReport {
            survivors: 0,
            initial_agents: 0,
            explosions: 0,
            duration: 0.0,
            pickups_collected: 0,
            disruptions_triggered: 0,
            survivor_types: BTreeMap::new(),
        };
        assert_eq!(report.dominant_element(), None);

        report.survivor_types.insert(Element::Poison, 2);
        report.survivor_types.insert(Element::Ice, 2);
        assert_eq!(report.dominant_element(), Some(Element::Ice));
    }

    #[test]
    fn test_combat_intensity_caps() {
        let mut state = GameState::new(config(3, 2));
        state.start_match();
        state.update_combat_intensity();
        assert!((state.combat_intensity - 6.0 / 80.0).abs() < 1e-6);

        for _ in 0..40 {
            state.spawn_agent();
        }
        state.update_combat_intensity();
        assert_eq!(state.combat_intensity, 1.0);
    }

    #[test]
    fn test_shape_morph_event() {
        let mut state = GameState::new(config(3, 2));
        state.start_match();
        // Fire until a reshape comes up
        for _ in 0..200 {
            state.trigger_disruption();
            if state.disruptions.last().map(|d| d.kind) == Some(DisruptionKind::ShapeMorph) {
                break;
            }
        }
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::ArenaReshaped { .. })));
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(config(4, 9));
        state.start_match();
        state.agents[0].effects.grant_shield(0.0);
        state.spawn_pickup();

        let snap = state.snapshot();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.agents.len(), 4);
        assert!(snap.agents[0].shielded);
        assert_eq!(snap.walls.len(), 6);
        assert_eq!(snap.pickups.len(), state.pickups.len());

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"Playing\""));
    }

    #[test]
    fn test_report_serializes() {
        let mut state = GameState::new(config(3, 2));
        state.start_match();
        state.end_match();
        let json = serde_json::to_string(state.report.as_ref().unwrap()).unwrap();
        assert!(json.contains("survivor_types"));
    }
}
