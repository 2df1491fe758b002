//! Fixed timestep simulation tick
//!
//! Drives the match state machine and advances a match in a fixed order.

use super::agent::{StepContext, update_agent};
use super::pickup::PickupOutcome;
use super::state::{GameEvent, GamePhase, GameState};
use crate::settings::MatchConfig;

/// Commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Menu -> Playing
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Abandon the match and go back to the menu
    pub to_menu: bool,
    /// GameOver -> Playing with the same config
    pub replay: bool,
    /// New config from the menu, applied outside a running match
    pub config: Option<MatchConfig>,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(config) = &input.config {
        match state.phase {
            GamePhase::Menu => {
                state.config = config.clamped();
                // Preview the chosen shape
                state.arena.generate_shape(state.config.arena_shape);
            }
            GamePhase::GameOver => state.config = config.clamped(),
            GamePhase::Playing | GamePhase::Paused => {}
        }
    }

    if input.to_menu && state.phase != GamePhase::Menu {
        state.return_to_menu();
        return;
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.start_match();
            }
            return;
        }
        GamePhase::GameOver => {
            if input.replay {
                log::info!("Replaying with the same config");
                state.start_match();
            }
            return;
        }
        GamePhase::Paused => {
            if input.pause {
                state.phase = GamePhase::Playing;
                log::info!("Resumed at {:.1}s", state.time);
            }
            return;
        }
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                log::info!("Paused at {:.1}s", state.time);
                return;
            }
        }
    }

    step_match(state, dt);
}

/// One Playing step
fn step_match(state: &mut GameState, dt: f32) {
    state.elapsed += f64::from(dt);
    state.time_ticks += 1;
    state.time = state.elapsed as f32;
    let now = state.time;

    if state.elapsed >= f64::from(state.config.match_duration) {
        state.end_match();
        return;
    }

    if now - state.last_disruption >= state.config.disruption_interval {
        state.trigger_disruption();
        state.last_disruption = now;
    }

    if now - state.last_pickup >= state.config.pickup_interval {
        state.spawn_pickup();
        state.last_pickup = now;
    }

    state.pickups.retain(|p| !p.is_expired(now));
    collect_pickups(state, now);

    update_agents(state, now, dt);
    remove_defeated(state);

    state.disruptions.retain(|d| d.is_active(now));
    state.update_combat_intensity();
}

/// Resolve agent/pickup contacts. Clones spawned here join next tick's contact pass.
fn collect_pickups(state: &mut GameState, now: f32) {
    let agent_count = state.agents.len();

    for i in 0..agent_count {
        for p in 0..state.pickups.len() {
            let pickup = &mut state.pickups[p];
            if pickup.collected || !pickup.touches(&state.agents[i]) {
                continue;
            }

            let outcome = pickup.apply(&mut state.agents[i], now);
            let (pos, kind) = (pickup.pos, pickup.kind);

            state.events.push(GameEvent::PickupConsumed {
                pos,
                color: kind.color(),
                kind,
            });
            state.stats.pickups_collected += 1;
            log::debug!("Agent {} took {}", state.agents[i].id, kind.as_str());

            if outcome == PickupOutcome::CloneRequested {
                state.spawn_clone(i);
            }
        }
    }

    state.pickups.retain(|p| !p.collected);
}

/// Update every living agent in list order
fn update_agents(state: &mut GameState, now: f32, dt: f32) {
    let GameState {
        agents,
        arena,
        disruptions,
        rng,
        events,
        ..
    } = state;

    let mut ctx = StepContext {
        now,
        dt,
        arena: &*arena,
        disruptions: disruptions.as_slice(),
        rng,
        events,
    };

    for i in 0..agents.len() {
        if agents[i].is_alive() {
            update_agent(agents, i, &mut ctx);
        }
    }
}

/// Emit explosions for this tick's casualties, then drop them
fn remove_defeated(state: &mut GameState) {
    let intensity = state.combat_intensity;

    for agent in state.agents.iter().filter(|a| !a.is_alive()) {
        state.events.push(GameEvent::AgentDefeated {
            pos: agent.pos,
            color: agent.color(),
            particles: agent.explosion_particles(),
            intensity,
        });
        state.stats.explosions += 1;
        log::debug!("{} agent {} defeated", agent.element.as_str(), agent.id);
    }

    state.agents.retain(|a| a.is_alive());
}
