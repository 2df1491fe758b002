//! Elemental Arena headless runner
//!
//! Plays one match at the fixed timestep and prints the end-of-match report
//! as JSON. An optional argument names a JSON match config file.

use std::collections::BTreeMap;

use elemental_arena::consts::*;
use elemental_arena::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use elemental_arena::MatchConfig;

/// Simulated display frame (the runner feeds 30 fps frames to the 60 Hz sim)
const FRAME_DT: f32 = 1.0 / 30.0;

/// Runner instance holding all state
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    /// Events seen so far, by kind
    event_counts: BTreeMap<&'static str, u64>,
}

impl Game {
    fn new(config: MatchConfig) -> Self {
        Self {
            state: GameState::new(config),
            accumulator: 0.0,
            input: TickInput {
                start: true,
                ..Default::default()
            },
            event_counts: BTreeMap::new(),
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input = TickInput::default();

            for event in self.state.drain_events() {
                *self.event_counts.entry(event_name(&event)).or_insert(0) += 1;
            }
        }
    }
}

fn event_name(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::AgentDefeated { .. } => "agent_defeated",
        GameEvent::AttackLanded { .. } => "attack_landed",
        GameEvent::PickupConsumed { .. } => "pickup_consumed",
        GameEvent::FreezeBlast { .. } => "freeze_blast",
        GameEvent::Trail { .. } => "trail",
        GameEvent::DisruptionStarted { .. } => "disruption_started",
        GameEvent::ArenaReshaped { .. } => "arena_reshaped",
        GameEvent::FinalExplosion { .. } => "final_explosion",
    }
}

fn run() {
    let config = match std::env::args().nth(1) {
        Some(path) => MatchConfig::load(std::path::Path::new(&path)),
        None => {
            log::info!("No config file given, using defaults");
            MatchConfig::default()
        }
    };

    let mut game = Game::new(config);
    let mut frames: u64 = 0;
    loop {
        game.update(FRAME_DT);
        frames += 1;
        if game.state.phase == GamePhase::GameOver {
            break;
        }
    }
    log::info!("Match finished after {} frames ({} ticks)", frames, game.state.time_ticks);

    for (name, count) in &game.event_counts {
        log::info!("  {}: {}", name, count);
    }

    let Some(report) = game.state.report.as_ref() else {
        log::error!("Match ended without a report");
        return;
    };
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize report: {}", e),
    }
}

fn main() {
    env_logger::init();
    log::info!("Elemental Arena (headless) starting...");
    run();
}
