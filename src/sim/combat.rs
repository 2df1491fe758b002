//! Combat resolution
//!
//! Direct attacks, shield mitigation, freeze blasts and the poison aura.
//! Defeated agents stay in the list until the end of the tick; they are never
//! picked as targets and never attack.

use glam::Vec2;

use super::agent::Agent;
use super::element::{Aura, DamageMatrix};
use super::state::GameEvent;
use crate::consts::*;

/// What a landed attack did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    /// Index of the agent that was hit
    pub target: usize,
    /// Damage after shield mitigation
    pub damage: f32,
    pub defeated: bool,
    /// Agents slowed by a freeze blast (0 if none fired)
    pub frozen: usize,
}

/// Raw damage of one hit from `attacker` on `defender`
#[inline]
pub fn calculate_damage(attacker: &Agent, defender: &Agent) -> f32 {
    BASE_DAMAGE
        * DamageMatrix::multiplier(attacker.element, defender.element)
        * attacker.effects.damage_multiplier
}

/// Consume a shield charge if the defender has one and return the damage that gets through
pub fn absorb_with_shield(defender: &mut Agent, damage: f32) -> f32 {
    if defender.effects.shield_charges > 0 {
        defender.effects.shield_charges -= 1;
        damage * SHIELD_DAMAGE_FACTOR
    } else {
        damage
    }
}

/// First living agent in list order within striking reach of `agents[index]`
pub fn find_target(agents: &[Agent], index: usize) -> Option<usize> {
    let me = &agents[index];
    agents.iter().enumerate().find_map(|(j, other)| {
        let in_reach = me.distance_to(other) < me.radius + other.radius + ATTACK_REACH;
        (j != index && other.is_alive() && in_reach).then_some(j)
    })
}

/// Attack the first agent in reach, if the cooldown allows.
///
/// Applies damage (with shield mitigation), stamps the cooldown, fires a
/// primed freeze blast and emits the matching events.
pub fn attack_nearby(
    agents: &mut [Agent],
    index: usize,
    now: f32,
    events: &mut Vec<GameEvent>,
) -> Option<AttackOutcome> {
    if !agents[index].is_alive() || !agents[index].can_attack(now) {
        return None;
    }
    let target = find_target(agents, index)?;

    let raw = calculate_damage(&agents[index], &agents[target]);
    let damage = absorb_with_shield(&mut agents[target], raw);
    let defeated = agents[target].take_damage(damage);

    let attacker = &mut agents[index];
    attacker.last_attack = Some(now);
    let blast = std::mem::take(&mut attacker.effects.freeze_blast_ready);

    let frozen = if blast {
        let origin = agents[index].pos;
        events.push(GameEvent::FreezeBlast { origin });
        freeze_blast(agents, index)
    } else {
        0
    };

    let midpoint = (agents[index].pos + agents[target].pos) * 0.5;
    events.push(GameEvent::AttackLanded { midpoint, damage });

    Some(AttackOutcome {
        target,
        damage,
        defeated,
        frozen,
    })
}

/// Slow every other agent near `agents[index]`. Returns how many were hit.
pub fn freeze_blast(agents: &mut [Agent], index: usize) -> usize {
    let origin = agents[index].pos;
    let mut frozen = 0;
    for (j, other) in agents.iter_mut().enumerate() {
        if j != index && other.is_alive() && origin.distance(other.pos) < FREEZE_RADIUS {
            other.vel *= FREEZE_FACTOR;
            frozen += 1;
        }
    }
    frozen
}

/// Damage-over-time to every unshielded agent around `agents[index]`
pub fn apply_aura(agents: &mut [Agent], index: usize, aura: &Aura, dt: f32) {
    let origin: Vec2 = agents[index].pos;
    for (j, other) in agents.iter_mut().enumerate() {
        if j == index || !other.is_alive() || other.effects.shielded() {
            continue;
        }
        if origin.distance(other.pos) < aura.radius {
            other.health -= aura.damage_per_second * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Element;
    use proptest::prelude::*;

    fn pair(a: Element, b: Element) -> Vec<Agent> {
        vec![
            Agent::new(1, a, Vec2::new(0.0, 0.0), 20.0),
            Agent::new(2, b, Vec2::new(50.0, 0.0), 20.0),
        ]
    }

    #[test]
    fn test_fire_hits_ice() {
        let mut agents = pair(Element::Fire, Element::Ice);
        let mut events = Vec::new();

        let outcome = attack_nearby(&mut agents, 0, 0.0, &mut events).unwrap();
        assert_eq!(outcome.target, 1);
        assert_eq!(outcome.damage, 62.5);
        assert!(!outcome.defeated);
        assert_eq!(agents[1].health, 37.5);
        assert_eq!(agents[0].last_attack, Some(0.0));
        assert!(matches!(events[0], GameEvent::AttackLanded { damage, .. } if damage == 62.5));
    }

    #[test]
    fn test_shield_softens_hit() {
        let mut agents = pair(Element::Fire, Element::Ice);
        agents[1].effects.grant_shield(0.0);
        let mut events = Vec::new();

        let outcome = attack_nearby(&mut agents, 0, 1.0, &mut events).unwrap();
        assert!((outcome.damage - 18.75).abs() < 1e-4);
        assert!((agents[1].health - 81.25).abs() < 1e-4);
        assert_eq!(agents[1].effects.shield_charges, 2);
    }

    #[test]
    fn test_shielded_ice_hit_by_ice() {
        let mut agents = pair(Element::Ice, Element::Ice);
        agents[1].effects.grant_shield(0.0);
        agents[1].health = 30.0;
        agents[0].effects.grant_rage(0.0);
        let mut events = Vec::new();

        let outcome = attack_nearby(&mut agents, 0, 0.5, &mut events).unwrap();
        // 25 * 1.0 * 3.0 * 0.3 = 22.5
        assert!((outcome.damage - 22.5).abs() < 1e-4);
        assert!((agents[1].health - 7.5).abs() < 1e-4);
        assert_eq!(agents[1].effects.shield_charges, 2);
    }

    #[test]
    fn test_cooldown_blocks_second_attack() {
        let mut agents = pair(Element::Poison, Element::Fire);
        let mut events = Vec::new();

        assert!(attack_nearby(&mut agents, 0, 1.0, &mut events).is_some());
        assert!(attack_nearby(&mut agents, 0, 1.5, &mut events).is_none());
        assert!(attack_nearby(&mut agents, 0, 1.8, &mut events).is_some());
        assert!(!agents[1].is_alive());
    }

    #[test]
    fn test_out_of_reach() {
        let mut agents = pair(Element::Fire, Element::Ice);
        agents[1].pos = Vec2::new(56.0, 0.0); // 56 > 20 + 20 + 15
        let mut events = Vec::new();
        assert!(attack_nearby(&mut agents, 0, 0.0, &mut events).is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn test_reach_boundary() {
        let mut agents = pair(Element::Fire, Element::Ice);
        agents[1].pos = Vec2::new(54.9, 0.0);
        assert_eq!(find_target(&agents, 0), Some(1));

        agents[1].pos = Vec2::new(55.1, 0.0);
        assert_eq!(find_target(&agents, 0), None);
    }

    #[test]
    fn test_rage_triples_damage() {
        let mut agents = pair(Element::Fire, Element::Ice);
        let calm = calculate_damage(&agents[0], &agents[1]);
        agents[0].effects.grant_rage(0.0);
        let raging = calculate_damage(&agents[0], &agents[1]);
        assert_eq!(calm, 62.5);
        assert_eq!(raging, 187.5);
        assert!(raging > calm);
    }

    #[test]
    fn test_dead_agents_are_not_targeted() {
        let mut agents = pair(Element::Fire, Element::Ice);
        agents[1].health = 0.0;
        agents.push(Agent::new(3, Element::Metal, Vec2::new(0.0, 30.0), 20.0));
        assert_eq!(find_target(&agents, 0), Some(2));

        // Dead agents don't attack either
        let mut events = Vec::new();
        assert!(attack_nearby(&mut agents, 1, 0.0, &mut events).is_none());
    }

    #[test]
    fn test_lethal_hit_reports_defeat() {
        let mut agents = pair(Element::Poison, Element::Fire);
        agents[1].health = 10.0;
        let mut events = Vec::new();
        let outcome = attack_nearby(&mut agents, 0, 0.0, &mut events).unwrap();
        assert!(outcome.defeated);
        assert!(!agents[1].is_alive());
    }

    #[test]
    fn test_freeze_blast_fires_once() {
        let mut agents = pair(Element::Fire, Element::Ice);
        agents.push(Agent::new(3, Element::Metal, Vec2::new(150.0, 0.0), 20.0));
        agents.push(Agent::new(4, Element::Metal, Vec2::new(300.0, 0.0), 20.0));
        for agent in agents.iter_mut() {
            agent.vel = Vec2::new(100.0, 0.0);
        }
        agents[0].effects.arm_freeze_blast();
        let mut events = Vec::new();

        let outcome = attack_nearby(&mut agents, 0, 0.0, &mut events).unwrap();
        assert_eq!(outcome.frozen, 2);
        assert!(!agents[0].effects.freeze_blast_ready);
        assert_eq!(agents[0].vel, Vec2::new(100.0, 0.0));
        assert!((agents[1].vel.x - 10.0).abs() < 1e-4);
        assert!((agents[2].vel.x - 10.0).abs() < 1e-4);
        assert_eq!(agents[3].vel.x, 100.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::FreezeBlast { .. })));

        let outcome = attack_nearby(&mut agents, 0, 1.0, &mut events).unwrap();
        assert_eq!(outcome.frozen, 0);
    }

    #[test]
    fn test_aura_skips_shielded() {
        let mut agents = pair(Element::Poison, Element::Fire);
        agents.push(Agent::new(3, Element::Ice, Vec2::new(0.0, 50.0), 20.0));
        agents[2].effects.grant_shield(0.0);
        let aura = Element::Poison.profile().aura.unwrap();

        apply_aura(&mut agents, 0, &aura, 0.5);
        assert_eq!(agents[0].health, 100.0);
        assert_eq!(agents[1].health, 96.0);
        assert_eq!(agents[2].health, 100.0);
    }

    proptest! {
        #[test]
        fn prop_damage_monotonic_in_rage(a in 0usize..5, d in 0usize..5, m in 1.01f32..5.0) {
            let mut attacker = Agent::new(1, Element::ALL[a], Vec2::ZERO, 20.0);
            let defender = Agent::new(2, Element::ALL[d], Vec2::ZERO, 20.0);
            let base = calculate_damage(&attacker, &defender);
            attacker.effects.damage_multiplier = m;
            prop_assert!(calculate_damage(&attacker, &defender) > base);
        }

        #[test]
        fn prop_shield_reduces_damage(raw in 0.1f32..200.0, charges in 0u32..4) {
            let mut defender = Agent::new(2, Element::Ice, Vec2::ZERO, 20.0);
            defender.effects.shield_charges = charges;
            let through = absorb_with_shield(&mut defender, raw);
            if charges > 0 {
                prop_assert!(through < raw);
                prop_assert_eq!(defender.effects.shield_charges, charges - 1);
            } else {
                prop_assert_eq!(through, raw);
            }
        }
    }
}
