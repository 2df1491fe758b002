//! Elemental types and their behavior table
//!
//! Each element owns one [`ElementProfile`] row: its color, its continuous
//! behavior and its damage row against every defender. Adding an element
//! means adding a variant and a row here.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Elemental type of an agent (fixed at spawn)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Ice,
    Metal,
    Lightning,
    Poison,
}

/// Pull toward nearby agents of a given element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attraction {
    pub target: Element,
    /// Only agents closer than this pull
    pub radius: f32,
    /// Force numerator: `strength / (dist + 1)`
    pub strength: f32,
}

/// Random velocity kicks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    /// Chance per tick
    pub chance: f64,
    /// Max impulse per axis
    pub impulse: f32,
}

/// Damage-over-time field around the agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aura {
    pub radius: f32,
    pub damage_per_second: f32,
}

/// Behavior parameters for one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementProfile {
    pub color: Rgb,
    pub attraction: Option<Attraction>,
    /// Velocity factor applied every tick (1.0 = no drag)
    pub drag: f32,
    pub jitter: Option<Jitter>,
    pub aura: Option<Aura>,
    /// Damage multiplier against each defender, indexed like [`Element::ALL`]
    pub damage: [f32; 5],
}

const PROFILES: [ElementProfile; 5] = [
    // Fire: hunts ice
    ElementProfile {
        color: [255, 100, 0],
        attraction: Some(Attraction {
            target: Element::Ice,
            radius: 200.0,
            strength: 80.0,
        }),
        drag: 1.0,
        jitter: None,
        aura: None,
        //       Fire Ice  Metal Light Poison
        damage: [1.0, 2.5, 0.4, 0.7, 1.8],
    },
    // Ice: slight drag
    ElementProfile {
        color: [100, 200, 255],
        attraction: None,
        drag: 0.999,
        jitter: None,
        aura: None,
        damage: [0.4, 1.0, 2.5, 1.8, 0.7],
    },
    // Metal: clumps with other metal
    ElementProfile {
        color: [150, 150, 150],
        attraction: Some(Attraction {
            target: Element::Metal,
            radius: 150.0,
            strength: 50.0,
        }),
        drag: 1.0,
        jitter: None,
        aura: None,
        damage: [1.2, 0.4, 1.0, 2.5, 1.8],
    },
    // Lightning: erratic
    ElementProfile {
        color: [255, 255, 100],
        attraction: None,
        drag: 1.0,
        jitter: Some(Jitter {
            chance: 0.08,
            impulse: 80.0,
        }),
        aura: None,
        damage: [1.2, 0.7, 0.4, 1.0, 2.5],
    },
    // Poison: hurts everything unshielded nearby
    ElementProfile {
        color: [100, 255, 100],
        attraction: None,
        drag: 1.0,
        jitter: None,
        aura: Some(Aura {
            radius: 100.0,
            damage_per_second: 8.0,
        }),
        damage: [2.5, 1.2, 0.7, 0.4, 1.0],
    },
];

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Ice,
        Element::Metal,
        Element::Lightning,
        Element::Poison,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Ice => "Ice",
            Element::Metal => "Metal",
            Element::Lightning => "Lightning",
            Element::Poison => "Poison",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn profile(self) -> &'static ElementProfile {
        &PROFILES[self.index()]
    }

    #[inline]
    pub fn color(self) -> Rgb {
        self.profile().color
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Attacker-vs-defender damage lookup
pub struct DamageMatrix;

impl DamageMatrix {
    /// Multiplier for `attacker` hitting `defender` (1.0 for same-element hits)
    #[inline]
    pub fn multiplier(attacker: Element, defender: Element) -> f32 {
        attacker.profile().damage[defender.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_matches_rock_paper_scissors() {
        assert_eq!(DamageMatrix::multiplier(Element::Fire, Element::Ice), 2.5);
        assert_eq!(DamageMatrix::multiplier(Element::Ice, Element::Metal), 2.5);
        assert_eq!(DamageMatrix::multiplier(Element::Metal, Element::Lightning), 2.5);
        assert_eq!(DamageMatrix::multiplier(Element::Lightning, Element::Poison), 2.5);
        assert_eq!(DamageMatrix::multiplier(Element::Poison, Element::Fire), 2.5);

        assert_eq!(DamageMatrix::multiplier(Element::Ice, Element::Fire), 0.4);
        assert_eq!(DamageMatrix::multiplier(Element::Metal, Element::Fire), 1.2);
    }

    #[test]
    fn test_same_element_defaults_to_one() {
        for element in Element::ALL {
            assert_eq!(DamageMatrix::multiplier(element, element), 1.0);
        }
    }

    #[test]
    fn test_every_element_has_a_strong_matchup() {
        for element in Element::ALL {
            let best = element
                .profile()
                .damage
                .iter()
                .copied()
                .fold(0.0f32, f32::max);
            assert_eq!(best, 2.5, "{} has no 2.5x matchup", element.as_str());
        }
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, element) in Element::ALL.iter().enumerate() {
            assert_eq!(element.index(), i);
        }
    }

    #[test]
    fn test_behavior_rows() {
        assert_eq!(Element::Ice.profile().drag, 0.999);
        assert_eq!(
            Element::Fire.profile().attraction.map(|a| a.target),
            Some(Element::Ice)
        );
        assert!(Element::Poison.profile().aura.is_some());
        assert!(Element::Lightning.profile().jitter.is_some());
    }
}
