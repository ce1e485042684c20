//! Game-rule configuration and diplomatic state.

use std::collections::HashSet;

use crate::tile::PlayerId;

/// Game-rule switches consulted by movement legality checks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rules {
    /// Whether a trader with no cargo aboard may still enter a foreign
    /// settlement for a benign visit.
    pub empty_traders_allowed: bool,
}

/// Diplomatic state between players: who has met whom, and who is at war.
///
/// Both relations are symmetric; pairs are stored in canonical order.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relations {
    contacts: HashSet<(PlayerId, PlayerId)>,
    wars: HashSet<(PlayerId, PlayerId)>,
}

fn pair(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Relations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `a` and `b` have established diplomatic contact.
    pub fn add_contact(&mut self, a: PlayerId, b: PlayerId) {
        self.contacts.insert(pair(a, b));
    }

    /// Record a state of war between `a` and `b`.
    pub fn declare_war(&mut self, a: PlayerId, b: PlayerId) {
        self.wars.insert(pair(a, b));
    }

    /// Whether `a` and `b` have met. A player always counts as having met
    /// itself.
    pub fn has_contact(&self, a: PlayerId, b: PlayerId) -> bool {
        a == b || self.contacts.contains(&pair(a, b))
    }

    /// Whether `a` and `b` are at war.
    pub fn at_war(&self, a: PlayerId, b: PlayerId) -> bool {
        a != b && self.wars.contains(&pair(a, b))
    }
}
