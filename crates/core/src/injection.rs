//! Context injections: configured messages inserted into the speakers'
//! histories once a given number of replies has been produced.

use duet_model::Role;
use serde::{Deserialize, Serialize};

use crate::turn::Side;

/// Which history an injection is inserted into.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InjectionTarget {
    /// Speaker A only.
    A,
    /// Speaker B only.
    B,
    /// Both speakers, A first.
    Both,
}

impl InjectionTarget {
    /// Returns the sides this target covers, in insertion order.
    #[inline]
    pub fn sides(self) -> &'static [Side] {
        match self {
            InjectionTarget::A => &[Side::A],
            InjectionTarget::B => &[Side::B],
            InjectionTarget::Both => &[Side::A, Side::B],
        }
    }
}

/// A message to insert after the `after_turn`-th reply.
///
/// The reply counter counts individual replies from either speaker,
/// starting at 1 for the seed reply.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InjectionRule {
    /// The counter value that triggers this rule.
    pub after_turn: u32,
    /// The history (or histories) that receive the message.
    pub target: InjectionTarget,
    /// The role of the inserted message.
    pub role: Role,
    /// The inserted text. Rules with empty content never fire.
    #[serde(default)]
    pub content: String,
}

/// Returns the rules that fire at `counter`, in configuration order.
pub fn due(
    rules: &[InjectionRule],
    counter: u64,
) -> impl Iterator<Item = &InjectionRule> {
    rules
        .iter()
        .filter(move |rule| u64::from(rule.after_turn) == counter)
        .filter(|rule| {
            if rule.content.is_empty() {
                debug!("skipping empty injection at turn {}", rule.after_turn);
                return false;
            }
            true
        })
}
