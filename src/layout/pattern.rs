use std::fmt;
use std::str::FromStr;

use crate::foundation::error::ChordError;

/// Rule assigning node identities to angular slots as the node count grows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTag {
    /// Node `i` sits in slot `i`; nodes are added sequentially around the ring.
    #[default]
    Circular,
    /// Interleaves the lower and upper halves of the ring so new nodes land across from each
    /// other.
    Opposite,
    /// Seed triangle, then alternates between the next low slot and the next high slot.
    Alternating,
}

impl PatternTag {
    /// Every supported pattern, in CLI order.
    pub const ALL: [PatternTag; 3] = [Self::Circular, Self::Opposite, Self::Alternating];

    /// Stable lowercase name used on the command line and in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circular => "circular",
            Self::Opposite => "opposite",
            Self::Alternating => "alternating",
        }
    }

    /// Slot index for every node index `0..count`.
    ///
    /// The returned vector is a permutation of `0..count`.
    pub fn slots(self, count: usize) -> Vec<usize> {
        match self {
            Self::Circular => (0..count).collect(),
            Self::Opposite => opposite_slots(count),
            Self::Alternating => alternating_slots(count),
        }
    }
}

fn opposite_slots(count: usize) -> Vec<usize> {
    let half = count / 2;
    let mut slots = Vec::with_capacity(count);
    if count >= 1 {
        slots.push(0);
    }
    if count >= 2 {
        slots.push(half);
    }

    let mut lower = 1..half;
    let mut upper = (half + 1)..count;
    while slots.len() < count {
        let a = lower.next();
        let b = upper.next();
        if a.is_none() && b.is_none() {
            break;
        }
        slots.extend(a);
        slots.extend(b);
    }
    slots
}

fn alternating_slots(count: usize) -> Vec<usize> {
    let mut slots: Vec<usize> = (0..count.min(3)).collect();
    if count <= 3 {
        return slots;
    }

    let mut low = 3;
    let mut high = count - 1;
    let mut take_low = true;
    while slots.len() < count {
        if take_low {
            slots.push(low);
            low += 1;
        } else {
            slots.push(high);
            high -= 1;
        }
        take_low = !take_low;
    }
    slots
}

impl fmt::Display for PatternTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternTag {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| {
                ChordError::validation(format!(
                    "unknown pattern '{name}' (expected circular, opposite or alternating)"
                ))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/pattern.rs"]
mod tests;
