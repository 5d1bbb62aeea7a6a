//! Node placement and edge generation.

/// Chord edge generation.
pub mod connections;
/// Slot-assignment patterns.
pub mod pattern;
/// Ring layouts.
pub mod ring;
