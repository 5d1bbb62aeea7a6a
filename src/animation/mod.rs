//! Easing and layout-to-layout transitions.

/// Easing curves.
pub mod ease;
/// Layout interpolation.
pub mod transition;
