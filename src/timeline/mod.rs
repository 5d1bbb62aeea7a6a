//! Growth timeline: which layouts and progress every output frame shows.

/// Frame scheduler state machine.
pub mod scheduler;
