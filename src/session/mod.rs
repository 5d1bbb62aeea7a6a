//! Frame scheduling and the end-to-end run.

/// Render-and-encode driver.
pub mod pipeline;
/// Per-frame synthesis and ordered delivery to a sink.
pub mod render_session;
