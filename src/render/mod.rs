//! Frame rasterization.

/// Frame buffer type and PNG output.
pub mod backend;
/// `vello_cpu` compositor.
pub mod cpu;
/// Per-run drawing style.
pub mod style;
