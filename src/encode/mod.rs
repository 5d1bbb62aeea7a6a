//! Frame sinks and the external encoder.
//!
//! Rendered frames flow into a [`sink::FrameSink`] in timeline order. The production sink is the
//! PNG-backed [`frame_store::FrameStore`], which `ffmpeg` then reads as an image sequence.

/// `ffmpeg` discovery and MP4 encoding.
pub mod ffmpeg;
/// Temporary PNG image sequence.
pub mod frame_store;
/// Progress reporting for synthesis and encoding.
pub mod progress;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
