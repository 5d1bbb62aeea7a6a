//! Chordnet renders a network that grows from 3 to 48 nodes, every node connected to every other
//! by straight chords, and encodes the result as an H.264 MP4.
//!
//! The pipeline is deterministic and batch oriented:
//!
//! - Build an [`AnimationConfig`] (defaults, JSON file, command line)
//! - Create a [`RenderSession`], which solves every node layout once
//! - Stream frames into a [`FrameSink`], or call [`run`] to render into a temporary PNG sequence
//!   and hand it to the system `ffmpeg`
#![forbid(unsafe_code)]

mod foundation;

/// Easing curves and layout interpolation.
pub mod animation;
/// Run configuration.
pub mod config;
/// Frame sinks and the external encoder.
pub mod encode;
/// Node placement and chord generation.
pub mod layout;
/// Frame rasterization.
pub mod render;
/// Frame scheduling and the end-to-end run.
pub mod session;
/// Growth timeline.
pub mod timeline;

pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::color::{Background, DEFAULT_PALETTE, Rgba8, parse_palette};
pub use crate::foundation::core::{Canvas, FrameIndex, Point};
pub use crate::foundation::error::{ChordError, ChordResult};

pub use crate::animation::ease::{Ease, ease};
pub use crate::animation::transition::{InterpolatedNode, interpolate, visible_count};
pub use crate::config::{AnimationConfig, EncoderSettings};
pub use crate::encode::ffmpeg::{EncodeJob, ensure_ffmpeg, is_ffmpeg_on_path};
pub use crate::encode::frame_store::FrameStore;
pub use crate::encode::progress::{FnProgress, LogProgress, NoProgress, ProgressSink};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::layout::connections::{Edge, connections};
pub use crate::layout::pattern::PatternTag;
pub use crate::layout::ring::{Layout, LayoutTable, RingGeometry, layout};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::CpuCompositor;
pub use crate::render::style::FrameStyle;
pub use crate::session::pipeline::{RunOpts, RunSummary, run};
pub use crate::session::render_session::{
    FrameScene, RenderSession, RenderSessionOpts, RenderStats,
};
pub use crate::timeline::scheduler::{FrameSpec, Phase, Timeline};
