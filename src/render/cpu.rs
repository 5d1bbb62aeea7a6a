use vello_cpu::kurbo::Shape as _;

use crate::animation::transition::InterpolatedNode;
use crate::foundation::color::{Background, Rgba8};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{ChordError, ChordResult};
use crate::layout::connections::Edge;
use crate::render::backend::FrameRGBA;
use crate::render::style::FrameStyle;

const CIRCLE_TOLERANCE: f64 = 0.1;

/// CPU frame compositor powered by `vello_cpu`.
///
/// Draw order is background, then every edge at full opacity, then nodes in index order so nodes
/// sit on top of the chords. Each call produces a freshly allocated [`FrameRGBA`].
pub struct CpuCompositor {
    canvas: Canvas,
    width: u16,
    height: u16,
    style: FrameStyle,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuCompositor {
    /// Create a compositor for a fixed canvas and style.
    pub fn new(canvas: Canvas, style: FrameStyle) -> ChordResult<Self> {
        let width = u16::try_from(canvas.width)
            .map_err(|_| ChordError::validation("canvas width exceeds rasterizer limit"))?;
        let height = u16::try_from(canvas.height)
            .map_err(|_| ChordError::validation("canvas height exceeds rasterizer limit"))?;
        if width == 0 || height == 0 {
            return Err(ChordError::validation("canvas width/height must be non-zero"));
        }
        Ok(Self {
            canvas,
            width,
            height,
            style,
            ctx: None,
        })
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Drawing style.
    pub fn style(&self) -> &FrameStyle {
        &self.style
    }

    /// Composite one frame.
    pub fn render(
        &mut self,
        nodes: &[InterpolatedNode],
        edges: &[Edge],
    ) -> ChordResult<FrameRGBA> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if let Background::Solid(c) = self.style.background {
            ctx.set_paint(to_cpu_color(c));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(self.width),
                f64::from(self.height),
            ));
        }

        if self.style.line_width > 0.0 && !edges.is_empty() {
            ctx.set_paint(to_cpu_color(self.style.line_color));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(self.style.line_width));
            for edge in edges {
                let mut line = vello_cpu::kurbo::BezPath::new();
                line.move_to(to_cpu_point(edge.a));
                line.line_to(to_cpu_point(edge.b));
                ctx.stroke_path(&line);
            }
        }

        for (i, node) in nodes.iter().enumerate() {
            let scale = node.effective_scale().clamp(0.0, 1.0);
            let r = self.style.node_size * scale;
            if scale <= 0.0 || r <= 0.0 {
                continue;
            }

            let disc = vello_cpu::kurbo::Circle::new(to_cpu_point(node.position), r)
                .to_path(CIRCLE_TOLERANCE);
            ctx.set_paint(to_cpu_color(self.style.node_color(i)));
            if scale < 1.0 {
                ctx.push_opacity_layer(scale as f32);
                ctx.fill_path(&disc);
                ctx.pop_layer();
            } else {
                ctx.fill_path(&disc);
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

fn to_cpu_point(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn to_cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
