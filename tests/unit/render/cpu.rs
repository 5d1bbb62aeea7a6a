use super::*;

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

fn compositor(bg: Background) -> CpuCompositor {
    let style = FrameStyle {
        background: bg,
        line_color: Rgba8::rgb(0x33, 0x33, 0x66),
        line_width: 3.0,
        node_size: 10.0,
        palette: vec![Rgba8::rgb(255, 0, 0), Rgba8::rgb(0, 0, 255)],
    };
    CpuCompositor::new(Canvas::new(64, 64).unwrap(), style).unwrap()
}

fn node(x: f64, y: f64, scale: Option<f64>) -> InterpolatedNode {
    InterpolatedNode {
        position: Point::new(x, y),
        scale,
    }
}

#[test]
fn default_canvas_buffer_is_exact_size() {
    let canvas = Canvas::square_from_extent(2.0 * (180.0 + 12.0 + 20.0)).unwrap();
    let mut c = CpuCompositor::new(canvas, FrameStyle::default()).unwrap();
    let f = c.render(&[], &[]).unwrap();
    assert_eq!((f.width, f.height), (424, 424));
    assert_eq!(f.data.len(), 424 * 424 * 4);
}

#[test]
fn transparent_background_stays_empty() {
    let mut c = compositor(Background::Transparent);
    let f = c.render(&[], &[]).unwrap();
    assert!(f.data.iter().all(|&b| b == 0));
}

#[test]
fn solid_background_fills_every_pixel() {
    let mut c = compositor(Background::Solid(Rgba8::rgb(0xf0, 0xe1, 0xc6)));
    let f = c.render(&[], &[]).unwrap();
    for (x, y) in [(0, 0), (63, 0), (0, 63), (63, 63), (32, 32)] {
        assert!(
            close(f.pixel(x, y).unwrap(), [0xf0, 0xe1, 0xc6, 255], 1),
            "pixel ({x},{y})"
        );
    }
}

#[test]
fn nodes_use_palette_by_index() {
    let mut c = compositor(Background::Transparent);
    let nodes = [node(16.5, 32.5, None), node(48.5, 32.5, None)];
    let f = c.render(&nodes, &[]).unwrap();
    assert!(close(f.pixel(16, 32).unwrap(), [255, 0, 0, 255], 1));
    assert!(close(f.pixel(48, 32).unwrap(), [0, 0, 255, 255], 1));
    assert_eq!(f.pixel(32, 5).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn zero_scale_node_draws_nothing() {
    let mut c = compositor(Background::Transparent);
    let f = c.render(&[node(32.5, 32.5, Some(0.0))], &[]).unwrap();
    assert!(f.data.iter().all(|&b| b == 0));
}

#[test]
fn partial_scale_shrinks_and_fades() {
    let mut c = compositor(Background::Transparent);
    let f = c.render(&[node(32.5, 32.5, Some(0.5))], &[]).unwrap();

    let center = f.pixel(32, 32).unwrap();
    assert!(center[3].abs_diff(128) <= 2, "alpha {}", center[3]);

    // Radius is 5px at half scale; 8px away is outside the disc.
    assert_eq!(f.pixel(40, 32).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn edges_are_drawn_under_nodes() {
    let mut c = compositor(Background::Transparent);
    let edges = [Edge {
        a: Point::new(0.0, 32.5),
        b: Point::new(64.0, 32.5),
    }];

    let lines_only = c.render(&[], &edges).unwrap();
    assert!(close(lines_only.pixel(5, 32).unwrap(), [0x33, 0x33, 0x66, 255], 1));
    assert_eq!(lines_only.pixel(5, 5).unwrap(), [0, 0, 0, 0]);

    let with_node = c.render(&[node(32.5, 32.5, None)], &edges).unwrap();
    assert!(close(with_node.pixel(32, 32).unwrap(), [255, 0, 0, 255], 1));
    assert!(close(with_node.pixel(5, 32).unwrap(), [0x33, 0x33, 0x66, 255], 1));
}

#[test]
fn rendering_is_deterministic_and_not_aliased() {
    let mut c = compositor(Background::Solid(Rgba8::rgb(1, 2, 3)));
    let nodes = [node(20.0, 20.0, None), node(40.0, 44.0, Some(0.3))];
    let edges = [Edge {
        a: nodes[0].position,
        b: nodes[1].position,
    }];
    let a = c.render(&nodes, &edges).unwrap();
    let blank = c.render(&[], &[]).unwrap();
    let b = c.render(&nodes, &edges).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, blank);
}

#[test]
fn straight_alpha_conversion_for_png() {
    let mut c = compositor(Background::Transparent);
    let f = c.render(&[node(32.5, 32.5, Some(0.5))], &[]).unwrap();
    let straight = f.to_straight_rgba8();
    let i = (32 * 64 + 32) * 4;
    // Unpremultiplied red stays close to full intensity.
    assert!(straight[i] >= 250, "r {}", straight[i]);
    assert_eq!(straight[i + 3], f.data[i + 3]);
}

#[test]
fn oversize_canvas_is_rejected() {
    let canvas = Canvas {
        width: 70_000,
        height: 10,
    };
    assert!(CpuCompositor::new(canvas, FrameStyle::default()).is_err());
}
