use std::path::Path;

use vello_cpu::kurbo::Shape as _;

use crate::{
    color::ColorAssignment,
    config::RenderConfig,
    error::{VizError, VizResult},
    matrix::PointSet,
    plot::{AxisBounds, PlotLayout},
};

const AXES_RGB: [u8; 3] = [255, 255, 255];
const GRID_RGB: [u8; 3] = [176, 176, 176];
const SPINE_RGB: [u8; 3] = [0, 0, 0];
const LINE_WIDTH_PT: f64 = 0.8;
const TICK_LENGTH_PT: f64 = 3.5;

/// A rasterized figure as tightly packed, row-major RGB8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGB {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGB {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn save_png(&self, path: &Path) -> VizResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .map_err(|e| VizError::io(format!("write frame '{}': {e}", path.display())))
    }
}

/// The one canvas a render run draws every frame onto.
///
/// Holding it by value is the exclusive lease on the canvas; dropping it releases the pixmap.
pub struct PlotSurface {
    layout: PlotLayout,
    face_rgb: [u8; 3],
    px_per_pt: f64,
    marker_radius_px: f64,
    pixmap: vello_cpu::Pixmap,
}

impl PlotSurface {
    pub fn acquire(cfg: &RenderConfig, bounds: AxisBounds) -> VizResult<Self> {
        cfg.validate()?;
        let layout = PlotLayout::new(cfg, bounds)?;
        let px_per_pt = cfg.px_per_pt();
        Ok(Self {
            layout,
            face_rgb: cfg.face_rgb,
            px_per_pt,
            // Marker size is an area in pt^2, so the diameter is its square root.
            marker_radius_px: 0.5 * cfg.marker_size.sqrt() * px_per_pt,
            pixmap: vello_cpu::Pixmap::new(layout.width, layout.height),
        })
    }

    pub fn layout(&self) -> &PlotLayout {
        &self.layout
    }

    /// Clear the canvas and draw one scatter frame: point `i` is filled with `colors[i]`.
    pub fn draw(&mut self, points: &PointSet, colors: &ColorAssignment) -> VizResult<FrameRGB> {
        if colors.len() != points.len() {
            return Err(VizError::render(format!(
                "{} colors for {} points",
                colors.len(),
                points.len()
            )));
        }
        let fills = colors
            .as_slice()
            .iter()
            .map(|c| c.to_rgb8())
            .collect::<VizResult<Vec<_>>>()?;

        let layout = self.layout;
        let axes = layout.axes;
        let lw = LINE_WIDTH_PT * self.px_per_pt;
        let tick_len = TICK_LENGTH_PT * self.px_per_pt;

        clear_pixmap(&mut self.pixmap, self.face_rgb);
        let mut ctx = vello_cpu::RenderContext::new(layout.width, layout.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        set_rgb(&mut ctx, self.face_rgb);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(layout.width),
            f64::from(layout.height),
        ));
        set_rgb(&mut ctx, AXES_RGB);
        ctx.fill_rect(&rect_to_cpu(axes));

        for (i, fill) in fills.iter().enumerate() {
            let c = layout.to_px(points.xs()[i], points.ys()[i]);
            let circle = vello_cpu::kurbo::Circle::new((c.x, c.y), self.marker_radius_px);
            let mut path = vello_cpu::kurbo::BezPath::new();
            for el in circle.path_elements(0.1) {
                path.push(el);
            }
            set_rgb(&mut ctx, *fill);
            ctx.fill_path(&path);
        }

        let ticks = layout.bounds.ticks();
        let tick_px: Vec<(f64, f64)> = ticks
            .iter()
            .map(|&t| {
                let p = layout.to_px(t, t);
                (p.x, p.y)
            })
            .collect();

        set_rgb(&mut ctx, GRID_RGB);
        for &(x, y) in &tick_px {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                x - lw / 2.0,
                axes.y0,
                x + lw / 2.0,
                axes.y1,
            ));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                axes.x0,
                y - lw / 2.0,
                axes.x1,
                y + lw / 2.0,
            ));
        }

        set_rgb(&mut ctx, SPINE_RGB);
        for &(x, y) in &tick_px {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                x - lw / 2.0,
                axes.y1,
                x + lw / 2.0,
                axes.y1 + tick_len,
            ));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                axes.x0 - tick_len,
                y - lw / 2.0,
                axes.x0,
                y + lw / 2.0,
            ));
        }
        let h = lw / 2.0;
        for spine in [
            vello_cpu::kurbo::Rect::new(axes.x0 - h, axes.y0 - h, axes.x1 + h, axes.y0 + h),
            vello_cpu::kurbo::Rect::new(axes.x0 - h, axes.y1 - h, axes.x1 + h, axes.y1 + h),
            vello_cpu::kurbo::Rect::new(axes.x0 - h, axes.y0 - h, axes.x0 + h, axes.y1 + h),
            vello_cpu::kurbo::Rect::new(axes.x1 - h, axes.y0 - h, axes.x1 + h, axes.y1 + h),
        ] {
            ctx.fill_rect(&spine);
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);

        let data = flatten_to_rgb8(self.pixmap.data_as_u8_slice(), self.face_rgb)?;
        Ok(FrameRGB {
            width: u32::from(layout.width),
            height: u32::from(layout.height),
            data,
        })
    }
}

fn set_rgb(ctx: &mut vello_cpu::RenderContext, [r, g, b]: [u8; 3]) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, 255));
}

fn rect_to_cpu(r: kurbo::Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, [r, g, b]: [u8; 3]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&[r, g, b, 255]);
    }
}

/// Drop alpha from premultiplied RGBA8, compositing any translucent pixel over `bg`.
fn flatten_to_rgb8(src: &[u8], bg: [u8; 3]) -> VizResult<Vec<u8>> {
    if !src.len().is_multiple_of(4) {
        return Err(VizError::render("pixmap byte length is not a multiple of 4"));
    }
    let mut out = Vec::with_capacity(src.len() / 4 * 3);
    for s in src.chunks_exact(4) {
        let a = u16::from(s[3]);
        if a == 255 {
            out.extend_from_slice(&s[..3]);
            continue;
        }
        let inv = 255 - a;
        for (c, bg_c) in s[..3].iter().zip(bg) {
            let v = u16::from(*c) + mul_div255(u16::from(bg_c), inv);
            out.push(v.min(255) as u8);
        }
    }
    Ok(out)
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{DefaultColorizer, Rgb};

    fn small_cfg() -> RenderConfig {
        RenderConfig {
            figure_size: (1.0, 1.0),
            dpi: 80,
            ..RenderConfig::default()
        }
    }

    fn px_at(surface: &PlotSurface, frame: &FrameRGB, x: f64, y: f64) -> [u8; 3] {
        let p = surface.layout().to_px(x, y);
        frame.pixel(p.x as u32, p.y as u32).unwrap()
    }

    #[test]
    fn draws_face_axes_and_marker_colors() {
        let cfg = small_cfg();
        let pts = PointSet::from_xy(vec![0.3], vec![0.3]).unwrap();
        let colors = ColorAssignment::compute(&pts, &|_x: f64, _y: f64| Rgb::new(1.0, 0.0, 0.0));
        let mut surface = PlotSurface::acquire(&cfg, AxisBounds::from_max_abs(1.0)).unwrap();
        let frame = surface.draw(&pts, &colors).unwrap();

        assert_eq!((frame.width, frame.height), (80, 80));
        assert_eq!(frame.data.len(), 80 * 80 * 3);
        assert_eq!(frame.pixel(0, 0).unwrap(), cfg.face_rgb);
        assert_eq!(px_at(&surface, &frame, 0.3, 0.3), [255, 0, 0]);
        assert_eq!(px_at(&surface, &frame, -0.7, -0.7), AXES_RGB);
    }

    #[test]
    fn redraw_clears_previous_frame() {
        let cfg = small_cfg();
        let colors = ColorAssignment::compute(
            &PointSet::from_xy(vec![0.3], vec![0.3]).unwrap(),
            &DefaultColorizer,
        );
        let mut surface = PlotSurface::acquire(&cfg, AxisBounds::from_max_abs(1.0)).unwrap();
        let first = surface
            .draw(&PointSet::from_xy(vec![0.3], vec![0.3]).unwrap(), &colors)
            .unwrap();
        let second = surface
            .draw(&PointSet::from_xy(vec![-0.3], vec![-0.3]).unwrap(), &colors)
            .unwrap();
        assert_eq!(px_at(&surface, &second, 0.3, 0.3), AXES_RGB);
        assert_ne!(px_at(&surface, &first, 0.3, 0.3), AXES_RGB);
        assert_ne!(first, second);
    }

    #[test]
    fn empty_frame_draws_only_axes() {
        let cfg = small_cfg();
        let mut surface = PlotSurface::acquire(&cfg, AxisBounds::from_max_abs(0.0)).unwrap();
        let frame = surface
            .draw(&PointSet::empty(2).unwrap(), &ColorAssignment::default())
            .unwrap();
        assert_eq!(frame.pixel(0, 0).unwrap(), cfg.face_rgb);
        assert_eq!(px_at(&surface, &frame, 0.1, 0.1), AXES_RGB);
    }

    #[test]
    fn out_of_range_color_is_render_error() {
        let pts = PointSet::from_xy(vec![0.0], vec![0.0]).unwrap();
        let colors = ColorAssignment::compute(&pts, &|_x: f64, _y: f64| Rgb::new(-0.5, 0.0, 0.0));
        let mut surface =
            PlotSurface::acquire(&small_cfg(), AxisBounds::from_max_abs(1.0)).unwrap();
        assert!(matches!(
            surface.draw(&pts, &colors),
            Err(VizError::Render(_))
        ));
    }

    #[test]
    fn color_count_mismatch_is_render_error() {
        let pts = PointSet::from_xy(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        let mut surface =
            PlotSurface::acquire(&small_cfg(), AxisBounds::from_max_abs(1.0)).unwrap();
        assert!(matches!(
            surface.draw(&pts, &ColorAssignment::default()),
            Err(VizError::Render(_))
        ));
    }

    #[test]
    fn flatten_translucent_over_background() {
        // Premultiplied red @ 50% alpha over black.
        let out = flatten_to_rgb8(&[128, 0, 0, 128], [0, 0, 0]).unwrap();
        assert_eq!(out, vec![128, 0, 0]);
        let opaque = flatten_to_rgb8(&[1, 2, 3, 255], [9, 9, 9]).unwrap();
        assert_eq!(opaque, vec![1, 2, 3]);
    }
}
