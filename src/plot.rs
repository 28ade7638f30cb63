//! Figure geometry shared by every frame of a run: symmetric axis limits, tick positions and the
//! data-to-pixel mapping.

use kurbo::{Point, Rect};

use crate::{
    config::RenderConfig,
    error::VizResult,
    interpolate::max_abs_coordinate,
    matrix::PointSet,
};

/// Headroom applied to the largest coordinate so no frame touches the axes edge.
pub const AXIS_MARGIN: f64 = 1.1;

/// Upper limit on grid intervals across one axis.
pub const MAX_TICK_INTERVALS: f64 = 8.0;

/// Axes rectangle as figure fractions, measured from the bottom-left corner.
pub const AXES_LEFT: f64 = 0.125;
pub const AXES_RIGHT: f64 = 0.9;
pub const AXES_BOTTOM: f64 = 0.11;
pub const AXES_TOP: f64 = 0.88;

/// Symmetric limits `[-bound, bound]`, identical on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisBounds {
    bound: f64,
}

impl AxisBounds {
    /// `AXIS_MARGIN * max |coordinate|` over the whole sequence, or `1.0` when every coordinate
    /// is zero (including the no-points case).
    pub fn from_frames(frames: &[PointSet]) -> Self {
        Self::from_max_abs(max_abs_coordinate(frames))
    }

    pub fn from_max_abs(max_abs: f64) -> Self {
        let bound = if max_abs > 0.0 && max_abs.is_finite() {
            AXIS_MARGIN * max_abs
        } else {
            1.0
        };
        Self { bound }
    }

    pub fn bound(self) -> f64 {
        self.bound
    }

    pub fn limits(self) -> (f64, f64) {
        (-self.bound, self.bound)
    }

    /// Tick spacing: the smallest of 1, 2, 2.5, 5 (times a power of ten) that keeps the
    /// interval count at or below `MAX_TICK_INTERVALS`.
    pub fn tick_step(self) -> f64 {
        let raw = 2.0 * self.bound / MAX_TICK_INTERVALS;
        let mag = 10f64.powi(raw.log10().floor() as i32);
        [1.0, 2.0, 2.5, 5.0, 10.0]
            .into_iter()
            .map(|m| m * mag)
            .find(|&step| step >= raw)
            .unwrap_or(10.0 * mag)
    }

    /// Multiples of `tick_step` inside the limits, ascending.
    pub fn ticks(self) -> Vec<f64> {
        let step = self.tick_step();
        let lo = (-self.bound / step - 1e-9).ceil() as i64;
        let hi = (self.bound / step + 1e-9).floor() as i64;
        (lo..=hi).map(|k| k as f64 * step).collect()
    }
}

/// Pixel layout of one figure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotLayout {
    pub width: u16,
    pub height: u16,
    /// Axes area in pixel space (y grows downward).
    pub axes: Rect,
    pub bounds: AxisBounds,
}

impl PlotLayout {
    pub fn new(cfg: &RenderConfig, bounds: AxisBounds) -> VizResult<Self> {
        let (width, height) = cfg.pixel_size()?;
        let (w, h) = (f64::from(width), f64::from(height));
        let axes = Rect::new(
            AXES_LEFT * w,
            (1.0 - AXES_TOP) * h,
            AXES_RIGHT * w,
            (1.0 - AXES_BOTTOM) * h,
        );
        Ok(Self {
            width,
            height,
            axes,
            bounds,
        })
    }

    pub fn to_px(&self, x: f64, y: f64) -> Point {
        let b = self.bounds.bound();
        let fx = (x + b) / (2.0 * b);
        let fy = (y + b) / (2.0 * b);
        Point::new(
            self.axes.x0 + fx * self.axes.width(),
            self.axes.y1 - fy * self.axes.height(),
        )
    }
}
