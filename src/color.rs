use crate::{
    error::{VizError, VizResult},
    matrix::PointSet,
};

/// Floating-point RGB, nominally in `[0, 1]` per channel.
///
/// Values outside that range are representable; they are only rejected when a frame is drawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn is_drawable(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    pub fn to_rgb8(self) -> VizResult<[u8; 3]> {
        if !self.is_drawable() {
            return Err(VizError::render(format!(
                "color ({}, {}, {}) has a channel outside [0, 1]",
                self.r, self.g, self.b
            )));
        }
        let q = |c: f64| (c * 255.0).round() as u8;
        Ok([q(self.r), q(self.g), q(self.b)])
    }
}

impl From<(f64, f64, f64)> for Rgb {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Self { r, g, b }
    }
}

/// Maps an original `(x, y)` coordinate pair to a point color.
pub trait Colorizer {
    fn color(&self, x: f64, y: f64) -> Rgb;
}

impl<F> Colorizer for F
where
    F: Fn(f64, f64) -> Rgb,
{
    fn color(&self, x: f64, y: f64) -> Rgb {
        self(x, y)
    }
}

/// Red fades in toward negative y, green toward positive y, blue grows with x.
///
/// Channels are capped at 1 but never floored at 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultColorizer;

impl Colorizer for DefaultColorizer {
    fn color(&self, x: f64, y: f64) -> Rgb {
        Rgb {
            r: (1.0 - y / 3.0).min(1.0),
            g: (1.0 + y / 3.0).min(1.0),
            b: 0.25 + x / 16.0,
        }
    }
}

/// One color per point, indexed like the point set it was computed from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorAssignment {
    colors: Vec<Rgb>,
}

impl ColorAssignment {
    /// Calls `colorizer` exactly once per point, on the point's `(x, y)`.
    pub fn compute(points: &PointSet, colorizer: &dyn Colorizer) -> Self {
        let colors = points
            .xs()
            .iter()
            .zip(points.ys())
            .map(|(&x, &y)| colorizer.color(x, y))
            .collect();
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<Rgb> {
        self.colors.get(i).copied()
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn default_policy_values() {
        let c = DefaultColorizer;
        assert_eq!(c.color(0.0, 0.0), Rgb::new(1.0, 1.0, 0.25));
        assert_eq!(c.color(4.0, 3.0), Rgb::new(0.0, 1.0, 0.5));
        assert_eq!(c.color(-4.0, -3.0), Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn default_policy_does_not_floor_channels() {
        let c = DefaultColorizer.color(-8.0, 6.0);
        assert_eq!(c.r, -1.0);
        assert_eq!(c.b, -0.25);
        assert!(!c.is_drawable());
    }

    #[test]
    fn closures_are_colorizers() {
        let gray = |x: f64, _y: f64| Rgb::new(x, x, x);
        assert_eq!(gray.color(0.5, 9.0), Rgb::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn compute_calls_colorizer_once_per_point_in_order() {
        let calls = Cell::new(0usize);
        let counting = |x: f64, y: f64| {
            calls.set(calls.get() + 1);
            Rgb::new(x, y, 0.0)
        };
        let pts = PointSet::from_xy(vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]).unwrap();
        let colors = ColorAssignment::compute(&pts, &counting);
        assert_eq!(calls.get(), 3);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors.get(1), Some(Rgb::new(0.2, 0.5, 0.0)));
        assert_eq!(colors.get(3), None);
    }

    #[test]
    fn to_rgb8_rejects_out_of_range() {
        assert_eq!(Rgb::new(1.0, 0.0, 0.5).to_rgb8().unwrap(), [255, 0, 128]);
        assert!(matches!(
            Rgb::new(1.2, 0.0, 0.0).to_rgb8(),
            Err(VizError::Render(_))
        ));
        assert!(Rgb::new(f64::NAN, 0.0, 0.0).to_rgb8().is_err());
    }
}
