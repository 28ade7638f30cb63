use crate::{
    error::{VizError, VizResult},
    matrix::{PointSet, TransformMatrix},
};

/// Apply `I + (j / steps) * (transform - I)` to `points` for every `j` in `0..=steps`.
///
/// Returns `steps + 1` point sets: index 0 is `points` under the identity and index `steps` is
/// `points` under `transform`.
pub fn interpolate(
    transform: &TransformMatrix,
    points: &PointSet,
    steps: u32,
) -> VizResult<Vec<PointSet>> {
    if steps == 0 {
        return Err(VizError::config("interpolation steps must be >= 1"));
    }
    if points.dims() != transform.order() {
        return Err(VizError::config(format!(
            "dimension mismatch: {0}x{0} transform, {1}-D points",
            transform.order(),
            points.dims()
        )));
    }

    (0..=steps)
        .map(|j| {
            let t = f64::from(j) / f64::from(steps);
            transform.blend_from_identity(t).apply(points)
        })
        .collect()
}

/// Global `max |coordinate|` across a whole frame sequence.
pub fn max_abs_coordinate(frames: &[PointSet]) -> f64 {
    frames.iter().map(PointSet::max_abs).fold(0.0, f64::max)
}
