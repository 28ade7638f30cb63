use crate::error::{VizError, VizResult};

/// Square transform matrix of order 2 or 3, stored row-major.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct TransformMatrix {
    order: usize,
    entries: Vec<f64>,
}

impl TransformMatrix {
    pub const SUPPORTED_ORDERS: [usize; 2] = [2, 3];

    pub fn from_rows(rows: Vec<Vec<f64>>) -> VizResult<Self> {
        let order = rows.len();
        if !Self::SUPPORTED_ORDERS.contains(&order) {
            return Err(VizError::config(format!(
                "transform matrix must be 2x2 or 3x3, got {order} rows"
            )));
        }
        let mut entries = Vec::with_capacity(order * order);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != order {
                return Err(VizError::config(format!(
                    "transform matrix must be square: row {r} has {} entries, expected {order}",
                    row.len()
                )));
            }
            entries.extend(row);
        }
        if entries.iter().any(|v| !v.is_finite()) {
            return Err(VizError::config("transform matrix entries must be finite"));
        }
        Ok(Self { order, entries })
    }

    /// Successive inner vectors are the matrix columns (images of the basis vectors).
    pub fn from_columns(columns: Vec<Vec<f64>>) -> VizResult<Self> {
        let m = Self::from_rows(columns)?;
        Ok(m.transposed())
    }

    pub fn identity(order: usize) -> VizResult<Self> {
        let rows = (0..order)
            .map(|r| (0..order).map(|c| if r == c { 1.0 } else { 0.0 }).collect())
            .collect();
        Self::from_rows(rows)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.entries[row * self.order + col]
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.entries
            .chunks_exact(self.order)
            .map(|row| row.to_vec())
            .collect()
    }

    pub fn transposed(&self) -> Self {
        let n = self.order;
        let mut entries = vec![0.0; n * n];
        for r in 0..n {
            for c in 0..n {
                entries[c * n + r] = self.entries[r * n + c];
            }
        }
        Self { order: n, entries }
    }

    /// `I + t * (self - I)`; `t = 0` is the identity and `t = 1` is `self`.
    pub fn blend_from_identity(&self, t: f64) -> Self {
        let n = self.order;
        let entries = self
            .entries
            .iter()
            .enumerate()
            .map(|(k, &v)| {
                let id = if k / n == k % n { 1.0 } else { 0.0 };
                (1.0 - t) * id + t * v
            })
            .collect();
        Self { order: n, entries }
    }

    /// Multiply every point of `points` by this matrix.
    pub fn apply(&self, points: &PointSet) -> VizResult<PointSet> {
        if points.dims() != self.order {
            return Err(VizError::config(format!(
                "dimension mismatch: {0}x{0} transform applied to {1}-D points",
                self.order,
                points.dims()
            )));
        }
        let n = self.order;
        let len = points.len();
        let axes = (0..n)
            .map(|r| {
                (0..len)
                    .map(|i| (0..n).map(|c| self.get(r, c) * points.axes[c][i]).sum())
                    .collect()
            })
            .collect();
        Ok(PointSet { axes })
    }
}

impl TryFrom<Vec<Vec<f64>>> for TransformMatrix {
    type Error = VizError;

    fn try_from(rows: Vec<Vec<f64>>) -> VizResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<TransformMatrix> for Vec<Vec<f64>> {
    fn from(m: TransformMatrix) -> Self {
        m.rows()
    }
}

/// N sample points stored per axis: `axes[0]` holds every x, `axes[1]` every y, and so on.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    axes: Vec<Vec<f64>>,
}

impl PointSet {
    pub fn from_axes(axes: Vec<Vec<f64>>) -> VizResult<Self> {
        if !TransformMatrix::SUPPORTED_ORDERS.contains(&axes.len()) {
            return Err(VizError::config(format!(
                "point set must be 2-D or 3-D, got {} coordinate arrays",
                axes.len()
            )));
        }
        let len = axes[0].len();
        if axes.iter().any(|a| a.len() != len) {
            return Err(VizError::config(
                "point set coordinate arrays must have equal length",
            ));
        }
        if axes.iter().flatten().any(|v| !v.is_finite()) {
            return Err(VizError::config("point coordinates must be finite"));
        }
        Ok(Self { axes })
    }

    pub fn from_xy(xs: Vec<f64>, ys: Vec<f64>) -> VizResult<Self> {
        Self::from_axes(vec![xs, ys])
    }

    /// Every `(x, y)` combination, x-major: all y values for the first x, then the next x.
    pub fn grid(x: Linspace, y: Linspace) -> VizResult<Self> {
        let xv = x.values();
        let yv = y.values();
        let mut xs = Vec::with_capacity(xv.len() * yv.len());
        let mut ys = Vec::with_capacity(xv.len() * yv.len());
        for &xi in &xv {
            for &yi in &yv {
                xs.push(xi);
                ys.push(yi);
            }
        }
        Self::from_xy(xs, ys)
    }

    pub fn empty(dims: usize) -> VizResult<Self> {
        Self::from_axes(vec![Vec::new(); dims])
    }

    pub fn dims(&self) -> usize {
        self.axes.len()
    }

    pub fn len(&self) -> usize {
        self.axes[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn xs(&self) -> &[f64] {
        &self.axes[0]
    }

    pub fn ys(&self) -> &[f64] {
        &self.axes[1]
    }

    pub fn point(&self, i: usize) -> Vec<f64> {
        self.axes.iter().map(|a| a[i]).collect()
    }

    /// Largest `|coordinate|` over every axis; `0.0` when empty.
    pub fn max_abs(&self) -> f64 {
        self.axes
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

/// `count` evenly spaced values over `[start, end]`, endpoints included.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Linspace {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Linspace {
    pub fn new(start: f64, end: f64, count: usize) -> Self {
        Self { start, end, count }
    }

    pub fn values(self) -> Vec<f64> {
        match self.count {
            0 => Vec::new(),
            1 => vec![self.start],
            n => {
                let step = (self.end - self.start) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.end
                        } else {
                            self.start + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }
}
