use std::path::{Path, PathBuf};

use crate::{
    error::{VizError, VizResult},
    matrix::{Linspace, PointSet, TransformMatrix},
};

pub const DEFAULT_STEPS: u32 = 30;
pub const DEFAULT_WORK_DIR_NAME: &str = "lintrans_frames";

/// Raster settings shared by every frame of one run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Figure `(width, height)` in inches.
    pub figure_size: (f64, f64),
    /// Pixels per inch.
    pub dpi: u32,
    /// Scratch directory holding the per-frame PNGs; removed when the run ends.
    pub work_dir: PathBuf,
    /// Display time of each animation frame.
    pub frame_delay_ms: u32,
    /// Figure background outside the axes.
    pub face_rgb: [u8; 3],
    /// Scatter marker area in points squared.
    pub marker_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            figure_size: (4.0, 4.0),
            dpi: 150,
            work_dir: std::env::temp_dir().join(DEFAULT_WORK_DIR_NAME),
            frame_delay_ms: 100,
            face_rgb: [0, 191, 191],
            marker_size: 36.0,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> VizResult<()> {
        let (w, h) = self.figure_size;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(VizError::config(format!(
                "figure size must be positive, got ({w}, {h})"
            )));
        }
        if self.dpi == 0 {
            return Err(VizError::config("dpi must be >= 1"));
        }
        if self.frame_delay_ms == 0 {
            return Err(VizError::config("frame delay must be >= 1 ms"));
        }
        if !(self.marker_size.is_finite() && self.marker_size > 0.0) {
            return Err(VizError::config("marker size must be positive"));
        }
        if self.work_dir.as_os_str().is_empty() {
            return Err(VizError::config("work dir must not be empty"));
        }
        self.pixel_size().map(|_| ())
    }

    /// Raster `(width, height)` in pixels: inches times dpi, rounded.
    pub fn pixel_size(&self) -> VizResult<(u16, u16)> {
        let to_px = |inches: f64| -> VizResult<u16> {
            let px = (inches * f64::from(self.dpi)).round();
            if !(1.0..=f64::from(u16::MAX)).contains(&px) {
                return Err(VizError::config(format!(
                    "raster dimension {px}px is outside 1..={}",
                    u16::MAX
                )));
            }
            Ok(px as u16)
        };
        Ok((to_px(self.figure_size.0)?, to_px(self.figure_size.1)?))
    }

    /// Pixels per typographic point (1/72 inch).
    pub fn px_per_pt(&self) -> f64 {
        f64::from(self.dpi) / 72.0
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum MatrixSpec {
    /// Successive arrays are columns.
    Columns(Vec<Vec<f64>>),
    Rows(Vec<Vec<f64>>),
}

impl MatrixSpec {
    pub fn build(&self) -> VizResult<TransformMatrix> {
        match self {
            Self::Columns(cols) => TransformMatrix::from_columns(cols.clone()),
            Self::Rows(rows) => TransformMatrix::from_rows(rows.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum DataSpec {
    Grid { x: Linspace, y: Linspace },
    Points { x: Vec<f64>, y: Vec<f64> },
}

impl DataSpec {
    pub fn build(&self) -> VizResult<PointSet> {
        match self {
            Self::Grid { x, y } => PointSet::grid(*x, *y),
            Self::Points { x, y } => PointSet::from_xy(x.clone(), y.clone()),
        }
    }
}

/// Everything needed to reproduce one visualization, as read from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneSpec {
    pub transform: MatrixSpec,
    pub data: DataSpec,
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default)]
    pub render: RenderConfig,
}

fn default_steps() -> u32 {
    DEFAULT_STEPS
}

impl SceneSpec {
    /// Horizontal shear of a 9x7 grid over `[-4, 4] x [-3, 3]` in 30 steps.
    pub fn reference() -> Self {
        Self {
            transform: MatrixSpec::Columns(vec![vec![1.0, 0.0], vec![1.0, 1.0]]),
            data: DataSpec::Grid {
                x: Linspace::new(-4.0, 4.0, 9),
                y: Linspace::new(-3.0, 3.0, 7),
            },
            steps: DEFAULT_STEPS,
            render: RenderConfig::default(),
        }
    }

    pub fn read_json(path: &Path) -> VizResult<Self> {
        let f = std::fs::File::open(path)
            .map_err(|e| VizError::io_at(format!("open scene '{}'", path.display()), e))?;
        serde_json::from_reader(std::io::BufReader::new(f)).map_err(|e| {
            VizError::config(format!("parse scene JSON '{}': {e}", path.display()))
        })
    }

    pub fn write_json(&self, path: &Path) -> VizResult<()> {
        crate::workdir::ensure_parent_dir(path)?;
        let f = std::fs::File::create(path)
            .map_err(|e| VizError::io_at(format!("create scene '{}'", path.display()), e))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(f), self)
            .map_err(|e| VizError::io(format!("write scene '{}': {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_render_config_is_4in_at_150dpi() {
        let cfg = RenderConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.pixel_size().unwrap(), (600, 600));
        assert!(cfg.work_dir.ends_with(DEFAULT_WORK_DIR_NAME));
    }

    #[test]
    fn validation_catches_bad_values() {
        let bad = [
            RenderConfig {
                figure_size: (0.0, 4.0),
                ..RenderConfig::default()
            },
            RenderConfig {
                figure_size: (f64::NAN, 4.0),
                ..RenderConfig::default()
            },
            RenderConfig {
                dpi: 0,
                ..RenderConfig::default()
            },
            RenderConfig {
                dpi: 20_000,
                ..RenderConfig::default()
            },
            RenderConfig {
                frame_delay_ms: 0,
                ..RenderConfig::default()
            },
            RenderConfig {
                marker_size: -1.0,
                ..RenderConfig::default()
            },
        ];
        for cfg in bad {
            assert!(
                matches!(cfg.validate(), Err(VizError::Config(_))),
                "{cfg:?}"
            );
        }
    }

    #[test]
    fn reference_scene_builds_shear_and_grid() {
        let scene = SceneSpec::reference();
        let m = scene.transform.build().unwrap();
        assert_eq!(m.rows(), vec![vec![1.0, 1.0], vec![0.0, 1.0]]);
        let data = scene.data.build().unwrap();
        assert_eq!(data.len(), 63);
        assert_eq!(scene.steps, 30);
    }

    #[test]
    fn scene_json_defaults_and_tags() {
        let json = r#"{
            "transform": {"rows": [[0.0, -1.0], [1.0, 0.0]]},
            "data": {"points": {"x": [1.0, 2.0], "y": [0.0, 0.5]}},
            "render": {"dpi": 40}
        }"#;
        let scene: SceneSpec = serde_json::from_str(json).unwrap();
        assert_eq!(scene.steps, DEFAULT_STEPS);
        assert_eq!(scene.render.dpi, 40);
        assert_eq!(scene.render.figure_size, (4.0, 4.0));
        assert_eq!(scene.data.build().unwrap().len(), 2);
    }

    #[test]
    fn scene_json_rejects_unknown_fields() {
        let json = r#"{
            "transform": {"rows": [[1.0, 0.0], [0.0, 1.0]]},
            "data": {"points": {"x": [], "y": []}},
            "colour": "red"
        }"#;
        assert!(serde_json::from_str::<SceneSpec>(json).is_err());
    }
}
