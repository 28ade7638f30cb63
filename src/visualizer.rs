use std::path::Path;

use crate::{
    color::{ColorAssignment, Colorizer, DefaultColorizer},
    config::{DEFAULT_STEPS, RenderConfig, SceneSpec},
    error::{VizError, VizResult},
    interpolate::interpolate,
    matrix::{PointSet, TransformMatrix},
    plot::AxisBounds,
    render::{RenderStats, render_animation},
    render_cpu::{FrameRGB, PlotSurface},
};

/// Animates `data` moving from the identity map to `transform`.
pub struct LinearTransformVisualizer {
    transform: TransformMatrix,
    colorizer: Box<dyn Colorizer>,
    data: PointSet,
    steps: u32,
}

impl std::fmt::Debug for LinearTransformVisualizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearTransformVisualizer")
            .field("transform", &self.transform)
            .field("points", &self.data.len())
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

impl LinearTransformVisualizer {
    pub fn new(transform: TransformMatrix, data: PointSet) -> VizResult<Self> {
        if transform.order() != data.dims() {
            return Err(VizError::config(format!(
                "dimension mismatch: {0}x{0} transform, {1}-D data",
                transform.order(),
                data.dims()
            )));
        }
        Ok(Self {
            transform,
            colorizer: Box::new(DefaultColorizer),
            data,
            steps: DEFAULT_STEPS,
        })
    }

    pub fn from_scene(scene: &SceneSpec) -> VizResult<Self> {
        Self::new(scene.transform.build()?, scene.data.build()?)?.with_steps(scene.steps)
    }

    pub fn with_colorizer(mut self, colorizer: impl Colorizer + 'static) -> Self {
        self.colorizer = Box::new(colorizer);
        self
    }

    pub fn with_steps(mut self, steps: u32) -> VizResult<Self> {
        if steps == 0 {
            return Err(VizError::config("steps must be >= 1"));
        }
        self.steps = steps;
        Ok(self)
    }

    pub fn transform(&self) -> &TransformMatrix {
        &self.transform
    }

    pub fn data(&self) -> &PointSet {
        &self.data
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// The `steps + 1` intermediate point sets, identity first.
    pub fn stepwise_transform(&self) -> VizResult<Vec<PointSet>> {
        interpolate(&self.transform, &self.data, self.steps)
    }

    /// Colors of the untransformed points; the same assignment is used for every frame.
    pub fn colors(&self) -> ColorAssignment {
        ColorAssignment::compute(&self.data, self.colorizer.as_ref())
    }

    /// Render the animation with the default figure (4x4 in at 150 dpi).
    pub fn visualize(&self, out_path: impl AsRef<Path>) -> VizResult<()> {
        self.visualize_with(out_path, &RenderConfig::default())
            .map(|_| ())
    }

    #[tracing::instrument(
        skip(self, out_path, cfg),
        fields(steps = self.steps, points = self.data.len())
    )]
    pub fn visualize_with(
        &self,
        out_path: impl AsRef<Path>,
        cfg: &RenderConfig,
    ) -> VizResult<RenderStats> {
        let frames = self.stepwise_transform()?;
        let colors = self.colors();
        render_animation(&frames, &colors, out_path.as_ref(), cfg)
    }

    /// Rasterize a single step, using the same axis scale as the full animation.
    pub fn render_frame(&self, step: u32, cfg: &RenderConfig) -> VizResult<FrameRGB> {
        if step > self.steps {
            return Err(VizError::config(format!(
                "step {step} is past the last step {}",
                self.steps
            )));
        }
        let frames = self.stepwise_transform()?;
        let mut surface = PlotSurface::acquire(cfg, AxisBounds::from_frames(&frames))?;
        surface.draw(&frames[step as usize], &self.colors())
    }
}
