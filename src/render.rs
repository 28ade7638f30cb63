use std::path::Path;

use crate::{
    color::ColorAssignment,
    config::RenderConfig,
    encode_gif::{EncodeConfig, assemble_animation},
    error::{VizError, VizResult},
    matrix::PointSet,
    plot::AxisBounds,
    render_cpu::PlotSurface,
    workdir::{WorkDir, ensure_parent_dir},
};

/// Counters reported by a finished render.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderStats {
    pub frames_rendered: usize,
    pub width: u32,
    pub height: u32,
    pub axis_bound: f64,
}

/// Rasterize every frame with one shared axis scale, then assemble the images into the
/// animation at `out_path`.
///
/// Frame images live in `cfg.work_dir`, which is gone when this returns, on success or failure.
#[tracing::instrument(
    skip(frames, colors, cfg),
    fields(frames = frames.len(), out = %out_path.display())
)]
pub fn render_animation(
    frames: &[PointSet],
    colors: &ColorAssignment,
    out_path: &Path,
    cfg: &RenderConfig,
) -> VizResult<RenderStats> {
    cfg.validate()?;
    let encode_cfg = EncodeConfig::for_path(out_path, cfg.frame_delay_ms)?;
    if frames.is_empty() {
        return Err(VizError::encode("no frames to render"));
    }
    if let Some(bad) = frames.iter().find(|f| f.len() != colors.len()) {
        return Err(VizError::config(format!(
            "{} colors for a frame of {} points",
            colors.len(),
            bad.len()
        )));
    }
    ensure_parent_dir(out_path)?;

    let bounds = AxisBounds::from_frames(frames);
    let work = WorkDir::create(&cfg.work_dir)?;
    let mut surface = PlotSurface::acquire(cfg, bounds)?;
    let (width, height) = (
        u32::from(surface.layout().width),
        u32::from(surface.layout().height),
    );

    let mut files = Vec::with_capacity(frames.len());
    for (j, frame) in frames.iter().enumerate() {
        let raster = surface.draw(frame, colors)?;
        let path = work.frame_path(j, frames.len());
        raster.save_png(&path)?;
        tracing::debug!(frame = j, path = %path.display(), "rasterized frame");
        files.push(path);
    }
    drop(surface);

    assemble_animation(&files, &encode_cfg)?;

    tracing::info!(
        frames = frames.len(),
        width,
        height,
        out = %out_path.display(),
        "wrote animation"
    );
    Ok(RenderStats {
        frames_rendered: frames.len(),
        width,
        height,
        axis_bound: bounds.bound(),
    })
}
