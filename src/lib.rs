//! Animated visualization of a 2-D linear transform.
//!
//! A [`LinearTransformVisualizer`] interpolates from the identity map to a target
//! [`TransformMatrix`], colors every point once from its original coordinates, rasterizes each
//! step on the CPU and assembles the frames into a looping GIF.
#![forbid(unsafe_code)]

pub mod color;
pub mod config;
pub mod encode_gif;
pub mod error;
pub mod interpolate;
pub mod matrix;
pub mod plot;
pub mod render;
pub mod render_cpu;
pub mod visualizer;
pub mod workdir;

pub use color::{ColorAssignment, Colorizer, DefaultColorizer, Rgb};
pub use config::{DataSpec, MatrixSpec, RenderConfig, SceneSpec};
pub use encode_gif::{AnimationFormat, read_gif_frames};
pub use error::{VizError, VizResult};
pub use interpolate::interpolate;
pub use matrix::{Linspace, PointSet, TransformMatrix};
pub use plot::{AxisBounds, PlotLayout};
pub use render::{RenderStats, render_animation};
pub use render_cpu::{FrameRGB, PlotSurface};
pub use visualizer::LinearTransformVisualizer;
