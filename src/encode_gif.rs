use std::path::{Path, PathBuf};

use image::{
    AnimationDecoder as _, Delay, Frame, RgbaImage,
    codecs::gif::{GifDecoder, GifEncoder, Repeat},
};

use crate::{
    error::{VizError, VizResult},
    workdir::ensure_parent_dir,
};

/// NeuQuant sampling factor: 1 is slowest/best, 30 fastest.
const GIF_QUANT_SPEED: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationFormat {
    Gif,
}

impl AnimationFormat {
    /// Container for `path`, picked from its extension.
    pub fn from_path(path: &Path) -> VizResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("gif") => Ok(Self::Gif),
            Some(other) => Err(VizError::encode(format!(
                "unsupported animation format '.{other}' for '{}' (supported: .gif)",
                path.display()
            ))),
            None => Err(VizError::encode(format!(
                "output '{}' has no extension to pick an animation format from",
                path.display()
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub format: AnimationFormat,
    pub frame_delay_ms: u32,
    pub out_path: PathBuf,
}

impl EncodeConfig {
    pub fn for_path(out_path: impl Into<PathBuf>, frame_delay_ms: u32) -> VizResult<Self> {
        let out_path = out_path.into();
        Ok(Self {
            format: AnimationFormat::from_path(&out_path)?,
            frame_delay_ms,
            out_path,
        })
    }
}

/// Read `frame_files` in the given order and write them to `cfg.out_path` as one looping
/// animation.
///
/// Nothing is written unless every frame decodes and the whole animation encodes.
pub fn assemble_animation(frame_files: &[PathBuf], cfg: &EncodeConfig) -> VizResult<()> {
    if frame_files.is_empty() {
        return Err(VizError::encode("cannot assemble an animation from zero frames"));
    }
    if cfg.frame_delay_ms == 0 {
        return Err(VizError::encode("frame delay must be >= 1 ms"));
    }

    let delay = Delay::from_numer_denom_ms(cfg.frame_delay_ms, 1);
    let mut size = None;
    let mut frames = Vec::with_capacity(frame_files.len());
    for path in frame_files {
        let img = image::open(path)
            .map_err(|e| VizError::encode(format!("read frame '{}': {e}", path.display())))?
            .to_rgba8();
        let dims = img.dimensions();
        match size {
            None => size = Some(dims),
            Some(expected) if expected != dims => {
                return Err(VizError::encode(format!(
                    "frame '{}' is {}x{}, expected {}x{}",
                    path.display(),
                    dims.0,
                    dims.1,
                    expected.0,
                    expected.1
                )));
            }
            Some(_) => {}
        }
        frames.push(Frame::from_parts(img, 0, 0, delay));
    }

    let bytes = match cfg.format {
        AnimationFormat::Gif => encode_gif(frames)?,
    };

    ensure_parent_dir(&cfg.out_path)?;
    std::fs::write(&cfg.out_path, bytes).map_err(|e| {
        VizError::io_at(format!("write animation '{}'", cfg.out_path.display()), e)
    })
}

fn encode_gif(frames: Vec<Frame>) -> VizResult<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut enc = GifEncoder::new_with_speed(&mut bytes, GIF_QUANT_SPEED);
        enc.set_repeat(Repeat::Infinite)
            .map_err(|e| VizError::encode(format!("gif repeat: {e}")))?;
        enc.encode_frames(frames)
            .map_err(|e| VizError::encode(format!("gif encode: {e}")))?;
    }
    Ok(bytes)
}

/// Decode every frame of a GIF file, in order.
pub fn read_gif_frames(path: &Path) -> VizResult<Vec<RgbaImage>> {
    let f = std::fs::File::open(path)
        .map_err(|e| VizError::io_at(format!("open '{}'", path.display()), e))?;
    let decoder = GifDecoder::new(std::io::BufReader::new(f))
        .map_err(|e| VizError::encode(format!("decode '{}': {e}", path.display())))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| VizError::encode(format!("decode '{}': {e}", path.display())))?;
    Ok(frames.into_iter().map(Frame::into_buffer).collect())
}
