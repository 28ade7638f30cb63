use std::path::{Path, PathBuf};

use crate::error::{VizError, VizResult};

const FRAME_PREFIX: &str = "frame-";
const FRAME_SUFFIX: &str = ".png";

pub fn ensure_parent_dir(path: &Path) -> VizResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            VizError::io_at(
                format!("create output directory '{}'", parent.display()),
                e,
            )
        })?;
    }
    Ok(())
}

/// `frame-<k>.png` with `k = index + 1`, zero-padded to the digit count of `total` so lexical
/// order matches frame order.
pub fn frame_file_name(index: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("{FRAME_PREFIX}{:0width$}{FRAME_SUFFIX}", index + 1)
}

/// Whether `name` has the shape [`frame_file_name`] produces, for any frame count.
pub fn is_frame_file_name(name: &str) -> bool {
    name.strip_prefix(FRAME_PREFIX)
        .and_then(|rest| rest.strip_suffix(FRAME_SUFFIX))
        .is_some_and(|k| !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()))
}

/// Scratch directory for per-frame images.
///
/// The directory and everything in it is removed when the guard drops, whether the run that
/// owns it succeeded or not. An existing directory is only taken over when it holds nothing but
/// frame images left behind by an earlier run; those are deleted up front.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    pub fn create(path: impl Into<PathBuf>) -> VizResult<Self> {
        let path = path.into();
        match std::fs::read_dir(&path) {
            Ok(entries) => clear_stale_frames(&path, entries)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                std::fs::create_dir_all(&path).map_err(|e| {
                    VizError::io_at(format!("create work dir '{}'", path.display()), e)
                })?;
            }
            Err(e) => {
                return Err(VizError::io_at(
                    format!("open work dir '{}'", path.display()),
                    e,
                ));
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frame_path(&self, index: usize, total: usize) -> PathBuf {
        self.path.join(frame_file_name(index, total))
    }
}

fn clear_stale_frames(dir: &Path, entries: std::fs::ReadDir) -> VizResult<()> {
    let list_err = |e| VizError::io_at(format!("list work dir '{}'", dir.display()), e);
    let mut stale = Vec::new();
    for entry in entries {
        let entry = entry.map_err(list_err)?;
        let is_file = entry.file_type().map_err(list_err)?.is_file();
        let name = entry.file_name();
        if !is_file || !name.to_str().is_some_and(is_frame_file_name) {
            return Err(VizError::config(format!(
                "work dir '{}' already holds '{}'; refusing to use a directory with foreign \
                 contents",
                dir.display(),
                name.to_string_lossy()
            )));
        }
        stale.push(entry.path());
    }
    for path in &stale {
        std::fs::remove_file(path).map_err(|e| {
            VizError::io_at(format!("remove stale frame '{}'", path.display()), e)
        })?;
    }
    if !stale.is_empty() {
        tracing::debug!(dir = %dir.display(), count = stale.len(), "removed stale frame images");
    }
    Ok(())
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!(dir = %self.path.display(), "removed work dir"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(dir = %self.path.display(), error = %e, "failed to remove work dir")
            }
        }
    }
}
