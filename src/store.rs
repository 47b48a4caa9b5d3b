//! Numbered PNG frames on disk.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ClashError, ClashResult};
use crate::foundation::math::flatten_premul_over_bg_to_opaque_rgba8;
use crate::render::canvas::FrameRGBA;

/// Glob pattern matched by [`FrameStore::cleanup`].
pub const FRAME_GLOB: &str = "frame_*.png";

/// File name of the frame at `index`.
pub fn frame_file_name(index: u64) -> String {
    format!("frame_{index:05}.png")
}

/// Write `frame` to `path` as an opaque RGBA PNG.
///
/// Premultiplied frames are flattened over black first.
pub fn write_frame_png(path: &Path, frame: &FrameRGBA) -> ClashResult<()> {
    let flattened;
    let pixels = if frame.premultiplied {
        let mut buf = vec![0u8; frame.data.len()];
        flatten_premul_over_bg_to_opaque_rgba8(&mut buf, &frame.data, [0, 0, 0, 255])?;
        flattened = buf;
        &flattened
    } else {
        &frame.data
    };

    image::save_buffer_with_format(
        path,
        pixels,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write frame '{}'", path.display()))?;
    Ok(())
}

/// Writes frames as `frame_NNNNN.png` and keeps the encode order.
///
/// The order may repeat a path (see [`FrameStore::hold_last`]); files themselves are written
/// once each, with strictly increasing indices.
#[derive(Debug)]
pub struct FrameStore {
    dir: PathBuf,
    frames: Vec<PathBuf>,
    written: u64,
}

impl FrameStore {
    /// Open a store in `dir`, creating it when absent.
    pub fn create(dir: impl Into<PathBuf>) -> ClashResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create frame directory '{}'", dir.display()))?;
        Ok(Self {
            dir,
            frames: Vec::new(),
            written: 0,
        })
    }

    /// Directory holding the frame files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `frame` as the next numbered PNG and append it to the order.
    pub fn persist(&mut self, frame: &FrameRGBA) -> ClashResult<PathBuf> {
        let path = self.dir.join(frame_file_name(self.written));
        write_frame_png(&path, frame)?;
        self.written += 1;
        self.frames.push(path.clone());
        Ok(path)
    }

    /// Repeat the last persisted frame `count` more times.
    pub fn hold_last(&mut self, count: u64) -> ClashResult<()> {
        let last = self
            .frames
            .last()
            .cloned()
            .ok_or_else(|| ClashError::validation("no frame persisted to hold"))?;
        let count = usize::try_from(count)
            .map_err(|_| ClashError::validation(format!("hold of {count} frames is too long")))?;
        self.frames.extend(std::iter::repeat_n(last, count));
        Ok(())
    }

    /// Frame paths in encode order.
    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }

    /// Length of the encode order, held copies included.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing has been persisted.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Distinct files written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Delete every `frame_*.png` in the directory and forget the order.
    ///
    /// Returns the number of files removed.
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn cleanup(&mut self) -> ClashResult<usize> {
        let dir = self
            .dir
            .to_str()
            .ok_or_else(|| ClashError::validation("frame directory is not valid UTF-8"))?;
        let pattern = Path::new(&glob::Pattern::escape(dir)).join(FRAME_GLOB);
        let pattern = pattern.to_string_lossy();
        let entries =
            glob::glob(&pattern).with_context(|| format!("bad frame glob '{pattern}'"))?;

        let mut removed = 0;
        for entry in entries {
            let path = entry.context("read frame directory entry")?;
            std::fs::remove_file(&path)
                .with_context(|| format!("remove frame '{}'", path.display()))?;
            removed += 1;
        }
        self.frames.clear();
        tracing::debug!(removed, "frames cleaned up");
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "../tests/unit/store/store.rs"]
mod tests;
