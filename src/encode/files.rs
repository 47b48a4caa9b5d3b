use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ClashError, ClashResult};
use crate::render::canvas::FrameRGBA;

/// Decode each PNG in `paths` and push it to `sink`, in order, as one video.
///
/// A path equal to its predecessor reuses the previous decode. Returns the number of frames
/// pushed.
#[tracing::instrument(skip(paths, sink), fields(frames = paths.len()))]
pub fn encode_frame_files(
    paths: &[PathBuf],
    canvas: Canvas,
    fps: Fps,
    sink: &mut dyn FrameSink,
) -> ClashResult<u64> {
    if paths.is_empty() {
        return Err(ClashError::encode("no frames to encode"));
    }

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
    })?;

    let mut current: Option<(&Path, FrameRGBA)> = None;
    let mut pushed = 0u64;
    for path in paths {
        let reuse = matches!(&current, Some((prev, _)) if *prev == path.as_path());
        if !reuse {
            let frame = decode_frame(path, canvas)?;
            current = Some((path.as_path(), frame));
        }
        let Some((_, frame)) = current.as_ref() else {
            return Err(ClashError::encode("frame decode produced nothing"));
        };
        sink.push_frame(FrameIndex(pushed), frame)?;
        pushed += 1;
    }

    sink.end()?;
    tracing::debug!(pushed, "frame files encoded");
    Ok(pushed)
}

fn decode_frame(path: &Path, canvas: Canvas) -> ClashResult<FrameRGBA> {
    let img = image::open(path)
        .with_context(|| format!("decode frame '{}'", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    if width != canvas.width || height != canvas.height {
        return Err(ClashError::encode(format!(
            "frame '{}' is {width}x{height}, expected {}x{}",
            path.display(),
            canvas.width,
            canvas.height
        )));
    }
    Ok(FrameRGBA {
        width,
        height,
        data: img.into_raw(),
        premultiplied: false,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/files.rs"]
mod tests;
