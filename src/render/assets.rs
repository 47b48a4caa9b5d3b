use std::path::Path;

use anyhow::Context as _;

use crate::config::RaceConfig;
use crate::foundation::error::{ClashError, ClashResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::render::canvas::rgba_premul_to_image;
use crate::render::layout::LOGO_SIZE;
use crate::render::text::{FontHandle, TextLayoutEngine};

/// A logo scaled to [`LOGO_SIZE`] and ready to paint.
#[derive(Clone)]
pub(crate) struct LogoPaint {
    pub(crate) paint: vello_cpu::Image,
    pub(crate) w: u32,
    pub(crate) h: u32,
}

impl LogoPaint {
    /// Scale and premultiply a decoded image.
    pub(crate) fn from_image(img: &image::DynamicImage) -> ClashResult<Self> {
        let scaled = image::imageops::resize(
            &img.to_rgba8(),
            LOGO_SIZE,
            LOGO_SIZE,
            image::imageops::FilterType::Triangle,
        );
        let (w, h) = scaled.dimensions();
        let mut bytes = scaled.into_raw();
        premultiply_rgba8_in_place(&mut bytes);
        Ok(Self {
            paint: rgba_premul_to_image(&bytes, w, h)?,
            w,
            h,
        })
    }
}

/// File-backed inputs of a run: one logo per entity plus the body and title fonts.
///
/// All IO happens here, before the first frame is drawn.
pub struct RaceAssets {
    pub(crate) logos: Vec<(String, LogoPaint)>,
    pub(crate) text: TextLayoutEngine,
    pub(crate) body_font: FontHandle,
    pub(crate) title_font: FontHandle,
}

impl RaceAssets {
    /// Load every logo and font named by `cfg` from `cfg.paths.assets_dir`.
    #[tracing::instrument(skip(cfg), fields(assets_dir = %cfg.paths.assets_dir.display()))]
    pub fn load(cfg: &RaceConfig) -> ClashResult<Self> {
        let root = &cfg.paths.assets_dir;

        let mut logos = Vec::with_capacity(cfg.entities.len());
        for e in &cfg.entities {
            let bytes = read_asset(root, &e.image)?;
            let img = image::load_from_memory(&bytes)
                .with_context(|| format!("decode logo '{}' for '{}'", e.image, e.name))?;
            logos.push((e.name.clone(), LogoPaint::from_image(&img)?));
        }

        let body = read_asset(root, &cfg.fonts.body)?;
        let title = if cfg.fonts.title == cfg.fonts.body {
            None
        } else {
            Some(read_asset(root, &cfg.fonts.title)?)
        };

        tracing::debug!(logos = logos.len(), "loaded assets");
        Self::from_parts(logos, body, title)
    }

    /// Build from already-decoded logos and raw font bytes.
    ///
    /// When `title_font` is `None` the body font is used for the title.
    pub(crate) fn from_parts(
        logos: Vec<(String, LogoPaint)>,
        body_font: Vec<u8>,
        title_font: Option<Vec<u8>>,
    ) -> ClashResult<Self> {
        let mut text = TextLayoutEngine::new();
        let body_font = text.register_font(body_font)?;
        let title_font = match title_font {
            Some(bytes) => text.register_font(bytes)?,
            None => body_font.clone(),
        };
        tracing::debug!(
            body = body_font.family(),
            title = title_font.family(),
            "fonts registered"
        );
        Ok(Self {
            logos,
            text,
            body_font,
            title_font,
        })
    }

    /// Build from in-memory images keyed by entity name and raw font bytes.
    pub fn from_images(
        logos: Vec<(String, image::DynamicImage)>,
        body_font: Vec<u8>,
        title_font: Option<Vec<u8>>,
    ) -> ClashResult<Self> {
        let logos = logos
            .into_iter()
            .map(|(name, img)| Ok((name, LogoPaint::from_image(&img)?)))
            .collect::<ClashResult<Vec<_>>>()?;
        Self::from_parts(logos, body_font, title_font)
    }

    pub(crate) fn logo_for(&self, name: &str) -> ClashResult<&LogoPaint> {
        self.logos
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, l)| l)
            .ok_or_else(|| ClashError::render(format!("no logo loaded for entity '{name}'")))
    }
}

fn read_asset(root: &Path, rel: &str) -> ClashResult<Vec<u8>> {
    let path = root.join(rel);
    let bytes =
        std::fs::read(&path).with_context(|| format!("read asset '{}'", path.display()))?;
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/render/assets.rs"]
mod tests;
