use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::render::test_support::test_font_bytes;
use crate::series::interpolate;

fn assets_for(cfg: &RaceConfig) -> Option<RaceAssets> {
    let Some(font) = test_font_bytes() else {
        eprintln!("skipping: no test font found");
        return None;
    };
    let logos = cfg
        .entities
        .iter()
        .map(|e| {
            let img = image::RgbaImage::from_pixel(
                8,
                8,
                image::Rgba([e.color.r, e.color.g, e.color.b, 255]),
            );
            (e.name.clone(), image::DynamicImage::ImageRgba8(img))
        })
        .collect();
    Some(RaceAssets::from_images(logos, font, None).unwrap())
}

fn renderer() -> Option<(RaceConfig, FrameRenderer)> {
    let cfg = RaceConfig::market_clash();
    let assets = assets_for(&cfg)?;
    let series = interpolate(&cfg, &mut StdRng::seed_from_u64(5)).unwrap();
    let r = FrameRenderer::new(&cfg, series, assets).unwrap();
    Some((cfg, r))
}

#[test]
fn frame_has_output_dimensions() {
    let Some((_, mut r)) = renderer() else { return };
    let frame = r.render_step(0).unwrap();
    assert_eq!((frame.width, frame.height), (1080, 1920));
    assert_eq!(frame.data.len(), 1080 * 1920 * 4);
    assert!(frame.premultiplied);
    assert_eq!(r.canvas(), layout::FRAME);
}

#[test]
fn rendering_is_deterministic_per_step() {
    let Some((_, mut r)) = renderer() else { return };
    let a = r.render_step(300).unwrap();
    let _ = r.render_step(10).unwrap();
    let b = r.render_step(300).unwrap();
    assert_eq!(a, b);
}

#[test]
fn later_steps_draw_more_curve() {
    let Some((_, mut r)) = renderer() else { return };
    let early = r.render_step(5).unwrap();
    let late = r.render_step(700).unwrap();
    assert_ne!(early, late);
}

#[test]
fn background_follows_theme_gradient() {
    let Some((cfg, mut r)) = renderer() else { return };
    let frame = r.render_step(0).unwrap();
    // Right margin, clear of the title, legend and panel.
    let top = frame.pixel(1075, 2).unwrap();
    let bottom = frame.pixel(1075, 1915).unwrap();
    let start = cfg.theme.gradient_start;
    let end = cfg.theme.gradient_end;
    assert_eq!(top, [start.r, start.g, start.b, 255]);
    assert!(bottom[0].abs_diff(end.r) <= 1);
}

#[test]
fn grid_lines_are_drawn_inside_panel() {
    let Some((_, mut r)) = renderer() else { return };
    let frame = r.render_step(0).unwrap();
    // Vertical grid line at x=500, midway between horizontal lines, above any curve at step 0.
    let on_line = frame.pixel(500, 450).unwrap();
    let off_line = frame.pixel(550, 450).unwrap();
    assert!(on_line[0] < off_line[0], "{on_line:?} vs {off_line:?}");
}

#[test]
fn axis_scale_is_fixed_for_run() {
    let Some((_, mut r)) = renderer() else { return };
    let before = r.axis();
    let _ = r.render_step(100).unwrap();
    assert_eq!(before, r.axis());
    assert!(before.axis_max > 3000.0);
}

#[test]
fn step_past_end_is_clamped() {
    let Some((_, mut r)) = renderer() else { return };
    let last = r.render_step(749).unwrap();
    let past = r.render_step(10_000).unwrap();
    assert_eq!(last, past);
}

#[test]
fn renderer_rejects_reordered_series() {
    let cfg = RaceConfig::market_clash();
    let Some(assets) = assets_for(&cfg) else { return };
    let mut reversed = cfg.clone();
    reversed.entities.reverse();
    let series = interpolate(&reversed, &mut StdRng::seed_from_u64(1)).unwrap();
    assert!(FrameRenderer::new(&cfg, series, assets).is_err());
}

fn ink_bounds(
    frame: &FrameRGBA,
    xs: std::ops::Range<u32>,
    ys: std::ops::Range<u32>,
    is_ink: impl Fn([u8; 4]) -> bool,
) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in ys {
        for x in xs.clone() {
            if !frame.pixel(x, y).is_some_and(&is_ink) {
                continue;
            }
            let b = bounds.get_or_insert((x, y, x, y));
            b.0 = b.0.min(x);
            b.1 = b.1.min(y);
            b.2 = b.2.max(x);
            b.3 = b.3.max(y);
        }
    }
    bounds
}

#[test]
fn title_is_laid_out_below_its_anchor() {
    let Some((_, mut r)) = renderer() else { return };
    let frame = r.render_step(400).unwrap();
    let (x0, y0, x1, y1) = ink_bounds(&frame, 0..1080, 0..200, |p| {
        p[0] < 40 && p[1] < 40 && p[2] < 40
    })
    .expect("title ink");
    assert!(y0 >= layout::TITLE_Y as u32, "title starts at row {y0}");
    assert!(y1 > y0 + 30, "title rows {y0}..{y1}");
    assert!(x1 - x0 > 300, "title spans {x0}..{x1}");
}

#[test]
fn year_label_sits_below_its_anchor() {
    let Some((cfg, mut r)) = renderer() else { return };
    let frame = r.render_step(400).unwrap();
    let year = cfg.theme.year;
    let (x, y) = layout::YEAR_POS;
    let (x0, y0, x1, y1) = ink_bounds(&frame, 800..1080, 150..390, |p| {
        p[..3] == [year.r, year.g, year.b]
    })
    .expect("year ink");
    assert!(y0 >= y as u32 && y1 <= y as u32 + 100, "year rows {y0}..{y1}");
    assert!(x0 >= x as u32 && x1 - x0 > 80, "year spans {x0}..{x1}");
}
