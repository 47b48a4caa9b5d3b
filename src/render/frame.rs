use kurbo::Shape as _;
use vello_cpu::kurbo::{Affine, BezPath, Point, Rect, Stroke};
use vello_cpu::peniko::Color;

use crate::config::{RaceConfig, Theme};
use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::{ClashError, ClashResult};
use crate::render::assets::{LogoPaint, RaceAssets};
use crate::render::canvas::{FrameCanvas, FrameRGBA, rgba_premul_to_image};
use crate::render::layout::{
    self, AxisScale, GRAPH, GraphMapper, PixelPoint, smooth_position, vertical_gradient_rgba8,
};
use crate::render::text::{FontHandle, TextLayoutEngine, draw_layout};
use crate::series::{EntitySeries, SeriesSet};

/// Draws one complete frame per animation step.
///
/// Implementations must fully redraw on every call: the result depends only on `step`.
pub trait StepRenderer {
    /// Frame dimensions.
    fn canvas(&self) -> Canvas;
    /// Render the frame showing series index `step`.
    fn render_step(&mut self, step: usize) -> ClashResult<FrameRGBA>;
}

struct EntityStyle {
    name: String,
    color: Rgb8,
    logo: LogoPaint,
}

/// The race chart renderer.
pub struct FrameRenderer {
    canvas: FrameCanvas,
    text: TextLayoutEngine,
    scene: Scene,
}

struct Scene {
    title: String,
    units_caption: String,
    theme: Theme,
    series: SeriesSet,
    styles: Vec<EntityStyle>,
    mapper: GraphMapper,
    background: vello_cpu::Image,
    body_font: FontHandle,
    title_font: FontHandle,
    // Reused across frames.
    points: Vec<PixelPoint>,
}

impl FrameRenderer {
    /// Prepare a renderer for `series`, which must follow `cfg`'s entity order.
    pub fn new(cfg: &RaceConfig, series: SeriesSet, assets: RaceAssets) -> ClashResult<Self> {
        let frame = layout::FRAME;
        let axis = AxisScale::from_series(&series)?;
        let mapper = GraphMapper::new(GRAPH, cfg.years, axis)?;

        if series.entities().len() != cfg.entities.len() {
            return Err(ClashError::validation(
                "series and config disagree on entity count",
            ));
        }
        let mut styles = Vec::with_capacity(cfg.entities.len());
        for (e, s) in cfg.entities.iter().zip(series.entities()) {
            if e.name != s.name {
                return Err(ClashError::validation(format!(
                    "series order mismatch: expected '{}', got '{}'",
                    e.name, s.name
                )));
            }
            styles.push(EntityStyle {
                name: e.name.clone(),
                color: e.color,
                logo: assets.logo_for(&e.name)?.clone(),
            });
        }

        let bg = vertical_gradient_rgba8(
            cfg.theme.gradient_start,
            cfg.theme.gradient_end,
            frame.width,
            frame.height,
        );
        let background = rgba_premul_to_image(&bg, frame.width, frame.height)?;

        let RaceAssets {
            text,
            body_font,
            title_font,
            ..
        } = assets;

        tracing::debug!(
            axis_max = axis.axis_max,
            entities = styles.len(),
            "frame renderer ready"
        );

        Ok(Self {
            canvas: FrameCanvas::new(frame)?,
            text,
            scene: Scene {
                title: cfg.title.clone(),
                units_caption: cfg.units_caption.clone(),
                theme: cfg.theme,
                series,
                styles,
                mapper,
                background,
                body_font,
                title_font,
                points: Vec::new(),
            },
        })
    }

    /// Shared vertical scale, identical for every frame.
    pub fn axis(&self) -> AxisScale {
        self.scene.mapper.axis()
    }
}

impl StepRenderer for FrameRenderer {
    fn canvas(&self) -> Canvas {
        self.canvas.canvas()
    }

    fn render_step(&mut self, step: usize) -> ClashResult<FrameRGBA> {
        let frame = self.canvas.canvas();
        let ctx = self.canvas.begin();
        self.scene.draw(ctx, &mut self.text, frame, step)?;
        Ok(self.canvas.finish())
    }
}

impl Scene {
    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &mut TextLayoutEngine,
        frame: Canvas,
        step: usize,
    ) -> ClashResult<()> {
        let step = step.min(self.series.main().len().saturating_sub(1));

        self.draw_background(ctx, frame);
        self.draw_title(ctx, text, frame)?;
        self.draw_legend(ctx, text)?;
        self.draw_grid(ctx);
        for i in 0..self.styles.len() {
            self.draw_entity(ctx, text, i, step)?;
        }
        self.draw_axis_labels(ctx, text)?;
        self.draw_year(ctx, text, step)?;
        Ok(())
    }

    fn draw_background(&self, ctx: &mut vello_cpu::RenderContext, frame: Canvas) {
        ctx.set_transform(Affine::IDENTITY);
        ctx.set_paint_transform(Affine::IDENTITY);
        ctx.set_paint(self.background.clone());
        ctx.fill_rect(&Rect::new(
            0.0,
            0.0,
            f64::from(frame.width),
            f64::from(frame.height),
        ));
    }

    fn draw_title(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        text: &mut TextLayoutEngine,
        frame: Canvas,
    ) -> ClashResult<()> {
        let title = text.layout_line(
            &self.title,
            &self.title_font,
            layout::TITLE_TEXT_PX,
            Rgb8::BLACK,
        )?;
        let x = f64::from(frame.width / 2) - f64::from(title.width() / 2.0).floor();
        draw_layout(ctx, &title, &self.title_font, x, f64::from(layout::TITLE_Y));
        Ok(())
    }

    fn draw_legend(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        text: &mut TextLayoutEngine,
    ) -> ClashResult<()> {
        let (x, mut y) = layout::LEGEND_ORIGIN;
        for style in &self.styles {
            draw_logo(ctx, &style.logo, x, y);
            let name = text.layout_line(
                &style.name,
                &self.body_font,
                layout::BODY_TEXT_PX,
                style.color,
            )?;
            let (dx, dy) = layout::LEGEND_TEXT_OFFSET;
            draw_layout(
                ctx,
                &name,
                &self.body_font,
                f64::from(x + dx),
                f64::from(y + dy),
            );
            y += layout::LEGEND_PITCH;
        }
        Ok(())
    }

    fn draw_grid(&self, ctx: &mut vello_cpu::RenderContext) {
        let panel = self.mapper.panel();
        let (top, bottom) = (f64::from(panel.top), f64::from(panel.bottom()));
        let (left, right) = (f64::from(panel.left), f64::from(panel.right()));

        let mut grid = BezPath::new();
        for x in panel.vertical_lines() {
            let x = crisp(x, layout::GRID_LINE_WIDTH);
            grid.move_to(Point::new(x, top));
            grid.line_to(Point::new(x, bottom));
        }
        for y in panel.horizontal_lines() {
            let y = crisp(y, layout::GRID_LINE_WIDTH);
            grid.move_to(Point::new(left, y));
            grid.line_to(Point::new(right, y));
        }
        ctx.set_transform(Affine::IDENTITY);
        ctx.set_stroke(Stroke::new(layout::GRID_LINE_WIDTH));
        ctx.set_paint(color(layout::GRID_LINE));
        ctx.stroke_path(&grid);

        // Border sits inside the panel rectangle.
        let inset = layout::BORDER_WIDTH / 2.0;
        let border = Rect::new(left + inset, top + inset, right - inset, bottom - inset);
        ctx.set_stroke(Stroke::new(layout::BORDER_WIDTH));
        ctx.set_paint(color(self.theme.grid));
        ctx.stroke_path(&border.to_path(0.1));
    }

    fn draw_entity(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &mut TextLayoutEngine,
        index: usize,
        step: usize,
    ) -> ClashResult<()> {
        let series: &EntitySeries = &self.series.entities()[index];
        let style = &self.styles[index];

        self.points.clear();
        self.points.extend(
            (0..=step).map(|i| self.mapper.to_pixel(series.year_at(i), series.value_at(i))),
        );

        if self.points.len() > 1 {
            let mut curve = BezPath::new();
            for (k, &(x, y)) in self.points.iter().enumerate() {
                let p = Point::new(f64::from(x), f64::from(y));
                if k == 0 {
                    curve.move_to(p);
                } else {
                    curve.line_to(p);
                }
            }
            ctx.set_transform(Affine::IDENTITY);
            ctx.set_stroke(Stroke::new(layout::CURVE_WIDTH));
            ctx.set_paint(color(style.color));
            ctx.stroke_path(&curve);
        }

        let Some((sx, sy)) = smooth_position(&self.points, layout::SMOOTH_WINDOW) else {
            return Ok(());
        };
        let (lx, ly) = layout::MARKER_LOGO_OFFSET;
        draw_logo(ctx, &style.logo, sx + lx, sy + ly);

        let value = text.layout_line(
            &format!("{}", series.value_at(step) as i64),
            &self.body_font,
            layout::BODY_TEXT_PX,
            style.color,
        )?;
        let (vx, vy) = layout::MARKER_VALUE_OFFSET;
        draw_layout(
            ctx,
            &value,
            &self.body_font,
            f64::from(sx + vx),
            f64::from(sy + vy),
        );
        Ok(())
    }

    fn draw_axis_labels(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        text: &mut TextLayoutEngine,
    ) -> ClashResult<()> {
        let panel = self.mapper.panel();
        let label_color = self.theme.grid_labels;

        for (x, year) in self.mapper.x_ticks() {
            let label = text.layout_line(
                &year.to_string(),
                &self.body_font,
                layout::LABEL_TEXT_PX,
                label_color,
            )?;
            draw_layout(
                ctx,
                &label,
                &self.body_font,
                f64::from(x - 20),
                f64::from(panel.bottom() + 10),
            );
        }

        for (y, value) in self.mapper.y_ticks() {
            let label = text.layout_line(
                &value.to_string(),
                &self.body_font,
                layout::LABEL_TEXT_PX,
                label_color,
            )?;
            draw_layout(
                ctx,
                &label,
                &self.body_font,
                f64::from(panel.left - 80),
                f64::from(y - 10),
            );
        }

        let caption = text.layout_line(
            &self.units_caption,
            &self.body_font,
            layout::LABEL_TEXT_PX,
            label_color,
        )?;
        draw_layout(
            ctx,
            &caption,
            &self.body_font,
            f64::from(panel.left - 80),
            f64::from(panel.top - 50),
        );
        Ok(())
    }

    fn draw_year(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        text: &mut TextLayoutEngine,
        step: usize,
    ) -> ClashResult<()> {
        let year = self.series.main().year_at(step) as i64;
        let label = text.layout_line(
            &year.to_string(),
            &self.body_font,
            layout::YEAR_TEXT_PX,
            self.theme.year,
        )?;
        let (x, y) = layout::YEAR_POS;
        draw_layout(ctx, &label, &self.body_font, f64::from(x), f64::from(y));
        Ok(())
    }
}

fn draw_logo(ctx: &mut vello_cpu::RenderContext, logo: &LogoPaint, x: i32, y: i32) {
    ctx.set_transform(Affine::translate((f64::from(x), f64::from(y))));
    ctx.set_paint_transform(Affine::IDENTITY);
    ctx.set_paint(logo.paint.clone());
    ctx.fill_rect(&Rect::new(0.0, 0.0, f64::from(logo.w), f64::from(logo.h)));
    ctx.set_transform(Affine::IDENTITY);
}

fn color(c: Rgb8) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, 255)
}

/// Center an odd-width line on its pixel so it covers whole pixels.
fn crisp(v: i32, width: f64) -> f64 {
    if (width as i64) % 2 == 1 {
        f64::from(v) + 0.5
    } else {
        f64::from(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
