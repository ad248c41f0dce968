// ============================================================================
// FRAMEBUFFER CANVAS
// ============================================================================

use image::RgbaImage;
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::assets::Assets;
use crate::colormap::Color;

/// Horizontal alignment of a text run relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

/// RGBA8 framebuffer borrowed from the pixel surface.
pub struct Canvas<'a> {
    pub frame: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let px = self.frame.get(idx..idx + 3)?;
        Some(Color::new(px[0], px[1], px[2]))
    }

    /// Alpha-blends `color` over the pixel at `(x, y)`.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        dst[0] = mix(color.r, dst[0]);
        dst[1] = mix(color.g, dst[1]);
        dst[2] = mix(color.b, dst[2]);
        dst[3] = 0xff;
    }

    /// Anti-aliased line with round caps.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, thickness: f32, color: Color) {
        let pad = thickness.ceil() as i32 + 1;
        let min_x = x0.min(x1).floor() as i32 - pad;
        let max_x = x0.max(x1).ceil() as i32 + pad;
        let min_y = y0.min(y1).floor() as i32 - pad;
        let max_y = y0.max(y1).ceil() as i32 + pad;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = (dx * dx + dy * dy).max(f32::EPSILON);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 - x0;
                let py = y as f32 - y0;
                let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
                let lx = x0 + t * dx;
                let ly = y0 + t * dy;
                let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend(x, y, color, aa);
                }
            }
        }
    }

    /// Horizontal dashed line.
    pub fn dashed_hline(&mut self, x0: f32, x1: f32, y: f32, dash: f32, thickness: f32, color: Color) {
        let mut x = x0;
        while x < x1 {
            let end = (x + dash).min(x1);
            self.line(x, y, end, y, thickness, color);
            x += dash * 2.0;
        }
    }

    /// Vertical span from `y0` to `y1` in column `x`, edges anti-aliased.
    pub fn vspan(&mut self, x: i32, y0: f32, y1: f32, color: Color, alpha: f32) {
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        let start = top.floor() as i32;
        let end = bottom.ceil() as i32;
        for y in start..end {
            let cover = ((y as f32 + 1.0).min(bottom) - (y as f32).max(top)).clamp(0.0, 1.0);
            if cover > 0.0 {
                self.blend(x, y, color, alpha * cover);
            }
        }
    }

    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let r = radius.ceil() as i32 + 1;
        let (bx, by) = (cx.round() as i32, cy.round() as i32);
        for y in by - r..=by + r {
            for x in bx - r..=bx + r {
                let dist = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
                let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if aa > 0.0 {
                    self.blend(x, y, color, aa);
                }
            }
        }
    }

    /// Draws `text` with its vertical center at `y`.
    pub fn text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        font: &Font,
        size: f32,
        color: Color,
        anchor: Anchor,
    ) {
        let scale = Scale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> =
            font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();
        let Some((min_x, max_x, min_y, max_y)) = glyph_bounds(&glyphs) else {
            return;
        };
        let width_px = max_x - min_x;
        let height_px = max_y - min_y;
        let offset_x = match anchor {
            Anchor::Left => x,
            Anchor::Center => x - width_px / 2,
            Anchor::Right => x - width_px,
        };
        let offset_y = y - height_px / 2;
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + gx as i32 + bb.min.x - min_x;
                    let py = offset_y + gy as i32 + bb.min.y - min_y;
                    self.blend(px, py, color, v);
                });
            }
        }
    }

    /// Copies an RGBA image with its own alpha, top-left at `(x, y)`.
    pub fn image(&mut self, x: i32, y: i32, image: &RgbaImage) {
        for (ix, iy, px) in image.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            if a > 0 {
                self.blend(x + ix as i32, y + iy as i32, Color::new(r, g, b), a as f32 / 255.0);
            }
        }
    }
}

fn glyph_bounds(glyphs: &[PositionedGlyph]) -> Option<(i32, i32, i32, i32)> {
    glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .fold(None, |acc, bb| {
            Some(match acc {
                None => (bb.min.x, bb.max.x, bb.min.y, bb.max.y),
                Some((min_x, max_x, min_y, max_y)) => (
                    min_x.min(bb.min.x),
                    max_x.max(bb.max.x),
                    min_y.min(bb.min.y),
                    max_y.max(bb.max.y),
                ),
            })
        })
}

// ============================================================================
// RETAINED MODE SCENE
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Line {
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        color: Color,
    },
    DashedLine {
        x0: f32,
        x1: f32,
        y: f32,
        dash: f32,
        color: Color,
    },
    Fill {
        x: i32,
        y0: f32,
        y1: f32,
        color: Color,
        alpha: f32,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: f32,
        color: Color,
        anchor: Anchor,
    },
    Icon {
        x: i32,
        y: i32,
        path: std::path::PathBuf,
    },
}

#[derive(Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn render(&self, canvas: &mut Canvas, assets: &Assets) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Line {
                    from,
                    to,
                    thickness,
                    color,
                } => canvas.line(from.0, from.1, to.0, to.1, *thickness, *color),
                DrawCommand::DashedLine {
                    x0,
                    x1,
                    y,
                    dash,
                    color,
                } => canvas.dashed_hline(*x0, *x1, *y, *dash, 1.0, *color),
                DrawCommand::Fill {
                    x,
                    y0,
                    y1,
                    color,
                    alpha,
                } => canvas.vspan(*x, *y0, *y1, *color, *alpha),
                DrawCommand::Circle {
                    cx,
                    cy,
                    radius,
                    color,
                } => canvas.circle(*cx, *cy, *radius, *color),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                    anchor,
                } => {
                    if let Some(font) = assets.font() {
                        canvas.text(*x, *y, text, font, *font_size, *color, *anchor);
                    }
                }
                DrawCommand::Icon { x, y, path } => {
                    if let Some(icon) = assets.icons.get(path) {
                        canvas.image(*x, *y, icon);
                    }
                }
            }
        }
    }
}
