//! Braille pixel canvas. Filled rectangles paint the paper, which becomes
//! the cell background; ellipses and circles are ink, which becomes braille
//! dots. Text is kept aside and stamped onto the cell grid afterwards.

use crate::terminal::{draw_text, Cell, CellBuffer};
use crossterm::style::Color;
use heliorama::{Canvas, Rgb};
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pixel {
    pub(crate) paper: Rgb,
    pub(crate) ink: Option<Rgb>,
}

#[derive(Clone, Debug, PartialEq)]
struct TextRun {
    col: u16,
    row: u16,
    text: String,
    color: Rgb,
}

pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
    text: Vec<TextRun>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
            text: Vec::new(),
        }
    }

    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn clear(&mut self) {
        self.px.fill(Pixel::default());
        self.text.clear();
    }

    fn pixel_mut(&mut self, x: i64, y: i64) -> Option<&mut Pixel> {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return None;
        }
        let i = self.idx(x as u32, y as u32);
        Some(&mut self.px[i])
    }

    fn plot(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(p) = self.pixel_mut(x, y) {
            p.ink = Some(color);
        }
    }

    /// Copies queued text onto `out`, over whatever braille is there.
    pub(crate) fn overlay_text(&self, out: &mut CellBuffer, enable_color: bool) {
        for run in &self.text {
            let fg = if enable_color {
                to_color(run.color)
            } else {
                Color::White
            };
            draw_text(out, run.col, run.row, &run.text, fg, None);
        }
    }
}

impl Canvas for PixelCanvas {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let x0 = x.floor().max(0.0) as i64;
        let y0 = y.floor().max(0.0) as i64;
        let x1 = (x + width).ceil().min(self.w as f32) as i64;
        let y1 = (y + height).ceil().min(self.h as f32) as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                if let Some(p) = self.pixel_mut(px, py) {
                    *p = Pixel { paper: color, ink: None };
                }
            }
        }
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Rgb) {
        // Glyphs sit on the cell row just above the baseline.
        let col = (x / 2.0).floor().max(0.0) as u16;
        let row = ((y - 1.0) / 4.0).floor().max(0.0) as u16;
        self.text.push(TextRun {
            col,
            row,
            text: text.to_string(),
            color,
        });
    }

    fn draw_ellipse(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let (rx, ry) = (width / 2.0, height / 2.0);
        let (cx, cy) = (x + rx, y + ry);
        if !(rx > 0.0 && ry > 0.0) {
            self.plot(cx.floor() as i64, cy.floor() as i64, color);
            return;
        }
        // About two samples per pixel of circumference.
        let steps = ((rx + ry) * TAU).ceil().max(16.0) as u32;
        for k in 0..steps {
            let a = TAU * k as f32 / steps as f32;
            let px = (cx + rx * a.cos()).floor() as i64;
            let py = (cy + ry * a.sin()).floor() as i64;
            self.plot(px, py, color);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        if !(radius > 0.0) {
            return;
        }
        let r2 = radius * radius;
        let mut any = false;
        for py in (cy - radius).floor() as i64..=(cy + radius).ceil() as i64 {
            for px in (cx - radius).floor() as i64..=(cx + radius).ceil() as i64 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.plot(px, py, color);
                    any = true;
                }
            }
        }
        if !any {
            self.plot(cx.floor() as i64, cy.floor() as i64, color);
        }
    }
}

pub(crate) fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/* -----------------------------
   Braille encoding: 2x4 pixels -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: u32, dy: u32) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

#[derive(Default)]
struct Average {
    r: u32,
    g: u32,
    b: u32,
    n: u32,
}

impl Average {
    fn add(&mut self, c: Rgb) {
        self.r += c.r as u32;
        self.g += c.g as u32;
        self.b += c.b as u32;
        self.n += 1;
    }

    fn get(&self) -> Option<Rgb> {
        (self.n > 0).then(|| {
            Rgb::new(
                (self.r / self.n) as u8,
                (self.g / self.n) as u8,
                (self.b / self.n) as u8,
            )
        })
    }
}

pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer, enable_color: bool) {
    for cy in 0..out.h as u32 {
        for cx in 0..out.w as u32 {
            let mut mask: u8 = 0;
            let mut ink = Average::default();
            let mut paper = Average::default();

            for dy in 0..4 {
                for dx in 0..2 {
                    let (x, y) = (cx * 2 + dx, cy * 4 + dy);
                    if x >= canvas.w || y >= canvas.h {
                        continue;
                    }
                    let p = canvas.px[canvas.idx(x, y)];
                    paper.add(p.paper);
                    if let Some(c) = p.ink {
                        mask |= braille_bit(dx, dy);
                        ink.add(c);
                    }
                }
            }

            let ch = if mask == 0 {
                ' '
            } else {
                char::from_u32(0x2800 + mask as u32).unwrap_or(' ')
            };
            let (fg, bg) = if enable_color {
                (
                    ink.get().map(to_color).unwrap_or(Color::White),
                    paper.get().map(to_color).unwrap_or(Color::Black),
                )
            } else {
                (Color::White, Color::Black)
            };

            out.set(cx as u16, cy as u16, Cell { ch, fg, bg });
        }
    }
}
