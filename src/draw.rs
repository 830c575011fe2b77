//! Draw commands emitted by the scene and the canvas seam hosts implement.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

/// One primitive in pixel space, origin at the top-left of the viewport.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    /// `x`/`y` is the left end of the text baseline.
    DrawText {
        x: f32,
        y: f32,
        text: String,
        color: Rgb,
    },
    /// Outline of the ellipse inscribed in the given rectangle.
    DrawEllipse {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    FillCircle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Rgb,
    },
}

pub trait Canvas {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb);
    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Rgb);
    fn draw_ellipse(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb);
}

impl DrawCommand {
    pub fn replay<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        match self {
            DrawCommand::FillRect { x, y, width, height, color } => {
                canvas.fill_rect(*x, *y, *width, *height, *color)
            }
            DrawCommand::DrawText { x, y, text, color } => canvas.draw_text(*x, *y, text, *color),
            DrawCommand::DrawEllipse { x, y, width, height, color } => {
                canvas.draw_ellipse(*x, *y, *width, *height, *color)
            }
            DrawCommand::FillCircle { cx, cy, radius, color } => {
                canvas.fill_circle(*cx, *cy, *radius, *color)
            }
        }
    }
}

/// Replays commands in order, back to front.
pub fn replay_all<C: Canvas + ?Sized>(commands: &[DrawCommand], canvas: &mut C) {
    for cmd in commands {
        cmd.replay(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl Canvas for Recorder {
        fn fill_rect(&mut self, _: f32, _: f32, _: f32, _: f32, _: Rgb) {
            self.calls.push("rect");
        }
        fn draw_text(&mut self, _: f32, _: f32, _: &str, _: Rgb) {
            self.calls.push("text");
        }
        fn draw_ellipse(&mut self, _: f32, _: f32, _: f32, _: f32, _: Rgb) {
            self.calls.push("ellipse");
        }
        fn fill_circle(&mut self, _: f32, _: f32, _: f32, _: Rgb) {
            self.calls.push("circle");
        }
    }

    #[test]
    fn hex_colors_split_into_channels() {
        assert_eq!(Rgb::from_hex(0x717378), Rgb::new(0x71, 0x73, 0x78));
        assert_eq!(Rgb::from_hex(0x000000), Rgb::BLACK);
    }

    #[test]
    fn replay_preserves_order() {
        let commands = vec![
            DrawCommand::FillRect { x: 0.0, y: 0.0, width: 1.0, height: 1.0, color: Rgb::BLACK },
            DrawCommand::DrawText { x: 0.0, y: 0.0, text: "hi".into(), color: Rgb::BLACK },
            DrawCommand::DrawEllipse { x: 0.0, y: 0.0, width: 1.0, height: 1.0, color: Rgb::BLACK },
            DrawCommand::FillCircle { cx: 0.0, cy: 0.0, radius: 1.0, color: Rgb::BLACK },
        ];
        let mut rec = Recorder::default();
        replay_all(&commands, &mut rec);
        assert_eq!(rec.calls, ["rect", "text", "ellipse", "circle"]);
    }
}
