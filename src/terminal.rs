use crate::canvas::PixelCanvas;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }

    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }

    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }

    pub(crate) fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell {
            bg,
            ..Cell::default()
        });
    }
}

/// Writes `s` left to right from (`x`, `y`), clipped at the right edge.
/// `bg: None` keeps whatever background the cell already has.
pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Option<Color>) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        let Some(under) = buf.get(xx, y) else {
            break;
        };
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                bg: bg.unwrap_or(under.bg),
            },
        );
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;

        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            // Braille: 2x4 pixels per cell
            canvas: PixelCanvas::new(cols as u32 * 2, rows as u32 * 4),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Reallocates every buffer when the window changed size. The caller
    /// must present the next frame in full.
    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.canvas = PixelCanvas::new(c as u32 * 2, r as u32 * 4);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut pen: Option<(Color, Color)> = None;
        for y in 0..self.rows {
            for (x0, x1) in dirty_runs(&self.prev, &self.cur, y, diff_only) {
                queue!(self.out, cursor::MoveTo(x0, y))?;
                for x in x0..x1 {
                    let c = self.cur.cells[self.cur.idx(x, y)];
                    if pen != Some((c.fg, c.bg)) {
                        queue!(self.out, SetForegroundColor(c.fg), SetBackgroundColor(c.bg))?;
                        pen = Some((c.fg, c.bg));
                    }
                    queue!(self.out, Print(c.ch))?;
                }
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/// ASCII and braille are one column wide everywhere. Other glyphs (the
/// play/pause symbols) may be drawn double width, so the cursor is
/// repositioned after them.
fn has_known_width(ch: char) -> bool {
    ch.is_ascii() || ('\u{2800}'..='\u{28FF}').contains(&ch)
}

/// Half-open column ranges of row `y` that must be printed. Each range is
/// written after a single cursor move.
fn dirty_runs(prev: &CellBuffer, cur: &CellBuffer, y: u16, diff_only: bool) -> Vec<(u16, u16)> {
    let mut runs = Vec::new();
    let mut open: Option<u16> = None;
    for x in 0..cur.w {
        let i = cur.idx(x, y);
        let c = cur.cells[i];
        if diff_only && prev.cells.get(i) == Some(&c) {
            if let Some(x0) = open.take() {
                runs.push((x0, x));
            }
            continue;
        }
        let x0 = open.unwrap_or(x);
        if has_known_width(c.ch) {
            open = Some(x0);
        } else {
            runs.push((x0, x + 1));
            open = None;
        }
    }
    if let Some(x0) = open {
        runs.push((x0, cur.w));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut buf = CellBuffer::new(3, 2);
        buf.set(3, 0, Cell { ch: 'x', ..Cell::default() });
        buf.set(0, 2, Cell { ch: 'x', ..Cell::default() });
        assert!(buf.cells.iter().all(|c| c.ch == ' '));
        assert_eq!(buf.get(3, 0), None);
    }

    #[test]
    fn text_clips_and_keeps_background() {
        let mut buf = CellBuffer::new(4, 1);
        buf.clear(Color::Blue);
        draw_text(&mut buf, 1, 0, "hello", Color::Red, None);
        let row: String = buf.cells.iter().map(|c| c.ch).collect();
        assert_eq!(row, " hel");
        assert_eq!(buf.cells[1].bg, Color::Blue);
        assert_eq!(buf.cells[1].fg, Color::Red);
        assert_eq!(buf.cells[0].fg, Color::White);
    }

    #[test]
    fn only_changed_cells_are_printed() {
        let prev = CellBuffer::new(8, 1);
        let mut cur = CellBuffer::new(8, 1);
        draw_text(&mut cur, 1, 0, "ab", Color::White, None);
        draw_text(&mut cur, 5, 0, "\u{2801}", Color::White, None);
        assert_eq!(dirty_runs(&prev, &cur, 0, true), vec![(1, 3), (5, 6)]);
        assert_eq!(dirty_runs(&prev, &cur, 0, false), vec![(0, 8)]);
        assert!(dirty_runs(&cur, &cur, 0, true).is_empty());
    }

    #[test]
    fn runs_break_after_symbols_of_unknown_width() {
        let prev = CellBuffer::new(6, 1);
        let mut cur = CellBuffer::new(6, 1);
        draw_text(&mut cur, 0, 0, "\u{23F8}  sp", Color::White, None);
        assert_eq!(dirty_runs(&prev, &cur, 0, true), vec![(0, 1), (3, 5)]);
    }

    #[test]
    fn text_with_explicit_background() {
        let mut buf = CellBuffer::new(2, 1);
        draw_text(&mut buf, 0, 0, "ok", Color::White, Some(Color::DarkGrey));
        assert!(buf.cells.iter().all(|c| c.bg == Color::DarkGrey));
    }
}
