//! MatrixPreview: flushes matrix frames to a real terminal.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::types::{FrameBuffer, Rgb};

pub const HALF_BLOCK: char = '▀';

/// Terminal lines needed for a matrix `height` pixels tall.
pub fn cell_rows(height: u16) -> u16 {
    height.div_ceil(2)
}

pub struct MatrixPreview {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    last_status: String,
    buf: Vec<u8>,
}

impl Default for MatrixPreview {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixPreview {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            last_status: String::new(),
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    pub fn invalidate(&mut self) {
        self.last = None;
        self.last_status.clear();
    }

    /// Draw `fb` and, when it changed, the status line below it.
    pub fn draw(&mut self, fb: &FrameBuffer, status: &str) -> Result<()> {
        self.buf.clear();
        match &mut self.last {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(prev, fb, &mut self.buf)?;
                prev.copy_from(fb);
            }
            last => {
                encode_full_into(fb, &mut self.buf)?;
                *last = Some(fb.clone());
                self.last_status.clear();
            }
        }

        if status != self.last_status {
            self.buf.queue(cursor::MoveTo(0, cell_rows(fb.height()) + 1))?;
            self.buf.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
            self.buf.queue(Print(status))?;
            self.last_status.clear();
            self.last_status.push_str(status);
        }

        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Upper and lower pixel of one terminal cell. A missing lower row (odd
/// heights) shows black.
fn cell_colors(fb: &FrameBuffer, x: u16, row: u16) -> (Rgb, Rgb) {
    let y = i32::from(row) * 2;
    let top = fb.get(i32::from(x), y).unwrap_or_default();
    let bottom = fb.get(i32::from(x), y + 1).unwrap_or_default();
    (top, bottom)
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let rows = cell_rows(fb.height());
    let mut current = None;
    for row in 0..rows {
        for x in 0..fb.width() {
            put_cell(out, cell_colors(fb, x, row), &mut current)?;
        }
        if row + 1 < rows {
            out.queue(Print("\r\n"))?;
        }
    }

    out.queue(ResetColor)?;
    Ok(())
}

/// Encode only the cells whose pixel pair changed between `prev` and `next`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut current = None;
    for_each_changed_run(prev, next, |x, row, len| {
        out.queue(cursor::MoveTo(x, row))?;
        for dx in 0..len {
            put_cell(out, cell_colors(next, x + dx, row), &mut current)?;
        }
        Ok(())
    })?;
    out.queue(ResetColor)?;
    Ok(())
}

fn put_cell(out: &mut Vec<u8>, colors: (Rgb, Rgb), current: &mut Option<(Rgb, Rgb)>) -> Result<()> {
    let (top, bottom) = colors;
    let (prev_top, prev_bottom) = match *current {
        Some((t, b)) => (Some(t), Some(b)),
        None => (None, None),
    };
    if prev_top != Some(top) {
        out.queue(SetForegroundColor(rgb_to_color(top)))?;
    }
    if prev_bottom != Some(bottom) {
        out.queue(SetBackgroundColor(rgb_to_color(bottom)))?;
    }
    *current = Some(colors);
    out.queue(Print(HALF_BLOCK))?;
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Call `f(x, row, len)` for each run of changed cells, row by row.
fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    let w = next.width();
    for row in 0..cell_rows(next.height()) {
        let mut x = 0;
        while x < w {
            if cell_colors(prev, x, row) == cell_colors(next, x, row) {
                x += 1;
                continue;
            }
            let start = x;
            x += 1;
            while x < w && cell_colors(prev, x, row) != cell_colors(next, x, row) {
                x += 1;
            }
            f(start, row, x - start)?;
        }
    }
    Ok(())
}
