use crossterm::{
    cursor, execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Character-grid drawing target. Origin top-left, Y down.
pub(crate) trait Surface {
    fn width(&self) -> i64;
    fn height(&self) -> i64;
    fn set_color(&mut self, fg: Color, bg: Color);
    /// Writes `glyph` with the current colors. Out-of-range cells are ignored;
    /// returns whether the cell was written.
    fn plot(&mut self, x: i64, y: i64, glyph: char) -> bool;
    fn clear(&mut self, fill: char);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

#[derive(Clone, Debug)]
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
    pub(crate) fn fill(&mut self, c: Cell) {
        self.cells.fill(c);
    }
    /// Copies `src` with its top-left corner at (`x`, `y`), clipped.
    pub(crate) fn blit(&mut self, src: &CellBuffer, x: u16, y: u16) {
        for sy in 0..src.h {
            for sx in 0..src.w {
                self.set(x.saturating_add(sx), y.saturating_add(sy), src.cells[src.idx(sx, sy)]);
            }
        }
    }
}

/// In-memory surface with a pen, used as the content of every window.
#[derive(Clone, Debug)]
pub(crate) struct Screen {
    pub(crate) buf: CellBuffer,
    fg: Color,
    bg: Color,
    bold: bool,
}

impl Screen {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            buf: CellBuffer::new(w, h),
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }

    pub(crate) fn resize(&mut self, w: u16, h: u16) {
        if (w, h) != (self.buf.w, self.buf.h) {
            self.buf = CellBuffer::new(w, h);
        }
    }

    pub(crate) fn reset_pen(&mut self) {
        self.fg = Color::White;
        self.bg = Color::Black;
        self.bold = false;
    }

    /// Text at (`x`, `y`) with the current pen, clipped to the row.
    pub(crate) fn print(&mut self, x: u16, y: u16, s: &str) {
        for (i, ch) in s.chars().enumerate() {
            let xx = x.saturating_add(i as u16);
            if xx >= self.buf.w || y >= self.buf.h {
                break;
            }
            self.buf.set(xx, y, self.cell(ch));
        }
    }

    /// Like `print`, but pads the rest of the row with blanks.
    pub(crate) fn print_line(&mut self, y: u16, s: &str) {
        self.print(0, y, s);
        let used = s.chars().count().min(self.buf.w as usize) as u16;
        for x in used..self.buf.w {
            self.buf.set(x, y, self.cell(' '));
        }
    }

    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.buf.get(x, y)
    }

    /// Row `y` as plain text.
    pub(crate) fn row_text(&self, y: u16) -> String {
        (0..self.buf.w)
            .filter_map(|x| self.buf.get(x, y))
            .map(|c| c.ch)
            .collect()
    }

    pub(crate) fn count(&self, glyph: char) -> usize {
        self.buf.cells.iter().filter(|c| c.ch == glyph).count()
    }

    fn cell(&self, ch: char) -> Cell {
        Cell {
            ch,
            fg: self.fg,
            bg: self.bg,
            bold: self.bold,
        }
    }
}

impl Surface for Screen {
    fn width(&self) -> i64 {
        self.buf.w as i64
    }

    fn height(&self) -> i64 {
        self.buf.h as i64
    }

    fn set_color(&mut self, fg: Color, bg: Color) {
        self.fg = fg;
        self.bg = bg;
    }

    fn plot(&mut self, x: i64, y: i64, glyph: char) -> bool {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return false;
        }
        let c = self.cell(glyph);
        self.buf.set(x as u16, y as u16, c);
        true
    }

    fn clear(&mut self, fill: char) {
        let c = self.cell(fill);
        self.buf.fill(c);
    }
}

// ---- terminal presenter ----

pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    full_redraw: bool,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
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
            full_redraw: true,
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
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.full_redraw = true;
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Flushes `cur` to the terminal, writing only cells that changed since
    /// the last present unless a full redraw is pending.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        let diff_only = !std::mem::take(&mut self.full_redraw);
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = false;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                if last_bold != c.bold {
                    let attr = if c.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = c.bold;
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}
