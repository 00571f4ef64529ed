// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, IsTerminal, Result, Stdout, Write};

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;
use crate::glyph::char_width;

struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    pos: Option<(u16, u16)>,
}

impl Pen {
    fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            pos: None,
        }
    }
}

pub struct Terminal {
    stdout: Stdout,
    last: Vec<Cell>,
    last_size: Option<(u16, u16)>,
    run_buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        if !out.is_terminal() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "stdout is not a terminal",
            ));
        }
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            out.execute(EnableMouseCapture)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: Vec::new(),
            last_size: None,
            run_buf: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn apply_style(&mut self, pen: &mut Pen, cell: &Cell) -> Result<()> {
        if cell.fg != pen.fg {
            self.stdout
                .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            pen.fg = cell.fg;
        }
        if cell.bg != pen.bg {
            self.stdout
                .queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            pen.bg = cell.bg;
        }
        if cell.bold != pen.bold {
            self.stdout.queue(SetAttribute(if cell.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            pen.bold = cell.bold;
        }
        Ok(())
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let size = (frame.width, frame.height);
        let total = frame.width as usize * frame.height as usize;
        let full = self.last_size != Some(size)
            || frame.is_dirty_all()
            || frame.dirty_indices().len() >= total / 3;

        let mut pen = Pen::new();
        if full {
            self.draw_full(frame, &mut pen)?;
        } else {
            self.draw_dirty(frame, &mut pen)?;
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    fn draw_full(&mut self, frame: &Frame, pen: &mut Pen) -> Result<()> {
        if self.last_size != Some((frame.width, frame.height)) {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last_size = Some((frame.width, frame.height));
        }
        self.last.clear();
        self.last
            .resize(frame.width as usize * frame.height as usize, Cell::blank_with_bg(None));

        for y in 0..frame.height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let idx = y as usize * frame.width as usize + x as usize;
                let cell = frame.cell_at_index(idx);
                self.last[idx] = cell;
                if cell.is_wide_tail() {
                    continue;
                }
                self.apply_style(pen, &cell)?;
                self.stdout.queue(Print(cell.ch))?;
            }
        }
        Ok(())
    }

    fn draw_dirty(&mut self, frame: &Frame, pen: &mut Pen) -> Result<()> {
        let width = frame.width as usize;
        let mut dirty: Vec<usize> = frame.dirty_indices().to_vec();
        dirty.sort_unstable();

        let mut i = 0usize;
        while i < dirty.len() {
            let idx0 = dirty[i];
            let cell0 = frame.cell_at_index(idx0);
            if self.last.get(idx0) == Some(&cell0) || cell0.is_wide_tail() {
                if let Some(slot) = self.last.get_mut(idx0) {
                    *slot = cell0;
                }
                i += 1;
                continue;
            }
            self.last[idx0] = cell0;

            let x0 = (idx0 % width) as u16;
            let y0 = (idx0 / width) as u16;

            // Extend the run over adjacent dirty cells on the same row that
            // share the style, so one Print covers them.
            self.run_buf.clear();
            self.run_buf.push(cell0.ch);
            let mut run_cols: u16 = char_width(cell0.ch).max(1);
            let mut last_idx = idx0;
            let mut j = i + 1;
            while j < dirty.len() {
                let idx1 = dirty[j];
                if idx1 != last_idx + 1 || idx1 / width != idx0 / width {
                    break;
                }
                let cell1 = frame.cell_at_index(idx1);
                if cell1.fg != cell0.fg || cell1.bg != cell0.bg || cell1.bold != cell0.bold {
                    break;
                }
                if !cell1.is_wide_tail() {
                    if self.last.get(idx1) == Some(&cell1) {
                        break;
                    }
                    self.run_buf.push(cell1.ch);
                    run_cols = run_cols.saturating_add(char_width(cell1.ch).max(1));
                }
                self.last[idx1] = cell1;
                last_idx = idx1;
                j += 1;
            }

            if pen.pos != Some((x0, y0)) {
                self.stdout.queue(cursor::MoveTo(x0, y0))?;
            }
            self.apply_style(pen, &cell0)?;
            self.stdout.queue(Print(self.run_buf.as_str()))?;

            let next_x = x0.saturating_add(run_cols);
            pen.pos = (next_x < frame.width).then_some((next_x, y0));
            i = j;
        }
        Ok(())
    }
}

fn restore(out: &mut Stdout) {
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout);
    }
}

pub fn restore_terminal_best_effort() {
    restore(&mut stdout());
}
