// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Cell {
    /// Right half of a double-width glyph. Never printed; the terminal cursor
    /// already advanced over it when the glyph to its left was written.
    pub const WIDE_TAIL: char = '\0';

    pub fn blank_with_bg(bg: Option<Color>) -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg,
            bold: false,
        }
    }

    pub fn styled(ch: char, fg: Option<Color>, bg: Option<Color>, bold: bool) -> Self {
        Self { ch, fg, bg, bold }
    }

    pub fn is_wide_tail(&self) -> bool {
        self.ch == Self::WIDE_TAIL
    }
}
