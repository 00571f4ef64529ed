// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::Cell;
use crate::glyph::visible_chars;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    gen: u32,
    cell_gen: Vec<u32>,
    blank: Cell,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let len = width as usize * height as usize;
        let blank = Cell::blank_with_bg(bg);
        Self {
            width,
            height,
            cells: vec![blank; len],
            gen: 1,
            cell_gen: vec![1; len],
            blank,
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        for i in 0..self.cells.len() {
            if self.cell_gen[i] == self.gen && self.cells[i] != self.blank {
                self.mark_dirty(i);
            }
        }
        self.gen = self.gen.wrapping_add(1);
        if self.gen == 0 {
            self.cell_gen.fill(0);
            self.gen = 1;
        }
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn has_changes(&self) -> bool {
        self.dirty_all || !self.dirty.is_empty()
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }
        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| {
            if self.cell_gen[i] == self.gen {
                &self.cells[i]
            } else {
                &self.blank
            }
        })
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        if self.cell_gen.get(i).copied() == Some(self.gen) {
            self.cells[i]
        } else {
            self.blank
        }
    }

    fn mark_dirty(&mut self, i: usize) {
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let cur = self.cell_at_index(i);
        self.cells[i] = cell;
        self.cell_gen[i] = self.gen;
        if cur != cell {
            self.mark_dirty(i);
        }
    }

    // returns the unclipped column span
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) -> u16 {
        let mut col = x;
        let mut span = 0u16;
        for (ch, w) in visible_chars(text) {
            let w32 = w as i32;
            let fits = y >= 0
                && y < self.height as i32
                && col >= 0
                && col + w32 <= self.width as i32;
            if fits {
                let (cx, cy) = (col as u16, y as u16);
                self.set(cx, cy, Cell::styled(ch, style.fg, style.bg, style.bold));
                if w == 2 {
                    self.set(
                        cx + 1,
                        cy,
                        Cell::styled(Cell::WIDE_TAIL, style.fg, style.bg, style.bold),
                    );
                }
            }
            col += w32;
            span = span.saturating_add(w);
        }
        span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Style {
        Style {
            fg: None,
            bg: None,
            bold: false,
        }
    }

    #[test]
    fn clear_makes_cells_blank_and_dirty() {
        let mut f = Frame::new(2, 2, None);
        f.set(0, 0, Cell::styled('x', None, None, false));
        f.clear_dirty();
        assert_eq!(f.get(0, 0).unwrap().ch, 'x');

        f.clear();
        assert_eq!(f.get(0, 0).unwrap().ch, ' ');
        assert_eq!(f.dirty_indices(), &[0]);
    }

    #[test]
    fn clear_then_repaint_only_touches_previous_cells() {
        let mut f = Frame::new(4, 1, None);
        f.put_str(0, 0, "ab", plain());
        f.clear_dirty();

        f.clear();
        f.put_str(0, 0, "ab", plain());
        assert_eq!(f.get(1, 0).unwrap().ch, 'b');
        assert_eq!(f.dirty_indices(), &[0, 1]);
    }

    #[test]
    fn put_str_clips_and_marks_wide_tails() {
        let mut f = Frame::new(4, 1, None);
        let span = f.put_str(-1, 0, "a💖b💖", plain());
        assert_eq!(span, 6);
        assert_eq!(f.get(0, 0).unwrap().ch, '💖');
        assert!(f.get(1, 0).unwrap().is_wide_tail());
        assert_eq!(f.get(2, 0).unwrap().ch, 'b');
        // second heart would need columns 3 and 4
        assert_eq!(f.get(3, 0).unwrap().ch, ' ');
    }

    #[test]
    fn put_str_outside_rows_is_ignored() {
        let mut f = Frame::new(3, 1, None);
        f.clear_dirty();
        f.put_str(0, 1, "abc", plain());
        f.put_str(0, -1, "abc", plain());
        assert!(!f.has_changes());
    }
}
