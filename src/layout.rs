// Copyright (c) 2026 rezky_nightky

use crate::error::StageError;
use crate::glyph::str_width;

pub const CELL_W: f64 = 8.0;
pub const CELL_H: f64 = 16.0;

pub const MIN_COLS: u16 = 20;
pub const MIN_ROWS: u16 = 5;

pub const MUTE_ON_ICON: &str = "🔇";
pub const MUTE_OFF_ICON: &str = "🔊";
pub const REPLAY_LABEL: &str = "[ r ] replay";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x && col < self.x + self.w && row >= self.y && row < self.y + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub fn width_px(&self) -> f64 {
        self.cols as f64 * CELL_W
    }

    pub fn height_px(&self) -> f64 {
        self.rows as f64 * CELL_H
    }

    pub fn cell_center(&self, col: u16, row: u16) -> Point {
        Point::new(
            (col as f64 + 0.5) * CELL_W,
            (row as f64 + 0.5) * CELL_H,
        )
    }

    pub fn to_cell(&self, p: Point) -> (i32, i32) {
        (
            (p.x / CELL_W).floor() as i32,
            (p.y / CELL_H).floor() as i32,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Controls {
    pub mute: bool,
    pub replay: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub viewport: Viewport,
    pub text: Option<Rect>,
    pub mute_button: Option<Rect>,
    pub replay_button: Option<Rect>,
}

impl Layout {
    pub fn compute(viewport: Viewport, controls: Controls) -> Self {
        let Viewport { cols, rows } = viewport;

        let text = (cols >= MIN_COLS && rows >= MIN_ROWS).then(|| {
            let w = (cols - 4).min(72);
            let h = (rows - 2).min(12);
            Rect {
                x: (cols - w) / 2,
                y: (rows - h) / 2,
                w,
                h,
            }
        });

        let mute_w = str_width(MUTE_ON_ICON).max(str_width(MUTE_OFF_ICON)) + 2;
        let mute_button = (controls.mute && cols > mute_w).then(|| Rect {
            x: cols - mute_w - 1,
            y: 0,
            w: mute_w,
            h: 1,
        });

        let replay_w = str_width(REPLAY_LABEL);
        let replay_button = (controls.replay && cols >= replay_w && rows >= 2).then(|| Rect {
            x: (cols - replay_w) / 2,
            y: rows - 1,
            w: replay_w,
            h: 1,
        });

        Self {
            viewport,
            text,
            mute_button,
            replay_button,
        }
    }

    pub fn require_text(&self) -> Result<Rect, StageError> {
        self.text.ok_or(StageError::MissingTextRegion {
            cols: self.viewport.cols,
            rows: self.viewport.rows,
            min_cols: MIN_COLS,
            min_rows: MIN_ROWS,
        })
    }
}
