// Copyright (c) 2026 rezky_nightky

use std::ops::Range;
use std::time::{Duration, Instant};

use crate::glyph::str_width;
use crate::layout::{Point, Viewport, CELL_H, CELL_W};

pub const HEART_SIZE: Range<f64> = 20.0..40.0;
pub const WORD_SIZE: Range<f64> = 14.0..24.0;

pub const MAX_LEFT_PCT: f64 = 90.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Heart,
    Word,
}

impl ItemKind {
    pub fn size_range(self) -> Range<f64> {
        match self {
            ItemKind::Heart => HEART_SIZE,
            ItemKind::Word => WORD_SIZE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FallingItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub content: String,
    pub size: f64,
    pub left_pct: f64,
    pub fall: Duration,
    pub born: Instant,
    pub glow: bool,
    pub offset: Point,
    cols: u16,
}

impl FallingItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ItemId,
        kind: ItemKind,
        content: String,
        size: f64,
        left_pct: f64,
        fall: Duration,
        born: Instant,
    ) -> Self {
        let cols = str_width(&content).max(1);
        Self {
            id,
            kind,
            content,
            size,
            left_pct,
            fall,
            born,
            glow: false,
            offset: Point::new(0.0, 0.0),
            cols,
        }
    }

    pub fn progress(&self, now: Instant) -> f64 {
        let fall = self.fall.as_secs_f64();
        if fall <= 0.0 {
            return 1.0;
        }
        now.saturating_duration_since(self.born).as_secs_f64() / fall
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn width_px(&self) -> f64 {
        (self.cols as f64 * CELL_W).max(self.size)
    }

    pub fn height_px(&self) -> f64 {
        self.size.max(CELL_H)
    }

    pub fn base_origin(&self, viewport: Viewport, now: Instant) -> Point {
        let h = self.height_px();
        let t = self.progress(now).min(1.0);
        Point::new(
            viewport.width_px() * self.left_pct / 100.0,
            -h + t * (viewport.height_px() + h),
        )
    }

    pub fn base_center(&self, viewport: Viewport, now: Instant) -> Point {
        let o = self.base_origin(viewport, now);
        Point::new(o.x + self.width_px() / 2.0, o.y + self.height_px() / 2.0)
    }

    pub fn origin(&self, viewport: Viewport, now: Instant) -> Point {
        let o = self.base_origin(viewport, now);
        Point::new(o.x + self.offset.x, o.y + self.offset.y)
    }

    // padded by one cell on every side
    pub fn hit_test(&self, viewport: Viewport, now: Instant, p: Point) -> bool {
        let o = self.origin(viewport, now);
        p.x >= o.x - CELL_W
            && p.x < o.x + self.width_px() + CELL_W
            && p.y >= o.y - CELL_H
            && p.y < o.y + self.height_px() + CELL_H
    }

    pub fn is_large(&self) -> bool {
        let r = self.kind.size_range();
        self.size >= (r.start + r.end) / 2.0
    }
}
