// Copyright (c) 2026 rezky_nightky

use std::time::Instant;

use crate::frame::{Frame, Style};
use crate::glyph::{str_width, wrap_columns};
use crate::item::{FallingItem, ItemKind};
use crate::layout::{Rect, Viewport, MUTE_OFF_ICON, MUTE_ON_ICON, REPLAY_LABEL};
use crate::palette::Palette;
use crate::show::{Phase, Show};

pub const CURSOR: &str = "▌";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRow {
    pub full: String,
    pub typed: usize,
}

pub fn text_rows(message: &str, typed_chars: usize, width: u16) -> Vec<TextRow> {
    let mut budget = typed_chars;
    let mut rows = Vec::new();
    for (i, line) in message.split('\n').enumerate() {
        if i > 0 {
            // the newline itself is one typed char
            budget = budget.saturating_sub(1);
        }
        for chunk in wrap_columns(line, width) {
            let n = chunk.chars().count();
            let typed = budget.min(n);
            budget -= typed;
            rows.push(TextRow { full: chunk, typed });
        }
    }
    rows
}

fn draw_message(show: &Show, frame: &mut Frame, palette: &Palette, rect: Rect) {
    let tw = show.typewriter();
    let typed_chars = tw.text().chars().count();
    let mut rows = text_rows(show.message(), typed_chars, rect.w);
    while rows.last().is_some_and(|r| r.full.trim().is_empty()) && rows.len() > 1 {
        rows.pop();
    }

    let visible = rows.len().min(rect.h as usize);
    let top = rect.y as i32 + (rect.h as i32 - visible as i32) / 2;
    let text_style = Style {
        fg: palette.text,
        bg: palette.bg,
        bold: true,
    };

    // cursor sits after the last typed char, on the row being typed
    let cursor_row = rows.iter().rposition(|r| r.typed > 0).unwrap_or(0);

    for (i, row) in rows.iter().take(visible).enumerate() {
        let full_w = str_width(&row.full).min(rect.w);
        let x = rect.x as i32 + (rect.w - full_w) as i32 / 2;
        let y = top + i as i32;
        let typed: String = row.full.chars().take(row.typed).collect();
        let span = frame.put_str(x, y, &typed, text_style);

        if show.phase() == Phase::Typing && !tw.is_done() && i == cursor_row {
            frame.put_str(
                x + span as i32,
                y,
                CURSOR,
                Style {
                    fg: palette.cursor,
                    bg: palette.bg,
                    bold: false,
                },
            );
        }
    }
}

fn draw_item(item: &FallingItem, frame: &mut Frame, palette: &Palette, vp: Viewport, now: Instant) {
    let (x, y) = vp.to_cell(item.origin(vp, now));
    // vertically center the glyph row inside the item's box
    let rows = (item.height_px() / crate::layout::CELL_H).floor() as i32;
    let y = y + rows.saturating_sub(1) / 2;

    let base_fg = match item.kind {
        ItemKind::Heart => palette.heart(item.id.0),
        ItemKind::Word => palette.word(item.id.0),
    };

    if !item.glow {
        let style = Style {
            fg: base_fg,
            bg: palette.bg,
            bold: item.is_large(),
        };
        frame.put_str(x, y, &item.content, style);
        return;
    }

    let style = Style {
        fg: palette.glow_fg.or(base_fg),
        bg: palette.glow_bg.or(palette.bg),
        bold: true,
    };
    if palette.glow_fg.is_none() {
        // no color to glow with: mark it instead
        frame.put_str(x - 1, y, "*", style);
        let w = frame.put_str(x, y, &item.content, style);
        frame.put_str(x + w as i32, y, "*", style);
    } else {
        frame.put_str(x, y, &item.content, style);
    }
}

fn draw_controls(show: &Show, frame: &mut Frame, palette: &Palette) {
    let style = Style {
        fg: palette.control,
        bg: palette.bg,
        bold: false,
    };
    let layout = show.layout();

    if let Some(r) = layout.mute_button {
        let icon = if show.is_muted() {
            MUTE_ON_ICON
        } else {
            MUTE_OFF_ICON
        };
        frame.put_str(r.x as i32 + 1, r.y as i32, icon, style);
    }

    if let Some(r) = layout.replay_button {
        if show.replay_visible() {
            frame.put_str(r.x as i32, r.y as i32, REPLAY_LABEL, Style { bold: true, ..style });
        }
    }
}

pub fn draw_scene(show: &Show, frame: &mut Frame, palette: &Palette, now: Instant) {
    frame.clear();

    if let Some(rect) = show.layout().text {
        draw_message(show, frame, palette, rect);
    }

    let vp = show.layout().viewport;
    for item in show.rain().items() {
        draw_item(item, frame, palette, vp, now);
    }

    draw_controls(show, frame, palette);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::config::Config;
    use crate::diag::Diagnostics;
    use crate::runtime::ColorMode;
    use crate::tone::Silent;

    fn row_text(frame: &Frame, y: u16) -> String {
        (0..frame.width)
            .filter_map(|x| frame.get(x, y))
            .filter(|c| !c.is_wide_tail())
            .map(|c| c.ch)
            .collect()
    }

    fn screen(frame: &Frame) -> String {
        (0..frame.height)
            .map(|y| row_text(frame, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn rows_follow_typed_budget_across_newlines() {
        let rows = text_rows("ab\ncd", 4, 10);
        assert_eq!(
            rows,
            vec![
                TextRow {
                    full: "ab".to_string(),
                    typed: 2
                },
                TextRow {
                    full: "cd".to_string(),
                    typed: 1
                },
            ]
        );
    }

    #[test]
    fn long_lines_wrap_to_the_region() {
        let rows = text_rows("abcdef", 6, 4);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].typed, 4);
        assert_eq!(rows[1].typed, 2);
    }

    #[test]
    fn typed_text_and_cursor_are_drawn() {
        let t0 = Instant::now();
        let cfg = Config {
            message: "oi amor".to_string(),
            color_mode: ColorMode::Mono,
            ..Config::default()
        };
        let mut show = Show::new(
            &cfg,
            Viewport::new(40, 10),
            StdRng::seed_from_u64(3),
            Box::new(Silent),
            Diagnostics::new(),
        );
        show.start(t0).unwrap();
        show.tick(t0 + Duration::from_millis(100));

        let palette = crate::palette::build_palette(ColorMode::Mono, true);
        let mut frame = Frame::new(40, 10, palette.bg);
        draw_scene(&show, &mut frame, &palette, t0 + Duration::from_millis(100));

        let s = screen(&frame);
        assert!(s.contains("oi ▌"), "screen was:\n{s}");
        assert!(s.contains(MUTE_OFF_ICON));
        assert!(!s.contains("replay"));
    }

    #[test]
    fn cursor_is_gone_once_typing_is_done() {
        let t0 = Instant::now();
        let cfg = Config {
            message: "oi".to_string(),
            ..Config::default()
        };
        let mut show = Show::new(
            &cfg,
            Viewport::new(40, 10),
            StdRng::seed_from_u64(3),
            Box::new(Silent),
            Diagnostics::new(),
        );
        show.start(t0).unwrap();
        show.tick(t0 + Duration::from_millis(100));

        let palette = crate::palette::build_palette(ColorMode::Mono, true);
        let mut frame = Frame::new(40, 10, palette.bg);
        draw_scene(&show, &mut frame, &palette, t0 + Duration::from_millis(100));
        let s = screen(&frame);
        assert!(s.contains("oi"));
        assert!(!s.contains(CURSOR));
    }

    #[test]
    fn glowing_items_are_marked_in_mono() {
        let t0 = Instant::now();
        let cfg = Config {
            message: "x".to_string(),
            ..Config::default()
        };
        let mut show = Show::new(
            &cfg,
            Viewport::new(80, 24),
            StdRng::seed_from_u64(11),
            Box::new(Silent),
            Diagnostics::new(),
        );
        show.start(t0).unwrap();

        let palette = crate::palette::build_palette(ColorMode::Mono, true);
        let mut now = t0;
        let vp = show.layout().viewport;
        let (col, row) = loop {
            now += Duration::from_millis(10);
            show.tick(now);
            let hit = show.rain().items().iter().find(|it| {
                let c = it.base_center(vp, now);
                c.y > 64.0 && c.y < vp.height_px() - 64.0 && c.x > 32.0 && c.x < vp.width_px() - 32.0
            });
            if let Some(it) = hit {
                let (x, y) = vp.to_cell(it.base_center(vp, now));
                break (x as u16, y as u16);
            }
            assert!(now < t0 + Duration::from_secs(30));
        };

        show.click(col, row, now);
        let mut frame = Frame::new(80, 24, palette.bg);
        draw_scene(&show, &mut frame, &palette, now);
        assert!(screen(&frame).contains('*'));
    }
}
