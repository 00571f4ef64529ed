// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

type Rgb = (u8, u8, u8);

const TEXT: Rgb = (255, 228, 236);
const CURSOR: Rgb = (255, 105, 180);
const CONTROL: Rgb = (200, 170, 190);
const GLOW_FG: Rgb = (255, 245, 160);
const GLOW_BG: Rgb = (95, 20, 60);

const HEART_STOPS: [Rgb; 3] = [(200, 20, 60), (255, 64, 129), (255, 150, 200)];
const WORD_STOPS: [Rgb; 3] = [(255, 182, 193), (238, 130, 238), (255, 240, 245)];

#[derive(Clone, Debug)]
pub struct Palette {
    pub bg: Option<Color>,
    pub text: Option<Color>,
    pub cursor: Option<Color>,
    pub control: Option<Color>,
    pub glow_fg: Option<Color>,
    pub glow_bg: Option<Color>,
    pub hearts: Vec<Color>,
    pub words: Vec<Color>,
}

impl Palette {
    pub fn heart(&self, seed: u64) -> Option<Color> {
        pick(&self.hearts, seed)
    }

    pub fn word(&self, seed: u64) -> Option<Color> {
        pick(&self.words, seed)
    }
}

fn pick(list: &[Color], seed: u64) -> Option<Color> {
    if list.is_empty() {
        return None;
    }
    Some(list[(seed % list.len() as u64) as usize])
}

fn dist2(a: Rgb, b: Rgb) -> i32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).pow(2);
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

fn rgb_to_ansi256(c: Rgb) -> u8 {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let q = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (q(c.0), q(c.1), q(c.2));
    let cube = (
        LEVELS[r6 as usize],
        LEVELS[g6 as usize],
        LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((c.0 as u16 + c.1 as u16 + c.2 as u16) / 3) as u8;
    let step = (avg.saturating_sub(8) / 10).min(23);
    let gray_v = 8 + 10 * step;
    let gray_idx = 232 + step;

    if dist2(c, (gray_v, gray_v, gray_v)) < dist2(c, cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(c: Rgb) -> Color {
    const TABLE: [(Color, Rgb); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];
    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2(c, *rgb))
        .map(|(color, _)| *color)
        .unwrap_or(Color::White)
}

fn convert(mode: ColorMode, c: Rgb) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb {
            r: c.0,
            g: c.1,
            b: c.2,
        }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(c))),
        ColorMode::Color16 => Some(rgb_to_color16(c)),
    }
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t)
        .round()
        .clamp(0.0, 255.0) as u8
}

fn gradient(stops: &[Rgb], steps: usize) -> Vec<Rgb> {
    match (stops.len(), steps) {
        (0, _) | (_, 0) => Vec::new(),
        (1, n) => vec![stops[0]; n],
        (_, 1) => vec![stops[0]],
        (n_stops, n) => (0..n)
            .map(|i| {
                let pos = i as f32 / (n - 1) as f32 * (n_stops - 1) as f32;
                let seg = (pos.floor() as usize).min(n_stops - 2);
                let t = pos - seg as f32;
                let (a, b) = (stops[seg], stops[seg + 1]);
                (lerp(a.0, b.0, t), lerp(a.1, b.1, t), lerp(a.2, b.2, t))
            })
            .collect(),
    }
}

fn shades(mode: ColorMode, stops: &[Rgb]) -> Vec<Color> {
    let mut out: Vec<Color> = gradient(stops, 6)
        .into_iter()
        .filter_map(|c| convert(mode, c))
        .collect();
    out.dedup();
    out
}

pub fn build_palette(mode: ColorMode, default_background: bool) -> Palette {
    let bg = if default_background {
        None
    } else {
        Some(match mode {
            ColorMode::Color16 | ColorMode::Mono => Color::Black,
            ColorMode::TrueColor => Color::Rgb {
                r: 12,
                g: 4,
                b: 10,
            },
            ColorMode::Color256 => Color::AnsiValue(16),
        })
    };

    Palette {
        bg,
        text: convert(mode, TEXT),
        cursor: convert(mode, CURSOR),
        control: convert(mode, CONTROL),
        glow_fg: convert(mode, GLOW_FG),
        glow_bg: convert(mode, GLOW_BG),
        hearts: shades(mode, &HEART_STOPS),
        words: shades(mode, &WORD_STOPS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi256_picks_cube_and_gray() {
        assert_eq!(rgb_to_ansi256((255, 0, 0)), 196);
        assert_eq!(rgb_to_ansi256((0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256((128, 128, 128)), 244);
    }

    #[test]
    fn color16_nearest() {
        assert_eq!(rgb_to_color16((250, 10, 10)), Color::Red);
        assert_eq!(rgb_to_color16((10, 10, 10)), Color::Black);
    }

    #[test]
    fn gradient_hits_both_ends() {
        let g = gradient(&[(0, 0, 0), (255, 255, 255)], 3);
        assert_eq!(g, vec![(0, 0, 0), (128, 128, 128), (255, 255, 255)]);
    }

    #[test]
    fn mono_has_no_colors() {
        let p = build_palette(ColorMode::Mono, false);
        assert!(p.text.is_none());
        assert!(p.hearts.is_empty());
        assert_eq!(p.heart(3), None);
    }

    #[test]
    fn truecolor_shades_are_stable_per_seed() {
        let p = build_palette(ColorMode::TrueColor, true);
        assert!(p.bg.is_none());
        assert_eq!(p.hearts.len(), 6);
        assert_eq!(p.heart(7), p.heart(7 + p.hearts.len() as u64));
        assert!(p.word(1).is_some());
    }
}
