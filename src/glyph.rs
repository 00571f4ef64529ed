// Copyright (c) 2026 rezky_nightky

use unicode_width::UnicodeWidthChar;

// Emoji are forced to 2 columns; terminals draw them wide whatever the
// East Asian Width tables say.
pub fn char_width(c: char) -> u16 {
    match c as u32 {
        0xFE00..=0xFE0F | 0x200D => 0,
        0x2600..=0x27BF => 2,
        0x1F300..=0x1F64F => 2,
        0x1F680..=0x1F6FF => 2,
        0x1F900..=0x1F9FF => 2,
        0x1FA70..=0x1FAFF => 2,
        _ => c.width().unwrap_or(0) as u16,
    }
}

pub fn str_width(s: &str) -> u16 {
    s.chars()
        .map(char_width)
        .fold(0u16, |acc, w| acc.saturating_add(w))
}

pub fn visible_chars(s: &str) -> impl Iterator<Item = (char, u16)> + '_ {
    s.chars()
        .map(|c| (c, char_width(c)))
        .filter(|&(_, w)| w > 0)
}

pub fn wrap_columns(line: &str, max_cols: u16) -> Vec<String> {
    let max_cols = max_cols.max(2);
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut cur_w = 0u16;
    for c in line.chars() {
        let w = char_width(c);
        if w > 0 && cur_w + w > max_cols {
            out.push(std::mem::take(&mut cur));
            cur_w = 0;
        }
        cur.push(c);
        cur_w += w;
    }
    out.push(cur);
    out
}
