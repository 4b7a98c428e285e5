//! Text handling for the standard Helvetica fonts.

/// Advance widths of Helvetica for ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const DEFAULT_WIDTH: u16 = 556;

/// Bold glyphs are roughly this much wider on average
const BOLD_FACTOR: f32 = 1.06;

const ELLIPSIS: &str = "...";

fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

fn scaled(units: u64, size: f32, bold: bool) -> f32 {
    let width = units as f32 * size / 1000.0;
    if bold {
        width * BOLD_FACTOR
    } else {
        width
    }
}

/// Approximate rendered width of `text` in points
#[must_use]
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u64 = text.chars().map(|c| u64::from(char_width(c))).sum();
    scaled(units, size, bold)
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`
#[must_use]
pub fn fit_text(text: &str, max_width: f32, size: f32, bold: bool) -> String {
    if text_width(text, size, bold) <= max_width {
        return text.to_string();
    }

    let budget = max_width - text_width(ELLIPSIS, size, bold);
    if budget < 0.0 {
        return String::new();
    }

    let mut units = 0u64;
    let mut cut = 0;
    for (i, c) in text.char_indices() {
        units += u64::from(char_width(c));
        if scaled(units, size, bold) > budget {
            break;
        }
        cut = i + c.len_utf8();
    }
    format!("{}{ELLIPSIS}", text[..cut].trim_end())
}

/// Encode text for a font using `WinAnsiEncoding`
///
/// Latin-1 characters map directly; a few common typographic characters are
/// mapped to their WinAnsi slots and everything else becomes `?`.
#[must_use]
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2026}' => 0x85,
            '\u{20AC}' => 0x80,
            '\t' | '\n' | '\r' => b' ',
            c if (' '..='~').contains(&c) || ('\u{A0}'..='\u{FF}').contains(&c) => c as u8,
            _ => b'?',
        })
        .collect()
}
