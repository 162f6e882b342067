//! Large block-glyph rendering of the MM:SS readout

use ratatui::{
    style::Style,
    text::{Line, Span},
};

pub const GLYPH_HEIGHT: u16 = 5;

const DIGITS: [[&str; 5]; 10] = [
    ["███", "█ █", "█ █", "█ █", "███"],
    ["  █", "  █", "  █", "  █", "  █"],
    ["███", "  █", "███", "█  ", "███"],
    ["███", "  █", "███", "  █", "███"],
    ["█ █", "█ █", "███", "  █", "  █"],
    ["███", "█  ", "███", "  █", "███"],
    ["███", "█  ", "███", "█ █", "███"],
    ["███", "  █", "  █", "  █", "  █"],
    ["███", "█ █", "███", "█ █", "███"],
    ["███", "█ █", "███", "  █", "███"],
];

const COLON: [&str; 5] = [" ", "█", " ", "█", " "];

fn glyph(c: char) -> Option<&'static [&'static str; 5]> {
    match c {
        ':' => Some(&COLON),
        d => d.to_digit(10).map(|n| &DIGITS[n as usize]),
    }
}

/// Width in cells of `text` rendered with `big_lines`
pub fn big_width(text: &str) -> u16 {
    let glyphs: u16 = text
        .chars()
        .filter_map(glyph)
        .map(|g| g[0].chars().count() as u16)
        .sum();
    let gaps = text.chars().count().saturating_sub(1) as u16;
    glyphs + gaps
}

/// Render `text` (digits and colons) as `GLYPH_HEIGHT` lines of block glyphs
pub fn big_lines(text: &str, style: Style) -> Vec<Line<'static>> {
    (0..GLYPH_HEIGHT as usize)
        .map(|row| {
            let row_text = text
                .chars()
                .filter_map(glyph)
                .map(|g| g[row])
                .collect::<Vec<_>>()
                .join(" ");
            Line::from(Span::styled(row_text, style))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn renders_readout_rows() {
        let lines = big_lines("10:05", Style::default());
        let rows = plain(&lines);
        assert_eq!(rows.len(), GLYPH_HEIGHT as usize);
        assert_eq!(rows[0], "  █ ███   ███ ███");
        assert_eq!(rows[1], "  █ █ █ █ █ █ █  ");
    }

    #[test]
    fn width_counts_gaps() {
        assert_eq!(big_width("00:00"), 3 * 4 + 1 + 4);
        assert_eq!(big_width(""), 0);
    }
}
