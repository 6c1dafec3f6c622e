//! Greedy line breaking over a buffer of code points.

use crate::font::Font;

/// Half-open `[begin, end)` range of buffer indices plus its pixel width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextLine {
    pub begin: usize,
    pub end: usize,
    pub width: f32,
}

impl TextLine {
    fn starting_at(begin: usize) -> Self {
        Self {
            begin,
            end: begin,
            width: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

pub fn is_line_terminator(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Splits `text` into lines no wider than `max_width`, writing them to
/// `lines` and returning the total height (one ascender per line).
///
/// A line ends when the next glyph would overflow or at `\n`/`\r`. The
/// terminator belongs to no line; the following line starts right after it.
/// Code points without a glyph take zero width but still belong to their
/// line. A glyph wider than `max_width` on its own gets a line of its own
/// instead of an empty line before it.
pub fn break_on_lines(text: &[char], font: &Font, max_width: f32, lines: &mut Vec<TextLine>) -> f32 {
    lines.clear();
    let mut line = TextLine::starting_at(0);
    for (i, &code) in text.iter().enumerate() {
        if is_line_terminator(code) {
            lines.push(line);
            line = TextLine::starting_at(i + 1);
            continue;
        }
        let advance = font.advance(code);
        if line.width + advance > max_width && !line.is_empty() {
            lines.push(line);
            line = TextLine {
                begin: i,
                end: i + 1,
                width: advance,
            };
        } else {
            line.width += advance;
            line.end = i + 1;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.len() as f32 * font.ascender()
}
