//! Line breaking: styled spans of one logical line into rows that fit the
//! content width.

use super::metrics::text_width;
use super::render::Canvas;
use super::style::TextStyle;

/// Row height as a multiple of the largest font size in the row.
pub const LEADING: f32 = 1.3;

/// Styled piece of text collected from the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: TextStyle,
    pub link: Option<String>,
}

/// Canvas that gathers the spans of one logical line.
#[derive(Debug, Default)]
pub struct LineBuffer {
    spans: Vec<Span>,
}

impl LineBuffer {
    pub fn into_spans(self) -> Vec<Span> {
        self.spans
    }
}

impl Canvas for LineBuffer {
    fn write(&mut self, text: &str, style: &TextStyle, link: Option<&str>) {
        if let Some(last) = self.spans.last_mut() {
            if last.style == *style && last.link.as_deref() == link {
                last.text.push_str(text);
                return;
            }
        }
        self.spans.push(Span {
            text: text.to_string(),
            style: *style,
            link: link.map(str::to_string),
        });
    }
}

/// Positioned piece of a row; `x` is relative to the left margin.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub x: f32,
    pub width: f32,
    pub text: String,
    pub style: TextStyle,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub fragments: Vec<Fragment>,
    pub height: f32,
}

impl Row {
    /// Largest font size in the row; the baseline sits this far below the top.
    pub fn ascent(&self) -> f32 {
        self.fragments
            .iter()
            .map(|f| f.style.size)
            .fold(0.0, f32::max)
    }

    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

/// Total height of `rows`.
pub fn rows_height(rows: &[Row]) -> f32 {
    rows.iter().map(|r| r.height).sum()
}

/// Greedy word wrap of `spans` into rows no wider than `max_width`.
///
/// Whitespace at the start and end of a row is dropped. A word wider than a
/// whole row is broken between characters.
pub fn wrap(spans: &[Span], max_width: f32) -> Vec<Row> {
    let mut builder = RowBuilder::new(max_width);
    for span in spans {
        for (piece, is_space) in split_words(&span.text) {
            if is_space {
                builder.space(span);
            } else {
                builder.word(piece, span);
            }
        }
    }
    builder.finish()
}

/// Split into alternating runs of whitespace and non-whitespace.
fn split_words(text: &str) -> Vec<(&str, bool)> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                pieces.push((&text[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if let Some(space) = in_space {
        pieces.push((&text[start..], space));
    }
    pieces
}

struct RowBuilder {
    max_width: f32,
    rows: Vec<Row>,
    current: Vec<Fragment>,
    x: f32,
}

impl RowBuilder {
    fn new(max_width: f32) -> Self {
        Self {
            max_width,
            rows: Vec::new(),
            current: Vec::new(),
            x: 0.0,
        }
    }

    /// Any whitespace run becomes a single space; none at the start of a row.
    fn space(&mut self, span: &Span) {
        if self.current.is_empty() {
            return;
        }
        self.place(" ", span);
    }

    fn word(&mut self, piece: &str, span: &Span) {
        let width = text_width(piece, &span.style);
        if self.x + width <= self.max_width {
            self.place(piece, span);
            return;
        }
        if !self.current.is_empty() {
            self.break_row();
        }
        if width <= self.max_width {
            self.place(piece, span);
            return;
        }

        // overlong word: break between characters
        let mut chunk = String::new();
        for ch in piece.chars() {
            let mut candidate = chunk.clone();
            candidate.push(ch);
            if !chunk.is_empty() && self.x + text_width(&candidate, &span.style) > self.max_width {
                self.place(&chunk, span);
                self.break_row();
                chunk.clear();
            }
            chunk.push(ch);
        }
        if !chunk.is_empty() {
            self.place(&chunk, span);
        }
    }

    fn place(&mut self, piece: &str, span: &Span) {
        let width = text_width(piece, &span.style);
        if let Some(last) = self.current.last_mut() {
            if last.style == span.style && last.link == span.link {
                last.text.push_str(piece);
                last.width = text_width(&last.text, &last.style);
                self.x = last.x + last.width;
                return;
            }
        }
        self.current.push(Fragment {
            x: self.x,
            width,
            text: piece.to_string(),
            style: span.style,
            link: span.link.clone(),
        });
        self.x += width;
    }

    fn break_row(&mut self) {
        while let Some(last) = self.current.last_mut() {
            let trimmed_len = last.text.trim_end().len();
            if trimmed_len == last.text.len() {
                break;
            }
            last.text.truncate(trimmed_len);
            if last.text.is_empty() {
                self.current.pop();
            } else {
                last.width = text_width(&last.text, &last.style);
                break;
            }
        }

        if !self.current.is_empty() {
            let fragments = std::mem::take(&mut self.current);
            let height = fragments
                .iter()
                .map(|f| f.style.size * LEADING)
                .fold(0.0, f32::max);
            self.rows.push(Row { fragments, height });
        }
        self.x = 0.0;
    }

    fn finish(mut self) -> Vec<Row> {
        self.break_row();
        self.rows
    }
}
