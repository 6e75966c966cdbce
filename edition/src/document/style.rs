//! Text styles and the explicit style stack used while rendering runs.

/// RGB colour, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

/// Newspaper palette
pub mod palette {
    use super::Color;

    /// Deep navy: masthead title, sub-headings
    pub const PRIMARY: Color = Color::rgb(26, 54, 93);
    /// Deep crimson: section titles, links
    pub const ACCENT: Color = Color::rgb(185, 28, 28);
    pub const TEXT_DARK: Color = Color::rgb(15, 23, 42);
    pub const TEXT_GRAY: Color = Color::rgb(100, 116, 139);
    pub const BODY: Color = Color::rgb(30, 30, 30);
    /// Learning corner heading
    pub const LEARNING: Color = Color::rgb(39, 174, 96);
    pub const LEARNING_BODY: Color = Color::rgb(60, 60, 60);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Times,
    Helvetica,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    Regular,
    Bold,
}

/// Everything that decides how a piece of text is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub family: FontFamily,
    pub weight: Weight,
    pub italic: bool,
    /// Font size in points
    pub size: f32,
    pub color: Color,
    pub underline: bool,
}

impl TextStyle {
    pub fn new(family: FontFamily, size: f32, color: Color) -> Self {
        Self {
            family,
            weight: Weight::Regular,
            italic: false,
            size,
            color,
            underline: false,
        }
    }

    pub fn bold(self) -> Self {
        Self {
            weight: Weight::Bold,
            ..self
        }
    }

    pub fn italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn with_underline(self, underline: bool) -> Self {
        Self { underline, ..self }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == Weight::Bold
    }
}

/// Style stack threaded through the renderer instead of mutable canvas state.
///
/// The base style is never popped; every push is matched by a pop restoring
/// the exact style captured before it.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleStack {
    base: TextStyle,
    pushed: Vec<TextStyle>,
}

impl StyleStack {
    pub fn new(base: TextStyle) -> Self {
        Self {
            base,
            pushed: Vec::new(),
        }
    }

    pub fn current(&self) -> &TextStyle {
        self.pushed.last().unwrap_or(&self.base)
    }

    pub fn depth(&self) -> usize {
        self.pushed.len()
    }

    pub fn push(&mut self, style: TextStyle) {
        self.pushed.push(style);
    }

    pub fn pop(&mut self) -> Option<TextStyle> {
        self.pushed.pop()
    }

    /// Run `f` with `style` on top of the stack, then restore the previous top.
    pub fn with<R>(&mut self, style: TextStyle, f: impl FnOnce(&Self) -> R) -> R {
        let depth = self.depth();
        self.push(style);
        let result = f(self);
        self.pop();
        debug_assert_eq!(self.depth(), depth);
        result
    }
}
