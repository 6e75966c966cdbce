//! Style-run renderer: writes tokenized runs onto a [`Canvas`].

use super::style::{Color, StyleStack, TextStyle};
use crate::markup::encoding::to_document_charset;
use crate::markup::Run;

/// Surface that receives styled text.
///
/// The canvas keeps no style of its own: every write carries the style to use.
pub trait Canvas {
    fn write(&mut self, text: &str, style: &TextStyle, link: Option<&str>);
}

/// How link runs are decorated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStyle {
    pub color: Color,
    pub underline: bool,
}

/// Write `runs` in order. Bold and link runs push a derived style and pop it
/// afterwards, so `styles` is left exactly as it was found.
///
/// Text is mapped onto the document character set before it reaches the canvas.
pub fn render<C: Canvas + ?Sized>(
    runs: &[Run],
    styles: &mut StyleStack,
    link_style: &LinkStyle,
    canvas: &mut C,
) {
    for run in runs {
        let text = to_document_charset(run.text());
        if text.is_empty() {
            continue;
        }

        match run {
            Run::Plain(_) => canvas.write(&text, styles.current(), None),
            Run::Bold(_) => {
                let bold = styles.current().bold();
                styles.with(bold, |s| canvas.write(&text, s.current(), None));
            }
            Run::Link { target, .. } => {
                let linked = styles
                    .current()
                    .with_color(link_style.color)
                    .with_underline(link_style.underline);
                styles.with(linked, |s| canvas.write(&text, s.current(), Some(target.as_str())));
            }
        }
    }
}
