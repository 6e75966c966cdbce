//! Canonical inline dialect shared by the document and the chat pages.
//!
//! The dialect has two markers: `*bold*` and `<target|display>` links.
//! [`normalize`] rewrites generic markdown into it, [`tokenize`] splits it
//! into [`Run`]s, and [`encoding`] maps text onto the document character set.

pub mod encoding;
pub mod normalize;
pub mod tokenizer;

pub use normalize::normalize;
pub use tokenizer::{plain_text, tokenize};

/// Wrapping character of a bold span.
pub const BOLD_MARKER: char = '*';
/// Opening and closing characters of a link, and the target/display separator.
pub const LINK_OPEN: char = '<';
pub const LINK_CLOSE: char = '>';
pub const LINK_SEPARATOR: char = '|';

/// A maximal span of text sharing one style/link classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    Plain(String),
    Bold(String),
    Link { text: String, target: String },
}

impl Run {
    /// Display text, markers stripped.
    pub fn text(&self) -> &str {
        match self {
            Run::Plain(text) | Run::Bold(text) => text,
            Run::Link { text, .. } => text,
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Run::Link { target, .. } => Some(target),
            _ => None,
        }
    }
}
