//! Generic markdown to canonical dialect.
//!
//! 1. `[text](https://url)` becomes `<https://url|text>`
//! 2. `**text**` becomes `*text*`
//! 3. `### text` and `###text` lines become `*text*`; a single `#` needs the
//!    space so `#hashtag` stays as written
//!
//! Canonical links already present are copied through untouched.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]<>\n]+)\]\((https?://[^()\s<>|]+)\)").unwrap());
static DOUBLE_BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").unwrap());
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:#{1,6}[ \t]+|#{2,6})(.*?)[ \t]*$").unwrap());
// Same acceptance rule as the tokenizer's link parser.
static CANONICAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>|\s]+\|[^<>\n]+>").unwrap());

// Realistic input settles in two passes.
const MAX_PASSES: usize = 8;

/// Rewrite generic markdown into the canonical inline dialect.
///
/// Total and deterministic; applying it twice gives the same result as once.
pub fn normalize(markdown: &str) -> String {
    let mut current = normalize_once(markdown);
    for _ in 0..MAX_PASSES {
        let next = normalize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn normalize_once(text: &str) -> String {
    let linked = map_outside_links(text, |gap| {
        MARKDOWN_LINK
            .replace_all(gap, |caps: &Captures| {
                let display = caps[1].replace('*', "");
                if display.trim().is_empty() {
                    caps[0].to_string()
                } else {
                    format!("<{}|{}>", &caps[2], display)
                }
            })
            .into_owned()
    });

    let bolded = map_outside_links(&linked, collapse_double_bold);

    bolded
        .split('\n')
        .map(rewrite_heading)
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_double_bold(gap: &str) -> String {
    let mut current = gap.to_string();
    loop {
        let next = DOUBLE_BOLD.replace_all(&current, "*$1*").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn rewrite_heading(line: &str) -> Cow<'_, str> {
    let Some(caps) = HEADING.captures(line) else {
        return Cow::Borrowed(line);
    };
    let content = map_outside_links(&caps[1], |gap| gap.replace('*', ""));
    if content.trim().is_empty() {
        return Cow::Borrowed(line);
    }
    Cow::Owned(format!("*{content}*"))
}

/// Apply `f` to every stretch of text between canonical links.
fn map_outside_links(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for link in CANONICAL_LINK.find_iter(text) {
        out.push_str(&f(&text[last..link.start()]));
        out.push_str(link.as_str());
        last = link.end();
    }
    out.push_str(&f(&text[last..]));
    out
}
