//! Mapping of text onto the document character set (Latin-1 / WinAnsi).
//!
//! Characters outside the set are swapped for their nearest visual
//! equivalent. Pictographs and invisible joiners are dropped; anything else
//! becomes `?`.

use std::borrow::Cow;
use tracing::debug;

/// Map `text` onto the document character set. Borrows when nothing changes.
pub fn to_document_charset(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_document_char) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut replaced = 0usize;
    for ch in text.chars() {
        if is_document_char(ch) {
            out.push(ch);
            continue;
        }
        match substitute(ch) {
            Substitution::Text(s) => out.push_str(s),
            Substitution::Drop => {}
            Substitution::Unknown => {
                replaced += 1;
                out.push('?');
            }
        }
    }
    if replaced > 0 {
        debug!(replaced, "characters without a document substitution");
    }
    Cow::Owned(out)
}

/// Upper-case `text` without leaving the document character set.
///
/// Characters whose upper case falls outside the set (`µ`, `ÿ`) are kept as
/// they are. The result of [`to_document_charset`] stays in the set.
pub fn to_document_uppercase(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.to_uppercase().all(is_document_char) {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// True when `ch` can be written to the document as-is.
pub fn is_document_char(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\n' | '\u{a0}'..='\u{ff}')
}

enum Substitution {
    Text(&'static str),
    Drop,
    Unknown,
}

fn substitute(ch: char) -> Substitution {
    use Substitution::{Drop, Text, Unknown};
    match ch {
        '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{201b}' | '\u{2032}' => Text("'"),
        '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{201f}' | '\u{2033}' => Text("\""),
        '\u{2010}'..='\u{2015}' | '\u{2212}' => Text("-"),
        '\u{2026}' => Text("..."),
        '\u{2022}' | '\u{2023}' | '\u{2043}' | '\u{25aa}' | '\u{25cf}' => Text("*"),
        '\u{2039}' => Text("<"),
        '\u{203a}' => Text(">"),
        '\u{20ac}' => Text("EUR"),
        '\u{2122}' => Text("(TM)"),
        '\t' | '\u{2000}'..='\u{200a}' | '\u{202f}' | '\u{205f}' | '\u{3000}' => Text(" "),
        '\r' | '\u{200b}'..='\u{200f}' | '\u{2060}' | '\u{feff}' | '\u{fe00}'..='\u{fe0f}' => Drop,
        // flags, emoji, dingbats and misc symbols
        '\u{2600}'..='\u{27bf}' | '\u{1f000}'..='\u{1faff}' | '\u{e0000}'..='\u{e007f}' => Drop,
        _ => Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_stays_in_document_charset() {
        let upper = to_document_uppercase("Café 5\u{b5}m naïve \u{ff} stra\u{df}e");
        assert_eq!(upper, "CAFÉ 5\u{b5}M NAÏVE \u{ff} STRASSE");
        assert!(upper.chars().all(is_document_char));
    }

    #[test]
    fn ascii_and_latin1_are_borrowed() {
        assert!(matches!(to_document_charset("plain text"), Cow::Borrowed(_)));
        assert!(matches!(to_document_charset("Café déjà"), Cow::Borrowed(_)));
    }

    #[test]
    fn typographic_punctuation_is_substituted() {
        assert_eq!(
            to_document_charset("\u{201c}Rates\u{201d} rose \u{2014} it\u{2019}s official\u{2026}"),
            "\"Rates\" rose - it's official..."
        );
        assert_eq!(to_document_charset("\u{2022} item"), "* item");
    }

    #[test]
    fn emoji_are_dropped() {
        assert_eq!(to_document_charset("\u{2696}\u{fe0f} International Law"), " International Law");
        assert_eq!(to_document_charset("\u{1f4f0} News"), " News");
    }

    #[test]
    fn unknown_characters_become_question_marks() {
        assert_eq!(to_document_charset("\u{4e2d}\u{6587}"), "??");
        assert_eq!(to_document_charset("\u{85}"), "?");
    }

    #[test]
    fn output_is_always_in_document_charset() {
        let out = to_document_charset("mixed \u{2018}x\u{2019} \u{3b1}\u{3b2} \u{1f600}\t\u{20ac}5");
        assert!(out.chars().all(is_document_char), "{out:?}");
    }
}
