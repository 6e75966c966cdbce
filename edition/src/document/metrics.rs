//! Advance widths of the standard Times and Helvetica faces.
//!
//! Printable ASCII comes from the AFM tables of each face (1/1000 em).
//! Italics share the widths of their upright weight. Latin-1 letters outside
//! ASCII are measured with a representative glyph.

use super::style::{FontFamily, TextStyle, Weight};

const FIRST: u32 = 0x20;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015,                                             // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // 'N'..'Z'
    278, 278, 278, 469, 556, 333,                                                   // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // 'n'..'z'
    334, 260, 334, 584,                                                             // '{'..'~'
];

#[rustfmt::skip]
const TIMES: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

fn table(family: FontFamily, weight: Weight) -> &'static [u16; 95] {
    match (family, weight) {
        (FontFamily::Times, Weight::Regular) => &TIMES,
        (FontFamily::Times, Weight::Bold) => &TIMES_BOLD,
        (FontFamily::Helvetica, Weight::Regular) => &HELVETICA,
        (FontFamily::Helvetica, Weight::Bold) => &HELVETICA_BOLD,
    }
}

/// Advance width of `ch` in 1/1000 em.
fn glyph_width(widths: &[u16; 95], ch: char) -> u16 {
    let code = u32::from(ch);
    if (FIRST..FIRST + 95).contains(&code) {
        return widths[(code - FIRST) as usize];
    }
    let stand_in = if ch.is_uppercase() {
        'O'
    } else if ch.is_alphabetic() {
        'n'
    } else if ch == '\u{a0}' {
        ' '
    } else {
        'o'
    };
    widths[(u32::from(stand_in) - FIRST) as usize]
}

/// Width of `text` in points when drawn in `style`.
pub fn text_width(text: &str, style: &TextStyle) -> f32 {
    let widths = table(style.family, style.weight);
    let units: u32 = text.chars().map(|ch| u32::from(glyph_width(widths, ch))).sum();
    units as f32 / 1000.0 * style.size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::style::palette;

    #[test]
    fn known_widths() {
        let helv = TextStyle::new(FontFamily::Helvetica, 10.0, palette::BODY);
        // H(722) + i(222)
        assert!((text_width("Hi", &helv) - 9.44).abs() < 1e-4);

        let times = TextStyle::new(FontFamily::Times, 1000.0, palette::BODY);
        assert_eq!(text_width(" ", &times), 250.0);
        assert_eq!(text_width("~", &times), 541.0);
    }

    #[test]
    fn bold_is_wider() {
        let regular = TextStyle::new(FontFamily::Times, 11.0, palette::BODY);
        assert!(text_width("Headline", &regular.bold()) > text_width("Headline", &regular));
    }

    #[test]
    fn bold_uses_its_own_metrics() {
        let times = TextStyle::new(FontFamily::Times, 1000.0, palette::BODY).bold();
        // Times-Bold r is 444 against 333 upright, far from any flat factor
        assert_eq!(text_width("r", &times), 444.0);
        assert_eq!(text_width("W", &times), 1000.0);

        let helv = TextStyle::new(FontFamily::Helvetica, 1000.0, palette::BODY).bold();
        assert_eq!(text_width("i", &helv), 278.0);
        assert_eq!(text_width("Hi", &helv), 1000.0);
    }

    #[test]
    fn latin1_letters_have_width() {
        let style = TextStyle::new(FontFamily::Times, 10.0, palette::BODY);
        assert_eq!(text_width("\u{e9}", &style), text_width("n", &style));
        assert_eq!(text_width("\u{c9}", &style), text_width("O", &style));
        assert_eq!(text_width("", &style), 0.0);
    }
}
