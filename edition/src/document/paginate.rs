//! Document paginator: lays titled sections onto fixed-size pages under a
//! masthead that is redrawn identically on every page.
//!
//! Coordinates are points with the origin at the top-left corner of the page;
//! text `y` is the baseline. Page breaks are greedy and single-pass: a block
//! (title block or one source line with all its wrapped rows) goes on the
//! current page if it fits, otherwise on a fresh one. Blocks are never split.

use chrono::NaiveDate;
use common::{DocumentConfig, Section, Supplement};
use tracing::{debug, warn};

use super::layout::{rows_height, wrap, LineBuffer, Row, Span, LEADING};
use super::metrics::text_width;
use super::render::{render, LinkStyle};
use super::style::{palette, Color, FontFamily, StyleStack, TextStyle};
use crate::markup::encoding::{to_document_charset, to_document_uppercase};
use crate::markup::{tokenize, Run};

const MM: f32 = 72.0 / 25.4;

/// Fixed header block of every page
#[derive(Debug, Clone, PartialEq)]
pub struct Masthead {
    pub title: String,
    pub volume: String,
    pub edition: String,
    pub date: NaiveDate,
}

impl Masthead {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            title: "Daily Law, Politics & Tech Journal".to_string(),
            volume: "VOL. CXXIV ... No. 58,402".to_string(),
            edition: "LONDON & NEW YORK EDITION".to_string(),
            date,
        }
    }

    /// e.g. "FRIDAY, OCTOBER 16, 2026"
    pub fn date_label(&self) -> String {
        to_document_uppercase(&self.date.format("%A, %B %d, %Y").to_string())
    }
}

/// Page geometry and fixed furniture. Lengths in points.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub masthead: Masthead,
    /// Written before the title under every section heading; `None` disables it.
    pub headline_prefix: Option<String>,
    pub page_numbers: bool,
}

impl PageLayout {
    /// A4 portrait, 10 mm side margins and a 20 mm bottom margin.
    pub fn a4(masthead: Masthead) -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_left: 10.0 * MM,
            margin_right: 10.0 * MM,
            margin_top: 10.0 * MM,
            margin_bottom: 20.0 * MM,
            masthead,
            headline_prefix: Some("Latest Developments in".to_string()),
            page_numbers: false,
        }
    }

    pub fn from_config(config: &DocumentConfig, date: NaiveDate) -> Self {
        let mut masthead = Masthead::new(date);
        if let Some(title) = &config.masthead.title {
            masthead.title = title.clone();
        }
        if let Some(volume) = &config.masthead.volume {
            masthead.volume = volume.clone();
        }
        if let Some(edition) = &config.masthead.edition {
            masthead.edition = edition.clone();
        }

        let defaults = Self::a4(masthead);
        Self {
            width: config.page_width.unwrap_or(defaults.width),
            height: config.page_height.unwrap_or(defaults.height),
            margin_left: config.margin_left.unwrap_or(defaults.margin_left),
            margin_right: config.margin_right.unwrap_or(defaults.margin_right),
            margin_top: config.margin_top.unwrap_or(defaults.margin_top),
            margin_bottom: config.margin_bottom.unwrap_or(defaults.margin_bottom),
            headline_prefix: match &config.headline_prefix {
                Some(prefix) if prefix.trim().is_empty() => None,
                Some(prefix) => Some(prefix.clone()),
                None => defaults.headline_prefix.clone(),
            },
            page_numbers: config.page_numbers.unwrap_or(false),
            masthead: defaults.masthead,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest y any body block may reach.
    pub fn body_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

/// One drawing instruction. `Link` marks an actionable area, drawn nowhere.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Color,
    },
    Link {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        target: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based
    pub number: usize,
    pub ops: Vec<DrawOp>,
    /// Number of leading ops drawn by the masthead
    pub masthead_len: usize,
    /// Top of the next free line
    pub cursor: f32,
}

impl Page {
    pub fn masthead_ops(&self) -> &[DrawOp] {
        &self.ops[..self.masthead_len]
    }

    pub fn body_ops(&self) -> &[DrawOp] {
        &self.ops[self.masthead_len..]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

/// Lay `sections` out in input order.
pub fn paginate(sections: &[Section], layout: &PageLayout) -> Document {
    let mut paginator = Paginator::new(layout);
    for section in sections {
        paginator.section(section);
    }
    paginator.finish()
}

/// Incremental form of [`paginate`], for callers adding a closing supplement.
pub struct Paginator<'a> {
    layout: &'a PageLayout,
    pages: Vec<Page>,
    current: Page,
    /// Nothing but the masthead on the current page yet
    fresh: bool,
}

struct Block {
    /// Space above the block, dropped at the top of a page
    lead: f32,
    rows: Vec<Row>,
    rules: Vec<Rule>,
    /// Extra height below the rows that belongs to the block
    tail: f32,
    /// Space added after the block, never forcing a break
    trail: f32,
}

/// Horizontal rule starting at the left margin, `offset` below the block top.
struct Rule {
    offset: f32,
    length: f32,
    width: f32,
    color: Color,
}

impl Block {
    fn height(&self) -> f32 {
        rows_height(&self.rows) + self.tail
    }
}

fn link_style() -> LinkStyle {
    LinkStyle {
        color: palette::ACCENT,
        underline: true,
    }
}

fn body_style() -> TextStyle {
    TextStyle::new(FontFamily::Times, 11.0, palette::BODY)
}

fn subheading_style() -> TextStyle {
    TextStyle::new(FontFamily::Times, 12.0, palette::PRIMARY).bold()
}

impl<'a> Paginator<'a> {
    pub fn new(layout: &'a PageLayout) -> Self {
        let current = new_page(layout, 1);
        Self {
            layout,
            pages: Vec::new(),
            current,
            fresh: true,
        }
    }

    /// Title block, optional headline, then the body line by line.
    pub fn section(&mut self, section: &Section) {
        let title = to_document_charset(section.title.trim()).trim().to_string();
        let title_style = TextStyle::new(FontFamily::Times, 16.0, palette::ACCENT).bold();
        let mut rows = self.text_rows(&to_document_uppercase(&title), title_style);
        let rule_y = rows_height(&rows);

        if let Some(prefix) = &self.layout.headline_prefix {
            let headline = to_document_charset(&format!("{prefix} {title}")).into_owned();
            let headline_style = TextStyle::new(FontFamily::Times, 14.0, palette::TEXT_DARK).bold();
            // room for the accent rule between title and headline
            rows.push(Row {
                fragments: Vec::new(),
                height: 5.0 * MM,
            });
            rows.extend(self.text_rows(&headline, headline_style));
        }

        self.place(Block {
            lead: 4.0 * MM,
            rows,
            rules: vec![Rule {
                offset: rule_y,
                length: 50.0 * MM,
                width: 1.0 * MM,
                color: palette::ACCENT,
            }],
            tail: 2.0 * MM,
            trail: 0.0,
        });

        self.body(&section.body, body_style());
    }

    /// Closing "learning corner" block.
    pub fn supplement(&mut self, supplement: &Supplement) {
        let title = format!("LEARNING CORNER: {}", supplement.title.trim());
        let title = to_document_charset(&title).into_owned();
        let title_style = TextStyle::new(FontFamily::Helvetica, 12.0, palette::LEARNING).bold();
        let rows = self.text_rows(&title, title_style);
        let rule_y = rows_height(&rows);

        self.place(Block {
            lead: 5.0 * MM,
            rows,
            rules: vec![Rule {
                offset: rule_y,
                length: self.layout.content_width(),
                width: 0.3 * MM,
                color: palette::LEARNING,
            }],
            tail: 3.0 * MM,
            trail: 0.0,
        });

        let content_style = TextStyle::new(FontFamily::Times, 11.0, palette::LEARNING_BODY).italic();
        self.body(&supplement.content, content_style);
    }

    pub fn finish(mut self) -> Document {
        let mut last = self.current;
        if self.layout.page_numbers {
            draw_footer(&mut last, self.layout);
        }
        self.pages.push(last);
        debug!(pages = self.pages.len(), "document paginated");
        Document {
            width: self.layout.width,
            height: self.layout.height,
            pages: self.pages,
        }
    }

    fn body(&mut self, body: &str, base: TextStyle) {
        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let heading = is_heading_line(line);
            let (text, style) = if heading {
                (line.trim_start_matches('#').trim_start(), subheading_style())
            } else {
                (line, base)
            };

            let mut runs = tokenize(text);
            if heading {
                strip_heading_wrapper(&mut runs);
            }

            let mut styles = StyleStack::new(style);
            let mut buffer = LineBuffer::default();
            render(&runs, &mut styles, &link_style(), &mut buffer);
            let rows = wrap(&buffer.into_spans(), self.layout.content_width());
            if rows.is_empty() {
                continue;
            }

            self.place(Block {
                lead: if heading { 4.0 * MM } else { 0.0 },
                rows,
                rules: Vec::new(),
                tail: 0.0,
                trail: if heading { 0.0 } else { style.size * LEADING },
            });
        }
        self.advance(3.0 * MM);
    }

    fn text_rows(&self, text: &str, style: TextStyle) -> Vec<Row> {
        let span = Span {
            text: text.to_string(),
            style,
            link: None,
        };
        wrap(&[span], self.layout.content_width())
    }

    fn place(&mut self, block: Block) {
        let height = block.height();
        let bottom = self.layout.body_bottom();

        if !self.fresh && self.current.cursor + block.lead + height > bottom {
            self.break_page();
        }
        if !self.fresh {
            self.current.cursor += block.lead;
        }
        if self.current.cursor + height > bottom {
            warn!(
                page = self.current.number,
                height,
                available = bottom - self.current.cursor,
                "block taller than a page, letting it overflow"
            );
        }

        let left = self.layout.margin_left;
        let top = self.current.cursor;
        let mut y = top;
        for row in &block.rows {
            draw_row(&mut self.current.ops, row, left, y);
            y += row.height;
        }
        for rule in block.rules {
            self.current.ops.push(DrawOp::Rule {
                x1: left,
                x2: left + rule.length,
                y: top + rule.offset + rule.width,
                width: rule.width,
                color: rule.color,
            });
        }

        self.current.cursor = y + block.tail;
        self.fresh = false;
        self.advance(block.trail);
    }

    fn advance(&mut self, amount: f32) {
        if !self.fresh {
            self.current.cursor += amount;
        }
    }

    fn break_page(&mut self) {
        let number = self.current.number + 1;
        let next = new_page(self.layout, number);
        let done = std::mem::replace(&mut self.current, next);
        self.push_page(done);
        self.fresh = true;
        debug!(page = number, "page break");
    }

    fn push_page(&mut self, mut page: Page) {
        if self.layout.page_numbers {
            draw_footer(&mut page, self.layout);
        }
        self.pages.push(page);
    }
}

/// Numbered item, bold lead-in or heading marker.
fn is_heading_line(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    (digits > 0 && line[digits..].starts_with('.')) || line.starts_with('*') || line.starts_with('#')
}

/// Drop a bold wrapper left unmatched around a heading that contains a link,
/// e.g. `*See <url|this>*`.
fn strip_heading_wrapper(runs: &mut Vec<Run>) {
    if runs.len() < 2 {
        return;
    }
    let opens = matches!(runs.first(), Some(Run::Plain(t)) if t.starts_with('*'));
    let closes = matches!(runs.last(), Some(Run::Plain(t)) if t.ends_with('*'));
    if !(opens && closes) {
        return;
    }
    if let Some(Run::Plain(t)) = runs.first_mut() {
        t.remove(0);
    }
    if let Some(Run::Plain(t)) = runs.last_mut() {
        t.pop();
    }
    runs.retain(|run| !run.text().is_empty());
}

fn draw_row(ops: &mut Vec<DrawOp>, row: &Row, left: f32, top: f32) {
    let baseline = top + row.ascent();
    for fragment in &row.fragments {
        let x = left + fragment.x;
        ops.push(DrawOp::Text {
            x,
            y: baseline,
            text: fragment.text.clone(),
            style: fragment.style,
        });
        if fragment.style.underline {
            ops.push(DrawOp::Rule {
                x1: x,
                x2: x + fragment.width,
                y: baseline + fragment.style.size * 0.12,
                width: fragment.style.size * 0.05,
                color: fragment.style.color,
            });
        }
        if let Some(target) = &fragment.link {
            ops.push(DrawOp::Link {
                x,
                y: top,
                width: fragment.width,
                height: row.height,
                target: target.clone(),
            });
        }
    }
}

fn new_page(layout: &PageLayout, number: usize) -> Page {
    let (ops, bottom) = draw_masthead(layout);
    Page {
        number,
        masthead_len: ops.len(),
        ops,
        cursor: bottom,
    }
}

/// Masthead ops and the y where the body starts.
fn draw_masthead(layout: &PageLayout) -> (Vec<DrawOp>, f32) {
    let masthead = &layout.masthead;
    let left = layout.margin_left;
    let right = layout.width - layout.margin_right;
    let column = layout.content_width() / 3.0;
    let mut ops = Vec::new();

    // metadata bar: volume | date | edition
    let meta = TextStyle::new(FontFamily::Helvetica, 12.0, palette::TEXT_GRAY).italic();
    let mut y = layout.margin_top;
    let baseline = y + meta.size;
    let volume = to_document_charset(&masthead.volume).into_owned();
    let date = to_document_charset(&masthead.date_label()).into_owned();
    let edition = to_document_charset(&masthead.edition).into_owned();
    let columns = [
        (left, volume),
        (left + column + (column - text_width(&date, &meta)) / 2.0, date),
        (right - text_width(&edition, &meta), edition),
    ];
    for (x, text) in columns {
        ops.push(DrawOp::Text {
            x,
            y: baseline,
            text,
            style: meta,
        });
    }
    y += 5.0 * MM + 2.0 * MM;

    let title_style = TextStyle::new(FontFamily::Times, 36.0, palette::PRIMARY).bold();
    let title = to_document_charset(&masthead.title).into_owned();
    let title_x = left + (layout.content_width() - text_width(&title, &title_style)) / 2.0;
    ops.push(DrawOp::Text {
        x: title_x.max(left),
        y: y + title_style.size,
        text: title,
        style: title_style,
    });
    y += 15.0 * MM + 2.0 * MM;

    // double rule
    ops.push(DrawOp::Rule {
        x1: left,
        x2: right,
        y,
        width: 0.6 * MM,
        color: palette::TEXT_DARK,
    });
    y += 1.0 * MM;
    ops.push(DrawOp::Rule {
        x1: left,
        x2: right,
        y,
        width: 0.3 * MM,
        color: palette::TEXT_DARK,
    });
    y += 5.0 * MM;

    (ops, y)
}

fn draw_footer(page: &mut Page, layout: &PageLayout) {
    let style = TextStyle::new(FontFamily::Helvetica, 8.0, palette::TEXT_GRAY).italic();
    let text = format!("Page {}", page.number);
    let x = layout.margin_left + (layout.content_width() - text_width(&text, &style)) / 2.0;
    page.ops.push(DrawOp::Text {
        x,
        y: layout.height - layout.margin_bottom / 2.0,
        text,
        style,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::encoding::is_document_char;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn layout() -> PageLayout {
        PageLayout::a4(Masthead::new(date()))
    }

    fn texts(ops: &[DrawOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn long_body(paragraphs: usize) -> String {
        (0..paragraphs)
            .map(|i| format!("Paragraph {i} says *something* about <https://n.io/{i}|the news> today."))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn masthead_date_label() {
        assert_eq!(Masthead::new(date()).date_label(), "FRIDAY, OCTOBER 16, 2026");
    }

    #[test]
    fn empty_input_is_one_page_with_masthead() {
        let doc = paginate(&[], &layout());
        assert_eq!(doc.pages.len(), 1);
        let page = &doc.pages[0];
        assert!(page.body_ops().is_empty());
        assert_eq!(
            texts(page.masthead_ops()),
            [
                "VOL. CXXIV ... No. 58,402",
                "FRIDAY, OCTOBER 16, 2026",
                "LONDON & NEW YORK EDITION",
                "Daily Law, Politics & Tech Journal",
            ]
        );
    }

    #[test]
    fn section_title_headline_and_body_in_order() {
        let sections = [Section::new(
            "\u{1f4bb} Tech & Innovation",
            "### Chips\nPer <https://x.com|X News>, *rates rose* today.",
        )];
        let doc = paginate(&sections, &layout());
        let body = texts(doc.pages[0].body_ops());
        assert_eq!(body[0], "TECH & INNOVATION");
        assert_eq!(body[1], "Latest Developments in Tech & Innovation");
        assert_eq!(body[2], "Chips");
        assert_eq!(&body[3..], ["Per ", "X News", ", ", "rates rose", " today."]);

        let links: Vec<_> = doc.pages[0]
            .body_ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Link { target, .. } => Some(target.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(links, ["https://x.com"]);
    }

    #[test]
    fn heading_lines_use_subheading_style_for_that_line_only() {
        let sections = [Section::new("Law", "1. *First* item\nplain follow-up\n*See <https://u.io|this>*")];
        let mut layout = layout();
        layout.headline_prefix = None;
        let doc = paginate(&sections, &layout);

        let styled: Vec<(&str, TextStyle)> = doc.pages[0]
            .body_ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, style, .. } => Some((text.as_str(), *style)),
                _ => None,
            })
            .collect();

        let find = |needle: &str| styled.iter().find(|(t, _)| *t == needle).map(|(_, s)| *s);
        let first = find("1. First item").expect("heading merged into one fragment");
        assert_eq!(first, subheading_style());
        assert_eq!(find("plain follow-up"), Some(body_style()));
        assert_eq!(find("See "), Some(subheading_style()));
        assert!(styled.iter().all(|(t, _)| !t.contains('*')));
    }

    #[test]
    fn long_sections_break_pages_without_splitting_lines() {
        let sections = [
            Section::new("International Law", long_body(60)),
            Section::new("Tech", long_body(60)),
        ];
        let layout = layout();
        let doc = paginate(&sections, &layout);
        assert!(doc.pages.len() > 2);

        let first_masthead = doc.pages[0].masthead_ops().to_vec();
        for (i, page) in doc.pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            assert_eq!(page.masthead_ops(), first_masthead.as_slice());
            for op in page.body_ops() {
                if let DrawOp::Text { y, .. } = op {
                    assert!(*y <= layout.body_bottom(), "text below body area on page {}", page.number);
                }
            }
        }

        // every paragraph appears exactly once, whole, on a single page
        for i in 0..60 {
            let needle = format!("Paragraph {i} says ");
            let hits: usize = doc
                .pages
                .iter()
                .map(|p| texts(p.body_ops()).iter().filter(|t| **t == needle).count())
                .sum();
            assert_eq!(hits, 2, "paragraph {i}");
        }
    }

    #[test]
    fn wrapped_paragraph_moves_to_next_page_whole() {
        let mut layout = layout();
        layout.headline_prefix = None;
        let para = "word ".repeat(400);
        let body = format!("{}\n{}", long_body(38), para.trim());
        let doc = paginate(&[Section::new("Tech", body)], &layout);

        let owner: Vec<usize> = doc
            .pages
            .iter()
            .filter(|p| texts(p.body_ops()).iter().any(|t| t.starts_with("word word")))
            .map(|p| p.number)
            .collect();
        assert_eq!(owner.len(), 1, "wrapped paragraph split across pages: {owner:?}");
    }

    #[test]
    fn oversize_block_is_written_not_dropped() {
        let mut layout = layout();
        layout.headline_prefix = None;
        let huge = "word ".repeat(6000);
        let doc = paginate(&[Section::new("Tech", huge.trim())], &layout);
        let words: usize = doc
            .pages
            .iter()
            .flat_map(|p| texts(p.body_ops()))
            .map(|t| t.split_whitespace().count())
            .sum();
        assert_eq!(words, 6000 + 1);
    }

    #[test]
    fn footer_page_numbers() {
        let mut layout = layout();
        layout.page_numbers = true;
        let doc = paginate(&[Section::new("Tech", long_body(80))], &layout);
        for page in &doc.pages {
            assert_eq!(texts(page.body_ops()).last().copied(), Some(format!("Page {}", page.number)).as_deref());
        }
    }

    #[test]
    fn supplement_is_laid_out_last() {
        let layout = layout();
        let mut paginator = Paginator::new(&layout);
        paginator.section(&Section::new("Tech", "Chips."));
        paginator.supplement(&Supplement {
            title: "Stare decisis".to_string(),
            content: "Courts follow *precedent*.".to_string(),
        });
        let doc = paginator.finish();
        let body = texts(doc.pages[0].body_ops());
        let corner = body.iter().position(|t| *t == "LEARNING CORNER: Stare decisis");
        assert!(corner.is_some());
        assert_eq!(body.last().copied(), Some("."));
        assert!(body.contains(&"precedent"));
    }

    #[test]
    fn config_overrides_layout() {
        let config = DocumentConfig {
            page_width: Some(612.0),
            headline_prefix: Some(String::new()),
            page_numbers: Some(true),
            masthead: common::MastheadConfig {
                title: Some("Evening Post".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let layout = PageLayout::from_config(&config, date());
        assert_eq!(layout.width, 612.0);
        assert_eq!(layout.height, 841.89);
        assert!(layout.headline_prefix.is_none());
        assert!(layout.page_numbers);
        assert_eq!(layout.masthead.title, "Evening Post");
        assert_eq!(layout.masthead.edition, "LONDON & NEW YORK EDITION");
    }

    #[test]
    fn every_drawn_text_is_in_document_charset() {
        let mut layout = layout();
        layout.masthead.edition = "\u{2014} \u{00b5}-EDITION \u{2014}".to_string();
        let sections = [Section::new(
            "Caf\u{e9} 5\u{b5}m na\u{ef}ve \u{ff}",
            "1. \u{201c}Quoted\u{201d} \u{3b1}\n*\u{b5}g* and <https://x.io|\u{2026}more>",
        )];
        let mut paginator = Paginator::new(&layout);
        paginator.section(&sections[0]);
        paginator.supplement(&Supplement {
            title: "\u{ff}\u{2122}".to_string(),
            content: "\u{1f393} tip".to_string(),
        });
        let doc = paginator.finish();

        let all = texts(&doc.pages[0].ops);
        assert!(all.contains(&"CAF\u{c9} 5\u{b5}M NA\u{cf}VE \u{ff}"));
        for text in all {
            assert!(text.chars().all(is_document_char), "{text:?} leaves the document charset");
        }
    }

    #[test]
    fn heading_detection() {
        assert!(is_heading_line("1. Item"));
        assert!(is_heading_line("12. Item"));
        assert!(is_heading_line("*Bold lead*"));
        assert!(is_heading_line("# Title"));
        assert!(!is_heading_line("1 Item"));
        assert!(!is_heading_line("Plain"));
    }
}
