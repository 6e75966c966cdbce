//! PDF serialization of a laid-out [`Document`].
//!
//! Only the base-14 Times and Helvetica faces are used, with WinAnsi
//! encoding, so no font data is embedded. Page coordinates are flipped here:
//! layout works top-down, PDF bottom-up.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use tracing::{debug, error};

use super::paginate::{Document, DrawOp, Page};
use super::style::{FontFamily, TextStyle, Weight};
use crate::error::EditionError;

const FONTS: [&str; 8] = [
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
];

/// `Morning_Edition_2026-10-16_Premium.pdf`
pub fn artifact_file_name(date: NaiveDate) -> String {
    format!("Morning_Edition_{}_Premium.pdf", date.format("%Y-%m-%d"))
}

fn font_index(style: &TextStyle) -> usize {
    let family = match style.family {
        FontFamily::Times => 0,
        FontFamily::Helvetica => 4,
    };
    let bold = usize::from(style.weight == Weight::Bold);
    let italic = usize::from(style.italic);
    family + bold + 2 * italic
}

fn font_name(index: usize) -> String {
    format!("F{index}")
}

/// WinAnsi bytes; the document charset maps one to one.
fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}

struct Refs {
    next: i32,
}

impl Refs {
    fn bump(&mut self) -> Ref {
        let id = Ref::new(self.next);
        self.next += 1;
        id
    }
}

pub fn to_pdf(document: &Document) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut refs = Refs { next: 1 };
    let catalog_id = refs.bump();
    let tree_id = refs.bump();
    let font_ids: Vec<Ref> = FONTS.iter().map(|_| refs.bump()).collect();

    let page_ids: Vec<Ref> = document.pages.iter().map(|_| refs.bump()).collect();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    for (id, base) in font_ids.iter().zip(FONTS) {
        pdf.type1_font(*id)
            .base_font(Name(base.as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for (page, page_id) in document.pages.iter().zip(&page_ids) {
        let content_id = refs.bump();
        let links: Vec<(Ref, &DrawOp)> = page
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Link { .. }))
            .map(|op| (refs.bump(), op))
            .collect();

        let mut writer = pdf.page(*page_id);
        writer
            .parent(tree_id)
            .media_box(Rect::new(0.0, 0.0, document.width, document.height))
            .contents(content_id);
        if !links.is_empty() {
            writer.annotations(links.iter().map(|(id, _)| *id));
        }
        {
            let mut resources = writer.resources();
            let mut fonts = resources.fonts();
            for (i, id) in font_ids.iter().enumerate() {
                let name = font_name(i);
                fonts.pair(Name(name.as_bytes()), *id);
            }
        }
        writer.finish();

        for (id, op) in &links {
            if let DrawOp::Link {
                x,
                y,
                width,
                height,
                target,
            } = op
            {
                let top = document.height - y;
                let mut annotation = pdf.annotation(*id);
                annotation
                    .subtype(AnnotationType::Link)
                    .rect(Rect::new(*x, top - height, x + width, top));
                annotation.border_style().width(0.0);
                annotation
                    .action()
                    .action_type(ActionType::Uri)
                    .uri(Str(target.as_bytes()));
            }
        }

        let content = page_content(page, document.height);
        pdf.stream(content_id, &content);
    }

    debug!(pages = document.pages.len(), "pdf serialized");
    pdf.finish()
}

fn page_content(page: &Page, height: f32) -> Vec<u8> {
    let mut content = Content::new();
    for op in &page.ops {
        match op {
            DrawOp::Text { x, y, text, style } => {
                let (r, g, b) = style.color.unit();
                let name = font_name(font_index(style));
                let bytes = encode(text);
                content.set_fill_rgb(r, g, b);
                content.begin_text();
                content.set_font(Name(name.as_bytes()), style.size);
                content.next_line(*x, height - y);
                content.show(Str(&bytes));
                content.end_text();
            }
            DrawOp::Rule {
                x1,
                x2,
                y,
                width,
                color,
            } => {
                let (r, g, b) = color.unit();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(*width);
                content.move_to(*x1, height - y);
                content.line_to(*x2, height - y);
                content.stroke();
            }
            DrawOp::Link { .. } => {}
        }
    }
    content.finish()
}

/// Serialize `document` and write it to `path`.
///
/// The bytes go to a sibling `.part` file that is renamed over `path` once
/// complete, so `path` never holds a truncated document. The staging file is
/// removed on failure.
pub async fn write_document(document: &Document, path: &Path) -> Result<(), EditionError> {
    let bytes = to_pdf(document);
    let staging = staging_path(path);
    let written = match tokio::fs::write(&staging, &bytes).await {
        Ok(()) => tokio::fs::rename(&staging, path).await,
        Err(e) => Err(e),
    };
    if let Err(source) = written {
        error!(path = %path.display(), error = %source, "failed to write document");
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(EditionError::ArtifactWrite {
            path: path.to_path_buf(),
            source,
        });
    }
    debug!(path = %path.display(), bytes = bytes.len(), "document written");
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}
