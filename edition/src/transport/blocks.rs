//! Block rendering of transport pages and their plain-text fallback.

use chrono::NaiveDate;
use common::TransportConfig;
use serde::{Deserialize, Serialize};

use super::pager::TransportPage;
use crate::markup::{plain_text, tokenize};

pub const DEFAULT_TITLE: &str = "THE DAILY INTELLIGENCE";
pub const DEFAULT_SUPPLEMENT_HEADING: &str = "CONCEPT OF THE DAY";

/// Structural unit of a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Section { text: TextObject },
    Context { elements: Vec<TextObject> },
    Divider,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String, emoji: bool },
    Mrkdwn { text: String },
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Block::Header {
            text: TextObject::PlainText {
                text: text.into(),
                emoji: true,
            },
        }
    }

    pub fn section(text: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::Mrkdwn { text: text.into() },
        }
    }

    pub fn context(text: impl Into<String>) -> Self {
        Block::Context {
            elements: vec![TextObject::Mrkdwn { text: text.into() }],
        }
    }
}

/// Per-run furniture shared by every page: title, supplement heading, date.
#[derive(Debug, Clone, PartialEq)]
pub struct PageChrome {
    pub title: String,
    pub supplement_heading: String,
    pub date: NaiveDate,
}

impl PageChrome {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            supplement_heading: DEFAULT_SUPPLEMENT_HEADING.to_string(),
            date,
        }
    }

    pub fn from_config(config: &TransportConfig, date: NaiveDate) -> Self {
        let defaults = Self::new(date);
        Self {
            title: config.title.clone().unwrap_or(defaults.title),
            supplement_heading: config
                .supplement_heading
                .clone()
                .unwrap_or(defaults.supplement_heading),
            date,
        }
    }

    /// Header blocks opening part `part` of `total`.
    pub fn header_blocks(&self, part: usize, total: usize) -> Vec<Block> {
        let title = if total > 1 {
            format!("{} | Part {} of {}", self.title, part, total)
        } else {
            self.title.clone()
        };
        vec![
            Block::header(title),
            Block::context(format!("*{}*", self.date.format("%A, %d %B %Y"))),
            Block::Divider,
        ]
    }

    /// Notification text sent alongside the blocks.
    pub fn summary(&self, part: usize, total: usize) -> String {
        format!("{} | Part {}/{}", self.title, part, total)
    }
}

impl TransportPage {
    pub fn blocks(&self, part: usize, total: usize, chrome: &PageChrome) -> Vec<Block> {
        let mut blocks = chrome.header_blocks(part, total);
        for section in &self.sections {
            blocks.push(Block::header(section.title.to_uppercase()));
            blocks.push(Block::section(section.body.clone()));
            blocks.push(Block::Divider);
        }
        if let Some(supplement) = &self.supplement {
            blocks.push(Block::Divider);
            blocks.push(Block::header(chrome.supplement_heading.clone()));
            blocks.push(Block::section(format!("*{}*\n{}", supplement.title, supplement.content)));
        }
        blocks
    }

    /// Degraded rendering: titles and bodies with every marker stripped.
    pub fn fallback_text(&self, part: usize, total: usize) -> String {
        let mut text = format!("*PART {part}/{total}*\n\n");
        for section in &self.sections {
            text.push_str(&section.title);
            text.push('\n');
            text.push_str(&plain_text(&tokenize(&section.body)));
            text.push_str("\n\n");
        }
        if let Some(supplement) = &self.supplement {
            text.push_str(&supplement.title);
            text.push('\n');
            text.push_str(&plain_text(&tokenize(&supplement.content)));
            text.push_str("\n\n");
        }
        text.truncate(text.trim_end().len());
        text
    }
}
