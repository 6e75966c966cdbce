//! Delivery of transport pages through an external chat client.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info, warn};

use super::blocks::{Block, PageChrome};
use super::pager::TransportPage;
use crate::error::EditionError;

/// Chat transport collaborator. Accepts one page of content per call.
#[async_trait::async_trait]
pub trait TransportClient: Send + Sync {
    /// Send a structured page; `summary` is the notification text.
    async fn send_blocks(&self, blocks: &[Block], summary: &str) -> Result<()>;

    /// Send a plain-text message.
    async fn send_text(&self, text: &str) -> Result<()>;
}

/// How a page ended up being delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Blocks,
    PlainText,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// One entry per page, in page order
    pub deliveries: Vec<Delivery>,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.deliveries.iter().filter(|d| **d != Delivery::Failed).count()
    }

    pub fn failed(&self) -> usize {
        self.deliveries.len() - self.delivered()
    }

    pub fn into_result(self) -> Result<Self, EditionError> {
        match self.failed() {
            0 => Ok(self),
            failed => Err(EditionError::Dispatch {
                failed,
                total: self.deliveries.len(),
            }),
        }
    }
}

/// Send `pages` in order, pausing `interval` between consecutive pages.
///
/// A page whose structured send fails is retried once as plain text.
pub async fn dispatch_pages(
    client: &dyn TransportClient,
    pages: &[TransportPage],
    chrome: &PageChrome,
    interval: Duration,
) -> DispatchReport {
    let total = pages.len();
    let mut report = DispatchReport::default();
    info!(pages = total, "dispatching transport pages");

    for (i, page) in pages.iter().enumerate() {
        let part = i + 1;
        if i > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }

        let blocks = page.blocks(part, total, chrome);
        let delivery = match client.send_blocks(&blocks, &chrome.summary(part, total)).await {
            Ok(()) => {
                info!(part, total, "sent transport page");
                Delivery::Blocks
            }
            Err(e) => {
                warn!(part, total, error = %e, "transport page rejected, retrying as plain text");
                match client.send_text(&page.fallback_text(part, total)).await {
                    Ok(()) => Delivery::PlainText,
                    Err(e) => {
                        error!(part, total, error = %e, "plain-text retry failed");
                        Delivery::Failed
                    }
                }
            }
        };
        report.deliveries.push(delivery);
    }

    report
}

#[derive(Serialize)]
struct Message<'a> {
    text: &'a str,
    blocks: &'a [Block],
}

/// Client that writes each message into a directory, one file per message:
/// `part_NN.json` for structured pages, `part_NN.txt` for plain text.
pub struct DirectoryTransport {
    dir: PathBuf,
    sent: AtomicUsize,
}

impl DirectoryTransport {
    pub async fn create<P: AsRef<Path>>(dir: P) -> Result<Self, EditionError> {
        let dir = dir.as_ref().to_path_buf();
        if let Err(source) = tokio::fs::create_dir_all(&dir).await {
            return Err(EditionError::TransportSetup { path: dir, source });
        }
        Ok(Self {
            dir,
            sent: AtomicUsize::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_path(&self, extension: &str) -> PathBuf {
        let n = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        self.dir.join(format!("part_{n:02}.{extension}"))
    }
}

#[async_trait::async_trait]
impl TransportClient for DirectoryTransport {
    async fn send_blocks(&self, blocks: &[Block], summary: &str) -> Result<()> {
        let message = Message { text: summary, blocks };
        let payload = serde_json::to_vec_pretty(&message).map_err(EditionError::from)?;
        let path = self.next_path("json");
        tokio::fs::write(&path, payload)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        let path = self.next_path("txt");
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
