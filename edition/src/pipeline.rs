//! One scheduled cycle: normalize the report, then produce the document and
//! the transport pages independently. A failure in one branch never stops the
//! other.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use common::{Config, DocumentConfig, Report, Section, SectionMapping, Supplement, TransportConfig};
use tracing::{error, info, warn};

use crate::document::{artifact_file_name, write_document, Document, PageLayout, Paginator};
use crate::error::EditionError;
use crate::markup::normalize;
use crate::transport::{
    build_pages, dispatch_pages, DirectoryTransport, DispatchReport, PageChrome, PagerConfig, TransportClient,
    TransportPage,
};

/// Report with every body rewritten into the canonical dialect.
pub fn normalize_report(report: &Report) -> Report {
    Report {
        sections: report
            .sections
            .iter()
            .map(|s| Section::new(s.title.clone(), normalize(&s.body)))
            .collect(),
        supplement: report.supplement.as_ref().map(|s| Supplement {
            title: s.title.clone(),
            content: normalize(&s.content),
        }),
    }
}

/// Sections for the document, in mapping order under the mapped titles.
///
/// Each mapping takes the first section whose title contains `matches`;
/// mappings with no match are skipped. No mappings means every section as-is.
pub fn select_document_sections(sections: &[Section], mappings: &[SectionMapping]) -> Vec<Section> {
    if mappings.is_empty() {
        return sections.to_vec();
    }

    let mut used = vec![false; sections.len()];
    let mut selected = Vec::new();
    for mapping in mappings {
        if let Some(i) = sections.iter().position(|s| s.title.contains(&mapping.matches)) {
            used[i] = true;
            selected.push(Section::new(mapping.title.clone(), sections[i].body.clone()));
        }
    }
    for (section, _) in sections.iter().zip(&used).filter(|(_, taken)| !**taken) {
        warn!(title = %section.title, "no document mapping selects this section, leaving it out");
    }
    selected
}

/// Lay out a normalized report as a paginated document.
pub fn build_document(report: &Report, config: &DocumentConfig, date: NaiveDate) -> Document {
    let layout = PageLayout::from_config(config, date);
    let sections = select_document_sections(&report.sections, &config.sections);
    let mut paginator = Paginator::new(&layout);
    for section in &sections {
        paginator.section(section);
    }
    if let Some(supplement) = &report.supplement {
        paginator.supplement(supplement);
    }
    paginator.finish()
}

/// Pack a normalized report into transport pages.
pub fn build_transport_pages(report: &Report, config: &TransportConfig) -> Vec<TransportPage> {
    build_pages(&report.sections, report.supplement.as_ref(), &PagerConfig::from(config))
}

/// Which branches to run and where the document goes.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub date: NaiveDate,
    pub out_dir: PathBuf,
    pub document: bool,
    pub transport: bool,
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Path of the written document
    pub document: Option<PathBuf>,
    pub transport: Option<DispatchReport>,
    pub errors: Vec<EditionError>,
}

impl RunOutcome {
    /// Nothing failed, or at least one branch still produced its output.
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
            || self.document.is_some()
            || self.transport.as_ref().is_some_and(|r| r.delivered() > 0)
    }
}

pub async fn run_cycle(
    report: &Report,
    config: &Config,
    client: &dyn TransportClient,
    options: &RunOptions,
) -> RunOutcome {
    let report = start_cycle(report, options);
    let mut outcome = RunOutcome::default();
    if options.document {
        document_branch(&report, config, options, &mut outcome).await;
    }
    if options.transport {
        transport_branch(&report, config, client, options, &mut outcome).await;
    }
    outcome
}

/// [`run_cycle`] delivering the transport pages into `<out_dir>/transport`.
///
/// The directory is created only when the transport branch runs; failing to
/// create it fails that branch alone.
pub async fn run_to_directory(report: &Report, config: &Config, options: &RunOptions) -> RunOutcome {
    let report = start_cycle(report, options);
    let mut outcome = RunOutcome::default();
    if options.document {
        document_branch(&report, config, options, &mut outcome).await;
    }
    if options.transport {
        match DirectoryTransport::create(transport_dir(&options.out_dir)).await {
            Ok(client) => transport_branch(&report, config, &client, options, &mut outcome).await,
            Err(e) => {
                error!(error = %e, "transport branch failed");
                outcome.errors.push(e);
            }
        }
    }
    outcome
}

/// Where [`run_to_directory`] writes the transport pages.
pub fn transport_dir(out_dir: &Path) -> PathBuf {
    out_dir.join("transport")
}

fn start_cycle(report: &Report, options: &RunOptions) -> Report {
    let report = normalize_report(report);
    info!(
        sections = report.sections.len(),
        supplement = report.supplement.is_some(),
        date = %options.date,
        "starting edition cycle"
    );
    report
}

async fn document_branch(report: &Report, config: &Config, options: &RunOptions, outcome: &mut RunOutcome) {
    match produce_document(report, &config.document, options.date, &options.out_dir).await {
        Ok(path) => {
            info!(path = %path.display(), "document written");
            outcome.document = Some(path);
        }
        Err(e) => {
            error!(error = %e, "document branch failed, continuing with transport");
            outcome.errors.push(e);
        }
    }
}

async fn transport_branch(
    report: &Report,
    config: &Config,
    client: &dyn TransportClient,
    options: &RunOptions,
    outcome: &mut RunOutcome,
) {
    let pages = build_transport_pages(report, &config.transport);
    let chrome = PageChrome::from_config(&config.transport, options.date);
    let interval = Duration::from_millis(config.transport.send_interval_ms.unwrap_or(1000));
    let dispatched = dispatch_pages(client, &pages, &chrome, interval).await;
    if let Err(e) = dispatched.clone().into_result() {
        warn!(error = %e, "transport branch incomplete");
        outcome.errors.push(e);
    }
    outcome.transport = Some(dispatched);
}

async fn produce_document(
    report: &Report,
    config: &DocumentConfig,
    date: NaiveDate,
    out_dir: &Path,
) -> Result<PathBuf, EditionError> {
    let document = build_document(report, config, date);
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| EditionError::ArtifactWrite {
            path: out_dir.to_path_buf(),
            source,
        })?;
    let path = out_dir.join(artifact_file_name(date));
    write_document(&document, &path).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DrawOp;

    fn mapping(matches: &str, title: &str) -> SectionMapping {
        SectionMapping {
            matches: matches.to_string(),
            title: title.to_string(),
        }
    }

    fn report() -> Report {
        Report {
            sections: vec![
                Section::new("\u{1f4bb} Tech", "### Chips\nSee [the filing](https://sec.gov/x) for **details**."),
                Section::new("\u{2696}\u{fe0f} International Law", "Treaty news."),
            ],
            supplement: Some(Supplement {
                title: "Res judicata".to_string(),
                content: "A matter **already judged**.".to_string(),
            }),
        }
    }

    #[test]
    fn normalizes_bodies_and_supplement() {
        let normalized = normalize_report(&report());
        assert_eq!(
            normalized.sections[0].body,
            "*Chips*\nSee <https://sec.gov/x|the filing> for *details*."
        );
        assert_eq!(normalized.sections[0].title, "\u{1f4bb} Tech");
        assert_eq!(
            normalized.supplement.map(|s| s.content).as_deref(),
            Some("A matter *already judged*.")
        );
    }

    #[test]
    fn mapping_reorders_and_renames() {
        let sections = report().sections;
        let mappings = [
            mapping("International Law", "International News"),
            mapping("National", "National & Political"),
            mapping("Tech", "Tech & Innovation"),
        ];
        let selected = select_document_sections(&sections, &mappings);
        let titles: Vec<&str> = selected.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["International News", "Tech & Innovation"]);
        assert_eq!(selected[0].body, "Treaty news.");
    }

    #[test]
    fn no_mapping_keeps_everything() {
        let sections = report().sections;
        assert_eq!(select_document_sections(&sections, &[]), sections);
    }

    #[test]
    fn document_includes_learning_corner() {
        let normalized = normalize_report(&report());
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let document = build_document(&normalized, &DocumentConfig::default(), date);
        let found = document.pages.iter().flat_map(|p| &p.ops).any(|op| {
            matches!(op, DrawOp::Text { text, .. } if text == "LEARNING CORNER: Res judicata")
        });
        assert!(found);
    }

    #[test]
    fn transport_pages_follow_config() {
        let normalized = normalize_report(&report());
        let config = TransportConfig {
            budget: Some(10),
            ..Default::default()
        };
        let pages = build_transport_pages(&normalized, &config);
        // every section exceeds the budget on its own; supplement fits the last page
        assert_eq!(pages.len(), 2);
        assert!(pages[1].supplement.is_some());
    }

    #[test]
    fn outcome_success_rules() {
        assert!(RunOutcome::default().succeeded());
        let failed = RunOutcome {
            errors: vec![EditionError::Dispatch { failed: 1, total: 1 }],
            ..Default::default()
        };
        assert!(!failed.succeeded());
        let partial = RunOutcome {
            document: Some(PathBuf::from("a.pdf")),
            errors: vec![EditionError::Dispatch { failed: 1, total: 1 }],
            ..Default::default()
        };
        assert!(partial.succeeded());
    }
}
