use chrono::NaiveDate;
use common::{Config, Report, Section, SectionMapping, Supplement};
use edition::document::DrawOp;
use edition::pipeline::{build_document, normalize_report, run_cycle, run_to_directory, transport_dir, RunOptions};
use edition::transport::{Delivery, DirectoryTransport};
use edition::EditionError;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn report() -> Report {
    Report {
        sections: vec![
            Section::new(
                "\u{2696}\u{fe0f} International Law",
                "### The Hague\nThe court **ruled** on the [border case](https://icj.org/case).\n1. First point\nMore \u{2014} much more.",
            ),
            Section::new("\u{1f4bb} Tech", "Per <https://x.com|X News>, *rates rose* today."),
        ],
        supplement: Some(Supplement {
            title: "Stare decisis".to_string(),
            content: "Courts follow **precedent**.".to_string(),
        }),
    }
}

fn options(out_dir: &std::path::Path) -> RunOptions {
    RunOptions {
        date: date(),
        out_dir: out_dir.to_path_buf(),
        document: true,
        transport: true,
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.transport.send_interval_ms = Some(0);
    config
}

#[tokio::test]
async fn test_run_cycle_writes_document_and_pages() {
    let dir = tempfile::tempdir().unwrap();
    let transport = DirectoryTransport::create(dir.path().join("transport")).await.unwrap();

    let outcome = run_cycle(&report(), &config(), &transport, &options(dir.path())).await;

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    let path = outcome.document.clone().unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Morning_Edition_2026-10-16_Premium.pdf"
    );
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let dispatch = outcome.transport.as_ref().unwrap();
    assert_eq!(dispatch.deliveries, vec![Delivery::Blocks]);
    let message = std::fs::read_to_string(transport.dir().join("part_01.json")).unwrap();
    assert!(message.contains("<https://icj.org/case|border case>"));
    assert!(message.contains("CONCEPT OF THE DAY"));
    assert!(outcome.succeeded());
}

#[tokio::test]
async fn test_document_failure_does_not_stop_transport() {
    let dir = tempfile::tempdir().unwrap();
    // a regular file where the output directory should be
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, b"").unwrap();
    let transport = DirectoryTransport::create(dir.path().join("transport")).await.unwrap();

    let outcome = run_cycle(&report(), &config(), &transport, &options(&blocked)).await;

    assert!(outcome.document.is_none());
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(outcome.errors[0], EditionError::ArtifactWrite { .. }));
    assert_eq!(outcome.transport.as_ref().unwrap().delivered(), 1);
    assert!(outcome.succeeded());
}

#[tokio::test]
async fn test_branches_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let transport = DirectoryTransport::create(dir.path().join("transport")).await.unwrap();
    let mut options = options(dir.path());
    options.transport = false;

    let outcome = run_cycle(&report(), &config(), &transport, &options).await;
    assert!(outcome.document.is_some());
    assert!(outcome.transport.is_none());
    assert!(!transport.dir().join("part_01.json").exists());
}

#[tokio::test]
async fn test_transport_directory_failure_keeps_document() {
    let dir = tempfile::tempdir().unwrap();
    // a regular file where the transport directory should be
    std::fs::write(transport_dir(dir.path()), b"").unwrap();

    let outcome = run_to_directory(&report(), &config(), &options(dir.path())).await;

    let path = outcome.document.as_ref().unwrap();
    assert!(std::fs::read(path).unwrap().starts_with(b"%PDF-"));
    assert!(outcome.transport.is_none());
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(outcome.errors[0], EditionError::TransportSetup { .. }));
    assert!(outcome.succeeded());
}

#[tokio::test]
async fn test_transport_directory_untouched_when_transport_disabled() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(transport_dir(dir.path()), b"").unwrap();
    let mut options = options(dir.path());
    options.transport = false;

    let outcome = run_to_directory(&report(), &config(), &options).await;

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert!(outcome.document.is_some());
    assert!(transport_dir(dir.path()).is_file());
}

#[tokio::test]
async fn test_run_to_directory_writes_pages_under_out_dir() {
    let dir = tempfile::tempdir().unwrap();

    let outcome = run_to_directory(&report(), &config(), &options(dir.path())).await;

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.transport.as_ref().unwrap().deliveries, vec![Delivery::Blocks]);
    assert!(transport_dir(dir.path()).join("part_01.json").exists());
}

#[tokio::test]
async fn test_shipped_defaults_print_every_section_in_order() {
    let config = Config::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/../config.default.toml"))
        .await
        .unwrap();
    assert!(config.document.sections.is_empty());

    let report = Report {
        sections: vec![
            Section::new("\u{26bd} Sports", "Final score 2-1."),
            Section::new("\u{1f4bb} Tech", "Chips shipped."),
        ],
        supplement: None,
    };
    let document = build_document(&normalize_report(&report), &config.document, date());

    let texts: Vec<&str> = document
        .pages
        .iter()
        .flat_map(|p| p.body_ops())
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    let sports = texts.iter().position(|t| *t == "SPORTS").unwrap();
    let tech = texts.iter().position(|t| *t == "TECH").unwrap();
    assert!(sports < tech);
    assert!(texts.contains(&"Final score 2-1."));
    assert!(texts.contains(&"Chips shipped."));
}

#[test]
fn test_document_uses_mapped_titles_and_clean_text() {
    let mut config = Config::default();
    config.document.sections = vec![
        SectionMapping {
            matches: "Tech".to_string(),
            title: "Tech & Innovation".to_string(),
        },
        SectionMapping {
            matches: "International Law".to_string(),
            title: "International News".to_string(),
        },
    ];
    let document = build_document(&normalize_report(&report()), &config.document, date());

    let texts: Vec<&str> = document
        .pages
        .iter()
        .flat_map(|p| p.body_ops())
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();

    let tech = texts.iter().position(|t| *t == "TECH & INNOVATION").unwrap();
    let law = texts.iter().position(|t| *t == "INTERNATIONAL NEWS").unwrap();
    assert!(tech < law);
    assert!(texts.contains(&"Latest Developments in International News"));
    assert!(texts.contains(&"The Hague"));
    assert!(texts.contains(&"border case"));
    assert!(texts.iter().any(|t| t.contains("More - much more.")));
    assert!(texts.iter().all(|t| !t.contains("**") && !t.contains("](")));
}
