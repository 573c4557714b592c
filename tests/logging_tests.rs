//! Checks the log records emitted while sealing a document.
//!
//! A single in-memory logger is installed for this test binary. Tests run in
//! parallel, so each one only looks at records mentioning its own document name.

use std::sync::{Mutex, Once};

use log::{Level, LevelFilter, Log, Metadata, Record};
use rstest::rstest;
use xml_doctree::{BuilderOptions, DocumentBuilder, ParentId};

struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

fn captured(document: &str) -> Vec<(Level, String)> {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
    let marker = format!("'{document}'");
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, message)| message.contains(&marker))
        .cloned()
        .collect()
}

/// Seals a document that holds one element which is never attached.
fn build_with_stray(document: &str, report_detached: bool) {
    // Installs the logger before anything is logged.
    captured(document);
    let options = BuilderOptions::default().report_detached(report_detached);
    let mut builder = DocumentBuilder::with_options(document, options);
    let root = builder.create_element(ParentId::Document, "root");
    builder.set_document_element(root).unwrap();
    builder.create_element(root, "stray");
    assert_eq!(builder.detached_nodes(), 1);
    builder.build();
}

#[rstest]
#[case("reported", true, 1)]
#[case("silent", false, 0)]
fn test_detached_warning(
    #[case] document: &str,
    #[case] report_detached: bool,
    #[case] expected_warnings: usize,
) {
    build_with_stray(document, report_detached);

    let records = captured(document);
    let warnings: Vec<&String> = records
        .iter()
        .filter(|(level, _)| *level == Level::Warn)
        .map(|(_, message)| message)
        .collect();
    assert_eq!(warnings.len(), expected_warnings);
    if let Some(warning) = warnings.first() {
        assert!(warning.contains("1 node(s) were created but never attached"));
    }
    assert!(
        records
            .iter()
            .any(|(level, message)| *level == Level::Debug && message.contains("sealed"))
    );
}

#[test]
fn test_no_warning_when_everything_is_attached() {
    captured("attached");
    let mut builder = DocumentBuilder::new("attached");
    let root = builder.create_element(ParentId::Document, "root");
    builder.set_document_element(root).unwrap();
    builder.build();

    let records = captured("attached");
    assert!(records.iter().all(|(level, _)| *level != Level::Warn));
}

#[test]
fn test_rejections_are_logged() {
    captured("rejecting");
    let mut builder = DocumentBuilder::new("rejecting");
    let root = builder.create_element(ParentId::Document, "root");
    builder.set_document_element(root).unwrap();
    assert!(builder.set_document_element(root).is_err());

    let records = captured("rejecting");
    assert!(records.iter().any(|(level, message)| {
        *level == Level::Debug && message.contains("already assigned")
    }));
}
