mod common;

use std::sync::Arc;

use chonker_reader::actions::{Action, PageDirection};
use chonker_reader::chat::EchoAssistant;
use chonker_reader::cli::render_extraction;
use chonker_reader::config::ReaderConfig;
use chonker_reader::extractor::{LopdfExtractor, TextExtractor};
use chonker_reader::reconstruct::reconstruct_page;
use chonker_reader::{ReaderApp, ReaderError};
use tempfile::tempdir;

use common::{apply_next, attach, build_pdf, FakeExtractor};

#[test]
fn test_lines_rebuilt_from_pdf() {
    let bytes = build_pdf(&[&[
        ("Chapter", 700),
        (" One", 702),
        ("Cells divide", 680),
        ("by mitosis.", 679),
    ]]);
    let extractor = LopdfExtractor::from_bytes(&bytes, "biology.pdf").unwrap();

    let page = reconstruct_page(&extractor.extract_page(1).unwrap());
    assert_eq!(page.lines(), ["Chapter One", "Cells divideby mitosis."]);
    assert_eq!(
        page.summary(1),
        "Extracted 2 lines, 5 words, 35 characters from page 1"
    );
}

#[test]
fn test_out_of_range_page_is_rejected() {
    let bytes = build_pdf(&[&[("Only page", 700)]]);
    let extractor = LopdfExtractor::from_bytes(&bytes, "one.pdf").unwrap();

    let err = extractor.extract_page(2).unwrap_err();
    assert!(matches!(
        err,
        ReaderError::InvalidPage {
            page: 2,
            page_count: 1
        }
    ));
    assert!(extractor.extract_page(0).is_err());
}

#[test]
fn test_garbage_file_is_a_load_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();

    let err = LopdfExtractor::open(&path).err().expect("load should fail");
    assert!(matches!(err, ReaderError::DocumentLoad { .. }));
}

#[test]
fn test_extract_output_for_blank_page() {
    let bytes = build_pdf(&[&[]]);
    let extractor = LopdfExtractor::from_bytes(&bytes, "blank.pdf").unwrap();
    let page = reconstruct_page(&extractor.extract_page(1).unwrap());

    let output = render_extraction(extractor.document(), 1, &page, false).unwrap();
    assert_eq!(
        output,
        "Extracted 0 lines, 0 words, 0 characters from page 1\n\n(no text on this page)"
    );
}

#[tokio::test]
async fn test_viewer_opens_pdf_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lecture.pdf");
    std::fs::write(
        &path,
        build_pdf(&[&[("First page", 700)], &[("Second page", 700), ("more", 650)]]),
    )
    .unwrap();

    let mut app = ReaderApp::new(ReaderConfig::default(), Arc::new(EchoAssistant));
    app.dispatch(Action::OpenDocument(path.clone()));
    assert!(app.state().document.is_opening());

    let opened = apply_next(&mut app).await;
    assert!(matches!(opened, Action::DocumentOpened { .. }));
    let info = app.state().document.info().expect("document info");
    assert_eq!(info.file_name, "lecture.pdf");
    assert_eq!(info.page_count, 2);
    assert_eq!(app.state().document.path(), Some(path));

    apply_next(&mut app).await;
    assert_eq!(app.state().page.lines(), ["First page"]);

    app.dispatch(Action::NavigatePage(PageDirection::Last));
    apply_next(&mut app).await;
    assert_eq!(app.state().page.panel_text(), "Second page\nmore");
}

#[tokio::test]
async fn test_load_finishing_after_newer_document_is_dropped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("old.pdf");
    std::fs::write(&path, build_pdf(&[&[("Old text", 700)]])).unwrap();

    let mut app = ReaderApp::new(ReaderConfig::default(), Arc::new(EchoAssistant));
    app.dispatch(Action::OpenDocument(path));
    attach(&mut app, FakeExtractor::numbered(1));

    // the disk load and the fake page extraction, in either order
    apply_next(&mut app).await;
    apply_next(&mut app).await;

    let info = app.state().document.info().expect("document info");
    assert_eq!(info.file_name, "fake.pdf");
    assert_eq!(app.state().page.lines(), ["Page 1"]);
    assert!(!app.state().page.extractions.in_flight());
}

#[tokio::test]
async fn test_second_open_wins_over_first() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.pdf");
    let second = dir.path().join("b.pdf");
    std::fs::write(&first, build_pdf(&[&[("Alpha", 700)]])).unwrap();
    std::fs::write(&second, build_pdf(&[&[("Beta", 700)], &[("more", 700)]])).unwrap();

    let mut app = ReaderApp::new(ReaderConfig::default(), Arc::new(EchoAssistant));
    app.dispatch(Action::OpenDocument(first));
    app.dispatch(Action::OpenDocument(second.clone()));

    // two loads and one extraction; the first load is stale whenever it lands
    for _ in 0..3 {
        apply_next(&mut app).await;
    }

    let info = app.state().document.info().expect("document info");
    assert_eq!(info.file_name, "b.pdf");
    assert_eq!(info.page_count, 2);
    assert_eq!(app.state().document.path(), Some(second));
    assert_eq!(app.state().page.lines(), ["Beta"]);
    assert!(!app.state().document.is_opening());
}
