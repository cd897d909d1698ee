#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chonker_reader::actions::Action;
use chonker_reader::extractor::{DocumentInfo, TextExtractor};
use chonker_reader::reconstruct::PositionedFragment;
use chonker_reader::{ReaderApp, ReaderError, ReaderResult};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// In-memory document with canned fragments per page
pub struct FakeExtractor {
    info: DocumentInfo,
    pages: Vec<Vec<PositionedFragment>>,
    slow_pages: HashSet<usize>,
    failing_pages: HashSet<usize>,
}

impl FakeExtractor {
    pub fn new(pages: Vec<Vec<PositionedFragment>>) -> Self {
        Self {
            info: DocumentInfo {
                id: uuid::Uuid::new_v4().to_string(),
                file_name: "fake.pdf".to_string(),
                path: None,
                page_count: pages.len(),
                file_size: 0,
                title: None,
            },
            pages,
            slow_pages: HashSet::new(),
            failing_pages: HashSet::new(),
        }
    }

    /// One line of text per page: "Page 1", "Page 2", ...
    pub fn numbered(page_count: usize) -> Self {
        Self::new(
            (1..=page_count)
                .map(|n| vec![PositionedFragment::new(format!("Page {}", n), 700.0)])
                .collect(),
        )
    }

    pub fn slow_on(mut self, page: usize) -> Self {
        self.slow_pages.insert(page);
        self
    }

    pub fn failing_on(mut self, page: usize) -> Self {
        self.failing_pages.insert(page);
        self
    }
}

impl TextExtractor for FakeExtractor {
    fn document(&self) -> &DocumentInfo {
        &self.info
    }

    fn extract_page(&self, page_number: usize) -> ReaderResult<Vec<PositionedFragment>> {
        if self.slow_pages.contains(&page_number) {
            std::thread::sleep(Duration::from_millis(200));
        }
        if self.failing_pages.contains(&page_number) {
            return Err(ReaderError::page_extraction(page_number, "broken content stream"));
        }
        self.pages
            .get(page_number.wrapping_sub(1))
            .cloned()
            .ok_or(ReaderError::InvalidPage {
                page: page_number,
                page_count: self.pages.len(),
            })
    }
}

pub fn attach(app: &mut ReaderApp, extractor: FakeExtractor) {
    app.attach_document(Arc::new(extractor));
}

/// Applies the next background completion, failing the test if none arrives
pub async fn apply_next(app: &mut ReaderApp) -> Action {
    let action = tokio::time::timeout(Duration::from_secs(5), app.next_action())
        .await
        .expect("timed out waiting for a background action")
        .expect("action channel closed");
    app.dispatch(action.clone());
    action
}

/// Single-font PDF, one `(text, baseline)` pair per `Tj`
pub fn build_pdf(pages: &[&[(&str, i64)]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
        ];
        for (text, y) in lines.iter() {
            operations.push(Operation::new(
                "Tm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), 72.into(), (*y).into()],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
