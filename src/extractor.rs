use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ReaderError, ReaderResult};
use crate::logging::PerformanceTimer;
use crate::reconstruct::PositionedFragment;

/// TJ offsets (thousandths of text space) more negative than this read as a word gap
const TJ_SPACE_THRESHOLD: f64 = -200.0;

/// Nesting limit for form XObjects drawn from inside other forms
const MAX_FORM_DEPTH: usize = 8;

/// Metadata of an opened document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub id: String,
    pub file_name: String,
    pub path: Option<PathBuf>,
    pub page_count: usize,
    pub file_size: u64,
    pub title: Option<String>,
}

/// Source of positioned text for the pages of one document
pub trait TextExtractor: Send + Sync {
    fn document(&self) -> &DocumentInfo;

    /// Fragments of a 1-based page, in content-stream order
    fn extract_page(&self, page_number: usize) -> ReaderResult<Vec<PositionedFragment>>;

    fn page_count(&self) -> usize {
        self.document().page_count
    }
}

/// Native text extraction by walking page content streams with lopdf
pub struct LopdfExtractor {
    document: Document,
    pages: Vec<ObjectId>,
    info: DocumentInfo,
}

impl LopdfExtractor {
    pub fn open<P: AsRef<Path>>(path: P) -> ReaderResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReaderError::document_load(format!(
                "PDF file not found: {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| ReaderError::file_io(path.display().to_string(), e))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let mut extractor = Self::from_bytes(&bytes, file_name)?;
        extractor.info.path = Some(path.to_path_buf());
        Ok(extractor)
    }

    pub fn from_bytes(bytes: &[u8], file_name: impl Into<String>) -> ReaderResult<Self> {
        let _timer = PerformanceTimer::new("document load");

        let document = Document::load_mem(bytes)
            .map_err(|e| ReaderError::document_load_with_source("malformed or unreadable PDF", e))?;

        let pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        let title = document_title(&document);

        let info = DocumentInfo {
            id: uuid::Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            path: None,
            page_count: pages.len(),
            file_size: bytes.len() as u64,
            title,
        };

        info!(
            "📄 Loaded {} ({} pages, {} bytes)",
            info.file_name, info.page_count, info.file_size
        );

        Ok(Self {
            document,
            pages,
            info,
        })
    }
}

impl TextExtractor for LopdfExtractor {
    fn document(&self) -> &DocumentInfo {
        &self.info
    }

    fn extract_page(&self, page_number: usize) -> ReaderResult<Vec<PositionedFragment>> {
        if page_number == 0 || page_number > self.pages.len() {
            return Err(ReaderError::InvalidPage {
                page: page_number,
                page_count: self.pages.len(),
            });
        }

        let _timer = PerformanceTimer::new(format!("extract page {}", page_number));
        let page_id = self.pages[page_number - 1];

        let content_data = self.document.get_page_content(page_id).map_err(|e| {
            ReaderError::page_extraction_with_source(page_number, "unreadable content stream", e)
        })?;
        let content = Content::decode(&content_data).map_err(|e| {
            ReaderError::page_extraction_with_source(page_number, "undecodable content stream", e)
        })?;

        let fragments = walk_page(&self.document, page_id, &content);
        debug!("Page {}: {} fragments", page_number, fragments.len());
        Ok(fragments)
    }
}

/// 2D affine matrix `[a b c d e f]` in PDF row-vector convention
type Matrix = [f64; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn translation(tx: f64, ty: f64) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

struct TextState {
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f64,
    in_text_block: bool,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            leading: 0.0,
            in_text_block: false,
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = multiply(&translation(tx, ty), &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.move_line(0.0, -leading);
    }

    /// Baseline in page space: text matrix mapped through the CTM
    fn baseline_y(&self) -> f64 {
        multiply(&self.text_matrix, &self.ctm)[5]
    }
}

/// Fonts and form XObjects a content stream can name
#[derive(Clone, Default)]
struct ResourceScope<'a> {
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    xobjects: BTreeMap<Vec<u8>, ObjectId>,
}

impl<'a> ResourceScope<'a> {
    fn for_page(document: &'a Document, page_id: ObjectId) -> Self {
        let mut scope = Self {
            fonts: document.get_page_fonts(page_id),
            xobjects: BTreeMap::new(),
        };
        let (own, inherited) = document.get_page_resources(page_id);
        if let Some(resources) = own {
            scope.add_xobjects(document, resources);
        }
        for id in inherited {
            if let Ok(resources) = document.get_dictionary(id) {
                scope.add_xobjects(document, resources);
            }
        }
        scope
    }

    /// A form sees its own resources first, then those of whoever drew it
    fn for_form(&self, document: &'a Document, form: &'a Dictionary) -> Self {
        let Some(resources) = resolve_dict(document, form.get(b"Resources").ok()) else {
            return self.clone();
        };

        let mut scope = Self::default();
        if let Some(fonts) = resolve_dict(document, resources.get(b"Font").ok()) {
            for (name, font) in fonts.iter() {
                if let Some(font) = resolve_dict(document, Some(font)) {
                    scope.fonts.insert(name.clone(), font);
                }
            }
        }
        scope.add_xobjects(document, resources);

        for (name, font) in &self.fonts {
            scope.fonts.entry(name.clone()).or_insert(*font);
        }
        for (name, id) in &self.xobjects {
            scope.xobjects.entry(name.clone()).or_insert(*id);
        }
        scope
    }

    fn add_xobjects(&mut self, document: &'a Document, resources: &'a Dictionary) {
        let Some(xobjects) = resolve_dict(document, resources.get(b"XObject").ok()) else {
            return;
        };
        for (name, object) in xobjects.iter() {
            if let Ok(id) = object.as_reference() {
                self.xobjects.entry(name.clone()).or_insert(id);
            }
        }
    }
}

fn resolve_dict<'a>(document: &'a Document, object: Option<&'a Object>) -> Option<&'a Dictionary> {
    document.dereference(object?).ok()?.1.as_dict().ok()
}

/// Walks the text operators of a page, descending into form XObjects
struct PageWalker<'a> {
    document: &'a Document,
    state: TextState,
    font: Option<&'a Dictionary>,
    fragments: Vec<PositionedFragment>,
}

impl<'a> PageWalker<'a> {
    fn new(document: &'a Document) -> Self {
        Self {
            document,
            state: TextState::new(),
            font: None,
            fragments: Vec::new(),
        }
    }

    fn walk(&mut self, content: &Content, scope: &ResourceScope<'a>, depth: usize) {
        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => self.state.ctm_stack.push(self.state.ctm),
                "Q" => {
                    if let Some(ctm) = self.state.ctm_stack.pop() {
                        self.state.ctm = ctm;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operands(operands) {
                        self.state.ctm = multiply(&m, &self.state.ctm);
                    }
                }
                "BT" => {
                    self.state.in_text_block = true;
                    self.state.text_matrix = IDENTITY;
                    self.state.line_matrix = IDENTITY;
                }
                "ET" => self.state.in_text_block = false,
                "Tf" => {
                    let name = operands.first().and_then(|o| o.as_name().ok());
                    self.font = name.and_then(|name| scope.fonts.get(name).copied());
                    if self.font.is_none() {
                        debug!("Font {:?} not in page resources", name.map(String::from_utf8_lossy));
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        self.state.leading = leading;
                    }
                }
                "Td" => {
                    if let (Some(tx), Some(ty)) = (
                        operands.first().and_then(get_number),
                        operands.get(1).and_then(get_number),
                    ) {
                        self.state.move_line(tx, ty);
                    }
                }
                "TD" => {
                    if let (Some(tx), Some(ty)) = (
                        operands.first().and_then(get_number),
                        operands.get(1).and_then(get_number),
                    ) {
                        self.state.leading = -ty;
                        self.state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_operands(operands) {
                        self.state.text_matrix = m;
                        self.state.line_matrix = m;
                    }
                }
                "T*" => self.state.next_line(),
                "Tj" => {
                    if let Some(text) = operands.first().and_then(|o| self.decode_operand(o)) {
                        self.push_fragment(text);
                    }
                }
                "'" => {
                    self.state.next_line();
                    if let Some(text) = operands.first().and_then(|o| self.decode_operand(o)) {
                        self.push_fragment(text);
                    }
                }
                "\"" => {
                    self.state.next_line();
                    if let Some(text) = operands.get(2).and_then(|o| self.decode_operand(o)) {
                        self.push_fragment(text);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        let text = self.decode_tj_array(items);
                        self.push_fragment(text);
                    }
                }
                "Do" => {
                    if let Some(name) = operands.first().and_then(|o| o.as_name().ok()) {
                        self.draw_form(name, scope, depth);
                    }
                }
                _ => {}
            }
        }
    }

    /// Runs a form XObject's content with its `/Matrix` on top of the CTM. Images
    /// and other XObjects carry no text and are skipped.
    fn draw_form(&mut self, name: &[u8], scope: &ResourceScope<'a>, depth: usize) {
        let Some(id) = scope.xobjects.get(name) else {
            debug!("XObject {} not in resources", String::from_utf8_lossy(name));
            return;
        };
        let document = self.document;
        let Ok(Object::Stream(stream)) = document.get_object(*id) else {
            return;
        };
        if stream.dict.get(b"Subtype").and_then(Object::as_name_str).ok() != Some("Form") {
            return;
        }
        if depth >= MAX_FORM_DEPTH {
            warn!(
                "Form XObjects nested deeper than {}, skipping {}",
                MAX_FORM_DEPTH,
                String::from_utf8_lossy(name)
            );
            return;
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let content = match Content::decode(&data) {
            Ok(content) => content,
            Err(e) => {
                warn!("Undecodable form XObject {}: {}", String::from_utf8_lossy(name), e);
                return;
            }
        };
        let matrix = stream
            .dict
            .get(b"Matrix")
            .and_then(Object::as_array)
            .ok()
            .and_then(|m| matrix_operands(m))
            .unwrap_or(IDENTITY);
        let form_scope = scope.for_form(document, &stream.dict);

        let saved_ctm = self.state.ctm;
        let saved_depth = self.state.ctm_stack.len();
        let saved_font = self.font;
        self.state.ctm = multiply(&matrix, &self.state.ctm);

        self.walk(&content, &form_scope, depth + 1);

        self.state.ctm = saved_ctm;
        self.state.ctm_stack.truncate(saved_depth);
        self.font = saved_font;
    }

    fn push_fragment(&mut self, text: String) {
        if !self.state.in_text_block {
            return;
        }
        let baseline_y = self.state.baseline_y();
        self.fragments.push(PositionedFragment::new(text, baseline_y));
    }

    fn decode_operand(&self, obj: &Object) -> Option<String> {
        match obj {
            Object::String(bytes, _) => Some(decode_with_font(self.document, self.font, bytes)),
            _ => None,
        }
    }

    fn decode_tj_array(&self, items: &[Object]) -> String {
        let mut text = String::new();
        for item in items {
            match item {
                Object::String(..) => {
                    if let Some(part) = self.decode_operand(item) {
                        text.push_str(&part);
                    }
                }
                other => {
                    if let Some(offset) = get_number(other) {
                        if offset < TJ_SPACE_THRESHOLD && !text.ends_with(' ') {
                            text.push(' ');
                        }
                    }
                }
            }
        }
        text
    }
}

fn walk_page(document: &Document, page_id: ObjectId, content: &Content) -> Vec<PositionedFragment> {
    let scope = ResourceScope::for_page(document, page_id);
    let mut walker = PageWalker::new(document);
    walker.walk(content, &scope, 0);

    if !walker.state.ctm_stack.is_empty() {
        warn!(
            "Content stream left {} graphics states on the stack",
            walker.state.ctm_stack.len()
        );
    }
    walker.fragments
}

fn matrix_operands(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = IDENTITY;
    for (slot, operand) in m.iter_mut().zip(operands.iter()) {
        *slot = get_number(operand)?;
    }
    Some(m)
}

fn get_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Single-byte encoding lopdf can map to Unicode for this font, if any.
///
/// A named `/Encoding`, or the `/BaseEncoding` of an encoding dictionary. Type1
/// fonts without one use StandardEncoding. Composite fonts (`Identity-H`) and
/// unknown encodings have no mapping here.
fn simple_encoding<'a>(document: &'a Document, font: &'a Dictionary) -> Option<&'a str> {
    let name = match font.get(b"Encoding") {
        Ok(Object::Name(_)) => Some(font.get_font_encoding()),
        Ok(other) => resolve_dict(document, Some(other))
            .and_then(|encoding| encoding.get(b"BaseEncoding").ok())
            .and_then(|base| base.as_name_str().ok()),
        Err(_) => {
            let subtype = font.get(b"Subtype").and_then(Object::as_name_str).ok();
            matches!(subtype, Some("Type1") | Some("MMType1")).then_some("StandardEncoding")
        }
    };
    name.filter(|name| SIMPLE_ENCODINGS.contains(name))
}

const SIMPLE_ENCODINGS: [&str; 4] = [
    "StandardEncoding",
    "MacRomanEncoding",
    "MacExpertEncoding",
    "WinAnsiEncoding",
];

fn decode_with_font(document: &Document, font: Option<&Dictionary>, bytes: &[u8]) -> String {
    match font.and_then(|font| simple_encoding(document, font)) {
        Some(encoding) => Document::decode_text(Some(encoding), bytes),
        None => decode_pdf_string(bytes),
    }
}

/// UTF-16BE when the string carries a BOM, otherwise one byte per character
pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }
    bytes.iter().map(|&b| b as char).collect()
}

fn document_title(document: &Document) -> Option<String> {
    let info = document.trailer.get(b"Info").ok()?;
    let info = match info {
        Object::Reference(id) => document.get_object(*id).ok()?,
        other => other,
    };
    let title = info.as_dict().ok()?.get(b"Title").ok()?;
    let title = match title {
        Object::Reference(id) => document.get_object(*id).ok()?,
        other => other,
    };
    match title {
        Object::String(bytes, _) => {
            let title = decode_pdf_string(bytes).trim().to_string();
            (!title.is_empty()).then_some(title)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruct::reconstruct_page;
    use lopdf::content::Operation;
    use lopdf::{dictionary, Stream, StringFormat};

    fn build_pdf(pages: Vec<Vec<Operation>>, title: Option<&str>) -> Vec<u8> {
        build_pdf_with(pages, title, dictionary! {}, Vec::new())
    }

    /// `font_extra` is merged into the F1 font dictionary; `forms` become form
    /// XObjects named in the shared resources, each `(name, operations, matrix)`.
    fn build_pdf_with(
        pages: Vec<Vec<Operation>>,
        title: Option<&str>,
        font_extra: Dictionary,
        forms: Vec<(&str, Vec<Operation>, Option<[i64; 6]>)>,
    ) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        };
        for (key, value) in font_extra.iter() {
            font.set(key.clone(), value.clone());
        }
        let font_id = doc.add_object(font);

        let mut xobjects = Dictionary::new();
        for (name, operations, matrix) in forms {
            let mut dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            };
            if let Some(matrix) = matrix {
                let matrix: Vec<Object> = matrix.iter().map(|v| (*v).into()).collect();
                dict.set("Matrix", matrix);
            }
            let content = Content { operations };
            let form_id = doc.add_object(Stream::new(dict, content.encode().unwrap()));
            xobjects.set(name, form_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => xobjects,
        });

        let mut kids: Vec<Object> = Vec::new();
        for operations in pages {
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
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        if let Some(title) = title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn shown(text: &[u8], y: i64) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), y.into()]),
            Operation::new("Tj", vec![Object::String(text.to_vec(), StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ]
    }

    fn text_page(lines: &[(&str, i64)]) -> Vec<Operation> {
        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
        ];
        for (text, y) in lines {
            ops.push(Operation::new(
                "Tm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), 72.into(), (*y).into()],
            ));
            ops.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
        }
        ops.push(Operation::new("ET", vec![]));
        ops
    }

    #[test]
    fn test_extracts_fragments_with_baselines() {
        let bytes = build_pdf(vec![text_page(&[("Hello", 700), ("World", 680)])], None);
        let extractor = LopdfExtractor::from_bytes(&bytes, "hello.pdf").unwrap();

        assert_eq!(extractor.page_count(), 1);
        let fragments = extractor.extract_page(1).unwrap();
        assert_eq!(
            fragments,
            vec![
                PositionedFragment::new("Hello", 700.0),
                PositionedFragment::new("World", 680.0),
            ]
        );
    }

    #[test]
    fn test_td_moves_are_relative_to_line_start() {
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("Hello")]),
            Operation::new("Tj", vec![Object::string_literal(" there")]),
            Operation::new("Td", vec![0.into(), (-20).into()]),
            Operation::new("Tj", vec![Object::string_literal("Second")]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("Third")]),
            Operation::new("ET", vec![]),
        ];
        let bytes = build_pdf(vec![ops], None);
        let extractor = LopdfExtractor::from_bytes(&bytes, "td.pdf").unwrap();

        let page = reconstruct_page(&extractor.extract_page(1).unwrap());
        assert_eq!(page.full_text(), "Hello there\nSecond\nThird");
    }

    #[test]
    fn test_tj_array_becomes_one_fragment() {
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![72.into(), 500.into()]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("Ker"),
                    Object::Integer(-20),
                    Object::string_literal("ning"),
                    Object::Integer(-400),
                    Object::string_literal("gap"),
                ])],
            ),
            Operation::new("ET", vec![]),
        ];
        let bytes = build_pdf(vec![ops], None);
        let extractor = LopdfExtractor::from_bytes(&bytes, "tj.pdf").unwrap();

        let fragments = extractor.extract_page(1).unwrap();
        assert_eq!(fragments, vec![PositionedFragment::new("Kerning gap", 500.0)]);
    }

    #[test]
    fn test_ctm_translation_applies_to_baseline() {
        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), 0.into(), 100.into()],
            ),
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![10.into(), 50.into()]),
            Operation::new("Tj", vec![Object::string_literal("shifted")]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ];
        let bytes = build_pdf(vec![ops], None);
        let extractor = LopdfExtractor::from_bytes(&bytes, "cm.pdf").unwrap();

        let fragments = extractor.extract_page(1).unwrap();
        assert_eq!(fragments[0].baseline_y, 150.0);
    }

    #[test]
    fn test_page_numbers_are_one_based() {
        let bytes = build_pdf(
            vec![text_page(&[("first", 700)]), text_page(&[("second", 700)])],
            None,
        );
        let extractor = LopdfExtractor::from_bytes(&bytes, "two.pdf").unwrap();

        assert_eq!(extractor.extract_page(2).unwrap()[0].text, "second");
        assert!(matches!(
            extractor.extract_page(0),
            Err(ReaderError::InvalidPage { page: 0, page_count: 2 })
        ));
        assert!(matches!(
            extractor.extract_page(3),
            Err(ReaderError::InvalidPage { page: 3, page_count: 2 })
        ));
    }

    #[test]
    fn test_corrupt_bytes_fail_to_load() {
        let result = LopdfExtractor::from_bytes(b"%PDF-1.4 this is not a pdf", "broken.pdf");
        assert!(matches!(result, Err(ReaderError::DocumentLoad { .. })));
    }

    #[test]
    fn test_missing_file_fails_to_load() {
        let result = LopdfExtractor::open("/no/such/file.pdf");
        assert!(matches!(result, Err(ReaderError::DocumentLoad { .. })));
    }

    #[test]
    fn test_document_title_is_read() {
        let bytes = build_pdf(vec![text_page(&[("x", 700)])], Some("Lecture Notes"));
        let extractor = LopdfExtractor::from_bytes(&bytes, "notes.pdf").unwrap();

        let info = extractor.document();
        assert_eq!(info.title.as_deref(), Some("Lecture Notes"));
        assert_eq!(info.file_name, "notes.pdf");
        assert_eq!(info.file_size, bytes.len() as u64);
    }

    #[test]
    fn test_win_ansi_text_is_decoded_through_font_encoding() {
        let bytes = build_pdf_with(
            vec![shown(b"It\x92s \x93quoted\x94", 700)],
            None,
            dictionary! { "Encoding" => "WinAnsiEncoding" },
            Vec::new(),
        );
        let extractor = LopdfExtractor::from_bytes(&bytes, "winansi.pdf").unwrap();

        let page = reconstruct_page(&extractor.extract_page(1).unwrap());
        assert_eq!(page.full_text(), "It\u{2019}s \u{201C}quoted\u{201D}");
    }

    #[test]
    fn test_type1_font_without_encoding_uses_standard_encoding() {
        // 0x27 is quoteright in StandardEncoding, a plain apostrophe in Latin-1
        let bytes = build_pdf(vec![shown(b"don't", 700)], None);
        let extractor = LopdfExtractor::from_bytes(&bytes, "standard.pdf").unwrap();

        assert_eq!(extractor.extract_page(1).unwrap()[0].text, "don\u{2019}t");
    }

    #[test]
    fn test_unknown_font_encoding_falls_back_to_byte_decoding() {
        let bytes = build_pdf_with(
            vec![shown(b"caf\xe9", 700)],
            None,
            dictionary! { "Subtype" => "TrueType", "Encoding" => "Identity-H" },
            Vec::new(),
        );
        let extractor = LopdfExtractor::from_bytes(&bytes, "identity.pdf").unwrap();

        assert_eq!(extractor.extract_page(1).unwrap()[0].text, "caf\u{e9}");
    }

    #[test]
    fn test_form_xobject_text_is_extracted() {
        let page = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("Page body")]),
            Operation::new("ET", vec![]),
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), 0.into(), 100.into()],
            ),
            Operation::new("Do", vec!["Fm1".into()]),
            Operation::new("Q", vec![]),
            Operation::new("Do", vec!["Img".into()]),
        ];
        let bytes = build_pdf_with(
            vec![page],
            None,
            dictionary! {},
            vec![("Fm1", shown(b"Inside form", 400), Some([1, 0, 0, 1, 0, 50]))],
        );
        let extractor = LopdfExtractor::from_bytes(&bytes, "form.pdf").unwrap();

        let fragments = extractor.extract_page(1).unwrap();
        assert_eq!(
            fragments,
            vec![
                PositionedFragment::new("Page body", 700.0),
                PositionedFragment::new("Inside form", 550.0),
            ]
        );
    }

    #[test]
    fn test_self_drawing_form_stops_at_depth_limit() {
        let mut form = shown(b"again", 300);
        form.push(Operation::new("Do", vec!["Loop".into()]));
        let page = vec![Operation::new("Do", vec!["Loop".into()])];
        let bytes = build_pdf_with(vec![page], None, dictionary! {}, vec![("Loop", form, None)]);
        let extractor = LopdfExtractor::from_bytes(&bytes, "loop.pdf").unwrap();

        let fragments = extractor.extract_page(1).unwrap();
        assert_eq!(fragments.len(), MAX_FORM_DEPTH);
        assert!(fragments.iter().all(|f| f.text == "again" && f.baseline_y == 300.0));
    }

    #[test]
    fn test_decode_utf16_strings() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0xE9];
        assert_eq!(decode_pdf_string(&bytes), "Hé");
        assert_eq!(decode_pdf_string(b"plain"), "plain");
    }
}
