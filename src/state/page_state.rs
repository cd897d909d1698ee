use crate::reconstruct::ReconstructedPage;
use crate::request::RequestTracker;

/// Panel header before any document is open
pub const NO_DOCUMENT_INFO: &str = "Select a PDF to see extracted text";
/// Panel header after a failed extraction
pub const EXTRACTION_FAILED_INFO: &str = "Error extracting text from PDF";

/// Text of the displayed page
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PageText {
    #[default]
    NoDocument,
    Loading { page: usize },
    Ready { page: usize, text: ReconstructedPage },
    Failed { page: usize, message: String },
}

#[derive(Debug, Default)]
pub struct PageState {
    pub text: PageText,
    pub extractions: RequestTracker,
}

impl PageState {
    pub fn is_loading(&self) -> bool {
        matches!(self.text, PageText::Loading { .. })
    }

    pub fn reconstructed(&self) -> Option<&ReconstructedPage> {
        match &self.text {
            PageText::Ready { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn lines(&self) -> &[String] {
        self.reconstructed().map(|page| page.lines()).unwrap_or(&[])
    }

    /// Header line of the extracted-text panel
    pub fn extraction_info(&self) -> String {
        match &self.text {
            PageText::NoDocument => NO_DOCUMENT_INFO.to_string(),
            PageText::Loading { page } => format!("Extracting text from page {}...", page),
            PageText::Ready { page, text } => text.summary(*page),
            PageText::Failed { .. } => EXTRACTION_FAILED_INFO.to_string(),
        }
    }

    /// Body of the extracted-text panel
    pub fn panel_text(&self) -> &str {
        match &self.text {
            PageText::Loading { .. } => "Extracting text...",
            PageText::Ready { text, .. } if !text.full_text().is_empty() => text.full_text(),
            _ => "No text extracted yet",
        }
    }
}
