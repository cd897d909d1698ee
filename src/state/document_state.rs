use std::path::PathBuf;
use std::sync::Arc;

use crate::extractor::{DocumentInfo, TextExtractor};
use crate::request::RequestTracker;

#[derive(Default)]
pub struct DocumentState {
    extractor: Option<Arc<dyn TextExtractor>>,
    pub page_number: usize,
    pub loads: RequestTracker,
}

impl std::fmt::Debug for DocumentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentState")
            .field("document", &self.info().map(|info| &info.file_name))
            .field("page_number", &self.page_number)
            .field("loads", &self.loads)
            .finish()
    }
}

impl DocumentState {
    pub fn is_loaded(&self) -> bool {
        self.extractor.is_some()
    }

    pub fn is_opening(&self) -> bool {
        self.loads.in_flight()
    }

    pub fn info(&self) -> Option<&DocumentInfo> {
        self.extractor.as_ref().map(|extractor| extractor.document())
    }

    pub fn extractor(&self) -> Option<Arc<dyn TextExtractor>> {
        self.extractor.clone()
    }

    pub fn page_count(&self) -> usize {
        self.info().map(|info| info.page_count).unwrap_or(0)
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.info().and_then(|info| info.path.clone())
    }

    /// Swaps in a new document and returns the page to show, clamped to its length
    pub fn load(&mut self, extractor: Arc<dyn TextExtractor>, start_page: usize) -> usize {
        let page_count = extractor.page_count();
        self.extractor = Some(extractor);
        self.page_number = start_page.clamp(1, page_count.max(1));
        self.page_number
    }
}
