use thiserror::Error;

/// Main error type for CHONKER Reader
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Failed to load document: {message}")]
    DocumentLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to extract text from page {page}: {message}")]
    PageExtraction {
        page: usize,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid page number: {page}. Document has {page_count} pages.")]
    InvalidPage { page: usize, page_count: usize },

    #[error("No document loaded")]
    NoDocument,

    #[error("File I/O error: {path}")]
    FileIO {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("General error: {0}")]
    General(#[from] anyhow::Error),
}

impl ReaderError {
    /// Create a document load error with context
    pub fn document_load(message: impl Into<String>) -> Self {
        Self::DocumentLoad {
            message: message.into(),
            source: None,
        }
    }

    /// Create a document load error with source
    pub fn document_load_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DocumentLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a page extraction error
    pub fn page_extraction(page: usize, message: impl Into<String>) -> Self {
        Self::PageExtraction {
            page,
            message: message.into(),
            source: None,
        }
    }

    /// Create a page extraction error with source
    pub fn page_extraction_with_source(
        page: usize,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::PageExtraction {
            page,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a file I/O error
    pub fn file_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileIO {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a terminal setup or teardown error
    pub fn terminal(err: impl std::fmt::Display) -> Self {
        Self::Terminal {
            message: err.to_string(),
        }
    }

    /// Check if error is recoverable (the view keeps running)
    pub fn is_recoverable(&self) -> bool {
        match self {
            ReaderError::DocumentLoad { .. } => true,
            ReaderError::PageExtraction { .. } => true,
            ReaderError::InvalidPage { .. } => true,
            ReaderError::NoDocument => true,
            ReaderError::Terminal { .. } => false,
            ReaderError::Configuration { .. } => false,
            _ => true,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ReaderError::DocumentLoad { message, .. } => {
                format!("🐹 CHONKER couldn't open this PDF: {}", message)
            }
            ReaderError::PageExtraction { page, message, .. } => {
                format!("📄 Couldn't read text on page {}: {}", page, message)
            }
            ReaderError::InvalidPage { page, page_count } => {
                format!("📄 Page {} is out of range (1-{}).", page, page_count)
            }
            ReaderError::NoDocument => "📁 Open a PDF first.".to_string(),
            ReaderError::Terminal { message } => {
                format!("🖥️ Terminal problem: {}", message)
            }
            ReaderError::FileIO { path, .. } => {
                format!("📁 File access error: {}. Check the path and permissions.", path)
            }
            _ => "🐹 Something went wrong. Check the logs for details.".to_string(),
        }
    }
}

/// Result type alias for convenience
pub type ReaderResult<T> = Result<T, ReaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_errors_are_recoverable() {
        assert!(ReaderError::page_extraction(3, "bad stream").is_recoverable());
        assert!(ReaderError::document_load("not a pdf").is_recoverable());
        assert!(!ReaderError::configuration("missing").is_recoverable());
    }

    #[test]
    fn test_user_message_names_the_page() {
        let err = ReaderError::page_extraction(7, "unsupported encoding");
        let msg = err.user_message();
        assert!(msg.contains("page 7"));
        assert!(msg.contains("unsupported encoding"));
    }

    #[test]
    fn test_terminal_errors_are_fatal() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "not a tty");
        let err = ReaderError::terminal(io);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Terminal error: not a tty");
        assert!(err.user_message().contains("not a tty"));
    }

    #[test]
    fn test_anyhow_errors_convert_to_general() {
        let err: ReaderError = anyhow::anyhow!("task panicked").context("loader").into();
        assert!(matches!(err, ReaderError::General(_)));
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "General error: loader");
        assert_eq!(
            err.user_message(),
            "🐹 Something went wrong. Check the logs for details."
        );
    }

    #[test]
    fn test_invalid_page_display() {
        let err = ReaderError::InvalidPage { page: 9, page_count: 4 };
        assert_eq!(
            err.to_string(),
            "Invalid page number: 9. Document has 4 pages."
        );
    }
}
