// Public module exports for the binary and integration tests
pub mod actions;
pub mod app;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod reconstruct;
pub mod request;
pub mod selection;
pub mod state;

#[cfg(feature = "tui")]
pub mod tui;

pub use app::ReaderApp;
pub use error::{ReaderError, ReaderResult};
