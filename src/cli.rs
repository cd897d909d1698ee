use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::extractor::{DocumentInfo, LopdfExtractor, TextExtractor};
use crate::logging::PerformanceTimer;
use crate::reconstruct::{reconstruct_page, PageStats, ReconstructedPage};

#[derive(Parser)]
#[command(name = "chonker-reader")]
#[command(version)]
#[command(about = "Read PDFs as reconstructed text, select passages and ask about them")]
pub struct Cli {
    /// Config file (defaults to chonker-reader.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive viewer
    #[cfg(feature = "tui")]
    View {
        /// PDF to open
        file: Option<PathBuf>,

        /// Page shown first
        #[arg(short, long)]
        page: Option<usize>,
    },

    /// Print the reconstructed text of one page
    Extract {
        /// PDF to read
        file: PathBuf,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Show document details
    Info {
        /// PDF to inspect
        file: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct ExtractOutput<'a> {
    file: &'a str,
    page: usize,
    stats: PageStats,
    lines: &'a [String],
    text: &'a str,
}

/// Extract one page and print it
pub async fn extract_command(file: PathBuf, page: usize, json: bool) -> Result<()> {
    info!("🔍 Extracting page {} of {:?}", page, file);

    let (document, text) = tokio::task::spawn_blocking(move || extract_page(&file, page))
        .await
        .context("extraction task failed")??;

    println!("{}", render_extraction(&document, page, &text, json)?);
    Ok(())
}

fn extract_page(file: &Path, page: usize) -> Result<(DocumentInfo, ReconstructedPage)> {
    let _timer = PerformanceTimer::new(format!("extract page {}", page));
    let extractor = LopdfExtractor::open(file)?;
    let fragments = extractor.extract_page(page)?;
    Ok((extractor.document().clone(), reconstruct_page(&fragments)))
}

/// Output of the `extract` command
pub fn render_extraction(
    document: &DocumentInfo,
    page: usize,
    text: &ReconstructedPage,
    json: bool,
) -> Result<String> {
    if json {
        let output = ExtractOutput {
            file: &document.file_name,
            page,
            stats: text.stats(),
            lines: text.lines(),
            text: text.full_text(),
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    if text.is_empty() {
        Ok(format!("{}\n\n(no text on this page)", text.summary(page)))
    } else {
        Ok(format!("{}\n\n{}", text.summary(page), text.full_text()))
    }
}

/// Print document details
pub async fn info_command(file: PathBuf) -> Result<()> {
    let document = tokio::task::spawn_blocking(move || LopdfExtractor::open(&file))
        .await
        .context("document task failed")??
        .document()
        .clone();

    println!("{}", render_info(&document));
    Ok(())
}

pub fn render_info(document: &DocumentInfo) -> String {
    let mut lines = vec![
        format!("📄 {}", document.file_name),
        format!("   Pages: {}", document.page_count),
        format!("   Size:  {} bytes", document.file_size),
    ];
    if let Some(title) = &document.title {
        lines.push(format!("   Title: {}", title));
    }
    if let Some(path) = &document.path {
        lines.push(format!("   Path:  {}", path.display()));
    }
    lines.join("\n")
}
