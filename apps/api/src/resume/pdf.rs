//! Resume PDF preparation: rasterize the first page for the vision model,
//! falling back to the embedded text layer when poppler is unavailable.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Uploaded file is not a valid PDF")]
    NotPdf,

    #[error("No readable content could be extracted from the PDF")]
    NoContent,

    #[error("I/O error while processing PDF: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF text extraction failed: {0}")]
    Extraction(String),
}

#[derive(Debug, Clone)]
pub struct PdfSettings {
    pub pdftoppm_path: String,
    pub dpi: u32,
}

/// What the analyzer receives for a resume.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumePage {
    /// First page rendered as a base64-encoded PNG.
    Image { png_base64: String },
    /// Text layer of the whole document.
    Text(String),
}

pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Converts uploaded PDF bytes into something the vision model can read.
pub async fn prepare_resume(bytes: &[u8], settings: &PdfSettings) -> Result<ResumePage, PdfError> {
    if !looks_like_pdf(bytes) {
        return Err(PdfError::NotPdf);
    }

    match render_first_page(bytes, settings).await {
        Ok(png) => {
            info!("Rendered resume first page ({} bytes PNG)", png.len());
            return Ok(ResumePage::Image {
                png_base64: STANDARD.encode(png),
            });
        }
        Err(e) => warn!("PDF rasterization unavailable ({e}); falling back to text extraction"),
    }

    let owned = bytes.to_vec();
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&owned))
        .await
        .map_err(|e| e.to_string())
        .and_then(|r| r.map_err(|e| e.to_string()));
    let text = match extracted {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF text extraction failed: {e}");
            return Err(PdfError::NoContent);
        }
    };

    let text = normalize_text(&text);
    if text.is_empty() {
        return Err(PdfError::NoContent);
    }
    info!("Extracted {} characters of resume text", text.len());
    Ok(ResumePage::Text(text))
}

/// Runs `pdftoppm` against a temp copy of the PDF and returns the first page as PNG.
async fn render_first_page(bytes: &[u8], settings: &PdfSettings) -> Result<Vec<u8>, PdfError> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("resume.pdf");
    tokio::fs::write(&input, bytes).await?;
    let output_prefix = dir.path().join("page");

    let output = Command::new(&settings.pdftoppm_path)
        .arg("-png")
        .arg("-r")
        .arg(settings.dpi.to_string())
        .args(["-f", "1", "-l", "1", "-singlefile"])
        .arg(&input)
        .arg(&output_prefix)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PdfError::Extraction(format!(
            "pdftoppm exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    read_png(&output_prefix.with_extension("png")).await
}

async fn read_png(path: &Path) -> Result<Vec<u8>, PdfError> {
    let png = tokio::fs::read(path).await?;
    if png.is_empty() {
        return Err(PdfError::NoContent);
    }
    Ok(png)
}

/// Collapses runs of blank lines and trailing whitespace left by text extraction.
fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
