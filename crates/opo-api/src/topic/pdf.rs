//! Download topic PDFs and extract their text.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to download PDF: {0}")]
    Download(#[from] reqwest::Error),
    #[error("PDF host answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("PDF is larger than {limit} bytes")]
    TooLarge { limit: usize },
    #[error("Failed to extract PDF text: {0}")]
    Extract(String),
    #[error("PDF contains no extractable text")]
    Empty,
}

/// Fetches a topic PDF over HTTP and turns it into plain text
#[derive(Clone, Debug)]
pub struct PdfFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl PdfFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, PdfError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, max_bytes })
    }

    /// Download `url` and return its trimmed text.
    pub async fn fetch_text(&self, url: &str) -> Result<String, PdfError> {
        let bytes = self.download(url).await?;
        tracing::debug!(url, bytes = bytes.len(), "Downloaded topic PDF");

        extract_text(bytes).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, PdfError> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PdfError::Status(status));
        }

        let limit = self.max_bytes;
        if response
            .content_length()
            .is_some_and(|length| length > limit as u64)
        {
            return Err(PdfError::TooLarge { limit });
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > limit {
                return Err(PdfError::TooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}

/// Extract text on the blocking pool; malformed files can make the parser panic.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, PdfError> {
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| PdfError::Extract(e.to_string()))?
        .map_err(|e| PdfError::Extract(e.to_string()))?;

    let text = extracted.trim();
    if text.is_empty() {
        return Err(PdfError::Empty);
    }

    Ok(text.to_string())
}
