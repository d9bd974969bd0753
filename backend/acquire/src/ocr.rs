//! Optical character recognition via the `tesseract` CLI.
//!
//! The engine stages image bytes in a temp file and shells out. A missing
//! binary or a failed run is a recoverable error; the session surfaces it as
//! a warning and keeps the previous text.

use std::path::Path;

use anyhow::Result;
use tokio::process::Command;
use tracing::{debug, warn};

use storymap_core::StorymapError;

#[derive(Debug, Clone)]
pub struct OcrEngine {
    /// Path to the `tesseract` binary.
    pub bin: String,
    /// Recognition language passed as `-l`.
    pub lang: String,
}

impl Default for OcrEngine {
    fn default() -> Self {
        Self {
            bin: "tesseract".to_string(),
            lang: "eng".to_string(),
        }
    }
}

impl OcrEngine {
    /// Run OCR over in-memory PNG bytes.
    pub async fn extract_text(&self, png: &[u8]) -> Result<String> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("capture.png");
        tokio::fs::write(&path, png).await?;
        self.extract_text_file(&path).await
    }

    /// Run OCR over an image file on disk.
    pub async fn extract_text_file(&self, path: &Path) -> Result<String> {
        debug!(path = %path.display(), bin = %self.bin, "Running OCR");
        let output = Command::new(&self.bin)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .await
            .map_err(|e| {
                StorymapError::Ocr(format!("could not run {}: {e}", self.bin))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = ?output.status.code(), "OCR run failed");
            return Err(StorymapError::Ocr(format!(
                "{} exited with {:?}: {}",
                self.bin,
                output.status.code(),
                stderr.trim()
            ))
            .into());
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(chars = text.len(), "OCR complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_recoverable_error() {
        let engine = OcrEngine {
            bin: "storymap-no-such-ocr-binary".to_string(),
            lang: "eng".to_string(),
        };
        let err = engine.extract_text(b"not a real png").await.unwrap_err();
        assert!(err.to_string().contains("could not run"));
    }
}
