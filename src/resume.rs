//! 简历文本提取
//!
//! PDF 提取失败时返回以 `Error` 开头的字符串，调用方通过 [`normalize_resume_text`]
//! 把失败结果替换为占位内容，避免错误信息被当作简历正文写入提示词。

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::types::report::NOT_PROVIDED;

const ERROR_PREFIX: &str = "Error";

/// 从PDF字节中提取纯文本
pub fn extract_pdf_text(bytes: &[u8]) -> String {
    // pdf-extract 遇到部分畸形文件会直接 panic
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => text.trim().to_string(),
        Ok(Err(e)) => format!("Error extracting PDF: {}", e),
        Err(_) => "Error extracting PDF: malformed document".to_string(),
    }
}

/// 提取失败或内容为空时返回 "Not provided"
pub fn normalize_resume_text(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() || text.starts_with(ERROR_PREFIX) {
        NOT_PROVIDED.to_string()
    } else {
        text.to_string()
    }
}

/// 读取简历文件：`.pdf` 按PDF提取，其余按UTF-8文本读取
pub fn load_resume(path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        let bytes =
            std::fs::read(path).context(format!("Failed to read resume file: {:?}", path))?;
        extract_pdf_text(&bytes)
    } else {
        std::fs::read_to_string(path).context(format!("Failed to read resume file: {:?}", path))?
    };

    if text.starts_with(ERROR_PREFIX) {
        warn!(path = %path.display(), detail = %text, "resume: extraction failed");
    }

    Ok(normalize_resume_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_garbage_bytes_yield_error_string() {
        let text = extract_pdf_text(b"definitely not a pdf");
        assert!(text.starts_with("Error extracting PDF"));
    }

    #[test]
    fn test_normalize_error_and_blank() {
        assert_eq!(normalize_resume_text("Error extracting PDF: bad xref"), "Not provided");
        assert_eq!(normalize_resume_text("   \n"), "Not provided");
        assert_eq!(
            normalize_resume_text("  Led a team of 15 engineers \n"),
            "Led a team of 15 engineers"
        );
    }

    #[test]
    fn test_load_text_resume() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cv.txt");
        fs::write(&path, "Grew ARR by 40% in 18 months").unwrap();

        assert_eq!(load_resume(&path).unwrap(), "Grew ARR by 40% in 18 months");
    }

    #[test]
    fn test_load_broken_pdf_falls_back_to_placeholder() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cv.PDF");
        fs::write(&path, b"%PDF-1.4 truncated").unwrap();

        assert_eq!(load_resume(&path).unwrap(), "Not provided");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_resume(&temp_dir.path().join("missing.txt")).is_err());
    }
}
