//! 官网正文抓取
//!
//! 抓取失败（网络错误、超时、非2xx状态码）时返回空字符串，调用方据此进入降级模式。

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Node};
use tracing::{debug, warn};

use crate::research::identifier::normalize_url;
use crate::research::user_agent::random_user_agent;

/// 官网正文默认最大字符数
pub const DEFAULT_PAGE_MAX_CHARS: usize = 15000;

/// 不参与正文提取的元素
const SKIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "noscript", "template"];

/// 需要换行分隔的块级元素
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "td", "th", "article",
    "section", "main", "header", "blockquote", "pre", "title", "dt", "dd", "figcaption",
];

/// 页面正文来源
#[async_trait]
pub trait PageSource: Send + Sync {
    /// 返回页面可见文本，失败时返回空字符串
    async fn fetch_text(&self, url: &str) -> String;
}

/// 基于HTTP的官网正文抓取器
pub struct HttpPageFetcher {
    client: reqwest::Client,
    max_chars: usize,
}

impl HttpPageFetcher {
    pub fn new(client: reqwest::Client, max_chars: usize) -> Self {
        Self { client, max_chars }
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, random_user_agent())
            .header(reqwest::header::ACCEPT, "text/html")
            .send()
            .await
            .context("page request failed")?
            .error_for_status()
            .context("page returned error status")?;

        let body = response.text().await.context("failed to read page body")?;
        Ok(extract_visible_text(&body, self.max_chars))
    }
}

#[async_trait]
impl PageSource for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        let url = normalize_url(url);
        match self.try_fetch(&url).await {
            Ok(text) => {
                debug!(url = %url, chars = text.chars().count(), "page: extracted text");
                text
            }
            Err(e) => {
                warn!(url = %url, error = %format!("{:#}", e), "page: fetch failed, continuing without website text");
                String::new()
            }
        }
    }
}

/// 提取HTML中的可见文本并按字符数截断
pub fn extract_visible_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len().min(max_chars * 2));
    collect_text(&document.root_element(), &mut raw);

    truncate_chars(&clean_whitespace(&raw), max_chars)
}

fn collect_text(element: &ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(el) => {
                let tag = el.name();
                if SKIPPED_TAGS.contains(&tag) {
                    continue;
                }
                if BLOCK_TAGS.contains(&tag) {
                    buf.push('\n');
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, buf);
                }
            }
            _ => {}
        }
    }
}

/// 逐行去除首尾空白，按连续两个空格拆分短语，丢弃空行
pub fn clean_whitespace(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 按字符（而非字节）截断
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
<html>
  <head>
    <title>Acme Corp</title>
    <style>body { color: red; }</style>
    <script>var tracking = "should not appear";</script>
  </head>
  <body>
    <nav><a href="/">Home</a><a href="/about">About</a></nav>
    <main>
      <h1>Industrial   Anvils</h1>
      <p>Acme builds anvils    for    cartoon coyotes.</p>
      <ul><li>Drop-forged</li><li>Rocket-assisted</li></ul>
    </main>
    <footer>Copyright Acme</footer>
  </body>
</html>"#;

    #[test]
    fn test_extract_visible_text_skips_noise() {
        let text = extract_visible_text(SAMPLE_HTML, DEFAULT_PAGE_MAX_CHARS);

        assert!(text.contains("Acme Corp"));
        assert!(text.contains("Drop-forged"));
        assert!(text.contains("Rocket-assisted"));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("About"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn test_extract_visible_text_splits_phrases() {
        let text = extract_visible_text(SAMPLE_HTML, DEFAULT_PAGE_MAX_CHARS);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines.contains(&"Industrial"));
        assert!(lines.contains(&"Anvils"));
        assert!(lines.iter().all(|line| !line.trim().is_empty()));
    }

    #[test]
    fn test_extract_visible_text_truncates() {
        let text = extract_visible_text(SAMPLE_HTML, 10);
        assert_eq!(text.chars().count(), 10);
    }

    #[test]
    fn test_clean_whitespace() {
        let cleaned = clean_whitespace("  first line  \n\n\n  second   part  \n   ");
        assert_eq!(cleaned, "first line\nsecond\npart");
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[tokio::test]
    async fn test_fetch_unreachable_returns_empty() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(500))
            .build()
            .unwrap();
        let fetcher = HttpPageFetcher::new(client, DEFAULT_PAGE_MAX_CHARS);

        let text = fetcher.fetch_text("http://127.0.0.1:9/unreachable").await;
        assert!(text.is_empty());
    }
}
