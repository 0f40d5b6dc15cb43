//! 新闻订阅源适配器（Google News RSS）

use anyhow::{Context, Result};
use async_trait::async_trait;
use url::form_urlencoded;

use crate::research::search::SearchSource;
use crate::research::user_agent::random_user_agent;
use crate::types::search::{GOOGLE_NEWS_LABEL, SearchResult};

pub struct GoogleNewsFeed {
    client: reqwest::Client,
    url_template: String,
}

impl GoogleNewsFeed {
    pub fn new(client: reqwest::Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    /// 把编码后的公司名称填入订阅源地址模板
    pub fn feed_url(&self, company_name: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(company_name.as_bytes()).collect();
        self.url_template.replace("{query}", &encoded)
    }
}

#[async_trait]
impl SearchSource for GoogleNewsFeed {
    fn name(&self) -> &str {
        GOOGLE_NEWS_LABEL
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let bytes = self
            .client
            .get(self.feed_url(query))
            .header(reqwest::header::USER_AGENT, random_user_agent())
            .send()
            .await
            .context("news feed request failed")?
            .error_for_status()
            .context("news feed returned error status")?
            .bytes()
            .await
            .context("failed to read news feed body")?;

        parse_feed(&bytes, limit)
    }
}

/// 解析订阅源，只保留前 `limit` 条
///
/// 订阅源自带的 description 往往是杂乱的HTML片段，摘要改用 "发布时间 - 标题" 拼接。
pub fn parse_feed(bytes: &[u8], limit: usize) -> Result<Vec<SearchResult>> {
    let feed = feed_rs::parser::parse(bytes).context("failed to parse news feed")?;

    let items = feed
        .entries
        .into_iter()
        .take(limit)
        .map(|entry| {
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "No Title".to_string());
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();
            // 缺少发布时间时日期部分留空，摘要形如 " - {title}"
            let published = entry
                .published
                .or(entry.updated)
                .map(|published| published.to_rfc2822())
                .unwrap_or_default();
            let snippet = format!("{} - {}", published, title);

            SearchResult::new(title, link, snippet).with_source_label(GOOGLE_NEWS_LABEL)
        })
        .collect();

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rss_with_items(count: usize) -> String {
        let items: String = (0..count)
            .map(|i| {
                format!(
                    r#"<item>
  <title>Acme headline {i}</title>
  <link>https://news.example.com/articles/{i}</link>
  <pubDate>Mon, 06 Oct 2025 14:0{i}:00 GMT</pubDate>
  <description>&lt;a href="https://news.example.com"&gt;noisy markup&lt;/a&gt;</description>
</item>"#,
                    i = i % 10
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>"acme" - Google News</title>{}</channel></rss>"#,
            items
        )
    }

    #[test]
    fn test_parse_feed_caps_items() {
        let results = parse_feed(rss_with_items(8).as_bytes(), 5).unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].title, "Acme headline 0");
        assert_eq!(results[4].title, "Acme headline 4");
    }

    #[test]
    fn test_parse_feed_synthesizes_snippet() {
        let results = parse_feed(rss_with_items(1).as_bytes(), 5).unwrap();
        let first = &results[0];

        assert_eq!(first.link, "https://news.example.com/articles/0");
        assert!(first.snippet.contains("Oct 2025 14:00:00"));
        assert!(first.snippet.ends_with(" - Acme headline 0"));
        assert!(!first.snippet.contains("noisy markup"));
        assert_eq!(first.source_label.as_deref(), Some("Google News RSS"));
    }

    #[test]
    fn test_parse_feed_missing_fields() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>t</title><item><description>only a description</description></item></channel></rss>"#;

        let results = parse_feed(xml.as_bytes(), 5).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "No Title");
        assert_eq!(results[0].link, "");
        assert_eq!(results[0].snippet, " - No Title");
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(parse_feed(b"<html>not a feed", 5).is_err());
    }

    #[test]
    fn test_feed_url_encodes_company_name() {
        let feed = GoogleNewsFeed::new(
            reqwest::Client::new(),
            "https://news.google.com/rss/search?q={query}&hl=en-US&gl=US&ceid=US:en",
        );

        assert_eq!(
            feed.feed_url("acme & sons"),
            "https://news.google.com/rss/search?q=acme+%26+sons&hl=en-US&gl=US&ceid=US:en"
        );
    }
}
