//! 网页检索适配器（DuckDuckGo HTML 检索页）

use std::sync::LazyLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::research::search::SearchSource;
use crate::research::user_agent::random_user_agent;
use crate::types::search::SearchResult;

static RESULT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result").expect("valid result selector"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("valid link selector"));
static SNIPPET_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a.result__snippet, .result__snippet").expect("valid snippet selector")
});

pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SearchSource for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "DuckDuckGo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let body = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .header(reqwest::header::USER_AGENT, random_user_agent())
            .header(reqwest::header::ACCEPT, "text/html")
            .send()
            .await
            .context("web search request failed")?
            .error_for_status()
            .context("web search returned error status")?
            .text()
            .await
            .context("failed to read web search body")?;

        Ok(parse_results(&body, limit))
    }
}

/// 解析检索结果页
///
/// `Html` 不是 Send，解析必须在同步函数里完成，不能跨越 await。
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);

    document
        .select(&RESULT_SELECTOR)
        .filter_map(|result| {
            let anchor = result.select(&LINK_SELECTOR).next()?;
            let title = anchor.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                return None;
            }

            let link = anchor
                .value()
                .attr("href")
                .map(resolve_redirect)
                .unwrap_or_default();
            let snippet = result
                .select(&SNIPPET_SELECTOR)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            Some(SearchResult::new(title, link, snippet))
        })
        .take(limit)
        .collect()
}

/// 检索结果链接可能被包装成 `//duckduckgo.com/l/?uddg=<编码后的目标地址>&rut=...`，
/// 这里还原出真实地址
pub fn resolve_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    if let Ok(parsed) = Url::parse(&absolute)
        && let Some((_, target)) = parsed.query_pairs().find(|(key, _)| key == "uddg")
        && !target.is_empty()
    {
        return target.into_owned();
    }

    href.to_string()
}
