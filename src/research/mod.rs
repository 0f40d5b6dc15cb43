// 公司调研流水线
// 公司名称推断 -> { 官网正文抓取, 多角度检索扇出 }（并行、互不依赖） -> 上下文组装

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ResearchConfig;
use crate::research::identifier::extract_company_name;
use crate::research::page_fetcher::{HttpPageFetcher, PageSource};
use crate::research::search::news_feed::GoogleNewsFeed;
use crate::research::search::web::DuckDuckGoSearch;
use crate::research::search::{FanOutOptions, SearchFanOut};
use crate::types::search::SearchResult;

pub mod context;
pub mod identifier;
pub mod page_fetcher;
pub mod search;
pub mod user_agent;

/// 调研阶段的原始产出，尚未截断
#[derive(Debug, Clone)]
pub struct RawResearch {
    /// 从URL推断出的公司名称，可能为空
    pub company_name: String,
    pub page_text: String,
    pub results: Vec<SearchResult>,
}

/// 调研流水线
#[derive(Clone)]
pub struct ResearchPipeline {
    page_source: Arc<dyn PageSource>,
    fan_out: Arc<SearchFanOut>,
}

impl ResearchPipeline {
    pub fn new(page_source: Arc<dyn PageSource>, fan_out: Arc<SearchFanOut>) -> Self {
        Self {
            page_source,
            fan_out,
        }
    }

    /// 使用真实的HTTP来源构建流水线，所有来源共享同一个HTTP客户端
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build research HTTP client")?;

        let page_source = Arc::new(HttpPageFetcher::new(client.clone(), config.page_max_chars));
        let web = Arc::new(DuckDuckGoSearch::new(
            client.clone(),
            config.web_search_url.clone(),
        ));
        let news = Arc::new(GoogleNewsFeed::new(client, config.news_feed_url.clone()));
        let fan_out = Arc::new(SearchFanOut::new(web, news, FanOutOptions::from(config)));

        Ok(Self::new(page_source, fan_out))
    }

    /// 执行调研：官网抓取与检索扇出并行进行
    ///
    /// 无法推断公司名称时不发起任何检索，占位名称只在组装上下文时使用。
    pub async fn gather(&self, url: &str) -> RawResearch {
        let company_name = extract_company_name(url);

        info!(url, company = %company_name, "research: gathering sources");

        let (page_text, results) = tokio::join!(
            self.page_source.fetch_text(url),
            self.fan_out.search(&company_name)
        );

        RawResearch {
            company_name,
            page_text,
            results,
        }
    }
}
