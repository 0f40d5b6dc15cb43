//! 调研上下文组装
//!
//! 把公司名称、官网正文和新闻条目整理为有长度上限的上下文，供提示词模板使用。

use crate::config::ResearchConfig;
use crate::research::page_fetcher::truncate_chars;
use crate::research::search::dedup_by_link;
use crate::types::report::ReportMode;
use crate::types::search::SearchResult;

/// 无法从URL推断公司名称时使用的占位名称
pub const FALLBACK_COMPANY_NAME: &str = "Target Company";

/// 官网正文不可用时使用的占位内容
pub const WEBSITE_UNAVAILABLE: &str = "Website content unavailable or blocked.";

/// 没有检索到新闻时的占位内容
pub const NO_NEWS_FOUND: &str = "No recent news found.";

/// 销售简报模式下写入提示词的官网正文长度
pub const DEFAULT_SALES_CONTEXT_CHARS: usize = 15000;

/// 面试准备模式下写入提示词的官网正文长度
pub const DEFAULT_INTERVIEW_CONTEXT_CHARS: usize = 10000;

/// 官网正文超过该长度才视为抓取成功
pub const MIN_SCRAPED_CHARS: usize = 100;

/// 来源统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCounts {
    pub article_count: usize,
    pub website_scraped: bool,
}

impl SourceCounts {
    pub fn scraped_status(&self) -> &'static str {
        if self.website_scraped {
            "Yes"
        } else {
            "No (Restricted)"
        }
    }
}

/// 交给报告合成阶段的调研上下文
#[derive(Debug, Clone)]
pub struct ResearchContext {
    pub company_name: String,
    /// 已截断的官网正文，或 [`WEBSITE_UNAVAILABLE`]
    pub website_text: String,
    /// 去重后的新闻条目，保持合并时的顺序
    pub news_items: Vec<SearchResult>,
    pub source_counts: SourceCounts,
}

impl ResearchContext {
    /// 每条新闻渲染为一行 `- {title}: {snippet} ({link})`
    pub fn render_news(&self) -> String {
        if self.news_items.is_empty() {
            return NO_NEWS_FOUND.to_string();
        }

        self.news_items
            .iter()
            .map(|item| format!("- {}: {} ({})", item.title, item.snippet, item.link))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 上下文组装器，官网正文截断长度随报告模式不同而不同
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    max_website_chars: usize,
}

impl ContextAssembler {
    pub fn new(max_website_chars: usize) -> Self {
        Self { max_website_chars }
    }

    pub fn for_mode(mode: ReportMode, config: &ResearchConfig) -> Self {
        match mode {
            ReportMode::SalesOutreach => Self::new(config.sales_context_chars),
            ReportMode::InterviewPrep => Self::new(config.interview_context_chars),
        }
    }

    pub fn assemble(
        &self,
        company_name: &str,
        page_text: &str,
        results: Vec<SearchResult>,
    ) -> ResearchContext {
        let company_name = match company_name.trim() {
            "" => FALLBACK_COMPANY_NAME.to_string(),
            name => name.to_string(),
        };

        let page_text = page_text.trim();
        let website_scraped = is_scraped(page_text);
        let website_text = if page_text.is_empty() {
            WEBSITE_UNAVAILABLE.to_string()
        } else {
            truncate_chars(page_text, self.max_website_chars)
        };

        let news_items = dedup_by_link(results);
        let source_counts = SourceCounts {
            article_count: news_items.len(),
            website_scraped,
        };

        ResearchContext {
            company_name,
            website_text,
            news_items,
            source_counts,
        }
    }
}

/// 正文长度超过阈值且不是占位内容时视为抓取成功
pub fn is_scraped(text: &str) -> bool {
    text.chars().count() > MIN_SCRAPED_CHARS && text != WEBSITE_UNAVAILABLE
}
