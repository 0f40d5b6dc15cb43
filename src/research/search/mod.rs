//! 多角度检索扇出引擎
//!
//! 为同一家公司并发执行若干条网页检索和一次新闻订阅源抓取，单个任务失败只会
//! 让该任务贡献空结果，不影响其它任务；全部任务结束（或批次截止时间到达）后
//! 按链接去重合并。

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::{MergeOrder, ResearchConfig};
use crate::types::search::SearchResult;
use crate::utils::threads::do_parallel_with_limit;

pub mod news_feed;
pub mod web;

/// 检索来源适配器
///
/// 适配器负责把各自来源的数据结构转换为统一的 [`SearchResult`]。
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// 用于日志的来源名称
    fn name(&self) -> &str;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
}

/// 单个检索任务
#[derive(Clone)]
pub struct SearchTask {
    pub index: usize,
    pub query: String,
    pub limit: usize,
    pub source: Arc<dyn SearchSource>,
}

impl SearchTask {
    pub fn label(&self) -> String {
        format!("{}: {}", self.source.name(), self.query)
    }

    /// 执行任务，失败时记录日志并返回空结果
    async fn run(self) -> TaskOutput {
        let label = self.label();
        let results = match self.source.search(&self.query, self.limit).await {
            Ok(results) => {
                debug!(task = %label, count = results.len(), "fanout: task finished");
                results
            }
            Err(e) => {
                warn!(task = %label, error = %format!("{:#}", e), "fanout: task failed, contributing no results");
                Vec::new()
            }
        };
        TaskOutput {
            index: self.index,
            results,
        }
    }
}

struct TaskOutput {
    index: usize,
    results: Vec<SearchResult>,
}

/// 扇出引擎参数
#[derive(Debug, Clone)]
pub struct FanOutOptions {
    pub max_parallels: usize,
    pub results_per_query: usize,
    pub feed_max_items: usize,
    pub batch_deadline: Option<Duration>,
    pub search_angles: Vec<String>,
    pub merge_order: MergeOrder,
}

impl From<&ResearchConfig> for FanOutOptions {
    fn from(config: &ResearchConfig) -> Self {
        Self {
            max_parallels: config.max_parallels,
            results_per_query: config.results_per_query,
            feed_max_items: config.feed_max_items,
            batch_deadline: Some(config.batch_deadline()),
            search_angles: config.search_angles.clone(),
            merge_order: config.merge_order,
        }
    }
}

/// 检索扇出引擎
pub struct SearchFanOut {
    web: Arc<dyn SearchSource>,
    news: Arc<dyn SearchSource>,
    options: FanOutOptions,
}

impl SearchFanOut {
    pub fn new(
        web: Arc<dyn SearchSource>,
        news: Arc<dyn SearchSource>,
        options: FanOutOptions,
    ) -> Self {
        Self { web, news, options }
    }

    /// 构造本次检索的全部任务：每个检索角度一条网页检索，外加一次订阅源抓取
    pub fn plan(&self, company_name: &str) -> Vec<SearchTask> {
        let mut tasks: Vec<SearchTask> = self
            .options
            .search_angles
            .iter()
            .enumerate()
            .map(|(index, angle)| SearchTask {
                index,
                query: format!("{} {}", company_name, angle),
                limit: self.options.results_per_query,
                source: self.web.clone(),
            })
            .collect();

        tasks.push(SearchTask {
            index: tasks.len(),
            query: company_name.to_string(),
            limit: self.options.feed_max_items,
            source: self.news.clone(),
        });

        tasks
    }

    /// 并发执行全部检索任务，合并并去重
    pub async fn search(&self, company_name: &str) -> Vec<SearchResult> {
        if company_name.trim().is_empty() {
            return Vec::new();
        }

        let tasks = self.plan(company_name);
        info!(
            company = company_name,
            tasks = tasks.len(),
            max_parallels = self.options.max_parallels,
            "fanout: starting"
        );

        let futures: Vec<_> = tasks.into_iter().map(SearchTask::run).collect();
        let outcome =
            do_parallel_with_limit(futures, self.options.max_parallels, self.options.batch_deadline)
                .await;

        if outcome.timed_out() {
            warn!(
                abandoned = outcome.abandoned,
                completed = outcome.completed.len(),
                "fanout: batch deadline reached, returning partial results"
            );
        }

        let mut outputs = outcome.completed;
        if self.options.merge_order == MergeOrder::TaskIndex {
            outputs.sort_by_key(|output| output.index);
        }

        let merged = outputs.into_iter().flat_map(|output| output.results);
        let deduped = dedup_by_link(merged);
        info!(company = company_name, results = deduped.len(), "fanout: merged");
        deduped
    }
}

/// 按链接去重，保留首次出现的结果
///
/// 链接为空的结果不参与去重，全部保留。
pub fn dedup_by_link<I>(results: I) -> Vec<SearchResult>
where
    I: IntoIterator<Item = SearchResult>,
{
    let mut seen: HashSet<String> = HashSet::new();
    results
        .into_iter()
        .filter(|result| match result.dedup_key() {
            Some(link) => seen.insert(link.to_string()),
            None => true,
        })
        .collect()
}
