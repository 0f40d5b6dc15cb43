use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use company_brief::cli::run_interactive;
use company_brief::config::{Config, LLMConfig, LLMProvider, MergeOrder, SessionConfig};
use company_brief::generator::context::GeneratorContext;
use company_brief::generate_report;
use company_brief::llm::client::{GenerationRequest, TextGenerator};
use company_brief::research::ResearchPipeline;
use company_brief::research::page_fetcher::PageSource;
use company_brief::research::search::{FanOutOptions, SearchFanOut, SearchSource};
use company_brief::types::report::{ReportRequest, SynthesisError};
use company_brief::types::search::SearchResult;
use tempfile::TempDir;

/// 官网不可访问
struct BlockedSite;

#[async_trait]
impl PageSource for BlockedSite {
    async fn fetch_text(&self, _url: &str) -> String {
        String::new()
    }
}

/// 按查询返回固定结果的检索源，可选地模拟慢速响应
struct CannedSource {
    name: &'static str,
    results: Vec<SearchResult>,
    delay: Option<Duration>,
}

#[async_trait]
impl SearchSource for CannedSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}

struct EchoGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let articles = request
            .user_prompt
            .lines()
            .find(|line| line.contains("Articles Analyzed"))
            .unwrap_or_default()
            .to_string();
        Ok(format!("```markdown\n{}\n```", articles))
    }
}

fn config() -> Config {
    Config {
        llm: LLMConfig {
            provider: LLMProvider::OpenAI,
            api_key: "sk-test".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn build_context(
    config: Config,
    web: CannedSource,
    news: CannedSource,
) -> (GeneratorContext, Arc<EchoGenerator>) {
    let fan_out = SearchFanOut::new(
        Arc::new(web),
        Arc::new(news),
        FanOutOptions::from(&config.research),
    );
    let research = ResearchPipeline::new(Arc::new(BlockedSite), Arc::new(fan_out));
    let generator = Arc::new(EchoGenerator {
        calls: AtomicUsize::new(0),
    });
    (
        GeneratorContext::with_parts(config, research, generator.clone()),
        generator,
    )
}

fn news_items() -> Vec<SearchResult> {
    vec![
        SearchResult::new("Acme opens plant", "https://news.example/plant", "Oct 2025"),
        SearchResult::new("Acme hires CFO", "https://news.example/cfo", "Sep 2025"),
        SearchResult::new("Acme opens plant", "https://news.example/plant", "Oct 2025"),
    ]
}

#[tokio::test]
async fn test_degraded_research_still_produces_report() {
    let (context, generator) = build_context(
        config(),
        CannedSource {
            name: "web",
            results: vec![],
            delay: None,
        },
        CannedSource {
            name: "news",
            results: news_items(),
            delay: None,
        },
    );

    let report = generate_report(&context, "https://acme.com", &ReportRequest::sales(None))
        .await
        .unwrap();

    assert_eq!(report.company_name, "acme");
    assert_eq!(report.source_counts.article_count, 2);
    assert!(!report.source_counts.website_scraped);
    assert_eq!(
        report.body,
        "📊 Research Sources: DuckDuckGo + Google News | Website: No (Restricted) | Articles Analyzed: 2"
    );
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_batch_deadline_returns_partial_results() {
    let mut config = config();
    config.research.batch_deadline_seconds = 1;
    config.research.merge_order = MergeOrder::TaskIndex;

    let (context, _generator) = build_context(
        config,
        CannedSource {
            name: "web",
            results: vec![SearchResult::new(
                "slow",
                "https://slow.example",
                "never arrives",
            )],
            delay: Some(Duration::from_secs(30)),
        },
        CannedSource {
            name: "news",
            results: news_items(),
            delay: None,
        },
    );

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        generate_report(&context, "acme.com", &ReportRequest::sales(None)),
    )
    .await
    .expect("deadline should cut the batch short")
    .unwrap();

    assert_eq!(report.source_counts.article_count, 2);
}

#[tokio::test]
async fn test_interactive_session_enforces_quota() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config();
    config.output_path = Some(temp_dir.path().to_path_buf());
    config.session = SessionConfig {
        cooldown_seconds: 0,
        max_requests: 2,
    };

    let (context, generator) = build_context(
        config,
        CannedSource {
            name: "web",
            results: vec![],
            delay: None,
        },
        CannedSource {
            name: "news",
            results: news_items(),
            delay: None,
        },
    );

    let input: &[u8] = b"acme.com\n\nglobex.com\ninitech.com\n";
    run_interactive(&context, &ReportRequest::sales(None), input)
        .await
        .unwrap();

    assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    assert!(temp_dir.path().join("acme-sales.md").exists());
    assert!(temp_dir.path().join("globex-sales.md").exists());
    assert!(!temp_dir.path().join("initech-sales.md").exists());
    assert!(
        fs::read_to_string(temp_dir.path().join("acme-sales.md"))
            .unwrap()
            .contains("Articles Analyzed: 2")
    );
}
