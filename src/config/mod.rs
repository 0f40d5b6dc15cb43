use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::research::context::{DEFAULT_INTERVIEW_CONTEXT_CHARS, DEFAULT_SALES_CONTEXT_CHARS};
use crate::research::page_fetcher::DEFAULT_PAGE_MAX_CHARS;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "company-brief.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl LLMProvider {
    /// 本地部署的模型服务不需要API KEY
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LLMProvider::Ollama)
    }
}

/// 检索结果合并顺序
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeOrder {
    /// 按任务完成先后合并，多次运行之间不保证一致
    #[serde(rename = "arrival")]
    #[default]
    Arrival,
    /// 按任务序号稳定排序，任务内部保持原有顺序
    #[serde(rename = "task_index")]
    TaskIndex,
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 报告输出目录，未设置时直接输出到终端
    pub output_path: Option<PathBuf>,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 调研配置
    pub research: ResearchConfig,

    /// 会话限流配置
    pub session: SessionConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 报告合成使用的模型
    pub model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 仅针对临时性故障的重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次调用超时时间（秒）
    pub timeout_seconds: u64,
}

/// 调研阶段配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// 检索任务最大并发数
    pub max_parallels: usize,

    /// 每条网页检索保留的结果数
    pub results_per_query: usize,

    /// 新闻订阅源保留的条目数
    pub feed_max_items: usize,

    /// 单次网络请求超时时间（秒）
    pub request_timeout_seconds: u64,

    /// 整批检索任务的截止时间（秒）
    pub batch_deadline_seconds: u64,

    /// 官网正文最大字符数
    pub page_max_chars: usize,

    /// 销售简报模式下写入提示词的官网正文长度
    pub sales_context_chars: usize,

    /// 面试准备模式下写入提示词的官网正文长度
    pub interview_context_chars: usize,

    /// 检索角度，拼接在公司名称之后
    pub search_angles: Vec<String>,

    /// 网页检索服务地址
    pub web_search_url: String,

    /// 新闻订阅源地址模板，{query} 会被替换为编码后的公司名称
    pub news_feed_url: String,

    /// 检索结果合并顺序
    pub merge_order: MergeOrder,
}

/// 会话限流配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    /// 两次请求之间的冷却时间（秒）
    pub cooldown_seconds: u64,

    /// 每个会话允许的最大请求数
    pub max_requests: u32,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 显式指定的配置文件优先，其次是当前目录下的默认配置文件，都不存在时使用默认值
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let default_config_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);

        if default_config_path.exists() {
            Self::from_file(&default_config_path)
        } else {
            Ok(Config::default())
        }
    }
}

impl LLMConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn has_credential(&self) -> bool {
        !self.provider.requires_api_key() || !self.api_key.trim().is_empty()
    }
}

impl ResearchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn batch_deadline(&self) -> Duration {
        Duration::from_secs(self.batch_deadline_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: None,
            llm: LLMConfig::default(),
            research: ResearchConfig::default(),
            session: SessionConfig::default(),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model: String::from("gpt-4o"),
            max_tokens: 4096,
            temperature: 0.3,
            retry_attempts: 1,
            retry_delay_ms: 2000,
            timeout_seconds: 90,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_parallels: 6,
            results_per_query: 3,
            feed_max_items: 5,
            request_timeout_seconds: 10,
            batch_deadline_seconds: 30,
            page_max_chars: DEFAULT_PAGE_MAX_CHARS,
            sales_context_chars: DEFAULT_SALES_CONTEXT_CHARS,
            interview_context_chars: DEFAULT_INTERVIEW_CONTEXT_CHARS,
            search_angles: vec![
                "news".to_string(),
                "recent acquisitions funding".to_string(),
                "strategic partnership announcement".to_string(),
                "new product launch".to_string(),
                "site:linkedin.com/company".to_string(),
            ],
            web_search_url: String::from("https://html.duckduckgo.com/html/"),
            news_feed_url: String::from(
                "https://news.google.com/rss/search?q={query}&hl=en-US&gl=US&ceid=US:en",
            ),
            merge_order: MergeOrder::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: 60,
            max_requests: 5,
        }
    }
}
