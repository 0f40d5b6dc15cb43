use crate::config::{Config, LLMProvider};
use crate::generator::context::GeneratorContext;
use crate::generator::workflow::launch;
use crate::resume::load_resume;
use crate::session::{RateLimitError, SessionLimiter};
use crate::types::report::{InputError, ReportMode, ReportRequest};
use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Company Brief - 基于公开信息与AI的公司调研报告生成工具
#[derive(Parser, Debug)]
#[command(name = "company-brief")]
#[command(
    about = "Researches a company from its website and recent news, then generates a sales outreach brief or an interview preparation guide."
)]
#[command(version)]
pub struct Args {
    /// 目标公司网址（也可以使用 --url 指定）
    #[arg(value_name = "URL")]
    pub target: Option<String>,

    /// 目标公司网址
    #[arg(short, long)]
    pub url: Option<String>,

    /// 报告模式 (sales, interview)
    #[arg(short, long, default_value = "sales")]
    pub mode: String,

    /// 销售简报模式下介绍自己产品/服务的价值主张
    #[arg(long)]
    pub value_proposition: Option<String>,

    /// 面试准备模式下的职位描述
    #[arg(long)]
    pub job_description: Option<String>,

    /// 从文件读取职位描述
    #[arg(long, conflicts_with = "job_description")]
    pub job_description_file: Option<PathBuf>,

    /// 简历文件（PDF或纯文本）
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 报告输出目录，未指定时直接输出到终端
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// LLM Provider (openai, anthropic, deepseek, openrouter, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 报告合成使用的模型
    #[arg(long)]
    pub model: Option<String>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 检索任务最大并发数
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// 整批检索任务的截止时间（秒）
    #[arg(long)]
    pub batch_deadline: Option<u64>,

    /// 交互式会话：每行输入一个公司网址
    #[arg(short, long)]
    pub interactive: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置，CLI参数优先级高于配置文件
    pub fn into_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(output_path) = &self.output_path {
            config.output_path = Some(output_path.clone());
        }

        // 覆盖LLM配置
        if let Some(provider_str) = &self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url.clone();
        }
        if let Some(llm_api_key) = &self.llm_api_key {
            config.llm.api_key = llm_api_key.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 覆盖调研配置
        if let Some(max_parallels) = self.max_parallels {
            config.research.max_parallels = max_parallels;
        }
        if let Some(batch_deadline) = self.batch_deadline {
            config.research.batch_deadline_seconds = batch_deadline;
        }

        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }

    /// 报告模式，外部传入的标签在这里统一归一化
    pub fn report_mode(&self) -> ReportMode {
        ReportMode::from_label(&self.mode)
    }

    /// 目标网址，位置参数与 --url 二选一
    pub fn target_url(&self) -> Result<String, InputError> {
        self.url
            .as_deref()
            .or(self.target.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or(InputError::MissingUrl)
    }

    /// 校验并组装报告请求，任何工作开始之前完成
    pub fn into_request(&self) -> Result<ReportRequest, InputError> {
        match self.report_mode() {
            ReportMode::SalesOutreach => Ok(ReportRequest::sales(self.value_proposition.as_deref())),
            ReportMode::InterviewPrep => {
                let job_description = match &self.job_description_file {
                    Some(path) => Some(read_text_file(path)?),
                    None => self.job_description.clone(),
                };
                let job_description = job_description
                    .filter(|jd| !jd.trim().is_empty())
                    .ok_or(InputError::MissingJobDescription)?;

                let resume_text = match &self.resume {
                    Some(path) => Some(load_resume(path).map_err(|e| InputError::UnreadableFile {
                        path: path.display().to_string(),
                        reason: format!("{:#}", e),
                    })?),
                    None => None,
                };

                Ok(ReportRequest::interview(
                    Some(&job_description),
                    resume_text.as_deref(),
                ))
            }
        }
    }
}

fn read_text_file(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|e| InputError::UnreadableFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// 交互式会话：逐行读取公司网址，受会话限流约束
///
/// 单个报告失败只打印错误，不会结束会话；配额用尽后会话结束。
pub async fn run_interactive<R>(
    context: &GeneratorContext,
    request: &ReportRequest,
    input: R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut limiter = SessionLimiter::new(&context.config.session);
    let mut lines = input.lines();

    println!("💬 请输入公司网址（每行一个，Ctrl-D 结束）:");
    while let Some(line) = lines.next_line().await? {
        let url = line.trim();
        if url.is_empty() {
            continue;
        }

        let now = Utc::now();
        match limiter.check(now) {
            Ok(()) => limiter.record(now),
            Err(e @ RateLimitError::CoolingDown { .. }) => {
                println!("⏳ {}", e);
                continue;
            }
            Err(e @ RateLimitError::QuotaExhausted { .. }) => {
                println!("🛑 {}", e);
                break;
            }
        }

        if let Err(e) = launch(context, url, request).await {
            eprintln!("❌ {}", e);
        }
    }

    Ok(())
}
