//! LLM客户端 - 提供统一的文本生成接口

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::LLMConfig;
use crate::types::report::SynthesisError;

pub mod error;
mod providers;

use error::classify_prompt_error;
use providers::ProviderClient;

/// 一次文本生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl GenerationRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }
}

/// 文本生成服务
///
/// 报告合成只依赖这个接口，测试中可替换为不访问网络的实现。
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, SynthesisError>;
}

/// LLM客户端 - 基于 rig 的多Provider实现
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// 单次调用，超时与空响应都会被转换为对应的错误
    async fn attempt(&self, request: &GenerationRequest) -> Result<String, SynthesisError> {
        let agent = self
            .client
            .create_agent(&request.system_prompt, &self.config);

        let reply = tokio::time::timeout(self.config.timeout(), agent.prompt(&request.user_prompt))
            .await
            .map_err(|_| SynthesisError::Timeout {
                seconds: self.config.timeout_seconds,
            })?
            .map_err(classify_prompt_error)?;

        if reply.trim().is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }
        Ok(reply)
    }
}

#[async_trait]
impl TextGenerator for LLMClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, SynthesisError> {
        debug!(
            provider = %self.config.provider,
            model = %self.config.model,
            prompt_chars = request.user_prompt.len(),
            "llm: generating"
        );

        retry_transient(
            self.config.retry_attempts,
            Duration::from_millis(self.config.retry_delay_ms),
            || self.attempt(request),
        )
        .await
    }
}

/// 通用重试逻辑：只有临时性故障才会重试，最多额外重试 `retry_attempts` 次
pub async fn retry_transient<T, F, Fut>(
    retry_attempts: u32,
    retry_delay: Duration,
    operation: F,
) -> Result<T, SynthesisError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, SynthesisError>>,
{
    let mut retries = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) if err.is_retryable() && retries < retry_attempts => {
                retries += 1;
                warn!(
                    retry = retries,
                    max_retries = retry_attempts,
                    error = %err,
                    "llm: transient failure, retrying"
                );
                tokio::time::sleep(retry_delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
