use std::sync::Arc;

use anyhow::Result;

use crate::{
    config::Config,
    generator::synthesizer::ReportSynthesizer,
    llm::client::{LLMClient, TextGenerator},
    research::ResearchPipeline,
};

#[derive(Clone)]
pub struct GeneratorContext {
    /// 配置
    pub config: Config,
    /// 调研流水线：官网抓取 + 检索扇出
    pub research: ResearchPipeline,
    /// 文本生成服务，用于与AI通信。
    pub generator: Arc<dyn TextGenerator>,
}

impl GeneratorContext {
    /// 创建新的生成器上下文
    pub fn new(config: Config) -> Result<Self> {
        let research = ResearchPipeline::from_config(&config.research)?;
        let generator: Arc<dyn TextGenerator> = Arc::new(LLMClient::new(config.llm.clone())?);

        Ok(Self::with_parts(config, research, generator))
    }

    /// 使用指定的调研流水线和文本生成服务组装上下文
    pub fn with_parts(
        config: Config,
        research: ResearchPipeline,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            config,
            research,
            generator,
        }
    }

    pub fn synthesizer(&self) -> ReportSynthesizer {
        ReportSynthesizer::new(self.config.llm.clone(), self.generator.clone())
    }
}
