//! 报告合成：渲染模板、调用模型服务、清理返回文本

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::LLMConfig;
use crate::generator::prompts::{render, templates_for};
use crate::llm::client::{GenerationRequest, TextGenerator};
use crate::research::context::ResearchContext;
use crate::types::report::{Report, ReportRequest, ReportResult, SynthesisError};

pub struct ReportSynthesizer {
    llm: LLMConfig,
    generator: Arc<dyn TextGenerator>,
}

impl ReportSynthesizer {
    pub fn new(llm: LLMConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self { llm, generator }
    }

    /// 合成报告
    ///
    /// 缺少凭证时立即返回 [`SynthesisError::MissingCredential`]，不会发起任何调用。
    pub async fn synthesize(
        &self,
        request: &ReportRequest,
        context: &ResearchContext,
    ) -> ReportResult {
        if !self.llm.has_credential() {
            return Err(SynthesisError::MissingCredential {
                provider: self.llm.provider.to_string(),
            });
        }

        let mode = request.mode();
        let (system_prompt, template) = templates_for(mode);
        let prompt = GenerationRequest::new(system_prompt, render(template, request, context));

        info!(
            company = %context.company_name,
            %mode,
            model = %self.llm.model,
            articles = context.source_counts.article_count,
            "synthesis: requesting report"
        );

        let raw = self.generator.generate(&prompt).await.inspect_err(|e| {
            warn!(company = %context.company_name, error = %e, "synthesis: generation failed");
        })?;

        Ok(Report {
            company_name: context.company_name.clone(),
            mode,
            body: sanitize_report(&raw),
            source_counts: context.source_counts,
        })
    }
}

const LEADING_FENCES: &[&str] = &["```markdown", "```md", "```"];

/// 去掉模型包裹输出用的起始代码围栏，并删除所有反引号
pub fn sanitize_report(raw: &str) -> String {
    let trimmed = raw.trim();
    let unfenced = LEADING_FENCES
        .iter()
        .find_map(|fence| trimmed.strip_prefix(fence))
        .unwrap_or(trimmed);

    unfenced.replace('`', "").trim().to_string()
}
