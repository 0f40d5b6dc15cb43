use crate::generator::context::GeneratorContext;
use crate::research::context::ContextAssembler;
use crate::types::report::{ReportRequest, ReportResult};

use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::info;

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: Vec<(String, Instant)>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: Vec::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .push((phase_name.to_string(), Instant::now()));
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let position = self
            .phase_start_times
            .iter()
            .position(|(name, _)| name == phase_name)?;
        let (name, start_time) = self.phase_start_times.remove(position);
        let duration = start_time.elapsed();
        self.phase_durations.push((name, duration));
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const RESEARCH: &'static str = "research";
    pub const SYNTHESIS: &'static str = "synthesis";
    pub const OUTPUT: &'static str = "output";
}

/// 调研 -> 上下文组装 -> 报告合成
///
/// 调研阶段的任何来源失败都只会让上下文变少，只有合成阶段的错误会返回给调用方。
pub async fn generate_report(
    context: &GeneratorContext,
    url: &str,
    request: &ReportRequest,
) -> ReportResult {
    let mut timing = TimingScope::new();
    let mode = request.mode();

    timing.start_phase(TimingKeys::RESEARCH);
    println!("🔍 正在调研目标公司: {}", url);
    let raw = context.research.gather(url).await;
    let research_context = ContextAssembler::for_mode(mode, &context.config.research).assemble(
        &raw.company_name,
        &raw.page_text,
        raw.results,
    );
    timing.end_phase(TimingKeys::RESEARCH);

    let counts = research_context.source_counts;
    if !counts.website_scraped {
        println!("⚠️ 官网内容无法抓取，报告将主要基于新闻检索结果生成");
    }
    println!(
        "📰 {} 调研完成：新闻 {} 条，官网抓取 {}",
        research_context.company_name,
        counts.article_count,
        counts.scraped_status()
    );

    timing.start_phase(TimingKeys::SYNTHESIS);
    println!("🤖 正在生成{}...", mode.display_name());
    let result = context
        .synthesizer()
        .synthesize(request, &research_context)
        .await;
    timing.end_phase(TimingKeys::SYNTHESIS);

    info!(
        company = %research_context.company_name,
        %mode,
        success = result.is_ok(),
        "\n{}",
        timing.generate_timing_report()
    );

    result
}

/// 启动报告生成工作流，并将结果交给输出端
pub async fn launch(context: &GeneratorContext, url: &str, request: &ReportRequest) -> Result<()> {
    let report = generate_report(context, url, request).await?;

    let mut timing = TimingScope::new();
    timing.start_phase(TimingKeys::OUTPUT);
    crate::generator::outlet::save(context, &report).await?;
    if let Some(duration) = timing.end_phase(TimingKeys::OUTPUT) {
        info!(elapsed_ms = duration.as_millis() as u64, "outlet: report saved");
    }

    Ok(())
}
