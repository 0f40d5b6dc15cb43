use thiserror::Error;

use crate::research::context::SourceCounts;

/// 价值主张为空时使用的占位内容
pub const DEFAULT_VALUE_PROPOSITION: &str = "Premium B2B Services";

/// 职位描述、简历缺失时使用的占位内容
pub const NOT_PROVIDED: &str = "Not provided";

/// 报告模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    #[default]
    SalesOutreach,
    InterviewPrep,
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportMode::SalesOutreach => write!(f, "sales"),
            ReportMode::InterviewPrep => write!(f, "interview"),
        }
    }
}

impl ReportMode {
    /// 归一化外部传入的模式标签
    ///
    /// 历史上出现过多种标签写法（如 "Interview Prep"、"🎯 Interview Preparation"），
    /// 凡包含 interview 的标签都归为面试准备，其余一律按销售简报处理。
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("interview") {
            ReportMode::InterviewPrep
        } else {
            ReportMode::SalesOutreach
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReportMode::SalesOutreach => "Strategic Account Brief",
            ReportMode::InterviewPrep => "Interview Strategy Guide",
        }
    }
}

/// 报告请求：模式及其专属的辅助输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRequest {
    SalesOutreach {
        value_proposition: String,
    },
    InterviewPrep {
        job_description: String,
        resume_text: String,
    },
}

impl ReportRequest {
    pub fn sales(value_proposition: Option<&str>) -> Self {
        ReportRequest::SalesOutreach {
            value_proposition: or_placeholder(value_proposition, DEFAULT_VALUE_PROPOSITION),
        }
    }

    pub fn interview(job_description: Option<&str>, resume_text: Option<&str>) -> Self {
        ReportRequest::InterviewPrep {
            job_description: or_placeholder(job_description, NOT_PROVIDED),
            resume_text: or_placeholder(resume_text, NOT_PROVIDED),
        }
    }

    pub fn mode(&self) -> ReportMode {
        match self {
            ReportRequest::SalesOutreach { .. } => ReportMode::SalesOutreach,
            ReportRequest::InterviewPrep { .. } => ReportMode::InterviewPrep,
        }
    }
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

/// 生成完成的报告
#[derive(Debug, Clone)]
pub struct Report {
    pub company_name: String,
    pub mode: ReportMode,
    /// 已清理的报告正文（Markdown）
    pub body: String,
    pub source_counts: SourceCounts,
}

pub type ReportResult = Result<Report, SynthesisError>;

/// 报告合成阶段的错误
///
/// Display 输出即面向用户的错误文本。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("Error: API key for the {provider} text-generation service was not found.")]
    MissingCredential { provider: String },

    #[error("Error generating report: request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Error generating report: {0}")]
    TransientServiceFailure(String),

    #[error("Error generating report: {0}")]
    PermanentServiceFailure(String),

    #[error("Error generating report: the model returned an empty response")]
    EmptyResponse,
}

impl SynthesisError {
    /// 是否值得重试（超时、限流、服务端临时故障）
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SynthesisError::Timeout { .. } | SynthesisError::TransientServiceFailure(_)
        )
    }
}

/// 在开始任何工作之前即被拒绝的输入
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Please enter a company URL.")]
    MissingUrl,

    #[error("Interview preparation requires a job description.")]
    MissingJobDescription,

    #[error("Could not read {path}: {reason}")]
    UnreadableFile { path: String, reason: String },
}
