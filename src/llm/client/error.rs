//! 模型服务错误分类：区分可重试的临时故障与不可重试的永久故障

use std::sync::LazyLock;

use regex::Regex;
use rig::completion::PromptError;

use crate::types::report::SynthesisError;

static TRANSIENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(429|500|502|503|504|529)\b|rate.?limit|too many requests|overloaded|timed? ?out|temporarily unavailable|connection (reset|refused|closed)|error sending request",
    )
    .expect("valid transient error pattern")
});

/// 将 rig 的调用错误转换为带分类的合成错误
pub fn classify_prompt_error(err: PromptError) -> SynthesisError {
    let detail = err.to_string();
    match err {
        PromptError::CompletionError(_) => classify_message(detail),
        _ => SynthesisError::PermanentServiceFailure(detail),
    }
}

/// 根据错误描述判断是否属于临时故障（限流、超时、服务端5xx、网络中断）
pub fn classify_message(detail: String) -> SynthesisError {
    if TRANSIENT_PATTERN.is_match(&detail) {
        SynthesisError::TransientServiceFailure(detail)
    } else {
        SynthesisError::PermanentServiceFailure(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_transient() {
        let err = classify_message("ProviderError: 429 Too Many Requests".to_string());
        assert!(matches!(err, SynthesisError::TransientServiceFailure(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_server_errors_are_transient() {
        for detail in [
            "HttpError: 503 Service Unavailable",
            "Anthropic API is overloaded",
            "error sending request for url (https://api.openai.com/v1/chat/completions)",
            "operation timed out",
        ] {
            assert!(
                classify_message(detail.to_string()).is_retryable(),
                "expected transient: {}",
                detail
            );
        }
    }

    #[test]
    fn test_auth_errors_are_permanent() {
        let err = classify_message("ProviderError: 401 invalid_api_key".to_string());
        assert!(matches!(err, SynthesisError::PermanentServiceFailure(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_status_codes_need_word_boundaries() {
        let err = classify_message("request id 15003 rejected: bad request".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_text_contains_detail() {
        let err = classify_message("invalid model gpt-9".to_string());
        assert_eq!(err.to_string(), "Error generating report: invalid model gpt-9");
    }
}
