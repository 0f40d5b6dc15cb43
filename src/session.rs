//! 会话级请求限流：冷却时间 + 每个会话的请求上限
//!
//! 状态由调用方持有并显式传入当前时间，不依赖任何全局计数器。

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::config::SessionConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Please wait {remaining_seconds} seconds before next request.")]
    CoolingDown { remaining_seconds: i64 },

    #[error("Demo limit reached ({max} companies per session). Restart the session to try more.")]
    QuotaExhausted { max: u32 },
}

#[derive(Debug, Clone)]
pub struct SessionLimiter {
    cooldown: Duration,
    max_requests: u32,
    last_request: Option<DateTime<Utc>>,
    request_count: u32,
}

impl SessionLimiter {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            cooldown: Duration::seconds(config.cooldown_seconds as i64),
            max_requests: config.max_requests,
            last_request: None,
            request_count: 0,
        }
    }

    /// 判断当前是否允许发起新请求，冷却检查优先于配额检查
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), RateLimitError> {
        if let Some(last) = self.last_request {
            let elapsed = now - last;
            if elapsed < self.cooldown {
                let remaining = self.cooldown - elapsed;
                return Err(RateLimitError::CoolingDown {
                    remaining_seconds: remaining.num_seconds().max(1),
                });
            }
        }

        if self.request_count >= self.max_requests {
            return Err(RateLimitError::QuotaExhausted {
                max: self.max_requests,
            });
        }

        Ok(())
    }

    /// 记录一次已放行的请求
    pub fn record(&mut self, now: DateTime<Utc>) {
        self.last_request = Some(now);
        self.request_count += 1;
    }
}
