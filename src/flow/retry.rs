use std::future::Future;
use std::time::Duration;

use crate::flow::task::ExecutionError;

/// 流程层的重试策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// 最大尝试次数（含首次），至少为1
    pub max_attempts: u32,
    /// 两次尝试之间的等待时间
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// 执行操作，遇到瞬时错误时重试，`operation`的参数为从1开始的尝试序号
    pub async fn run<T, F, Fut>(&self, tag: &str, operation: F) -> Result<T, ExecutionError>
    where
        F: Fn(u32) -> Fut,
        Fut: Future<Output = Result<T, ExecutionError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        tracing::info!(task = tag, attempt, "retry succeeded");
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if !err.is_transient() || attempt >= max_attempts {
                        tracing::warn!(
                            task = tag,
                            attempt,
                            max_attempts,
                            error = %err,
                            "task failed, giving up"
                        );
                        return Err(err);
                    }
                    tracing::warn!(
                        task = tag,
                        attempt,
                        max_attempts,
                        error = %err,
                        "task failed, retrying"
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }
        }
    }
}
