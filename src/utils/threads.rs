use futures::StreamExt;
use std::future::Future;
use std::time::Duration;

/// 并发执行结果
#[derive(Debug)]
pub struct ParallelOutcome<T> {
    /// 按完成先后排列的结果
    pub completed: Vec<T>,
    /// 截止时间到达时仍未完成而被放弃的任务数
    pub abandoned: usize,
}

impl<T> ParallelOutcome<T> {
    pub fn timed_out(&self) -> bool {
        self.abandoned > 0
    }
}

/// 以最大并发数 `max_parallels` 执行一批任务，等待全部完成或截止时间到达
///
/// 截止时间到达后，尚未完成的任务会随 stream 一起被丢弃（即被取消），
/// 已完成的结果照常返回。
pub async fn do_parallel_with_limit<F, T>(
    futures: Vec<F>,
    max_parallels: usize,
    deadline: Option<Duration>,
) -> ParallelOutcome<T>
where
    F: Future<Output = T>,
{
    let total = futures.len();
    let mut stream = futures::stream::iter(futures).buffer_unordered(max_parallels.max(1));
    let mut completed = Vec::with_capacity(total);

    let deadline_at = deadline.map(|d| tokio::time::Instant::now() + d);

    loop {
        let next = match deadline_at {
            Some(at) => match tokio::time::timeout_at(at, stream.next()).await {
                Ok(next) => next,
                Err(_) => break,
            },
            None => stream.next().await,
        };

        match next {
            Some(result) => completed.push(result),
            None => break,
        }
    }

    let abandoned = total - completed.len();
    ParallelOutcome {
        completed,
        abandoned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_all_tasks_complete() {
        let futures: Vec<_> = (0..5).map(|i| async move { i * 2 }).collect();

        let outcome = do_parallel_with_limit(futures, 2, None).await;

        let mut values = outcome.completed;
        values.sort();
        assert_eq!(values, vec![0, 2, 4, 6, 8]);
        assert_eq!(outcome.abandoned, 0);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let futures: Vec<_> = (0..8)
            .map(|_| {
                let running = running.clone();
                let peak = peak.clone();
                async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                }
            })
            .collect();

        let outcome = do_parallel_with_limit(futures, 3, None).await;

        assert_eq!(outcome.completed.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_results() {
        let futures: Vec<std::pin::Pin<Box<dyn Future<Output = u32> + Send>>> = vec![
            Box::pin(async { 1 }),
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                2
            }),
            Box::pin(async { 3 }),
        ];

        let started = std::time::Instant::now();
        let outcome =
            do_parallel_with_limit(futures, 3, Some(Duration::from_millis(100))).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        let mut values = outcome.completed.clone();
        values.sort();
        assert_eq!(values, vec![1, 3]);
        assert_eq!(outcome.abandoned, 1);
        assert!(outcome.timed_out());
    }

    #[tokio::test]
    async fn test_zero_parallels_still_runs() {
        let futures: Vec<_> = (0..3).map(|i| async move { i }).collect();
        let outcome = do_parallel_with_limit(futures, 0, None).await;
        assert_eq!(outcome.completed.len(), 3);
    }
}
