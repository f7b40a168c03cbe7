use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// 以有限并发执行一组异步任务，返回结果的顺序与输入顺序一致，与完成先后无关
pub async fn do_parallel_with_limit<F, T>(futures: Vec<F>, max_concurrent: usize) -> Vec<T>
where
    F: Future<Output = T>,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

    let controlled = futures.into_iter().map(|fut| {
        let semaphore = semaphore.clone();
        async move {
            // 信号量不会被关闭，获取失败时直接执行
            let _permit = semaphore.acquire().await.ok();
            fut.await
        }
    });

    join_all(controlled).await
}
