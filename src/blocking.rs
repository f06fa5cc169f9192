use thiserror::Error;

/// The blocking task panicked or was cancelled.
#[derive(Debug, Error)]
#[error("blocking task failed: {0}")]
pub struct BlockingError(String);

/// Runs CPU-bound work (password hashing) off the async workers.
pub async fn run<F, R>(f: F) -> Result<R, BlockingError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BlockingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_the_closure_result() {
        assert_eq!(run(|| 6 * 7).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn reports_a_panicking_task() {
        let err = run(|| -> u8 { panic!("boom") }).await.unwrap_err();
        assert!(err.to_string().starts_with("blocking task failed"));
    }
}
