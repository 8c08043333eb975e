use crate::utils::error::{BookError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Bounded execution window for a single store operation.
///
/// Handlers create one per request and pass it down; when the window closes the
/// in-flight store future is dropped and the call fails with `StoreUnavailable`.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    window: Duration,
}

impl Deadline {
    pub fn after(window: Duration) -> Self {
        Self {
            at: Instant::now() + window,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout_at(self.at, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("{} abandoned after {:?}", operation, self.window);
                Err(BookError::store_unavailable(format!(
                    "{} timed out after {:?}",
                    operation, self.window
                )))
            }
        }
    }
}
