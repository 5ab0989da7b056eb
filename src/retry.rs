use std::{sync::Arc, time::Duration};

use reqwest::StatusCode;
use tokio::time::sleep;

use crate::{
    connection::{BoxFuture, Wrapper},
    Connection, Error, Request, Response, Result,
};

/// Decorator that replays a request after transient failures.
///
/// Only added to a chain when the caller asks for retries. Retryable statuses
/// are recognised through [`Error::raw_status`], so the decorator behaves the
/// same on either side of an [`ErrorWrapper`](crate::ErrorWrapper).
pub struct RetryRequest {
    max_retries: usize,
    backoff_ms: u64,
    connection: Arc<dyn Connection>,
}

impl RetryRequest {
    pub fn new(max_retries: usize, backoff_ms: u64, connection: Arc<dyn Connection>) -> Self {
        Self {
            max_retries,
            backoff_ms,
            connection,
        }
    }

    pub fn layer(max_retries: usize, backoff_ms: u64) -> RetryLayer {
        RetryLayer {
            max_retries,
            backoff_ms,
        }
    }

    async fn make_with_retry(&self, request: &Request, response: &mut Response<'_>) -> Result<()> {
        let mut attempt = 0usize;
        loop {
            match self.connection.make(request, response).await {
                Err(err) if should_retry(&err) && attempt < self.max_retries => {
                    self.wait_before_retry(attempt).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Exponential backoff sleep.
    async fn wait_before_retry(&self, attempt: usize) {
        let exp = attempt.min(16) as u32;
        let multiplier = 1u64 << exp;
        let delay_ms = self.backoff_ms.saturating_mul(multiplier);

        #[cfg(feature = "tracing")]
        tracing::debug!("retrying request after {} ms", delay_ms);

        sleep(Duration::from_millis(delay_ms)).await;
    }
}

impl Connection for RetryRequest {
    fn make<'a>(
        &'a self,
        request: &'a Request,
        response: &'a mut Response<'_>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.make_with_retry(request, response))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RetryLayer {
    max_retries: usize,
    backoff_ms: u64,
}

impl Wrapper for RetryLayer {
    fn wrap(&self, inner: Arc<dyn Connection>) -> Arc<dyn Connection> {
        Arc::new(RetryRequest::new(self.max_retries, self.backoff_ms, inner))
    }
}

fn should_retry(err: &Error) -> bool {
    if let Some(raw) = err.raw_status() {
        return StatusCode::from_u16(raw.status_code).is_ok_and(should_retry_status);
    }
    match err {
        Error::Request(err) => err.is_timeout() || err.is_connect(),
        _ => false,
    }
}

fn should_retry_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}
