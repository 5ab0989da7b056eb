//! Request logging decorator.
//!
//! Enabled with the `tracing` feature.

use std::{sync::Arc, time::Instant};

use crate::{
    connection::{BoxFuture, Wrapper},
    Connection, Request, Response, Result,
};

/// Emits a `tracing` event per request and per outcome.
///
/// The `Authorization` header never reaches the log; only the method, URL,
/// duration and status or error do.
pub struct RequestLogger {
    connection: Arc<dyn Connection>,
}

impl RequestLogger {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    pub fn layer() -> RequestLoggerLayer {
        RequestLoggerLayer
    }
}

impl Connection for RequestLogger {
    fn make<'a>(
        &'a self,
        request: &'a Request,
        response: &'a mut Response<'_>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            tracing::debug!(method = %request.method, url = %request.url, "request");
            let started = Instant::now();
            let result = self.connection.make(request, response).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::debug!(
                    method = %request.method,
                    url = %request.url,
                    elapsed_ms,
                    warnings = response.warnings.len(),
                    "response"
                ),
                Err(err) => tracing::debug!(
                    method = %request.method,
                    url = %request.url,
                    elapsed_ms,
                    status = err.raw_status().map(|raw| raw.status_code),
                    error = %err,
                    "request failed"
                ),
            }
            result
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RequestLoggerLayer;

impl Wrapper for RequestLoggerLayer {
    fn wrap(&self, inner: Arc<dyn Connection>) -> Arc<dyn Connection> {
        Arc::new(RequestLogger::new(inner))
    }
}
