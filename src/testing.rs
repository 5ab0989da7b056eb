//! Fake connections for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::{header::HeaderMap, Method};
use url::Url;

use crate::{
    connection::BoxFuture, decode::decode_body, Connection, Request, Response, Result,
};

type Responder = dyn Fn(&Request, usize) -> Result<Vec<u8>> + Send + Sync;

/// Answers every request from a closure instead of the network.
///
/// The closure receives the request and the zero-based attempt number and
/// returns either a success body or the error the transport would produce.
pub(crate) struct StubConnection {
    responder: Box<Responder>,
    hits: AtomicUsize,
}

impl StubConnection {
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: Fn(&Request, usize) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            hits: AtomicUsize::new(0),
        }
    }

    pub(crate) fn ok(body: &'static [u8]) -> Self {
        Self::new(move |_, _| Ok(body.to_vec()))
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Connection for StubConnection {
    fn make<'a>(
        &'a self,
        request: &'a Request,
        response: &'a mut Response<'_>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let attempt = self.hits.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            response.raw_response = (self.responder)(request, attempt)?;
            if let Some(target) = response.result.as_deref_mut() {
                decode_body(&response.raw_response, target)?;
            }
            Ok(())
        })
    }
}

pub(crate) fn request(path: &str) -> Request {
    Request {
        method: Method::GET,
        url: Url::parse(&format!("https://api.example.com{path}")).expect("valid test url"),
        headers: HeaderMap::new(),
        body: None,
    }
}
