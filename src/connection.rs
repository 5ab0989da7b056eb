//! The request/response capability and its decorator chain.

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, OnceLock},
};

use crate::{Error, Request, Response, Result};

/// Boxed future returned by dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Makes a request and populates a response.
///
/// Implementations are either a transport, which talks to the network, or a
/// decorator holding exactly one inner connection it delegates to. A chain
/// holds no per-request state, so one instance serves concurrent requests.
pub trait Connection: Send + Sync {
    fn make<'a>(
        &'a self,
        request: &'a Request,
        response: &'a mut Response<'_>,
    ) -> BoxFuture<'a, Result<()>>;
}

impl<C: Connection + ?Sized> Connection for Arc<C> {
    fn make<'a>(
        &'a self,
        request: &'a Request,
        response: &'a mut Response<'_>,
    ) -> BoxFuture<'a, Result<()>> {
        (**self).make(request, response)
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn make<'a>(
        &'a self,
        request: &'a Request,
        response: &'a mut Response<'_>,
    ) -> BoxFuture<'a, Result<()>> {
        (**self).make(request, response)
    }
}

/// Builds one decorator layer around an inner connection.
pub trait Wrapper: Send + Sync {
    fn wrap(&self, inner: Arc<dyn Connection>) -> Arc<dyn Connection>;
}

impl<F> Wrapper for F
where
    F: Fn(Arc<dyn Connection>) -> Arc<dyn Connection> + Send + Sync,
{
    fn wrap(&self, inner: Arc<dyn Connection>) -> Arc<dyn Connection> {
        self(inner)
    }
}

/// An ordered list of wrappers terminated by exactly one transport.
///
/// Wrappers apply in insertion order: the first one added sits directly on
/// the transport, the last one added faces the caller. The chain starts
/// unbound; [`ConnectionChain::bind`] attaches the transport once and for
/// all. Requests on an unbound chain fail with [`Error::UnboundConnection`].
#[derive(Default)]
pub struct ConnectionChain {
    wrappers: Vec<Box<dyn Wrapper>>,
    bound: OnceLock<Arc<dyn Connection>>,
}

impl std::fmt::Debug for ConnectionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionChain")
            .field("wrappers", &self.wrappers.len())
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl ConnectionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer outside every layer added so far.
    pub fn with_wrapper(mut self, wrapper: impl Wrapper + 'static) -> Self {
        self.wrappers.push(Box::new(wrapper));
        self
    }

    /// Attaches the terminating transport. Succeeds at most once.
    pub fn bind(&self, transport: Arc<dyn Connection>) -> Result<()> {
        if self.is_bound() {
            return Err(Error::AlreadyBound);
        }

        let connection = self
            .wrappers
            .iter()
            .fold(transport, |inner, wrapper| wrapper.wrap(inner));

        self.bound.set(connection).map_err(|_| Error::AlreadyBound)
    }

    /// Binds `transport` and returns the chain ready for use.
    pub fn bound_to(self, transport: Arc<dyn Connection>) -> Result<Self> {
        self.bind(transport)?;
        Ok(self)
    }

    pub fn is_bound(&self) -> bool {
        self.bound.get().is_some()
    }
}

impl Connection for ConnectionChain {
    fn make<'a>(
        &'a self,
        request: &'a Request,
        response: &'a mut Response<'_>,
    ) -> BoxFuture<'a, Result<()>> {
        match self.bound.get() {
            Some(connection) => connection.make(request, response),
            None => Box::pin(async { Err::<(), _>(Error::UnboundConnection) }),
        }
    }
}
