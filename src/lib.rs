//! `cf-connection` is the HTTP connection layer shared by Cloud Controller
//! and UAA API clients.
//!
//! A request flows from a [`RequestBuilder`] into a chain of [`Connection`]s:
//! decorators such as [`ErrorWrapper`] and [`RetryRequest`] wrap a single
//! [`HttpTransport`]. The transport reports non-success responses as
//! [`RawHttpStatusError`]s; the error wrapper turns them into typed errors
//! where the body allows it:
//! - [`Error::InvalidAuthToken`]
//! - [`Error::Api`]
//! - [`Error::RawHttpStatus`] when the body cannot be classified

mod classify;
mod client;
mod connection;
mod decode;
mod error;
#[cfg(feature = "tracing")]
mod logging;
mod options;
mod request;
mod response;
mod retry;
mod transport;
mod types;
mod wire;

pub mod ccv2;
pub mod uaa;

#[cfg(test)]
mod testing;

pub use ccv2::CloudControllerClient;
pub use classify::{classify, convert, ApiKind, ErrorLayer, ErrorWrapper};
pub use client::{default_chain, ApiClient};
pub use connection::{BoxFuture, Connection, ConnectionChain, Wrapper};
pub use error::{Error, RawHttpStatusError};
#[cfg(feature = "tracing")]
pub use logging::{RequestLogger, RequestLoggerLayer};
pub use options::ClientOptions;
pub use request::{Request, RequestBuilder, RequestOptions, Route};
pub use response::{Response, ResultSink, WARNINGS_HEADER};
pub use retry::{RetryLayer, RetryRequest};
pub use transport::HttpTransport;
pub use types::{CcUser, UaaUser, Warnings};
pub use uaa::UaaClient;

pub type Result<T> = std::result::Result<T, Error>;
