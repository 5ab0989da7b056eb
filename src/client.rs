use std::{fmt, sync::Arc};

use serde::de::DeserializeOwned;

use crate::{
    ApiKind, ClientOptions, Connection, ConnectionChain, ErrorWrapper, HttpTransport,
    RequestBuilder, RequestOptions, Response, Result, RetryRequest, Route, Warnings,
};

/// Request builder plus connection chain for one API.
///
/// Every typed client in this crate is a thin layer over `ApiClient`.
#[derive(Clone)]
pub struct ApiClient {
    builder: RequestBuilder,
    connection: Arc<dyn Connection>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client over the default chain for `api`.
    ///
    /// The chain is `HttpTransport`, then the error classifier, then retry
    /// when `options.max_retries > 0`, then request logging when the
    /// `tracing` feature is enabled.
    pub fn new(
        api: ApiKind,
        base_url: impl AsRef<str>,
        routes: &'static [Route],
        token: impl AsRef<str>,
        options: &ClientOptions,
    ) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(options)?);
        let connection = Arc::new(default_chain(api, options).bound_to(transport)?);
        Self::with_connection(base_url, routes, token, options, connection)
    }

    /// Creates a client over a caller-supplied connection.
    pub fn with_connection(
        base_url: impl AsRef<str>,
        routes: &'static [Route],
        token: impl AsRef<str>,
        options: &ClientOptions,
        connection: Arc<dyn Connection>,
    ) -> Result<Self> {
        let builder = RequestBuilder::new(base_url, routes)?
            .with_token(token)?
            .with_user_agent(&options.user_agent)?;
        Ok(Self {
            builder,
            connection,
        })
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Executes `options` and decodes the success body into `T`.
    ///
    /// An empty success body yields `T::default()`.
    pub async fn make<T>(&self, options: RequestOptions) -> Result<(T, Warnings)>
    where
        T: DeserializeOwned + Default + Send,
    {
        let request = self.builder.new_request(options)?;
        let mut result = T::default();
        let mut response = Response::with_result(&mut result);
        self.connection.make(&request, &mut response).await?;
        let warnings = std::mem::take(&mut response.warnings);
        drop(response);
        Ok((result, warnings))
    }
}

/// The unbound chain every typed client starts from.
pub fn default_chain(api: ApiKind, options: &ClientOptions) -> ConnectionChain {
    let mut chain = ConnectionChain::new().with_wrapper(ErrorWrapper::layer(api));
    if options.max_retries > 0 {
        chain = chain.with_wrapper(RetryRequest::layer(
            options.max_retries,
            options.retry_backoff_ms,
        ));
    }
    #[cfg(feature = "tracing")]
    {
        chain = chain.with_wrapper(crate::RequestLogger::layer());
    }
    chain
}
