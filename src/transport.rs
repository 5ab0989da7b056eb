use std::{error::Error as StdError, fmt, io, time::Duration};

use crate::{
    connection::BoxFuture, decode::decode_body, ClientOptions, Connection, Error,
    RawHttpStatusError, Request, Response, Result,
};

/// Terminates every connection chain: sends the request over HTTP.
///
/// Failures before a response arrives become [`Error::UnverifiedServer`] or
/// [`Error::Request`]. Once a status code is known, non-success responses
/// always come back as [`Error::RawHttpStatus`] with the literal body.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(options.timeout_ms))
            .danger_accept_invalid_certs(options.skip_ssl_validation)
            .build()
            .map_err(Error::Request)?;
        Ok(Self::with_client(http))
    }

    /// Wraps an existing client, sharing its connection pool.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn send(&self, request: &Request, response: &mut Response<'_>) -> Result<()> {
        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let http_response = builder
            .send()
            .await
            .map_err(|err| classify_send_error(err, request))?;

        let status = http_response.status();
        response.set_headers(http_response.headers().clone());
        // With a status in hand, a non-success response is reported as such
        // even if its body could not be read.
        let body = match http_response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(err) if status.is_success() => return Err(Error::Request(err)),
            Err(_) => Vec::new(),
        };
        response.raw_response = body.clone();

        if !status.is_success() {
            return Err(Error::RawHttpStatus(RawHttpStatusError::new(
                status.as_u16(),
                body,
            )));
        }

        if let Some(target) = response.result.as_deref_mut() {
            decode_body(&response.raw_response, target)?;
        }
        Ok(())
    }
}

impl Connection for HttpTransport {
    fn make<'a>(
        &'a self,
        request: &'a Request,
        response: &'a mut Response<'_>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.send(request, response))
    }
}

fn classify_send_error(err: reqwest::Error, request: &Request) -> Error {
    if is_certificate_error(&err) {
        let mut url = request.url.clone();
        url.set_path("");
        url.set_query(None);
        return Error::UnverifiedServer {
            url: url.as_str().trim_end_matches('/').to_owned(),
        };
    }
    Error::Request(err)
}

/// Walks the source chain looking for a rustls certificate verification
/// failure.
///
/// TLS handshake errors surface wrapped in an `io::Error`, whose `source()`
/// skips the wrapped value, so the inner error is inspected directly.
pub(crate) fn is_certificate_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if is_invalid_certificate(err) {
            return true;
        }
        if let Some(inner) = err.downcast_ref::<io::Error>().and_then(io::Error::get_ref) {
            if is_invalid_certificate(inner) {
                return true;
            }
        }
        current = err.source();
    }
    false
}

fn is_invalid_certificate(err: &(dyn StdError + 'static)) -> bool {
    matches!(
        err.downcast_ref::<rustls::Error>(),
        Some(rustls::Error::InvalidCertificate(_))
    )
}

#[cfg(test)]
mod tests {
    use std::{error::Error as StdError, fmt, io};

    use rustls::{CertificateError, Error as TlsError};

    use super::is_certificate_error;

    /// Stand-in for the reqwest/hyper layers above the connector error.
    #[derive(Debug)]
    struct Layer {
        message: &'static str,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.source
                .as_deref()
                .map(|source| source as &(dyn StdError + 'static))
        }
    }

    fn sending(source: impl StdError + Send + Sync + 'static) -> Layer {
        Layer {
            message: "error sending request for url (https://certificate-manager.example.com/v2/service_certificates)",
            source: Some(Box::new(Layer {
                message: "client error (Connect)",
                source: Some(Box::new(source)),
            })),
        }
    }

    #[test]
    fn detects_rustls_certificate_failure_inside_io_error() {
        let tls = TlsError::InvalidCertificate(CertificateError::UnknownIssuer);
        let err = sending(io::Error::new(io::ErrorKind::InvalidData, tls));
        assert!(is_certificate_error(&err));
    }

    #[test]
    fn detects_bare_rustls_certificate_failure() {
        let err = sending(TlsError::InvalidCertificate(CertificateError::Expired));
        assert!(is_certificate_error(&err));
    }

    #[test]
    fn certificate_wording_in_url_is_not_certificate_failure() {
        let err = sending(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "tcp connect error: Connection refused (os error 111)",
        ));
        assert!(!is_certificate_error(&err));
    }

    #[test]
    fn other_tls_failures_are_not_certificate_failures() {
        let tls = TlsError::General("handshake aborted".to_owned());
        let err = sending(io::Error::new(io::ErrorKind::InvalidData, tls));
        assert!(!is_certificate_error(&err));
    }
}
