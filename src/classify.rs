//! Translation of raw HTTP status errors into typed errors.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::{
    connection::{BoxFuture, Wrapper},
    Connection, Error, RawHttpStatusError, Request, Response, Result,
};

/// Selects the error-body schema of the API behind a connection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApiKind {
    /// `{"error": "...", "error_description": "..."}`
    Uaa,
    /// Cloud Controller v2: `{"code": 1000, "description": "...", "error_code": "CF-..."}`
    CloudController,
}

impl ApiKind {
    fn invalid_token_type(self) -> &'static str {
        match self {
            ApiKind::Uaa => "invalid_token",
            ApiKind::CloudController => "CF-InvalidAuthToken",
        }
    }
}

/// Both fields are required: a body missing either one stays a raw status
/// error instead of becoming a structured error with empty text.
#[derive(Debug, Deserialize)]
struct UaaErrorBody {
    error: String,
    error_description: String,
}

#[derive(Debug, Deserialize)]
struct CloudControllerErrorBody {
    description: String,
    error_code: String,
}

/// Parses `raw` against the error schema of `api`.
///
/// Returns `None` when the body does not match, in which case the caller
/// keeps the raw error. Status codes are only consulted after a successful
/// parse, so an opaque 401 from an intermediary is never mistaken for a
/// token rejection.
pub fn classify(api: ApiKind, raw: &RawHttpStatusError) -> Option<Error> {
    let (error_type, description) = match api {
        ApiKind::Uaa => {
            let body: UaaErrorBody = serde_json::from_slice(&raw.raw_response).ok()?;
            (body.error, body.error_description)
        }
        ApiKind::CloudController => {
            let body: CloudControllerErrorBody =
                serde_json::from_slice(&raw.raw_response).ok()?;
            (body.error_code, body.description)
        }
    };

    if raw.status_code == StatusCode::UNAUTHORIZED.as_u16()
        && error_type == api.invalid_token_type()
    {
        return Some(Error::InvalidAuthToken {
            message: description,
            raw: raw.clone(),
        });
    }

    Some(Error::Api {
        error_type,
        description,
        raw: raw.clone(),
    })
}

/// Converts a raw status error into the most specific error available.
pub fn convert(api: ApiKind, raw: RawHttpStatusError) -> Error {
    match classify(api, &raw) {
        Some(err) => err,
        None => Error::RawHttpStatus(raw),
    }
}

/// Decorator that classifies the raw status errors of its inner connection.
///
/// Every other error, and every success, passes through untouched.
pub struct ErrorWrapper {
    api: ApiKind,
    connection: Arc<dyn Connection>,
}

impl ErrorWrapper {
    pub fn new(api: ApiKind, connection: Arc<dyn Connection>) -> Self {
        Self { api, connection }
    }

    /// A [`Wrapper`] that produces an `ErrorWrapper` for `api`.
    pub fn layer(api: ApiKind) -> ErrorLayer {
        ErrorLayer { api }
    }
}

impl Connection for ErrorWrapper {
    fn make<'a>(
        &'a self,
        request: &'a Request,
        response: &'a mut Response<'_>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            match self.connection.make(request, response).await {
                Err(Error::RawHttpStatus(raw)) => {
                    let err = convert(self.api, raw);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(api = ?self.api, error = %err, "classified http status error");
                    Err(err)
                }
                other => other,
            }
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ErrorLayer {
    api: ApiKind,
}

impl Wrapper for ErrorLayer {
    fn wrap(&self, inner: Arc<dyn Connection>) -> Arc<dyn Connection> {
        Arc::new(ErrorWrapper::new(self.api, inner))
    }
}
