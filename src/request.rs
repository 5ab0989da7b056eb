use std::fmt;

use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Method,
};
use url::Url;

use crate::{Error, Result};

/// Maps a symbolic request name to a method and path template.
///
/// Path templates use `:param` segments, e.g. `/v2/apps/:app_guid`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
}

impl Route {
    pub const fn new(name: &'static str, method: Method, path: &'static str) -> Self {
        Self { name, method, path }
    }
}

/// Describes a single call before it is turned into a [`Request`].
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub request_name: String,
    pub uri_params: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// Header overrides. `Accept` is always replaced with JSON.
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new(request_name: impl Into<String>) -> Self {
        Self {
            request_name: request_name.into(),
            ..Self::default()
        }
    }

    pub fn uri_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.uri_params.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A fully built request, ready for a [`Connection`](crate::Connection).
#[derive(Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut headers = self.headers.clone();
        if headers.contains_key(header::AUTHORIZATION) {
            headers.insert(
                header::AUTHORIZATION,
                HeaderValue::from_static("<redacted>"),
            );
        }
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .finish()
    }
}

/// Turns [`RequestOptions`] into concrete [`Request`]s against one API.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: String,
    routes: &'static [Route],
    authorization: Option<HeaderValue>,
    user_agent: HeaderValue,
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("routes", &self.routes.len())
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl RequestBuilder {
    /// Creates a builder for the API rooted at `base_url`.
    pub fn new(base_url: impl AsRef<str>, routes: &'static [Route]) -> Result<Self> {
        let base_url = base_url.as_ref().trim().trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|err| Error::InvalidUrl(format!("{base_url}: {err}")))?;
        Ok(Self {
            base_url,
            routes,
            authorization: None,
            user_agent: HeaderValue::from_static(crate::options::DEFAULT_USER_AGENT),
        })
    }

    /// Attaches a bearer token to every request this builder produces.
    pub fn with_token(mut self, token: impl AsRef<str>) -> Result<Self> {
        let token = token.as_ref();
        if token.trim().is_empty() {
            self.authorization = None;
            return Ok(self);
        }
        let mut value = HeaderValue::from_str(&normalize_bearer_authorization(token))
            .map_err(|_| Error::InvalidHeader("access token contains invalid characters".to_owned()))?;
        value.set_sensitive(true);
        self.authorization = Some(value);
        Ok(self)
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Result<Self> {
        self.user_agent = HeaderValue::from_str(user_agent)
            .map_err(|_| Error::InvalidHeader("user agent contains invalid characters".to_owned()))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn route(&self, name: &str) -> Result<&Route> {
        self.routes
            .iter()
            .find(|route| route.name == name)
            .ok_or_else(|| Error::UnknownRequest {
                name: name.to_owned(),
            })
    }

    /// Builds a request. Touches no network.
    pub fn new_request(&self, options: RequestOptions) -> Result<Request> {
        let route = self.route(&options.request_name)?;
        let path = expand_path(route, &options.uri_params)?;

        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|err| Error::InvalidUrl(format!("{}{path}: {err}", self.base_url)))?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&options.query);
        }

        let mut headers = options.headers;
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        if options.body.is_some() && !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        if !headers.contains_key(header::USER_AGENT) {
            headers.insert(header::USER_AGENT, self.user_agent.clone());
        }
        if let Some(authorization) = &self.authorization {
            if !headers.contains_key(header::AUTHORIZATION) {
                headers.insert(header::AUTHORIZATION, authorization.clone());
            }
        }

        Ok(Request {
            method: route.method.clone(),
            url,
            headers,
            body: options.body,
        })
    }
}

fn expand_path(route: &Route, params: &[(String, String)]) -> Result<String> {
    let mut path = String::with_capacity(route.path.len());
    for (index, segment) in route.path.split('/').enumerate() {
        if index > 0 {
            path.push('/');
        }
        match segment.strip_prefix(':') {
            Some(param) => {
                let value = params
                    .iter()
                    .find(|(name, _)| name == param)
                    .map(|(_, value)| value)
                    .ok_or_else(|| Error::MissingPathParam {
                        request: route.name.to_owned(),
                        param: param.to_owned(),
                    })?;
                path.push_str(&urlencoding::encode(value));
            }
            None => path.push_str(segment),
        }
    }
    Ok(path)
}

pub(crate) fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("bearer {trimmed}")
    }
}
