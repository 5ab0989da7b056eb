use reqwest::header::{HeaderMap, LOCATION};
use serde::de::DeserializeOwned;

/// Header Cloud Controller uses to attach warnings to a successful response.
pub const WARNINGS_HEADER: &str = "x-cf-warnings";

/// A slot the decoder can fill with a success payload.
///
/// Implemented for every deserializable type, so any `&mut T` can serve as
/// the result target of a request.
pub trait ResultSink: Send {
    fn fill(&mut self, body: &[u8]) -> serde_json::Result<()>;
}

impl<T> ResultSink for T
where
    T: DeserializeOwned + Send,
{
    fn fill(&mut self, body: &[u8]) -> serde_json::Result<()> {
        *self = serde_json::from_slice(body)?;
        Ok(())
    }
}

/// Caller-owned target populated by a connection.
///
/// Each request gets its own `Response`, so concurrent requests through one
/// connection chain never share response state.
#[derive(Default)]
pub struct Response<'r> {
    /// Where the decoded success body goes. `None` skips decoding.
    pub result: Option<&'r mut dyn ResultSink>,
    /// Body bytes exactly as received.
    pub raw_response: Vec<u8>,
    pub headers: HeaderMap,
    /// Value of the `Location` header, if any.
    pub resource_location_url: Option<String>,
    /// Warnings the server attached alongside the result.
    pub warnings: Vec<String>,
}

impl<'r> Response<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a response that decodes into `result`.
    pub fn with_result(result: &'r mut dyn ResultSink) -> Self {
        Self {
            result: Some(result),
            ..Self::default()
        }
    }

    /// Records response metadata from the received headers.
    pub(crate) fn set_headers(&mut self, headers: HeaderMap) {
        self.resource_location_url = headers
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        self.warnings = parse_warnings(&headers);
        self.headers = headers;
    }
}

impl std::fmt::Debug for Response<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("has_result", &self.result.is_some())
            .field("raw_response_len", &self.raw_response.len())
            .field("resource_location_url", &self.resource_location_url)
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Splits the warnings header into its comma-separated, query-escaped parts.
pub(crate) fn parse_warnings(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(WARNINGS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let spaced = part.replace('+', " ");
            match urlencoding::decode(&spaced) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => spaced,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, LOCATION};

    use super::{parse_warnings, Response, WARNINGS_HEADER};

    #[test]
    fn warnings_are_split_and_unescaped() {
        let mut headers = HeaderMap::new();
        headers.insert(
            WARNINGS_HEADER,
            HeaderValue::from_static("first+warning,second%2C+with+comma"),
        );
        assert_eq!(
            parse_warnings(&headers),
            vec!["first warning".to_owned(), "second, with comma".to_owned()]
        );
    }

    #[test]
    fn missing_warnings_header_yields_no_warnings() {
        assert!(parse_warnings(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn set_headers_records_location() {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static("/v2/jobs/abc"));
        let mut response = Response::new();
        response.set_headers(headers);
        assert_eq!(
            response.resource_location_url.as_deref(),
            Some("/v2/jobs/abc")
        );
    }
}
