pub(crate) const DEFAULT_USER_AGENT: &str = concat!("cf-connection/", env!("CARGO_PKG_VERSION"));

/// Configures the transport and the optional decorators of a client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt. Zero leaves the
    /// retry decorator out of the chain entirely.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
    /// Accept any server certificate.
    pub skip_ssl_validation: bool,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_retries: 0,
            retry_backoff_ms: 250,
            skip_ssl_validation: false,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ClientOptions {
    /// Reads overrides from the environment on top of the defaults.
    ///
    /// Reads:
    /// - `CF_DIAL_TIMEOUT` — request timeout in whole seconds
    /// - `CF_SKIP_SSL_VALIDATION` — `true` or `1` to accept any certificate
    ///
    /// Unset variables keep their defaults; malformed values are an error.
    pub fn from_env() -> std::result::Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> std::result::Result<Self, String> {
        let mut options = Self::default();

        if let Some(raw) = lookup("CF_DIAL_TIMEOUT") {
            let seconds = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("CF_DIAL_TIMEOUT must be a whole number of seconds, got '{raw}'"))?;
            options.timeout_ms = seconds.saturating_mul(1_000);
        }

        if let Some(raw) = lookup("CF_SKIP_SSL_VALIDATION") {
            options.skip_ssl_validation = match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" | "" => false,
                _ => return Err(format!("CF_SKIP_SSL_VALIDATION must be true or false, got '{raw}'")),
            };
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::ClientOptions;

    #[test]
    fn defaults_do_not_retry() {
        let options = ClientOptions::default();
        assert_eq!(options.max_retries, 0);
        assert!(!options.skip_ssl_validation);
        assert!(options.user_agent.starts_with("cf-connection/"));
    }

    #[test]
    fn lookup_overrides_timeout_and_ssl() {
        let options = ClientOptions::from_lookup(|key| match key {
            "CF_DIAL_TIMEOUT" => Some("5".to_owned()),
            "CF_SKIP_SSL_VALIDATION" => Some("TRUE".to_owned()),
            _ => None,
        })
        .expect("valid env");
        assert_eq!(options.timeout_ms, 5_000);
        assert!(options.skip_ssl_validation);
    }

    #[test]
    fn lookup_rejects_malformed_timeout() {
        let err = ClientOptions::from_lookup(|key| {
            (key == "CF_DIAL_TIMEOUT").then(|| "soon".to_owned())
        })
        .expect_err("must fail");
        assert!(err.contains("CF_DIAL_TIMEOUT"));
    }
}
