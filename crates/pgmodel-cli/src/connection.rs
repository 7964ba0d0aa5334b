use std::fmt;

use url::Url;

use crate::error::{CliError, CliResult};

const SCHEMES: &[&str] = &["postgres", "postgresql"];
const SENSITIVE_PARAMS: &[&str] = &["password", "pass", "token", "sslpassword"];
const REDACTED: &str = "***";

/// A validated PostgreSQL connection string.
///
/// `Display` renders the redacted form; the raw URL is only handed to the
/// driver.
#[derive(Clone)]
pub struct ConnectionConfig {
    raw: String,
    url: Url,
}

impl ConnectionConfig {
    pub fn parse(raw: &str) -> CliResult<Self> {
        let invalid =
            |reason: String| CliError::InvalidConfig(format!("connection string {reason}"));

        let url = Url::parse(raw).map_err(|err| invalid(format!("is not a valid URL: {err}")))?;
        if !SCHEMES.contains(&url.scheme()) {
            return Err(invalid(
                "must start with postgres:// or postgresql://".to_string(),
            ));
        }

        let has_host = url.host_str().is_some_and(|host| !host.is_empty())
            || url
                .query_pairs()
                .any(|(key, value)| key == "host" && !value.is_empty());
        if !has_host {
            return Err(invalid("is missing a host".to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            url,
        })
    }

    /// Raw connection string, secrets included.
    pub fn url(&self) -> &str {
        &self.raw
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn database(&self) -> Option<&str> {
        Some(self.url.path().trim_start_matches('/')).filter(|name| !name.is_empty())
    }

    fn redacted(&self) -> Url {
        let mut redacted = self.url.clone();
        if redacted.password().is_some() {
            // Only fails for URLs that cannot carry credentials.
            let _ = redacted.set_password(Some(REDACTED));
        }

        let sensitive = |key: &str| SENSITIVE_PARAMS.contains(&key.to_ascii_lowercase().as_str());
        if self.url.query_pairs().any(|(key, _)| sensitive(&key)) {
            let pairs: Vec<(String, String)> = self
                .url
                .query_pairs()
                .map(|(key, value)| {
                    let value = if sensitive(&key) {
                        REDACTED.to_string()
                    } else {
                        value.into_owned()
                    };
                    (key.into_owned(), value)
                })
                .collect();
            redacted.query_pairs_mut().clear().extend_pairs(pairs);
        }

        redacted
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionConfig")
            .field(&self.to_string())
            .finish()
    }
}
