use std::env;

use thiserror::Error;
use url::Url;

pub const API_KEY_VAR: &str = "ALTTEXT_API_KEY";
pub const BASE_URL_VAR: &str = "ALTTEXT_API_BASE_URL";
pub const CLIENT_TAG_VAR: &str = "ALTTEXT_CLIENT_TAG";
pub const TRANSPORT_VAR: &str = "MCP_TRANSPORT";
pub const PORT_VAR: &str = "MCP_PORT";
pub const BIND_HOST_VAR: &str = "MCP_BIND_HOST";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_HOST: &str = "127.0.0.1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ALTTEXT_API_KEY is not set; the server cannot start without an AltText.ai API key")]
    MissingApiKey,
    #[error("ALTTEXT_API_BASE_URL is not a valid http(s) URL: {0}")]
    InvalidBaseUrl(String),
    #[error("MCP_TRANSPORT must be `stdio` or `http`, got `{0}`")]
    InvalidTransport(String),
    #[error("MCP_PORT must be a port number, got `{0}`")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http { bind_address: String },
}

/// Process configuration, read once at startup and handed to the server.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub client_tag: Option<String>,
    pub transport: Transport,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("client_tag", &self.client_tag)
            .field("transport", &self.transport)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = read(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;
        let base_url = read(BASE_URL_VAR)
            .map(|raw| validate_base_url(&raw).map(|()| raw))
            .transpose()?;
        let client_tag = read(CLIENT_TAG_VAR);

        let transport = match read(TRANSPORT_VAR).as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("stdio") => Transport::Stdio,
            Some("http") => {
                let port = match read(PORT_VAR) {
                    Some(raw) => raw
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
                    None => DEFAULT_PORT,
                };
                let host = read(BIND_HOST_VAR).unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());
                Transport::Http {
                    bind_address: format!("{host}:{port}"),
                }
            }
            Some(other) => return Err(ConfigError::InvalidTransport(other.to_string())),
        };

        Ok(Self {
            api_key,
            base_url,
            client_tag,
            transport,
        })
    }
}

fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(raw).map_err(|err| ConfigError::InvalidBaseUrl(format!("{raw} ({err})")))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::MissingApiKey
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(API_KEY_VAR, "   ")])).unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn defaults_to_stdio() {
        let config = AppConfig::from_lookup(lookup(&[(API_KEY_VAR, "secret")])).unwrap();
        assert_eq!(config.transport, Transport::Stdio);
        assert_eq!(config.base_url, None);
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn http_transport_with_port() {
        let config = AppConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (TRANSPORT_VAR, "HTTP"),
            (PORT_VAR, "8123"),
        ]))
        .unwrap();
        assert_eq!(
            config.transport,
            Transport::Http {
                bind_address: "127.0.0.1:8123".to_string()
            }
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(API_KEY_VAR, "k"), (BASE_URL_VAR, "ftp://x")])),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(API_KEY_VAR, "k"), (TRANSPORT_VAR, "sse")])),
            Err(ConfigError::InvalidTransport(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[
                (API_KEY_VAR, "k"),
                (TRANSPORT_VAR, "http"),
                (PORT_VAR, "99999")
            ])),
            Err(ConfigError::InvalidPort(_))
        ));
    }

    #[test]
    fn staging_base_url_is_accepted() {
        let config = AppConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "k"),
            (BASE_URL_VAR, "https://staging.alttext.ai/api/v1/"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://staging.alttext.ai/api/v1/"));
    }
}
