use axum::http::{HeaderValue, Method, header};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("FOS_BIND_ADDR '{value}' is not a socket address: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("FOS_ALLOWED_ORIGINS entry '{0}' is not a valid origin")]
    Origin(String),
    #[error("FOS_API_TOKENS entry '{0}' must look like token:user")]
    Token(String),
    #[error("FOS_CMS_PATH is set but FOS_CMS_URL is not")]
    CmsPathWithoutUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsConfig {
    pub url: String,
    pub path: String,
}

/// A bearer token accepted by the auth middleware and the user it identifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken {
    pub token: String,
    pub user_id: String,
}

/// Runtime settings, read from `FOS_*` environment variables and `DATABASE_URL`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    /// Empty means any origin.
    pub allowed_origins: Vec<HeaderValue>,
    pub cms: Option<CmsConfig>,
    pub api_tokens: Vec<ApiToken>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_value = var("FOS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::BindAddr {
                value: bind_value.clone(),
                source,
            })?;

        let allowed_origins = match var("FOS_ALLOWED_ORIGINS") {
            Some(list) if list != "*" => split_list(&list)
                .map(|origin| {
                    HeaderValue::from_str(origin).map_err(|_| ConfigError::Origin(origin.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };

        let cms = match (var("FOS_CMS_URL"), var("FOS_CMS_PATH")) {
            (Some(url), path) => Some(CmsConfig {
                url,
                path: path.unwrap_or_default(),
            }),
            (None, Some(_)) => return Err(ConfigError::CmsPathWithoutUrl),
            (None, None) => None,
        };

        let api_tokens = match var("FOS_API_TOKENS") {
            Some(list) => split_list(&list)
                .map(parse_token)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            bind_addr,
            database_url: var("DATABASE_URL"),
            allowed_origins,
            cms,
            api_tokens,
        })
    }

    /// Credentials are only allowed together with an explicit origin list.
    pub fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
        if self.allowed_origins.is_empty() {
            layer.allow_origin(Any)
        } else {
            layer
                .allow_origin(AllowOrigin::list(self.allowed_origins.clone()))
                .allow_credentials(true)
        }
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_token(entry: &str) -> Result<ApiToken, ConfigError> {
    match entry.split_once(':') {
        Some((token, user)) if !token.trim().is_empty() && !user.trim().is_empty() => {
            Ok(ApiToken {
                token: token.trim().to_string(),
                user_id: user.trim().to_string(),
            })
        }
        _ => Err(ConfigError::Token(entry.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert!(config.database_url.is_none());
        assert!(config.allowed_origins.is_empty());
        assert!(config.cms.is_none());
        assert!(config.api_tokens.is_empty());
    }

    #[test]
    fn reads_all_settings() {
        let config = config(&[
            ("FOS_BIND_ADDR", "127.0.0.1:8080"),
            ("DATABASE_URL", "postgres://fos@localhost/fos"),
            ("FOS_ALLOWED_ORIGINS", "https://fos.example.com, https://admin.example.com"),
            ("FOS_CMS_URL", "http://cms.local/"),
            ("FOS_CMS_PATH", "documents"),
            ("FOS_API_TOKENS", "abc:7, def:8"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(
            config.cms,
            Some(CmsConfig {
                url: "http://cms.local/".into(),
                path: "documents".into(),
            })
        );
        assert_eq!(
            config.api_tokens[1],
            ApiToken {
                token: "def".into(),
                user_id: "8".into(),
            }
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config(&[("FOS_BIND_ADDR", "localhost")]),
            Err(ConfigError::BindAddr { .. })
        ));
        assert!(matches!(
            config(&[("FOS_API_TOKENS", "abc")]),
            Err(ConfigError::Token(_))
        ));
        assert!(matches!(
            config(&[("FOS_CMS_PATH", "documents")]),
            Err(ConfigError::CmsPathWithoutUrl)
        ));
    }

    #[test]
    fn wildcard_origin_means_any() {
        let config = config(&[("FOS_ALLOWED_ORIGINS", "*")]).unwrap();
        assert!(config.allowed_origins.is_empty());
    }
}
