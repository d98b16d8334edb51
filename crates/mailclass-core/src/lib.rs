use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config_file;
pub mod options;
pub mod orchestrator;
pub mod presenter;
pub mod selection;
pub mod transport;

// Re-export for convenience
pub use options::{ClassificationOptions, Provider};
pub use orchestrator::{PendingSubmission, RequestOrchestrator, RequestState};
pub use presenter::{ResultPresenter, format_confidence, format_file_size};
pub use selection::{
    FileContents, FileInputWidget, FileSelectionManager, SelectedFile, SelectionSource,
    validate_file_name,
};
pub use transport::ClassifyTransport;
pub use transport::http::HttpTransport;

/// Backend address used when neither flags, environment nor config file set one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Shown when a transport failure carries no message of its own.
pub const GENERIC_NETWORK_MESSAGE: &str =
    "Falha ao processar o arquivo. Verifique sua conexão e tente novamente.";

/// The verdict returned by the classification backend.
///
/// `category` is canonically "Produtivo" or "Improdutivo", but any string is
/// accepted here; the presenter decides how to bucket it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: String,
    pub confidence: f64,
    pub suggested_reply: String,
    pub language: String,
    pub preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Everything that can end a submission without a result.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Por favor, selecione um arquivo .pdf ou .txt.")]
    NoFileSelected,
    #[error("Formato inválido. Envie apenas arquivos .pdf ou .txt.")]
    InvalidExtension { name: String },
    #[error("Não foi possível ler o arquivo {name}: {reason}")]
    FileUnreadable { name: String, reason: String },
    #[error("{message}")]
    ServerRejected { status: u16, message: String },
    #[error("{0}")]
    NetworkFailure(String),
}

impl ClassifyError {
    /// Build a rejection from a non-2xx response. A non-empty body is used
    /// verbatim; an empty one gets a generic message naming the status.
    pub fn server_rejected(status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("Erro {status} - Falha na comunicação com o servidor")
        } else {
            body.to_string()
        };
        ClassifyError::ServerRejected { status, message }
    }

    /// Build a transport failure, falling back to the generic message.
    pub fn network(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.trim().is_empty() {
            ClassifyError::NetworkFailure(GENERIC_NETWORK_MESSAGE.to_string())
        } else {
            ClassifyError::NetworkFailure(reason)
        }
    }

    /// True for failures detected before any network I/O was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClassifyError::NoFileSelected | ClassifyError::InvalidExtension { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid backend URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("unknown provider {0:?} (expected \"openai\" or \"huggingface\")")]
    InvalidProvider(String),
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("invalid MAILCLASS_TIMEOUT value {0:?} (expected a number of seconds)")]
    InvalidTimeout(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Environment variable overriding the backend base URL.
pub const ENV_BASE_URL: &str = "MAILCLASS_BASE_URL";
/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT: &str = "MAILCLASS_TIMEOUT";

/// Values supplied by flags or environment, taking precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Overrides {
    /// Fill the fields no flag set from the environment, read through `lookup`.
    ///
    /// A timeout that is not a number is an error rather than being ignored.
    pub fn or_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if self.base_url.is_none() {
            self.base_url = lookup(ENV_BASE_URL);
        }
        if self.timeout_secs.is_none()
            && let Some(raw) = lookup(ENV_TIMEOUT)
        {
            let secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            self.timeout_secs = Some(secs);
        }
        Ok(self)
    }
}

/// Resolved settings for talking to the classification backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Resolve settings: overrides > config file > defaults.
    pub fn resolve(
        file: &config_file::ConfigFile,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let backend = file.backend.as_ref();
        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| backend.and_then(|b| b.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = overrides
            .timeout_secs
            .or_else(|| backend.and_then(|b| b.timeout_secs))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url,
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn classify_url(&self) -> String {
        format!("{}/classify", self.base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_file::{BackendConfig, ConfigFile};

    #[test]
    fn rejection_with_body_is_verbatim() {
        let err = ClassifyError::server_rejected(500, "server error");
        assert_eq!(err.to_string(), "server error");
    }

    #[test]
    fn rejection_without_body_names_status() {
        let err = ClassifyError::server_rejected(503, "");
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn whitespace_body_is_still_verbatim() {
        let err = ClassifyError::server_rejected(400, "  ");
        assert_eq!(err.to_string(), "  ");
    }

    #[test]
    fn empty_network_reason_falls_back() {
        assert_eq!(
            ClassifyError::network("").to_string(),
            GENERIC_NETWORK_MESSAGE
        );
        assert_eq!(
            ClassifyError::network("connection refused").to_string(),
            "connection refused"
        );
    }

    #[test]
    fn validation_kinds() {
        assert!(ClassifyError::NoFileSelected.is_validation());
        assert!(
            ClassifyError::InvalidExtension {
                name: "a.doc".into()
            }
            .is_validation()
        );
        assert!(!ClassifyError::network("x").is_validation());
        assert!(!ClassifyError::server_rejected(500, "").is_validation());
    }

    #[test]
    fn result_provider_is_optional() {
        let json = r#"{"category":"Produtivo","confidence":0.9,"suggested_reply":"Ok",
                       "language":"pt","preview":"Olá"}"#;
        let parsed: ClassificationResult = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.provider, None);
        assert_eq!(parsed.category, "Produtivo");
    }

    #[test]
    fn resolve_defaults() {
        let cfg = ClientConfig::resolve(&ConfigFile::default(), &Overrides::default()).unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.classify_url(), "http://localhost:8000/classify");
    }

    #[test]
    fn resolve_override_beats_file() {
        let file = ConfigFile {
            backend: Some(BackendConfig {
                base_url: Some("http://file:9000".into()),
                timeout_secs: Some(5),
            }),
            ..Default::default()
        };
        let overrides = Overrides {
            base_url: Some("https://flag.example/".into()),
            timeout_secs: None,
        };
        let cfg = ClientConfig::resolve(&file, &overrides).unwrap();
        assert_eq!(cfg.base_url, "https://flag.example");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.health_url(), "https://flag.example/health");
    }

    #[test]
    fn resolve_rejects_bad_url_and_zero_timeout() {
        let bad_url = Overrides {
            base_url: Some("not a url".into()),
            timeout_secs: None,
        };
        assert!(matches!(
            ClientConfig::resolve(&ConfigFile::default(), &bad_url),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let ftp = Overrides {
            base_url: Some("ftp://host".into()),
            timeout_secs: None,
        };
        assert!(matches!(
            ClientConfig::resolve(&ConfigFile::default(), &ftp),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let zero = Overrides {
            base_url: None,
            timeout_secs: Some(0),
        };
        assert!(matches!(
            ClientConfig::resolve(&ConfigFile::default(), &zero),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn env_fills_only_unset_overrides() {
        let lookup = env(&[(ENV_BASE_URL, "http://env:1"), (ENV_TIMEOUT, " 12 ")]);

        let from_env = Overrides::default().or_env(&lookup).unwrap();
        assert_eq!(from_env.base_url.as_deref(), Some("http://env:1"));
        assert_eq!(from_env.timeout_secs, Some(12));

        let flags = Overrides {
            base_url: Some("http://flag:2".into()),
            timeout_secs: Some(3),
        };
        let kept = flags.or_env(&lookup).unwrap();
        assert_eq!(kept.base_url.as_deref(), Some("http://flag:2"));
        assert_eq!(kept.timeout_secs, Some(3));
    }

    #[test]
    fn unparsable_env_timeout_is_an_error() {
        let err = Overrides::default()
            .or_env(env(&[(ENV_TIMEOUT, "thirty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(ref v) if v == "thirty"));
        assert!(err.to_string().contains(ENV_TIMEOUT));

        // A flag wins before the variable is ever parsed.
        let flags = Overrides {
            base_url: None,
            timeout_secs: Some(5),
        };
        assert!(flags.or_env(env(&[(ENV_TIMEOUT, "thirty")])).is_ok());
    }
}
