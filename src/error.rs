use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum GaError {
    /// The service-account key file could not be read
    CredentialRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The key file was read but is not a usable service-account key
    CredentialParse(String),
    /// The reporting client could not be constructed
    ServiceInit(String),
    /// Network failures, token exchange failures and undecodable responses
    Transport(String),
    /// The reporting API answered with something other than 200
    UnexpectedStatus {
        status_code: i32,
    },
    ConfigError(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for GaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaError::CredentialRead { path, source } => write!(
                f,
                "Failed to load credentials from {}: {}",
                path.display(),
                source
            ),
            GaError::CredentialParse(e) => {
                write!(f, "Failed to create JWT config from JSON creds: {}", e)
            }
            GaError::ServiceInit(e) => {
                write!(f, "Failed to create reporting service: {}", e)
            }
            GaError::Transport(e) => write!(f, "Transport error: {}", e),
            GaError::UnexpectedStatus { status_code } => write!(
                f,
                "Did not get expected HTTP response code. HTTPStatusCode: {}",
                status_code
            ),
            GaError::ConfigError(e) => write!(f, "Config error: {}", e),
            GaError::IoError(e) => write!(f, "IO error: {}", e),
            GaError::JsonError(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for GaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GaError::CredentialRead { source, .. } => Some(source),
            GaError::IoError(e) => Some(e),
            GaError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GaError {
    fn from(err: std::io::Error) -> Self {
        GaError::IoError(err)
    }
}

impl From<serde_json::Error> for GaError {
    fn from(err: serde_json::Error) -> Self {
        GaError::JsonError(err)
    }
}
