use crate::BiostrapError;
use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: SecretString,
    pub hostname: String,
    pub version: String,
    pub verify_tls: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, BiostrapError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values through the provided
    /// lookup. Tests can inject values without mutating the process
    /// environment, and `from_env()` stays a one-liner.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, BiostrapError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let api = get("BIOSTRAP_API_KEY")
            .ok_or_else(|| BiostrapError::Config("BIOSTRAP_API_KEY missing".into()))?;
        let hostname = get("BIOSTRAP_HOSTNAME").unwrap_or_else(|| "api-beta.biostrap.com".into());
        let version = get("BIOSTRAP_API_VERSION").unwrap_or_else(|| "v1".into());
        let verify_tls = match get("BIOSTRAP_VERIFY_TLS") {
            Some(v) => !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"),
            None => true,
        };
        Ok(Self {
            api_key: SecretString::new(api.into()),
            hostname,
            version,
            verify_tls,
        })
    }

    /// Base URL the adapter prefixes to every endpoint path.
    pub fn base_url(&self) -> String {
        format!("https://{}/{}", self.hostname, self.version)
    }
}
