use failure::Fail;
use serde::Deserialize;
use url::Url;

/// Password reset configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Base URL of the application.
    ///
    /// Reset links are formed by appending `/changePassword/<token>` to this
    /// value, verbatim.
    pub base_url: String,
}

impl Config {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Config { base_url: base_url.into() }
    }

    /// Validate configuration correctness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::InvalidUrl(self.base_url.clone(), err))?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConfigError::UnsupportedScheme(scheme.to_string())),
        }
    }
}

#[derive(Debug, Fail)]
pub enum ConfigError {
    #[fail(display = "Invalid base URL {:?}: {}", _0, _1)]
    InvalidUrl(String, #[cause] url::ParseError),
    #[fail(display = "Base URL must use http or https, not {}", _0)]
    UnsupportedScheme(String),
}
