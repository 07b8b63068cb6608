//! Configuration loading via `ortho-config`.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Default resource path listing smart storage controllers.
pub const DEFAULT_CONTROLLERS_PATH: &str = "/redfish/v1/Systems/1/SmartStorageConfig";

/// Connection settings for the management processor, derived from
/// configuration files, environment variables, and CLI login flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "RAIDCTL",
    discovery(
        app_name = "raidctl",
        env_var = "RAIDCTL_CONFIG_PATH",
        config_file_name = "raidctl.toml",
        dotfile_name = ".raidctl.toml",
        project_file_name = "raidctl.toml"
    )
)]
pub struct ManagementConfig {
    /// Base URL of the management processor, for example
    /// `https://10.0.0.100`. Required.
    pub url: Option<String>,
    /// Account used for HTTP Basic authentication.
    pub username: Option<String>,
    /// Password paired with `username`.
    pub password: Option<String>,
    /// Session key sent as `X-Auth-Token`; takes precedence over the
    /// username and password.
    pub session_key: Option<String>,
    /// Resource listing the smart storage controllers.
    #[ortho_config(default = DEFAULT_CONTROLLERS_PATH.to_owned())]
    pub controllers_path: String,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub timeout_secs: u64,
    /// Accept self-signed management processor certificates.
    #[ortho_config(default = false)]
    pub insecure: bool,
}

/// Login values supplied on the command line. Set fields replace the
/// corresponding loaded configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LoginOverrides {
    /// Management processor URL.
    pub url: Option<String>,
    /// Account name.
    pub username: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// Existing session key.
    pub session_key: Option<String>,
    /// Accept self-signed certificates.
    pub insecure: bool,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    flag: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(
        description: &'static str,
        flag: &'static str,
        env_var: &'static str,
        toml_key: &'static str,
    ) -> Self {
        Self {
            description,
            flag,
            env_var,
            toml_key,
        }
    }

    fn missing(&self) -> ConfigError {
        ConfigError::MissingField(format!(
            "missing {}: pass {}, set {} or add {} to raidctl.toml",
            self.description, self.flag, self.env_var, self.toml_key
        ))
    }
}

const URL_FIELD: FieldMetadata = FieldMetadata::new(
    "management processor URL",
    "--url",
    "RAIDCTL_URL",
    "url",
);
const USERNAME_FIELD: FieldMetadata =
    FieldMetadata::new("account name", "--user", "RAIDCTL_USERNAME", "username");
const PASSWORD_FIELD: FieldMetadata =
    FieldMetadata::new("account password", "--password", "RAIDCTL_PASSWORD", "password");

impl ManagementConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("raidctl")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies command-line login values on top of the loaded configuration.
    #[must_use]
    pub fn with_login_overrides(mut self, overrides: LoginOverrides) -> Self {
        if overrides.url.is_some() {
            self.url = overrides.url;
        }
        if overrides.username.is_some() {
            self.username = overrides.username;
        }
        if overrides.password.is_some() {
            self.password = overrides.password;
        }
        if overrides.session_key.is_some() {
            self.session_key = overrides.session_key;
        }
        self.insecure |= overrides.insecure;
        self
    }

    /// Returns the configured URL, treating a blank value as unset.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        present(self.url.as_deref())
    }

    /// Returns the session key when one is configured.
    #[must_use]
    pub fn session(&self) -> Option<&str> {
        present(self.session_key.as_deref())
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Performs semantic validation. Error messages name the flag,
    /// environment variable, and configuration key that supply each value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the URL is missing or when
    /// neither a session key nor a complete username and password is set.
    /// Returns [`ConfigError::Invalid`] when the controllers path is blank or
    /// the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url().is_none() {
            return Err(URL_FIELD.missing());
        }
        if self.session().is_none() {
            if present(self.username.as_deref()).is_none() {
                return Err(USERNAME_FIELD.missing());
            }
            if self.password.is_none() {
                return Err(PASSWORD_FIELD.missing());
            }
        }
        if self.controllers_path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: String::from("controllers_path"),
                reason: String::from("must not be blank"),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: String::from("timeout_secs"),
                reason: String::from("must be greater than zero"),
            });
        }
        Ok(())
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configured value is unusable.
    #[error("invalid configuration field {field}: {reason}")]
    Invalid {
        /// Configuration key.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
