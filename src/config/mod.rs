pub mod file;

use crate::adapters::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{self, Validate};
use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};
use file::FileConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Clone, Parser)]
#[command(name = "proposal-pilot")]
#[command(about = "Proposal generation and management API")]
pub struct ServerConfig {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Comma-separated list of allowed CORS origins
    #[arg(
        long = "frontend-origin",
        env = "FRONTEND_ORIGIN",
        value_delimiter = ',',
        default_value = "http://localhost:3000,http://localhost:5173"
    )]
    pub frontend_origins: Vec<String>,

    #[arg(long, env = "APP_ENV", value_enum, default_value = "development")]
    pub environment: Environment,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    #[arg(long, env = "JWT_EXPIRES_IN_DAYS", default_value = "30")]
    pub jwt_expires_in_days: i64,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub openai_model: String,

    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value = "60")]
    pub provider_timeout_secs: u64,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "120")]
    pub request_timeout_secs: u64,

    #[arg(long, env = "MAX_BODY_BYTES", default_value = "1048576")]
    pub max_body_bytes: usize,

    /// Optional TOML file; flags and environment variables take precedence
    #[arg(long, env = "PROPOSAL_PILOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("frontend_origins", &self.frontend_origins)
            .field("environment", &self.environment)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_expires_in_days", &self.jwt_expires_in_days)
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("config", &self.config)
            .finish()
    }
}

impl ServerConfig {
    /// 解析命令列與環境變數，再套用設定檔中未被明確指定的欄位；呼叫端負責 validate()
    pub fn load() -> Result<Self> {
        let matches = Self::command().get_matches();
        let mut config = Self::from_arg_matches(&matches).map_err(|e| AppError::ConfigError {
            message: e.to_string(),
        })?;

        if let Some(path) = config.config.clone() {
            let file = FileConfig::from_file(&path)?;
            config.apply_file(file, |id| {
                matches!(
                    matches.value_source(id),
                    Some(ValueSource::CommandLine | ValueSource::EnvVariable)
                )
            });
        }

        Ok(config)
    }

    /// Copies file values into fields for which `is_explicit(field)` is false.
    pub fn apply_file(&mut self, file: FileConfig, is_explicit: impl Fn(&str) -> bool) {
        fn take<T>(slot: &mut T, value: Option<T>, explicit: bool) {
            if let (false, Some(value)) = (explicit, value) {
                *slot = value;
            }
        }

        let FileConfig {
            server,
            auth,
            provider,
        } = file;

        take(&mut self.host, server.host, is_explicit("host"));
        take(&mut self.port, server.port, is_explicit("port"));
        take(
            &mut self.environment,
            server.environment,
            is_explicit("environment"),
        );
        take(
            &mut self.frontend_origins,
            server.frontend_origins,
            is_explicit("frontend_origins"),
        );
        take(
            &mut self.request_timeout_secs,
            server.request_timeout_secs,
            is_explicit("request_timeout_secs"),
        );
        take(
            &mut self.max_body_bytes,
            server.max_body_bytes,
            is_explicit("max_body_bytes"),
        );
        if !is_explicit("jwt_secret") && auth.jwt_secret.is_some() {
            self.jwt_secret = auth.jwt_secret;
        }
        take(
            &mut self.jwt_expires_in_days,
            auth.jwt_expires_in_days,
            is_explicit("jwt_expires_in_days"),
        );
        take(
            &mut self.openai_base_url,
            provider.base_url,
            is_explicit("openai_base_url"),
        );
        take(
            &mut self.openai_model,
            provider.model,
            is_explicit("openai_model"),
        );
        take(
            &mut self.provider_timeout_secs,
            provider.timeout_secs,
            is_explicit("provider_timeout_secs"),
        );
    }

    pub fn jwt_secret(&self) -> Result<&str> {
        validation::validate_required_field("jwt_secret", &self.jwt_secret).map(String::as_str)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_non_empty_string("host", &self.host)?;
        validate_range("port", self.port, 1, u16::MAX)?;

        for origin in &self.frontend_origins {
            validate_url("frontend_origins", origin.trim())?;
        }

        validate_non_empty_string("jwt_secret", self.jwt_secret()?)?;
        validate_range("jwt_expires_in_days", self.jwt_expires_in_days, 1, 365)?;

        validate_url("openai_base_url", &self.openai_base_url)?;
        validate_non_empty_string("openai_model", &self.openai_model)?;

        validate_positive_number("provider_timeout_secs", self.provider_timeout_secs, 1)?;
        validate_positive_number("request_timeout_secs", self.request_timeout_secs, 1)?;
        validate_positive_number("max_body_bytes", self.max_body_bytes as u64, 1)?;

        tracing::info!("✅ Server configuration validation passed");
        Ok(())
    }
}
