use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::workflows::admission::{ActivitiesPolicy, EvaluationConfig};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Deployment flavor; picks the default log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    fn default_log_level(self) -> &'static str {
        match self {
            Self::Development => "admissions=debug,info",
            Self::Test => "warn",
            Self::Production => "info",
        }
    }
}

/// Everything the service reads from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub admission: AdmissionSettings,
}

impl AppConfig {
    /// Reads `.env` (if any) and then the process environment. Blank variables count as unset.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = env_value("APP_ENV")
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or(AppEnvironment::Development);

        let host = env_value("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match env_value("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            None => DEFAULT_PORT,
        };

        let log_level = env_value("APP_LOG_LEVEL")
            .unwrap_or_else(|| environment.default_log_level().to_string());
        let ansi = match env_value("APP_LOG_ANSI") {
            Some(raw) => parse_switch("APP_LOG_ANSI", raw)?,
            None => false,
        };

        let activities_policy = match env_value("ADMISSION_ACTIVITIES_POLICY") {
            Some(raw) => ActivitiesPolicy::parse(&raw)
                .ok_or(ConfigError::InvalidActivitiesPolicy { value: raw })?,
            None => ActivitiesPolicy::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            admission: AdmissionSettings { activities_policy },
        })
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_switch(key: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidSwitch { key, value: raw }),
    }
}

/// HTTP bind address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    value: self.host.clone(),
                    source,
                })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Rubric options selectable per deployment.
#[derive(Debug, Clone)]
pub struct AdmissionSettings {
    pub activities_policy: ActivitiesPolicy,
}

impl AdmissionSettings {
    pub fn evaluation_config(&self) -> EvaluationConfig {
        EvaluationConfig::standard().with_activities_policy(self.activities_policy)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
    InvalidSwitch {
        key: &'static str,
        value: String,
    },
    InvalidActivitiesPolicy {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT '{}' is not a port number", value)
            }
            ConfigError::InvalidHost { value, .. } => {
                write!(f, "APP_HOST '{}' is not an IPv4/IPv6 address or localhost", value)
            }
            ConfigError::InvalidSwitch { key, value } => {
                write!(f, "{} expects on/off (found '{}')", key, value)
            }
            ConfigError::InvalidActivitiesPolicy { value } => write!(
                f,
                "ADMISSION_ACTIVITIES_POLICY must be 'lenient' or 'strict' (found '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source, .. } => Some(source),
            _ => None,
        }
    }
}
