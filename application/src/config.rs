//! [`Config`]-related definitions.

use std::time;

use common::Percent;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Display, Error};
use rust_decimal::Decimal;
use serde::Deserialize;
use service::domain::booking;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// Tax rate, in percents of a room subtotal.
    #[default(Decimal::from(10))]
    pub tax_rate: Decimal,

    /// Service charge rate, in percents of a room subtotal.
    #[default(Decimal::from(5))]
    pub service_rate: Decimal,

    /// Deposit rate, in percents of a total to be paid on check-in.
    #[default(Decimal::from(30))]
    pub deposit_rate: Decimal,

    /// Minimal time before a check-in for a cancellation to be free of
    /// charge.
    #[default(time::Duration::from_secs(48 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub free_cancellation: time::Duration,

    /// Service tasks configuration.
    pub tasks: Tasks,
}

impl TryFrom<Service> for service::Config {
    type Error = InvalidRate;

    fn try_from(value: Service) -> Result<Self, Self::Error> {
        let Service {
            tax_rate,
            service_rate,
            deposit_rate,
            free_cancellation,
            tasks: Tasks { mark_no_shows },
        } = value;
        let percent = |name, rate| {
            Percent::new(rate).ok_or(InvalidRate { name, rate })
        };

        Ok(Self {
            booking: booking::Policy {
                rates: booking::Rates {
                    tax: percent("tax_rate", tax_rate)?,
                    service: percent("service_rate", service_rate)?,
                },
                deposit_rate: percent("deposit_rate", deposit_rate)?,
                free_cancellation,
            },
            mark_no_shows: service::task::mark_no_shows::Config {
                interval: mark_no_shows.interval,
            },
        })
    }
}

/// Error of a rate being out of the `0..=100` percents range.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`service.{name}` must be within 0..=100 percents, got: {rate}")]
pub struct InvalidRate {
    /// Name of the invalid rate.
    #[error(not(source))]
    pub name: &'static str,

    /// Provided value of the rate.
    #[error(not(source))]
    pub rate: Decimal,
}

/// Service tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// `MarkNoShows` task configuration.
    pub mark_no_shows: Task,
}

/// Service task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Task {
    /// Task execution interval.
    #[default(time::Duration::from_secs(60 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,
}

/// Postgres configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database name to connect to.
    #[default("postgres".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time;

    use rust_decimal::Decimal;

    use super::{Config, Service};

    #[test]
    fn defaults_to_service_policy() {
        let config = service::Config::try_from(Service::default()).unwrap();

        assert_eq!(config.booking, service::Config::default().booking);
        assert_eq!(
            config.mark_no_shows.interval,
            time::Duration::from_secs(60 * 60),
        );
    }

    #[test]
    fn rejects_rates_out_of_range() {
        let err = service::Config::try_from(Service {
            deposit_rate: Decimal::from(101),
            ..Service::default()
        })
        .unwrap_err();

        assert_eq!(err.name, "deposit_rate");
    }

    #[test]
    fn loads_without_file() {
        let config = Config::new("non-existent.toml").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.service.tax_rate, Decimal::from(10));
    }
}
