use crate::error::ConfigError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DashboardSettings, DataSources, LoggingSettings, ServerSettings};

/// Prefix of the environment variables that override file settings,
/// e.g. `STOREFRONT__SERVER__BIND_ADDR=127.0.0.1:8080`.
pub const ENV_PREFIX: &str = "STOREFRONT";

/// Loads the application configuration.
///
/// The TOML file at `path` is optional; values from `STOREFRONT__*` environment
/// variables are layered on top of it, and anything still unset takes its default.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    let config = finish(builder)?;
    tracing::debug!(path = %path.display(), ?config, "Configuration loaded.");
    Ok(config)
}

/// Parses configuration from an in-memory TOML document, without consulting the environment.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    let builder =
        config::Config::builder().add_source(config::File::from_str(toml, config::FileFormat::Toml));
    finish(builder)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Config, ConfigError> {
    let config = builder.build()?.try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let limits = [
        ("dashboard.top_categories", config.dashboard.top_categories),
        ("dashboard.top_cities", config.dashboard.top_cities),
        ("dashboard.top_customers", config.dashboard.top_customers),
    ];
    for (field, value) in limits {
        if value == 0 {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
    }
    Ok(())
}
