use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; a missing section falls back
/// to its `Default` implementation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSources,
    pub dashboard: DashboardSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

/// Locations of the two CSV exports the dashboard is built from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSources {
    /// The denormalized table: one row per order line with customer and product columns.
    pub all_orders_path: PathBuf,
    /// The raw orders export. Only used as the global recency reference.
    pub orders_path: PathBuf,
}

/// How many entries each ranked section of the dashboard shows.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub top_categories: usize,
    pub top_cities: usize,
    /// Number of best customers listed per RFM dimension.
    pub top_customers: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---

impl Default for DataSources {
    fn default() -> Self {
        Self {
            all_orders_path: PathBuf::from("data/all_data.csv"),
            orders_path: PathBuf::from("data/orders_dataset.csv"),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_categories: 5,
            top_cities: 10,
            top_customers: 5,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
