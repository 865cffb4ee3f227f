//! # Storefront Dataset Crate
//!
//! Loads the two CSV exports the dashboard is computed from and holds them as an
//! immutable, explicitly passed `Dataset` handle.
//!
//! - **Schema checks up front:** every required column is checked against the
//!   header row before any data row is read, and a value that does not parse
//!   aborts the load with its line number.
//! - **Range validation:** `Dataset::resolve_range` is the caller-side check that
//!   keeps a requested date window inside the observed purchase days.

pub mod error;
pub mod loader;
pub mod store;

pub use error::DatasetError;
pub use loader::{load_all_orders, load_all_orders_file, load_raw_orders, load_raw_orders_file};
pub use store::Dataset;
