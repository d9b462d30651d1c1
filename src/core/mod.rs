//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod log;
pub mod price;

// Re-export main types for cleaner imports
pub use config::{Environment, EnvironmentTable, RunMode};
pub use error::ExportError;
pub use price::{ChartRange, PriceProvider, PriceRecord};
