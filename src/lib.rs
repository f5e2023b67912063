//! Asset owner prediction service
//!
//! Trains random forest classifiers that predict the system owner and
//! application owner of IT assets from hostname, IP address, location and
//! operating system, and serves predictions over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod ml;
pub mod models;

pub use error::{AppError, Result};
