pub mod config;
pub mod error;
pub mod licensing;
pub mod telemetry;
