// src/lib.rs - Library interface for the Allan deviation pipeline

#![allow(non_snake_case)]

pub mod axis_names;
pub mod config;
pub mod console_report;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod json_export;
pub mod plot_framework;
pub mod plot_functions;
pub mod types;

pub use config::AllanConfig;
pub use error::{AllanError, Result};

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
