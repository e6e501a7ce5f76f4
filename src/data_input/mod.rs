// src/data_input/mod.rs

pub mod log_data;
pub mod log_parser;
pub mod unit_conversion;

// src/data_input/mod.rs
