// src/data_analysis/mod.rs

pub mod allan_deviation;
pub mod channel_analysis;
pub mod noise_parameters;
pub mod noise_regions;
pub mod tau_grid;

// src/data_analysis/mod.rs
