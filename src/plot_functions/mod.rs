// src/plot_functions/mod.rs

pub mod plot_allan_deviation;

// src/plot_functions/mod.rs
