pub mod config;
pub mod logging;

// Core modules
pub mod burst;
pub mod lock;
pub mod migrate;
pub mod status;
