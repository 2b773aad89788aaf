pub mod analytics;
pub mod config;
pub mod logging;
pub mod recorder;
pub mod runner;
