pub mod app;
pub mod config;
pub mod csv_loader;
pub mod format;
pub mod logging;
pub mod session;
pub mod state;
pub mod utils;
pub mod views;
