mod app;
mod config;
mod effects;
mod intent;
mod logging;
mod ui;

pub use app::run_app;
