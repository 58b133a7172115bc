pub mod app;
pub mod clipboard;
pub mod config;
pub mod effects;
pub mod logging;
pub mod ui;
