pub mod api;
pub mod app;
pub mod config;
pub mod protocol;
pub mod search;
pub mod tui;
