pub mod config;
pub mod feeds;
pub mod query;
pub mod render;
pub mod ui;
