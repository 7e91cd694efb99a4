pub mod config;
pub mod extract;
pub mod formatter;
pub mod models;
pub mod pace;
pub mod poller;
