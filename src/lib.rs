// Library exports for Inkpot
// This allows integration tests and the binary to use Inkpot modules

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod routes;
pub mod session;
pub mod ui;
