pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod github;
pub mod http;
pub mod issue;
pub mod logging;
pub mod middleware;
pub mod rule;
pub mod server;
pub mod slack;
#[cfg(test)]
mod testing;
pub mod types;
pub mod webhook;

pub use types::Result;
