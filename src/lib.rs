//! Session bootstrap and typed match-data clients for a VALORANT companion.
//!
//! Start with [`session::Session`]: it finds the running client's
//! credentials, derives tokens and routing, opens the local socket and exposes
//! the local and remote endpoints.

pub mod api;
pub mod cli;
pub mod command;
pub mod config;
pub mod domain;
pub mod error;
pub mod locator;
pub mod logging;
pub mod session;
pub mod socket;

#[cfg(test)]
mod testing;

pub use config::ClientConfig;
pub use error::{ApiError, BootstrapError, ConfigError, ConnectError, LocateError, TransportError};
pub use session::Session;
