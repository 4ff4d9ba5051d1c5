//! Core domain + application logic for the Satta chart bot.
//!
//! This crate is intentionally framework-agnostic. Telegram lives behind the
//! messaging port implemented in the adapter crate; the scrape target is a
//! plain HTTP client with an overridable base URL so tests can point it at a
//! mock server.

pub mod chart;
pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod flow;
pub mod games;
pub mod logging;
pub mod messaging;
pub mod scrape;
pub mod session;

pub use errors::{Error, Result};
