//! deeplinker - Deep link derivation for edited documents
//!
//! Derives a deep link for a document, regenerates it when the document
//! changes, and optionally shortens it through a remote link API.
//!
//! # Features
//! - **cli**: Command-line driver (default)
//!
//! # Architecture
//! - `link`: Parameter extraction, sanitization, link building and the
//!   update coordinator
//! - `sdk`: Remote short-link capability and its initialization lifecycle
//! - `config`: Static configuration (TOML + environment)
//! - `system`: Logging setup
//! - `interfaces`: User interfaces (CLI)

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod link;
pub mod sdk;
pub mod system;
pub mod utils;
