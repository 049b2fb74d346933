#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! # Transifex client
//!
//! ## Architecture
//!
//! - **[`error`]** - Error types and error handling
//! - **[`config`]** - Configuration loading and persistence
//! - **[`client`]** - HTTP client over runtime-selected transports
//! - **[`api`]** - Transifex API connector and endpoint wrappers
//! - **[`cli`]** - Command-line argument parsing
//!
//! ## Quick Start
//!
//! ```bash
//! transifex projects                       # List projects
//! transifex stats joomla joomla-platform   # Resource statistics
//! transifex --driver socket formats        # Force the raw socket transport
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;

/// Error type alias for convenience
pub use error::{Result, TxError};

/// Configuration type alias for convenience
pub use config::Config;

pub use api::Transifex;
pub use client::{Http, HttpOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "transifex";
