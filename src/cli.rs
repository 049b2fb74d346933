//! Command-line interface argument parsing
//!
//! Defines all CLI commands and their arguments using Clap.

use crate::config::Config;
use crate::error::{Result, TxError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Transifex CLI - query the Transifex API from the command line
#[derive(Parser, Debug)]
#[command(name = "transifex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A command-line client for the Transifex translation API")]
#[command(long_about = concat!(
    "Transifex client (v", env!("CARGO_PKG_VERSION"), ")\n",
    "Query projects, resources, translations and statistics from the Transifex API.\n\n",
    "Results are printed as JSON. Pass credentials with --header or the [headers]\n",
    "table of the config file."
))]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (defaults to ~/.config/transifex/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Transifex API root URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Transport driver to try, in order (repeatable): pooled, socket, stream
    #[arg(long = "driver", global = true)]
    pub drivers: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Extra request header as NAME:VALUE (repeatable)
    #[arg(long = "header", global = true, value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List supported file formats
    ///
    /// Example:
    ///   transifex formats
    #[command(display_order = 1)]
    Formats,

    /// List every language known to Transifex
    ///
    /// Example:
    ///   transifex languages
    #[command(display_order = 2)]
    Languages,

    /// Show a single language
    ///
    /// Example:
    ///   transifex language en_GB
    #[command(display_order = 3)]
    Language {
        /// Language code
        code: String,
    },

    /// List projects
    ///
    /// Example:
    ///   transifex projects
    #[command(display_order = 4)]
    Projects,

    /// Show a project
    ///
    /// Examples:
    ///   transifex project joomla
    ///   transifex project joomla --details
    #[command(display_order = 5)]
    Project {
        /// Project slug
        slug: String,

        /// Include extended details
        #[arg(long)]
        details: bool,
    },

    /// List the resources of a project
    ///
    /// Example:
    ///   transifex resources joomla
    #[command(display_order = 6)]
    Resources {
        /// Project slug
        project: String,
    },

    /// Show a resource
    ///
    /// Example:
    ///   transifex resource joomla joomla-platform --details
    #[command(display_order = 7)]
    Resource {
        /// Project slug
        project: String,

        /// Resource slug
        resource: String,

        /// Include extended details
        #[arg(long)]
        details: bool,
    },

    /// Show the source content of a resource
    ///
    /// Example:
    ///   transifex content joomla joomla-platform
    #[command(display_order = 8)]
    Content {
        /// Project slug
        project: String,

        /// Resource slug
        resource: String,
    },

    /// Show translation statistics of a resource
    ///
    /// Examples:
    ///   transifex stats joomla joomla-platform
    ///   transifex stats joomla joomla-platform --lang en_GB
    #[command(visible_alias = "statistics")]
    #[command(display_order = 9)]
    Stats {
        /// Project slug
        project: String,

        /// Resource slug
        resource: String,

        /// Only this language
        #[arg(long)]
        lang: Option<String>,
    },

    /// Download the translation of a resource
    ///
    /// Example:
    ///   transifex translation joomla joomla-platform en_GB --mode reviewed
    #[command(display_order = 10)]
    Translation {
        /// Project slug
        project: String,

        /// Resource slug
        resource: String,

        /// Language code
        lang: String,

        /// Export mode (e.g. default, reviewed, onlytranslated)
        #[arg(long)]
        mode: Option<String>,
    },

    /// List the translation strings of a resource
    ///
    /// Example:
    ///   transifex strings joomla joomla-platform en_GB --details
    #[command(display_order = 11)]
    Strings {
        /// Project slug
        project: String,

        /// Resource slug
        resource: String,

        /// Language code
        lang: String,

        /// Include extended details
        #[arg(long)]
        details: bool,

        /// Only the string with this key
        #[arg(long)]
        key: Option<String>,

        /// Only strings with this context
        #[arg(long)]
        context: Option<String>,
    },

    /// List the releases of a project
    ///
    /// Example:
    ///   transifex releases joomla
    #[command(display_order = 12)]
    Releases {
        /// Project slug
        project: String,
    },

    /// List transport drivers and whether they are usable here
    ///
    /// Example:
    ///   transifex drivers
    #[command(display_order = 13)]
    Drivers,

    /// Check CLI version
    ///
    /// Example:
    ///   transifex version
    #[command(display_order = 14)]
    Version,
}

impl Cli {
    /// Parse command-line arguments
    ///
    /// # Returns
    ///
    /// Parsed CLI arguments
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Load the configuration and apply command-line overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or the resulting
    /// configuration is invalid.
    pub fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        // Flags given on the command line win, even when equal to a default
        if let Some(api_url) = &self.api_url {
            config.api_url.clone_from(api_url);
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if !self.drivers.is_empty() {
            config.drivers.clone_from(&self.drivers);
        }
        config.headers.extend(self.headers.iter().cloned());
        config.verbose |= self.verbose;

        config.validate()?;
        Ok(config)
    }
}

/// Parse a `NAME:VALUE` header argument
fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| TxError::InvalidArgument(format!("Header '{raw}' must be NAME:VALUE")))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(TxError::InvalidArgument(format!("Header '{raw}' has no name")));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
