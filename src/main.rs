//! Transifex CLI - query the Transifex translation API

#![allow(clippy::print_stdout, clippy::print_stderr)]

use console::style;
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use transifex_client::api::StringFilter;
use transifex_client::cli::{Cli, Commands};
use transifex_client::client::{http_transports, Driver};
use transifex_client::{Result, Transifex, TxError};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

/// Main application entry point
fn run() -> i32 {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err}", style("Error:").red().bold());
            err.exit_code()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "transifex_client=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute the requested command
fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => {
            println!("Transifex CLI v{}", transifex_client::VERSION);
            return Ok(());
        }
        Commands::Drivers => {
            handle_drivers();
            return Ok(());
        }
        _ => {}
    }

    let config = cli.config()?;
    let api = Transifex::new(config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| TxError::Internal(format!("Failed to start async runtime: {e}")))?;

    let value = runtime.block_on(dispatch(&api, cli.command))?;
    print_json(&value)
}

async fn dispatch(api: &Transifex, command: Commands) -> Result<Value> {
    match command {
        Commands::Formats => api.formats().get_formats().await,
        Commands::Languages => api.language_info().get_languages().await,
        Commands::Language { code } => api.language_info().get_language(&code).await,
        Commands::Projects => api.projects().get_projects().await,
        Commands::Project { slug, details } => api.projects().get_project(&slug, details).await,
        Commands::Resources { project } => api.resources().get_resources(&project).await,
        Commands::Resource {
            project,
            resource,
            details,
        } => {
            api.resources()
                .get_resource(&project, &resource, details)
                .await
        }
        Commands::Content { project, resource } => {
            api.resources()
                .get_resource_content(&project, &resource)
                .await
        }
        Commands::Stats {
            project,
            resource,
            lang,
        } => {
            api.statistics()
                .get_statistics(&project, &resource, lang.as_deref())
                .await
        }
        Commands::Translation {
            project,
            resource,
            lang,
            mode,
        } => {
            api.translations()
                .get_translation(&project, &resource, &lang, mode.as_deref())
                .await
        }
        Commands::Strings {
            project,
            resource,
            lang,
            details,
            key,
            context,
        } => {
            let filter = StringFilter { key, context };
            api.translation_strings()
                .get_strings(&project, &resource, &lang, details, &filter)
                .await
        }
        Commands::Releases { project } => api.releases().get_releases(&project).await,
        Commands::Drivers | Commands::Version => Ok(Value::Null),
    }
}

/// Handle drivers command
fn handle_drivers() {
    for name in http_transports() {
        let usable = name.parse::<Driver>().is_ok_and(Driver::is_supported);
        let marker = if usable {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("{marker} {name}");
    }
}

fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| TxError::SerializationError(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}
