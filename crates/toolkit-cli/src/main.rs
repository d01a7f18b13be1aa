//! Toolkit engine CLI.
//!
//! Registers CRM products, discovers their APIs, resolves endpoint
//! mappings and drives generated clients from the command line.
//!
//! # Examples
//!
//! ```bash
//! toolkit-engine register --id pipedrive --name Pipedrive --type crm \
//!     --base-url https://api.pipedrive.com/v1 --auth api_key
//! toolkit-engine discover --id pipedrive
//! toolkit-engine select --id pipedrive --auto
//! toolkit-engine call --id pipedrive --op list_contacts --credential api_token=...
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use toolkit_engine_cli::commands::{self, call::CallArgs, register::RegisterArgs};
use toolkit_engine_core::cli::{ExitCode, OutputFormat};
use toolkit_engine_core::{HOME_ENV_VAR, ProductId};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Uniform clients for heterogeneous CRM APIs.
#[derive(Parser, Debug)]
#[command(name = "toolkit-engine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,

    /// Directory holding persisted records
    #[arg(long, global = true, env = HOME_ENV_VAR)]
    home: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a product.
    Register {
        /// Product id, e.g. `pipedrive`
        #[arg(long)]
        id: String,

        /// Human-readable name
        #[arg(long)]
        name: String,

        /// Product type (crm, accounting)
        #[arg(long = "type", value_name = "TYPE")]
        product_type: String,

        /// API base URL every endpoint path is joined to
        #[arg(long)]
        base_url: String,

        /// Authentication method (api_key, oauth2)
        #[arg(long, default_value = "api_key")]
        auth: String,
    },

    /// List registered products.
    List,

    /// Fetch a product's API description and extract its capabilities.
    Discover {
        /// Product id
        #[arg(long)]
        id: String,

        /// Fetch the description from this URL instead of the default
        #[arg(long)]
        spec_url: Option<String>,
    },

    /// Resolve one endpoint per entity and action and save the mapping.
    Select {
        /// Product id
        #[arg(long)]
        id: String,

        /// Pick the best-scored endpoint instead of prompting
        #[arg(long)]
        auto: bool,
    },

    /// Run one operation through a generated client.
    Call {
        /// Product id
        #[arg(long)]
        id: String,

        /// Operation name, e.g. `list_contacts` or `get_contact`
        #[arg(long = "op", value_name = "OPERATION")]
        operation: String,

        /// Credential field (repeatable)
        #[arg(long = "credential", value_name = "KEY=VALUE")]
        credentials: Vec<String>,

        /// Record identifier for get, update and delete
        #[arg(long)]
        record_id: Option<String>,

        /// Path placeholder value (repeatable)
        #[arg(long = "path-param", value_name = "NAME=VALUE")]
        path_params: Vec<String>,

        /// JSON request body for create and update
        #[arg(long)]
        data: Option<String>,

        /// Query parameter (repeatable)
        #[arg(long = "query", value_name = "KEY=VALUE")]
        query: Vec<String>,
    },

    /// Generate a client and list a few contacts.
    Demo {
        /// Product id
        #[arg(long)]
        id: String,

        /// API token; defaults to `<ID>_API_TOKEN` or `<ID>_ACCESS_TOKEN`
        #[arg(long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            commands::exit_code_for(&err)
        }
    };

    std::process::exit(code.as_i32());
}

/// Initializes logging on stderr.
///
/// `RUST_LOG` overrides the default `info` level; `--verbose` forces `debug`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let output_format: OutputFormat = cli.format.parse().context("invalid --format")?;
    let mut engine = commands::open_engine(cli.home)?;

    match cli.command {
        Commands::Register {
            id,
            name,
            product_type,
            base_url,
            auth,
        } => {
            let args = RegisterArgs {
                id,
                name,
                product_type,
                base_url,
                auth,
            };
            commands::register::run(&mut engine, &args, output_format)
        }
        Commands::List => commands::list::run(&engine, output_format),
        Commands::Discover { id, spec_url } => {
            commands::discover::run(&engine, &ProductId::new(id), spec_url, output_format).await
        }
        Commands::Select { id, auto } => {
            commands::select::run(&engine, &ProductId::new(id), auto, output_format)
        }
        Commands::Call {
            id,
            operation,
            credentials,
            record_id,
            path_params,
            data,
            query,
        } => {
            let args = CallArgs {
                operation,
                credentials,
                record_id,
                path_params,
                data,
                query,
            };
            commands::call::run(&engine, &ProductId::new(id), &args, output_format).await
        }
        Commands::Demo { id, token } => {
            commands::demo::run(&engine, &ProductId::new(id), token, output_format).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_register() {
        let cli = Cli::parse_from([
            "toolkit-engine",
            "register",
            "--id",
            "hubspot",
            "--name",
            "HubSpot",
            "--type",
            "crm",
            "--base-url",
            "https://api.hubapi.com",
            "--auth",
            "oauth2",
        ]);
        match cli.command {
            Commands::Register {
                id,
                product_type,
                auth,
                ..
            } => {
                assert_eq!(id, "hubspot");
                assert_eq!(product_type, "crm");
                assert_eq!(auth, "oauth2");
            }
            _ => panic!("expected register"),
        }
    }

    #[test]
    fn test_cli_register_default_auth() {
        let cli = Cli::parse_from([
            "toolkit-engine",
            "register",
            "--id",
            "pipedrive",
            "--name",
            "Pipedrive",
            "--type",
            "crm",
            "--base-url",
            "https://api.pipedrive.com/v1",
        ]);
        assert!(matches!(cli.command, Commands::Register { ref auth, .. } if auth == "api_key"));
    }

    #[test]
    fn test_cli_parsing_call_repeatable_flags() {
        let cli = Cli::parse_from([
            "toolkit-engine",
            "--format",
            "json",
            "call",
            "--id",
            "pipedrive",
            "--op",
            "list_contacts",
            "--credential",
            "api_token=abc",
            "--query",
            "limit=5",
            "--query",
            "start=10",
        ]);
        assert_eq!(cli.format, "json");
        match cli.command {
            Commands::Call {
                operation,
                credentials,
                query,
                record_id,
                ..
            } => {
                assert_eq!(operation, "list_contacts");
                assert_eq!(credentials, vec!["api_token=abc"]);
                assert_eq!(query, vec!["limit=5", "start=10"]);
                assert!(record_id.is_none());
            }
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn test_cli_parsing_select_auto_with_global_verbose() {
        let cli = Cli::parse_from(["toolkit-engine", "select", "--id", "pipedrive", "--auto", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Select { auto: true, .. }));
    }

    #[test]
    fn test_cli_default_format() {
        let cli = Cli::parse_from(["toolkit-engine", "list"]);
        assert_eq!(cli.format, "pretty");
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_cli_requires_id() {
        let result = Cli::try_parse_from(["toolkit-engine", "discover"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
