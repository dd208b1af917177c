use anyhow::Result;
use clap::{Parser, Subcommand};
use costctl::commands::{self, CommandContext, ResourceSpec};
use costctl::config::{self, Config};
use costctl::exit_codes::exit_code_for_anyhow;
use costctl::pricing::{PricingClient, ResourceType};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "costctl")]
#[command(
    about = "Cloud cost estimator for the pricing service",
    long_about = "costctl talks to a cloud pricing service.\n\nPick resource types, names and regions, then get an itemized cost estimate.\nPast estimates can be listed and inspected."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    output: String,

    /// Pricing service base URL (overrides api.base_url)
    #[arg(long, global = true, env = "COSTCTL_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List resource names available for a type
    Names {
        /// Resource type (Compute, Storage, Database)
        resource_type: ResourceType,
    },
    /// List regions available for a resource
    Regions {
        /// Resource type (Compute, Storage, Database)
        resource_type: ResourceType,
        /// Resource name (see `costctl names`)
        name: String,
    },
    /// Get a cost estimate for one or more resources
    Estimate {
        /// Resource as TYPE:NAME:REGION:UNITS, repeat for more rows
        #[arg(short, long = "resource", required = true)]
        resources: Vec<ResourceSpec>,
    },
    /// List past estimates
    History,
    /// Show one past estimate
    Details {
        /// Estimate ID (see `costctl history`)
        id: String,
    },
    /// Initialize configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".costctl.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // warnings and errors only unless --verbose
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for_anyhow(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Init { output } = &cli.command {
        return config::init_config(output);
    }

    let config = Config::load(cli.config.as_deref())?.with_base_url(cli.api_url)?;
    let client = PricingClient::from_config(&config.api)?;
    let ctx = CommandContext {
        api: Arc::new(client),
        config,
        output: cli.output,
    };

    match cli.command {
        Commands::Names { resource_type } => commands::list_names(&ctx, resource_type).await?,
        Commands::Regions {
            resource_type,
            name,
        } => commands::list_regions(&ctx, resource_type, &name).await?,
        Commands::Estimate { resources } => commands::run_estimate(&ctx, &resources).await?,
        Commands::History => commands::show_history(&ctx).await?,
        Commands::Details { id } => commands::show_details(&ctx, &id).await?,
        Commands::Init { .. } => {}
    }

    Ok(())
}
