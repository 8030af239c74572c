//! NLB CLI
//!
//! Command-line interface for CloudControl load balancers.
//!
//! # Usage
//!
//! ```bash
//! nlbctl balancers list
//! nlbctl balancers create --name web --port 80 --member 10.0.0.5:8080 --member 10.0.0.6:8080
//! nlbctl members attach vl-1 --ip 10.0.0.7 --port 8080 --name web-3
//! nlbctl pools list --format json
//! nlbctl --region dd-eu --profile staging balancers get vl-1
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "nlbctl")]
#[command(version)]
#[command(about = "Manage CloudControl load balancers", long_about = None)]
struct Cli {
    /// API user name
    #[arg(long, env = "NLB_USER")]
    user: Option<String>,

    /// API password
    #[arg(long, env = "NLB_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Region key, e.g. dd-na
    #[arg(long, env = "NLB_REGION")]
    region: Option<String>,

    /// Network domain new resources are created in
    #[arg(long, env = "NLB_NETWORK_DOMAIN")]
    network_domain: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage load balancers
    Balancers {
        #[command(subcommand)]
        action: BalancerCommands,
    },
    /// Manage balancer members
    Members {
        #[command(subcommand)]
        action: MemberCommands,
    },
    /// Inspect pools
    Pools {
        #[command(subcommand)]
        action: PoolCommands,
    },
    /// List supported protocols
    Protocols,
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum BalancerCommands {
    /// List all balancers
    List,
    /// Get balancer details
    Get { id: String },
    /// Create a balancer with its pool and members
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        port: u16,
        #[arg(long, default_value = "http")]
        protocol: String,
        #[arg(long, default_value = "round_robin")]
        algorithm: nlb_common::Algorithm,
        /// Member address as ip[:port], repeatable
        #[arg(long = "member", value_parser = commands::parse_member)]
        members: Vec<nlb_common::Member>,
    },
    /// Destroy a balancer (its pool and nodes are kept)
    Destroy { id: String },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// List members of a balancer
    List { balancer: String },
    /// Attach a new member
    Attach {
        balancer: String,
        #[arg(long)]
        ip: String,
        /// Defaults to the balancer port
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Detach a member by pool member id
    Detach { balancer: String, member: String },
}

#[derive(Subcommand)]
enum PoolCommands {
    /// List all pools
    List,
    /// Get pool details
    Get { id: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    // logs go to stderr so json and yaml output stay parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();
    let overrides = config::Overrides {
        user: cli.user,
        password: cli.password,
        region: cli.region,
        network_domain_id: cli.network_domain,
    };

    let result = match cli.command {
        Commands::Config { action } => commands::config::handle(action, profile),
        command => match commands::Context::new(profile, overrides, cli.format) {
            Ok(ctx) => dispatch(command, &ctx).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn dispatch(command: Commands, ctx: &commands::Context) -> anyhow::Result<()> {
    match command {
        Commands::Balancers { action } => commands::balancers::handle(action, ctx).await,
        Commands::Members { action } => commands::members::handle(action, ctx).await,
        Commands::Pools { action } => commands::pools::handle(action, ctx).await,
        Commands::Protocols => commands::protocols(ctx.format),
        Commands::Config { action } => commands::config::handle(action, ctx.profile()),
    }
}
