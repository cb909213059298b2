use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vine_cli::cli::{run_command, CliCommand, CliConfig};
use vine_cli::tracing_setup::init_tracing;

#[derive(Parser)]
#[command(name = "vine-cli")]
#[command(about = "Query social metrics and follow graphs for videos on nostr relays")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, short, global = true)]
    pretty: bool,

    /// Path to JSON config file (relays, query timeouts)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Relay URL to query instead of the configured ones (can be specified multiple times)
    #[arg(long, short = 'r', global = true)]
    relay: Vec<String>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count likes, reposts, comments and views of a video
    Metrics {
        /// Video event ID (hex or bech32)
        video_id: String,
        #[command(flatten)]
        address: AddressArgs,
    },

    /// Show whether a viewer liked or reposted a video
    Interaction {
        /// Video event ID (hex or bech32)
        video_id: String,
        /// Viewer public key (hex or npub)
        viewer: String,
        #[command(flatten)]
        address: AddressArgs,
    },

    /// List the accounts a user follows
    Following {
        /// Public key (hex or npub)
        pubkey: String,
    },

    /// List accounts whose contact lists mention a user
    Followers {
        /// Public key (hex or npub)
        pubkey: String,
    },

    /// Count following and followers
    FollowCounts {
        /// Public key (hex or npub)
        pubkey: String,
    },

    /// Show the relays that would be queried
    Relays,
}

#[derive(clap::Args)]
struct AddressArgs {
    /// Video author public key, enables address-based lookups with --slug
    #[arg(long, short = 'a')]
    author: Option<String>,

    /// Video d-tag
    #[arg(long, short = 's')]
    slug: Option<String>,

    /// Full video coordinate (kind:author:slug), overrides --author and --slug
    #[arg(long, conflicts_with_all = ["author", "slug"])]
    address: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_ref()).into_core_config(cli.relay);

    let command = match cli.command {
        Commands::Metrics { video_id, address } => CliCommand::Metrics {
            video_id,
            author: address.author,
            slug: address.slug,
            address: address.address,
        },
        Commands::Interaction {
            video_id,
            viewer,
            address,
        } => CliCommand::Interaction {
            video_id,
            viewer,
            author: address.author,
            slug: address.slug,
            address: address.address,
        },
        Commands::Following { pubkey } => CliCommand::Following { pubkey },
        Commands::Followers { pubkey } => CliCommand::Followers { pubkey },
        Commands::FollowCounts { pubkey } => CliCommand::FollowCounts { pubkey },
        Commands::Relays => CliCommand::Relays,
    };

    let report = match run_command(command, config).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Load configuration from `--config`, else the default path if present
fn load_config(path: Option<&PathBuf>) -> CliConfig {
    if let Some(path) = path {
        match CliConfig::load(path) {
            Ok(config) => return config,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
    }

    match CliConfig::default_path().filter(|p| p.exists()) {
        Some(path) => CliConfig::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring default config: {:#}", e);
            CliConfig::default()
        }),
        None => CliConfig::default(),
    }
}
