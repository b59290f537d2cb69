//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for cloud control-plane services
#[derive(Parser, Debug)]
#[command(name = "stackclient")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// clouds.yaml-style file; `OS_*` environment variables are used when absent
    #[arg(long, global = true)]
    pub cloud_config: Option<PathBuf>,

    /// Cloud to use from the config file
    #[arg(long, global = true)]
    pub cloud: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load-balancer virtual IPs
    Vips {
        #[command(subcommand)]
        command: VipCommands,
    },

    /// Databases on a database-service instance
    Databases {
        #[command(subcommand)]
        command: DatabaseCommands,
    },
}

/// Virtual IP subcommands
#[derive(Subcommand, Debug)]
pub enum VipCommands {
    /// List virtual IPs, page by page
    List(VipListArgs),

    /// Show one virtual IP
    Get { id: String },

    /// Create a virtual IP
    Create(VipCreateArgs),

    /// Delete a virtual IP
    Delete { id: String },
}

/// Filters for `vips list`
#[derive(Args, Debug, Default)]
pub struct VipListArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub tenant_id: Option<String>,

    #[arg(long)]
    pub subnet_id: Option<String>,

    #[arg(long)]
    pub protocol: Option<String>,

    #[arg(long)]
    pub protocol_port: Option<u16>,

    #[arg(long)]
    pub admin_state_up: Option<bool>,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long)]
    pub sort_key: Option<String>,

    /// asc or desc
    #[arg(long)]
    pub sort_dir: Option<String>,
}

/// Parameters for `vips create`
#[derive(Args, Debug)]
pub struct VipCreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub subnet_id: String,

    /// TCP, HTTP or HTTPS
    #[arg(long)]
    pub protocol: String,

    #[arg(long)]
    pub protocol_port: u16,

    #[arg(long)]
    pub pool_id: String,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// -1 for unlimited
    #[arg(long, allow_hyphen_values = true)]
    pub connection_limit: Option<i64>,

    /// Session persistence type (SOURCE_IP, HTTP_COOKIE, APP_COOKIE)
    #[arg(long)]
    pub persistence: Option<String>,

    /// Cookie name for APP_COOKIE persistence
    #[arg(long, requires = "persistence")]
    pub cookie_name: Option<String>,

    /// Create administratively down
    #[arg(long)]
    pub down: bool,
}

/// Database subcommands
#[derive(Subcommand, Debug)]
pub enum DatabaseCommands {
    /// List databases on an instance, page by page
    List {
        #[arg(long)]
        instance: String,

        /// Page size
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Create databases on an instance
    Create {
        #[arg(long)]
        instance: String,

        /// Database names
        #[arg(required = true)]
        names: Vec<String>,

        #[arg(long)]
        character_set: Option<String>,

        #[arg(long)]
        collate: Option<String>,
    },

    /// Delete a database
    Delete {
        #[arg(long)]
        instance: String,

        name: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
}
