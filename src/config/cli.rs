use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "shipsgo-sync")]
#[command(about = "Create ShipsGo ocean shipments for projects and sync the carrier list")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "shipsgo.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON (for scheduled runs)
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create or update a project's tracking fields (validated on save)
    SaveProject {
        /// Project name
        name: String,
        #[arg(long)]
        carrier: Option<String>,
        /// "Container Number" or "Booking Number"
        #[arg(long)]
        track_with: Option<String>,
        #[arg(long)]
        tracking_number: Option<String>,
    },
    /// Create the project's shipment on ShipsGo
    CreateShipment {
        record_id: String,
        /// User whose ShipsGo token is used
        #[arg(long)]
        user: String,
    },
    /// Import carriers missing from the local list (scheduled job)
    SyncCarriers,
    /// Show a project's shipment fields and the next available action
    ShowProject { record_id: String },
    /// Fetch a shipment document from ShipsGo
    GetShipment {
        shipment_id: String,
        #[arg(long)]
        user: String,
    },
    /// Print the ShipsGo dashboard tracking link
    TrackingLink,
    /// List configured tokens as seen by a viewer
    Tokens {
        #[arg(long)]
        viewer: String,
        #[arg(long = "role")]
        roles: Vec<String>,
    },
}
