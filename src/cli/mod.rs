//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `auditscan scan --start <IP> --end <IP>` - Sweep a range and audit responders
//! - `auditscan devices` - List the device families the scanner recognizes

mod devices;
mod scan;

pub use devices::DevicesCommand;
pub use scan::ScanCommand;

use clap::{Parser, Subcommand};

/// auditscan - A broadcast-network discovery and audit tool.
///
/// Pings every address in an IPv4 range, classifies each responder by
/// probing its SNMP, HTTP, and Telnet surfaces, then runs a family-specific
/// collector that records identity, licensing, card inventory, and raw
/// configuration to disk.
#[derive(Parser, Debug)]
#[command(name = "auditscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discover and audit broadcast network appliances", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sweep an address range and audit every recognized responder
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// List the device families the scanner recognizes
    #[command(alias = "d")]
    Devices(DevicesCommand),
}
