//! Devices subcommand implementation.
//!
//! Lists the family tags accepted by `auditscan scan --devices`.

use crate::error::{CliError, CliResult};
use crate::output;
use clap::Parser;

/// List the device families the scanner recognizes.
#[derive(Parser, Debug)]
pub struct DevicesCommand {}

impl DevicesCommand {
    /// Execute the devices command.
    pub fn execute(&self) -> CliResult<()> {
        output::print_device_list()
            .map_err(|e| CliError::Other(format!("cannot write device list: {}", e)))
    }
}
