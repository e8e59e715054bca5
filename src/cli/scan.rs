//! Scan subcommand implementation.
//!
//! Handles the `auditscan scan` command: sweeps the range, drives the
//! progress bar from scheduler events, and prints the final summary.

use crate::classify::ProbeConfig;
use crate::error::{CliError, CliResult};
use crate::net::SystemPinger;
use crate::output;
use crate::scheduler::{ScanEvent, ScanRequest, ScanTask};
use crate::types::{AddrRange, DeviceTypeId};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Sweep an address range and audit every recognized responder.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// First address of the range (inclusive)
    #[arg(long, value_name = "IP")]
    pub start: String,

    /// Last address of the range (inclusive)
    #[arg(long, value_name = "IP")]
    pub end: String,

    /// Directory under which the timestamped result directory is created
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub out: PathBuf,

    /// Also audit 127.0.0.1, submitted after the range
    #[arg(long)]
    pub include_localhost: bool,

    /// Keep results for responders no classifier rule matched
    #[arg(long)]
    pub keep_unknown: bool,

    /// Comma-separated family tags to audit (default: all). See `auditscan devices`
    #[arg(short, long, value_name = "TAGS")]
    pub devices: Option<String>,

    /// Maximum number of concurrent host jobs (0 = number of CPUs)
    #[arg(short = 'c', long, default_value = "0")]
    pub concurrency: usize,

    /// SNMP agent port on the targets
    #[arg(long, default_value = "161")]
    pub snmp_port: u16,

    /// HTTP port on the targets
    #[arg(long, default_value = "80")]
    pub http_port: u16,

    /// Alternate HTTP port checked during classification
    #[arg(long = "http-alt-port", default_value = "8080")]
    pub http_alt_port: u16,

    /// Telnet port on the targets
    #[arg(long, default_value = "23")]
    pub telnet_port: u16,

    /// SNMP probe timeout in milliseconds
    #[arg(long, default_value = "2000")]
    pub snmp_timeout: u64,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, quiet: bool) -> CliResult<()> {
        let range = AddrRange::parse(&self.start, &self.end)?;
        let selected = self.selected_devices()?;

        let concurrency = if self.concurrency == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.concurrency
        };

        let probes = ProbeConfig {
            snmp_port: self.snmp_port,
            http_port: self.http_port,
            http_alt_port: self.http_alt_port,
            telnet_port: self.telnet_port,
            snmp_timeout: Duration::from_millis(self.snmp_timeout),
            ..ProbeConfig::default()
        };

        let request = ScanRequest {
            range,
            output_dir: self.out.clone(),
            include_localhost: self.include_localhost,
            ignore_unknown: !self.keep_unknown,
            selected,
            concurrency,
            probes,
        };
        let total = request.steps_total();
        debug!(total, concurrency, "starting scan");

        let task = Arc::new(ScanTask::new(request, Arc::new(SystemPinger::new())));
        let (tx, mut rx) = mpsc::unbounded_channel();

        // Ctrl-C cancels cleanly: submission stops, in-flight jobs finish.
        let stop = task.stop_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                output::print_warning("cancelling, waiting for running jobs...");
                stop.stop();
            }
        });

        let runner = {
            let task = Arc::clone(&task);
            tokio::spawn(async move { task.run(tx).await })
        };

        let progress = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
                    )
                    .unwrap()
                    .progress_chars("=>-"),
            );
            bar.set_message("sweeping");
            bar
        };

        while let Some(event) = rx.recv().await {
            match event {
                ScanEvent::Step { done, .. } => progress.set_position(done as u64),
                ScanEvent::Finished { hosts_found, .. } => {
                    progress.set_message(format!("{} units found", hosts_found));
                }
            }
        }
        progress.finish_and_clear();

        let summary = runner
            .await
            .map_err(|e| CliError::Other(format!("scan task panicked: {}", e)))??;

        output::print_summary(&summary)
            .map_err(|e| CliError::Other(format!("cannot write summary: {}", e)))?;
        Ok(())
    }

    /// Parse `--devices` into the set of audited families. No flag means
    /// every family.
    fn selected_devices(&self) -> CliResult<HashSet<DeviceTypeId>> {
        let Some(list) = &self.devices else {
            return Ok(DeviceTypeId::ALL.iter().copied().collect());
        };
        let mut selected = HashSet::new();
        for tag in list.split(',') {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            let id: DeviceTypeId = tag
                .parse()
                .map_err(|_| CliError::UnknownDeviceType(tag.to_string()))?;
            selected.insert(id);
        }
        if selected.is_empty() {
            return Err(CliError::Other("no device families selected".to_string()));
        }
        Ok(selected)
    }
}
