//! Liveness probing.
//!
//! A single echo attempt decides whether an address gets the full
//! classification treatment. The production prober shells out to the
//! platform `ping` binary with a one-reply budget; a missed echo is
//! simply "down", never an error. The trait seam exists so the scheduler
//! can be exercised without touching the network.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Reachability check for a single address.
#[async_trait]
pub trait Prober: Send + Sync {
    /// True only on a confirmed echo reply. Must not raise.
    async fn probe(&self, address: &str) -> bool;
}

/// Prober backed by the operating system's `ping` command.
#[derive(Debug, Clone)]
pub struct SystemPinger {
    timeout: Duration,
}

impl SystemPinger {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(3),
        }
    }

    /// Outer ceiling on the whole ping process, on top of ping's own
    /// one second reply budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(address: &str) -> Command {
        let mut cmd = Command::new("ping");
        #[cfg(target_os = "windows")]
        cmd.args(["-n", "1", "-w", "1000", address]);
        #[cfg(target_os = "macos")]
        cmd.args(["-c", "1", "-W", "1000", address]);
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        cmd.args(["-c", "1", "-w", "1", address]);
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        cmd
    }
}

impl Default for SystemPinger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for SystemPinger {
    async fn probe(&self, address: &str) -> bool {
        let child = Self::command(address).status();
        match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(err)) => {
                debug!(%address, %err, "could not run ping");
                false
            }
            Err(_) => {
                debug!(%address, "ping did not finish in time");
                false
            }
        }
    }
}
