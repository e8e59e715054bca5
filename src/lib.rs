//! # auditscan - Broadcast Network Discovery and Audit
//!
//! auditscan sweeps an IPv4 address range, classifies every responder by
//! probing its SNMP, HTTP, and Telnet surfaces, then runs a family-specific
//! collector that records identity, licensing, card inventory, network
//! interfaces, and raw configuration to a timestamped result directory.
//!
//! ## Features
//!
//! - **Range Sweeps**: Inclusive start/end IPv4 ranges with an optional
//!   localhost tail entry
//! - **Ordered Classification**: An SNMP-first probe cascade that resolves
//!   each responder to one of over twenty device families
//! - **Data-Driven Collectors**: Most families are described by a static
//!   profile interpreted by a single table driver; the rest get
//!   hand-written collectors
//! - **Bounded Concurrency**: Async host jobs under a semaphore budget,
//!   with cooperative cancellation
//! - **Result Persistence**: One directory per responding host, holding a
//!   JSON record and the raw configuration dump where the device offers one
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use auditscan::classify::{Classifier, ProbeConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let classifier = Classifier::new(ProbeConfig::default());
//!     let family = classifier.classify("192.168.1.40").await;
//!     println!("192.168.1.40 is a {}", family);
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`types`] - Address ranges, device family identifiers, and records
//! - [`net`] - Probe transports: ping, SNMP, HTTP, Telnet, and the XML scanner
//! - [`classify`] - The ordered classification cascade
//! - [`driver`] - Per-family collectors and the driver registry
//! - [`scheduler`] - The scan task, job pool, and progress events
//! - [`persist`] - Result directory layout and host record writer
//! - [`error`] - Comprehensive error types
//! - [`output`] - Output formatting utilities

pub mod classify;
pub mod cli;
pub mod driver;
pub mod error;
pub mod net;
pub mod output;
pub mod persist;
pub mod scheduler;
pub mod types;

// Re-export commonly used types
pub use classify::{Classifier, ProbeConfig};
pub use driver::Driver;
pub use error::{CliError, ProbeError, RangeError};
pub use scheduler::{ScanEvent, ScanRequest, ScanSummary, ScanTask};
pub use types::{AddrRange, DeviceRecord, DeviceTypeId};
