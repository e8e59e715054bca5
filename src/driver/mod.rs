//! Product-specific collectors.
//!
//! Every classified family maps through a static registry to a driver.
//! Most families share [`TableDriver`], which interprets a declarative
//! [`DriverProfile`]; the two REST/XML-only products get their own
//! implementations. `Unknown` always resolves, so classification never
//! produces a host the framework cannot at least record.

mod collect;
mod elemental;
mod profile;
mod svp2000;
mod table;

pub use elemental::ElementalDriver;
pub use profile::DriverProfile;
pub use svp2000::Svp2000Driver;
pub use table::TableDriver;

use crate::classify::ProbeConfig;
use crate::types::{DeviceRecord, DeviceTypeId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::LazyLock;

/// One fingerprinting collector. Construction is cheap; all network work
/// happens in `populate`, which contains its own failures.
#[async_trait]
pub trait Driver: Send {
    fn device_type(&self) -> DeviceTypeId;

    /// Fill the record. Per-field probe failures leave defaults in place;
    /// this never errors.
    async fn populate(&mut self);

    fn record(&self) -> &DeviceRecord;

    fn into_record(self: Box<Self>) -> DeviceRecord;

    /// The captured raw config, when the family has one.
    fn raw_config(&self) -> Option<&[u8]> {
        self.record().raw_config.as_deref()
    }
}

enum DriverKind {
    Table(&'static DriverProfile),
    Elemental,
    Svp2000,
}

/// Registry row: the human-readable family name and how to build its driver.
pub struct DriverEntry {
    pub display_name: &'static str,
    kind: DriverKind,
}

static REGISTRY: LazyLock<HashMap<DeviceTypeId, DriverEntry>> = LazyLock::new(|| {
    use DeviceTypeId::*;
    let mut table = HashMap::new();
    let mut add = |id: DeviceTypeId, display_name: &'static str, kind: DriverKind| {
        table.insert(id, DriverEntry { display_name, kind });
    };

    add(Rx9500, "RX9500 bulk descrambler", DriverKind::Table(&profile::RX9500));
    add(Rx8000, "RX8000 series receivers", DriverKind::Table(&profile::ERICSSON_GENERIC));
    add(Rx1200, "RX1290/TT12xx receivers", DriverKind::Table(&profile::RX1200));
    add(En8000, "EN8000 series encoders", DriverKind::Table(&profile::ERICSSON_GENERIC));
    add(En8100, "EN8100/ViPENC encoders", DriverKind::Table(&profile::ERICSSON_GENERIC));
    add(Spr1000, "SPR1100/SPR1200", DriverKind::Table(&profile::SPR1000));
    add(Mx8400, "MX8400 multiplexer", DriverKind::Table(&profile::MX8400));
    add(Sm6600, "SM6600 stream processor", DriverKind::Table(&profile::ERICSSON_GENERIC));
    add(Eq8000, "EQ8096 EdgeQAM", DriverKind::Table(&profile::EQ8000));
    add(Tt6120, "TT6120 TS Processor", DriverKind::Table(&profile::TT6120));
    add(Mx5210, "MX5210 multiplexer", DriverKind::Table(&profile::ERICSSON_GENERIC));
    add(Mx5000, "MX5000 multiplexer", DriverKind::Table(&profile::MX5000));
    add(Iplex, "iPLEX encoders", DriverKind::Table(&profile::IPLEX));
    add(NccServer, "nCC Server", DriverKind::Table(&profile::NCC_SERVER));
    add(Cisco, "Cisco Switches and Routers", DriverKind::Table(&profile::CISCO));
    add(Brocade, "Brocade Switches and Routers", DriverKind::Table(&profile::BROCADE));
    add(M6100, "Newtec M6100 Modulator", DriverKind::Table(&profile::M6100));
    add(Elemental, "Elemental/SVP4000 encoder", DriverKind::Elemental);
    add(Dev, "DEV RF Switch", DriverKind::Table(&profile::DEV));
    add(Svp2000, "SVP2000 ABR encoder/decoder", DriverKind::Svp2000);
    add(Svp1000, "SVP1000 encoder", DriverKind::Svp2000);
    add(Leitch, "Leitch/Harris SDI router", DriverKind::Table(&profile::LEITCH));
    add(Unknown, "Unknown device", DriverKind::Table(&profile::UNKNOWN));
    table
});

/// Build the driver for a classified host. Families without a registry row
/// never occur, but they would fall back to the unknown collector.
pub fn create(
    device_type: DeviceTypeId,
    address: &str,
    probes: &ProbeConfig,
) -> Box<dyn Driver> {
    let entry = REGISTRY
        .get(&device_type)
        .unwrap_or_else(|| &REGISTRY[&DeviceTypeId::Unknown]);
    match entry.kind {
        DriverKind::Table(profile) => {
            Box::new(TableDriver::new(device_type, profile, address, probes))
        }
        DriverKind::Elemental => Box::new(ElementalDriver::new(address, probes)),
        DriverKind::Svp2000 => Box::new(Svp2000Driver::new(device_type, address, probes)),
    }
}

/// Human-readable family name for listings and logs.
pub fn display_name(device_type: DeviceTypeId) -> &'static str {
    REGISTRY
        .get(&device_type)
        .map(|entry| entry.display_name)
        .unwrap_or("Unknown device")
}
