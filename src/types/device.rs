//! Device family identifiers.
//!
//! One variant per product family the classifier can name, plus `Unknown`
//! for hosts that respond but match no rule. Each variant dispatches to
//! exactly one driver in the registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for a product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTypeId {
    Rx9500,
    Rx8000,
    Rx1200,
    En8000,
    En8100,
    Spr1000,
    Mx8400,
    Sm6600,
    Eq8000,
    Tt6120,
    Mx5210,
    Mx5000,
    Iplex,
    NccServer,
    Cisco,
    Brocade,
    M6100,
    Elemental,
    Dev,
    Svp2000,
    Svp1000,
    Leitch,
    Unknown,
}

impl DeviceTypeId {
    /// Every known family, in registry order. `Unknown` is last.
    pub const ALL: [DeviceTypeId; 23] = [
        DeviceTypeId::Rx9500,
        DeviceTypeId::Rx8000,
        DeviceTypeId::Rx1200,
        DeviceTypeId::En8000,
        DeviceTypeId::En8100,
        DeviceTypeId::Spr1000,
        DeviceTypeId::Mx8400,
        DeviceTypeId::Sm6600,
        DeviceTypeId::Eq8000,
        DeviceTypeId::Tt6120,
        DeviceTypeId::Mx5210,
        DeviceTypeId::Mx5000,
        DeviceTypeId::Iplex,
        DeviceTypeId::NccServer,
        DeviceTypeId::Cisco,
        DeviceTypeId::Brocade,
        DeviceTypeId::M6100,
        DeviceTypeId::Elemental,
        DeviceTypeId::Dev,
        DeviceTypeId::Svp2000,
        DeviceTypeId::Svp1000,
        DeviceTypeId::Leitch,
        DeviceTypeId::Unknown,
    ];

    /// Short lowercase tag, stable for CLI selection and serialization.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Rx9500 => "rx9500",
            Self::Rx8000 => "rx8000",
            Self::Rx1200 => "rx1200",
            Self::En8000 => "en8000",
            Self::En8100 => "en8100",
            Self::Spr1000 => "spr1000",
            Self::Mx8400 => "mx8400",
            Self::Sm6600 => "sm6600",
            Self::Eq8000 => "eq8000",
            Self::Tt6120 => "tt6120",
            Self::Mx5210 => "mx5210",
            Self::Mx5000 => "mx5000",
            Self::Iplex => "iplex",
            Self::NccServer => "nccserver",
            Self::Cisco => "cisco",
            Self::Brocade => "brocade",
            Self::M6100 => "m6100",
            Self::Elemental => "elemental",
            Self::Dev => "dev",
            Self::Svp2000 => "svp2000",
            Self::Svp1000 => "svp1000",
            Self::Leitch => "leitch",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DeviceTypeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|id| id.tag() == needle)
            .copied()
            .ok_or_else(|| format!("unknown device type: {}", s))
    }
}
