//! The structured result of fingerprinting one host.
//!
//! A `DeviceRecord` is built fresh by a driver, fully populated during
//! `populate()`, then treated as immutable. `info` keys are declared up
//! front per product family with null defaults, so a field whose probe
//! failed still appears in the output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A scalar field value: string, integer, boolean, or unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Null
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// One row of a sub-table (an interface, a license, an option card).
pub type Row = BTreeMap<String, Scalar>;

/// Structured device state for one discovered host.
///
/// Serializes to the on-disk `<addr>_data.json` contract: top-level keys
/// `info`, `interfaces`, `licenses`, `optioncards`. The raw config blob is
/// written to its own file and never embedded here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub info: BTreeMap<String, Scalar>,
    pub interfaces: BTreeMap<String, Row>,
    pub licenses: BTreeMap<String, Scalar>,
    pub optioncards: BTreeMap<String, Row>,
    #[serde(skip)]
    pub raw_config: Option<Vec<u8>>,
}

impl DeviceRecord {
    /// Skeleton record with a declared field list, values all null.
    pub fn with_fields(address: &str, fields: &[&str]) -> Self {
        let mut info = BTreeMap::new();
        for &field in fields {
            info.insert(field.to_string(), Scalar::Null);
        }
        info.insert("ipaddress".to_string(), Scalar::from(address));
        Self {
            info,
            ..Default::default()
        }
    }

    /// Set an info field, overwriting its default.
    pub fn set_info(&mut self, key: &str, value: Scalar) {
        self.info.insert(key.to_string(), value);
    }

    pub fn address(&self) -> &str {
        self.info
            .get("ipaddress")
            .and_then(Scalar::as_str)
            .unwrap_or("")
    }
}
