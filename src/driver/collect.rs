//! Shared SNMP collection helpers for the table-driven drivers.

use crate::net::{Oid, SnmpClient, SnmpValue};
use crate::types::{Row, Scalar};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ceiling on any single column walk; real tables hold a handful of rows,
/// so hitting this means the agent is misbehaving.
pub const MAX_WALK_ROWS: usize = 256;

const IP_ADDR_OID: &str = "1.3.6.1.2.1.4.20.1.1";
const IP_IFINDEX_OID: &str = "1.3.6.1.2.1.4.20.1.2";
const IF_NAME_OID: &str = "1.3.6.1.2.1.2.2.1.2";
const IF_MAC_OID: &str = "1.3.6.1.2.1.2.2.1.6";
const IF_STATUS_OID: &str = "1.3.6.1.2.1.2.2.1.8";

/// GET-NEXT from `root` until the reply leaves the subtree. Also stops on
/// a repeated OID (broken agents loop) and at [`MAX_WALK_ROWS`].
pub async fn walk_column(snmp: &SnmpClient, root: &Oid) -> Vec<(Oid, SnmpValue)> {
    let mut rows = Vec::new();
    let mut cursor = root.clone();
    loop {
        let Some((oid, value)) = snmp.get_next(&cursor).await else {
            break;
        };
        if !oid.starts_with(root) || oid == cursor {
            break;
        }
        cursor = oid.clone();
        rows.push((oid, value));
        if rows.len() >= MAX_WALK_ROWS {
            break;
        }
    }
    rows
}

/// Walk an index column and return each row's value rendered as an OID
/// instance suffix ("3", or a dotted address for IP-indexed tables).
pub async fn walk_indexes(snmp: &SnmpClient, root: &Oid) -> Vec<String> {
    walk_column(snmp, root)
        .await
        .into_iter()
        .filter_map(|(_, value)| value_suffix(&value))
        .collect()
}

/// Render a walked value as an instance suffix.
pub fn value_suffix(value: &SnmpValue) -> Option<String> {
    match value {
        SnmpValue::Int(n) => Some(n.to_string()),
        SnmpValue::Counter(n) | SnmpValue::TimeTicks(n) => Some(n.to_string()),
        SnmpValue::IpAddress(ip) => Some(ip.to_string()),
        SnmpValue::OctetString(_) => value.as_text(),
        _ => None,
    }
}

/// Convert a decoded varbind into a record scalar.
pub fn scalar_from(value: SnmpValue) -> Scalar {
    match value {
        SnmpValue::Int(n) => Scalar::Int(n),
        SnmpValue::Counter(n) | SnmpValue::TimeTicks(n) => Scalar::Int(n as i64),
        SnmpValue::IpAddress(ip) => Scalar::Text(ip.to_string()),
        SnmpValue::ObjectId(oid) => Scalar::Text(oid.to_string()),
        SnmpValue::OctetString(bytes) => {
            Scalar::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        SnmpValue::Null | SnmpValue::Absent => Scalar::Null,
    }
}

/// MAC bytes as colon-separated lowercase hex.
pub fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Interface names come back NUL-terminated; drop the terminator.
pub fn trim_nul(text: &str) -> &str {
    text.trim_end_matches('\0')
}

/// Pluck a value out of nested JSON objects by key path.
pub fn json_path<'a>(mut value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    for key in path {
        value = value.as_object()?.get(*key)?;
    }
    Some(value)
}

/// JSON leaf to record scalar.
pub fn scalar_from_json(value: &Value) -> Scalar {
    match value {
        Value::String(s) => Scalar::Text(s.clone()),
        Value::Number(n) => n.as_i64().map(Scalar::Int).unwrap_or(Scalar::Null),
        Value::Bool(b) => Scalar::Bool(*b),
        _ => Scalar::Null,
    }
}

/// The standard MIB-II two-stage interface walk: discover addresses in the
/// ipAddrTable, skip loopback rows, then follow each row's ifIndex into the
/// ifTable for name, MAC, and operational status.
pub async fn collect_interfaces(snmp: &SnmpClient) -> BTreeMap<String, Row> {
    let mut interfaces = BTreeMap::new();
    let Ok(addr_root) = IP_ADDR_OID.parse::<Oid>() else {
        return interfaces;
    };

    for address in walk_indexes(snmp, &addr_root).await {
        if address.starts_with("127") {
            continue;
        }
        let mut row = Row::new();
        row.insert("ipaddress".to_string(), Scalar::from(address.as_str()));

        let if_index = match get_suffixed(snmp, IP_IFINDEX_OID, &address).await {
            Some(SnmpValue::Int(n)) => n,
            _ => {
                // can't reach the ifTable without an index; keep the bare row
                interfaces.insert(address, row);
                continue;
            }
        };
        row.insert("ifidx".to_string(), Scalar::Int(if_index));

        let suffix = if_index.to_string();
        if let Some(value) = get_suffixed(snmp, IF_NAME_OID, &suffix).await {
            if let Some(name) = value.as_text() {
                row.insert("name".to_string(), Scalar::from(trim_nul(&name)));
            }
        }
        if let Some(value) = get_suffixed(snmp, IF_MAC_OID, &suffix).await {
            if let Some(bytes) = value.as_bytes() {
                row.insert("macaddress".to_string(), Scalar::Text(format_mac(bytes)));
            }
        }
        if let Some(value) = get_suffixed(snmp, IF_STATUS_OID, &suffix).await {
            row.insert(
                "status".to_string(),
                Scalar::Bool(value.as_int() == Some(1)),
            );
        }

        interfaces.insert(suffix, row);
    }
    interfaces
}

/// GET of `column.suffix`.
pub async fn get_suffixed(snmp: &SnmpClient, column: &str, suffix: &str) -> Option<SnmpValue> {
    let oid = column.parse::<Oid>().ok()?.join(suffix);
    snmp.get(&oid).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mac() {
        assert_eq!(format_mac(&[0x00, 0x1B, 0xC5, 0x0A, 0xFF, 0x01]), "00:1b:c5:0a:ff:01");
    }

    #[test]
    fn test_trim_nul() {
        assert_eq!(trim_nul("eth0\0"), "eth0");
        assert_eq!(trim_nul("eth0"), "eth0");
    }

    #[test]
    fn test_json_path() {
        let doc: Value = serde_json::from_str(
            r#"{"collection":{"data":{"ipAddress":{"value":"10.0.0.5"}}}}"#,
        )
        .unwrap();
        let leaf = json_path(&doc, &["collection", "data", "ipAddress", "value"]).unwrap();
        assert_eq!(scalar_from_json(leaf), Scalar::from("10.0.0.5"));
        assert!(json_path(&doc, &["collection", "missing"]).is_none());
    }

    #[test]
    fn test_value_suffix_variants() {
        assert_eq!(value_suffix(&SnmpValue::Int(7)).as_deref(), Some("7"));
        assert_eq!(
            value_suffix(&SnmpValue::IpAddress("10.1.2.3".parse().unwrap())).as_deref(),
            Some("10.1.2.3")
        );
        assert_eq!(value_suffix(&SnmpValue::Null), None);
    }
}
