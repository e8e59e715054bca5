//! Collector for SVP2000-family ABR units (SVP1000 answers the same API).
//!
//! Pure REST: every scalar lives at its own `/objects` path and comes back
//! as a bare JSON value, licenses are one object map, interfaces one array.

use crate::classify::ProbeConfig;
use crate::driver::collect::scalar_from_json;
use crate::driver::Driver;
use crate::types::{DeviceRecord, DeviceTypeId, Row, Scalar};
use async_trait::async_trait;
use serde_json::Value;

const ENDPOINTS: &[(&str, &str)] = &[
    ("productname", "/objects/device/System/ModelName"),
    ("unitname", "/objects/device/System/DeviceName"),
    ("swversion", "/objects/device/Firmware/SoftwareVersion"),
    ("hwversion", "/objects/device/Firmware/HardwareVersion"),
    ("sntpserver", "/objects/device/DateTime/NtpServerList"),
    ("serialnumber", "/objects/device/System/Uid"),
    ("licensekey", "/objects/device/System/LicenseKey"),
    ("uptime", "/objects/device/System/UpTime"),
];

const LICENSES_URI: &str = "/objects/device/License/AllowedFeatures";
const ADAPTERS_URI: &str = "/objects/device/Network/Adapters";

pub struct Svp2000Driver {
    device_type: DeviceTypeId,
    probes: ProbeConfig,
    record: DeviceRecord,
}

impl Svp2000Driver {
    pub fn new(device_type: DeviceTypeId, address: &str, probes: &ProbeConfig) -> Self {
        let names: Vec<&str> = ENDPOINTS.iter().map(|(name, _)| *name).collect();
        Self {
            device_type,
            probes: probes.clone(),
            record: DeviceRecord::with_fields(address, &names),
        }
    }
}

#[async_trait]
impl Driver for Svp2000Driver {
    fn device_type(&self) -> DeviceTypeId {
        self.device_type
    }

    async fn populate(&mut self) {
        let address = self.record.address().to_string();
        let http = self.probes.http_fetcher();
        let port = self.probes.http_port;

        for (field, uri) in ENDPOINTS {
            let Some(body) = http.get(&address, port, uri).await else {
                continue;
            };
            if let Ok(value) = serde_json::from_str::<Value>(&body) {
                let scalar = scalar_from_json(&value);
                if !scalar.is_null() {
                    self.record.set_info(field, scalar);
                }
            }
        }

        if let Some(body) = http.get(&address, port, LICENSES_URI).await {
            if let Ok(Value::Object(features)) = serde_json::from_str::<Value>(&body) {
                for (name, value) in &features {
                    self.record
                        .licenses
                        .insert(name.clone(), scalar_from_json(value));
                }
            }
        }

        if let Some(body) = http.get(&address, port, ADAPTERS_URI).await {
            if let Ok(Value::Array(adapters)) = serde_json::from_str::<Value>(&body) {
                for (position, adapter) in adapters.iter().enumerate() {
                    let name = adapter
                        .get("Adapter")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    let mut row = Row::new();
                    row.insert("name".to_string(), Scalar::from(name));
                    row.insert(
                        "ipaddress".to_string(),
                        Scalar::from(
                            adapter
                                .get("CurrentIpAddress")
                                .and_then(Value::as_str)
                                .unwrap_or_default(),
                        ),
                    );
                    row.insert(
                        "status".to_string(),
                        Scalar::Bool(
                            adapter.get("OperationalStatus").and_then(Value::as_i64) == Some(1),
                        ),
                    );
                    let key = if name.is_empty() {
                        position.to_string()
                    } else {
                        name.to_string()
                    };
                    self.record.interfaces.insert(key, row);
                }
            }
        }
    }

    fn record(&self) -> &DeviceRecord {
        &self.record
    }

    fn into_record(self: Box<Self>) -> DeviceRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_values_decode_as_bare_json() {
        // the API returns quoted strings and plain numbers
        let model: Value = serde_json::from_str("\"SVP2110\"").unwrap();
        assert_eq!(scalar_from_json(&model), Scalar::from("SVP2110"));
        let uptime: Value = serde_json::from_str("86400").unwrap();
        assert_eq!(scalar_from_json(&uptime), Scalar::Int(86400));
    }

    #[test]
    fn test_skeleton_declares_all_endpoint_fields() {
        let driver =
            Svp2000Driver::new(DeviceTypeId::Svp2000, "10.0.0.2", &ProbeConfig::default());
        for (field, _) in ENDPOINTS {
            assert!(driver.record().info.contains_key(*field), "missing {field}");
        }
    }
}
