//! Collector for Elemental Live / SVP4000 encoders.
//!
//! These boxes have no SNMP agent at all; identity and network layout come
//! from two XML settings endpoints and the raw "config" is the live-event
//! list. The same firmware runs both brandings, told apart by the version
//! string.

use crate::classify::ProbeConfig;
use crate::driver::Driver;
use crate::net::xml;
use crate::types::{DeviceRecord, DeviceTypeId, Row, Scalar};
use async_trait::async_trait;

const CONFIG_URI: &str = "/api/live_events.xml";
const VERSION_URI: &str = "/api/settings/version.xml";
const NETWORK_URI: &str = "/api/settings/network.xml";

const INFO_FIELDS: &[&str] = &["productname", "swversion", "unitname"];

pub struct ElementalDriver {
    probes: ProbeConfig,
    record: DeviceRecord,
}

impl ElementalDriver {
    pub fn new(address: &str, probes: &ProbeConfig) -> Self {
        Self {
            probes: probes.clone(),
            record: DeviceRecord::with_fields(address, INFO_FIELDS),
        }
    }
}

#[async_trait]
impl Driver for ElementalDriver {
    fn device_type(&self) -> DeviceTypeId {
        DeviceTypeId::Elemental
    }

    async fn populate(&mut self) {
        let address = self.record.address().to_string();
        let http = self.probes.http_fetcher();
        let port = self.probes.http_port;

        // the live event list doubles as the config blob
        self.record.raw_config = http
            .get(&address, port, CONFIG_URI)
            .await
            .filter(|body| !body.is_empty())
            .map(String::into_bytes);

        if let Some(version) = http.get(&address, port, VERSION_URI).await {
            for (field, tag) in [
                ("productname", "product"),
                ("swversion", "version"),
                ("unitname", "hostname"),
            ] {
                if let Some(value) = xml::tag_text(&version, tag) {
                    self.record.set_info(field, Scalar::from(value));
                }
            }
            // same firmware, two brandings; Ericsson builds carry an
            // "er" marker in the version string
            let branded = self
                .record
                .info
                .get("swversion")
                .and_then(Scalar::as_str)
                .is_some_and(|v| v.contains("er"));
            let product = if branded { "SVP4000" } else { "Elemental Live" };
            self.record.set_info("productname", Scalar::from(product));
        }

        if let Some(network) = http.get(&address, port, NETWORK_URI).await {
            for (position, entry) in xml::sections(&network, "eth_config").iter().enumerate() {
                let mut row = Row::new();
                for (field, tag) in [
                    ("ifidx", "id"),
                    ("name", "eth_dev"),
                    ("ipaddress", "ipv4_addr"),
                    ("management", "management"),
                ] {
                    if let Some(value) = xml::tag_text(entry, tag) {
                        row.insert(field.to_string(), Scalar::from(value));
                    }
                }
                let key = row
                    .get("name")
                    .and_then(Scalar::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| position.to_string());
                self.record.interfaces.insert(key, row);
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
