//! The data-driven driver that interprets a [`DriverProfile`].
//!
//! One implementation covers every family whose collection is "read these
//! OIDs, walk these tables, maybe grab a config": the profile says what to
//! fetch, this module says how. Every fetch is independently fault
//! tolerant; a field whose probe fails simply keeps its default.

use crate::classify::ProbeConfig;
use crate::driver::collect::{
    self, get_suffixed, scalar_from, scalar_from_json, walk_indexes,
};
use crate::driver::profile::{
    CardIndexStyle, CardProfile, ConfigCapture, DriverProfile, FieldSource, LicenseSource,
    ScrapeSource,
};
use crate::driver::Driver;
use crate::net::{telnet, xml, HttpFetcher, Oid, SnmpClient, SnmpValue};
use crate::types::{DeviceRecord, DeviceTypeId, Row, Scalar};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

pub struct TableDriver {
    device_type: DeviceTypeId,
    profile: &'static DriverProfile,
    probes: ProbeConfig,
    record: DeviceRecord,
}

impl TableDriver {
    pub fn new(
        device_type: DeviceTypeId,
        profile: &'static DriverProfile,
        address: &str,
        probes: &ProbeConfig,
    ) -> Self {
        let names: Vec<&str> = profile.fields.iter().map(|f| f.name).collect();
        let mut record = DeviceRecord::with_fields(address, &names);
        for field in profile.fields {
            if let Some(default) = field.default {
                record.set_info(field.name, Scalar::from(default));
            }
        }
        Self {
            device_type,
            profile,
            probes: probes.clone(),
            record,
        }
    }

    async fn capture_config(&self, address: &str, http: &HttpFetcher) -> Option<Vec<u8>> {
        let port = self.probes.http_port;
        match self.profile.config {
            ConfigCapture::None => None,
            ConfigCapture::HttpGet { uri, auth } => {
                let body = match auth {
                    Some(token) => {
                        http.get_with_headers(address, port, uri, &[("authorization", token)])
                            .await
                    }
                    None => http.get(address, port, uri).await,
                };
                body.filter(|b| !b.is_empty()).map(String::into_bytes)
            }
            ConfigCapture::HttpTokenGet {
                login_uri,
                token_path,
                config_uri,
            } => {
                let login = http.post(address, port, login_uri).await?;
                let doc: Value = serde_json::from_str(&login).ok()?;
                let token = collect::json_path(&doc, token_path)?.as_str()?.to_string();
                let cookie = format!("token={token}");
                http.get_with_headers(address, port, config_uri, &[("cookie", &cookie)])
                    .await
                    .filter(|b| !b.is_empty())
                    .map(String::into_bytes)
            }
            ConfigCapture::Telnet(script) => {
                telnet::run_script(
                    address,
                    self.probes.telnet_port,
                    self.probes.telnet_timeout,
                    script,
                )
                .await
            }
            ConfigCapture::TelnetTrimmed(script) => {
                let raw = telnet::run_script(
                    address,
                    self.probes.telnet_port,
                    self.probes.telnet_timeout,
                    script,
                )
                .await?;
                let text = String::from_utf8_lossy(&raw)
                    .replace('>', "")
                    .trim()
                    .to_string();
                if text.is_empty() {
                    None
                } else {
                    Some(text.into_bytes())
                }
            }
        }
    }

    async fn fetch_scrape(&self, address: &str, http: &HttpFetcher) -> Option<String> {
        match self.profile.scrape? {
            ScrapeSource::HttpGet { uri } => http.get(address, self.probes.http_port, uri).await,
            ScrapeSource::Telnet(script) => telnet::run_script(
                address,
                self.probes.telnet_port,
                self.probes.telnet_timeout,
                script,
            )
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
        }
    }

    async fn fill_fields(
        &mut self,
        address: &str,
        snmp: Option<&SnmpClient>,
        http: &HttpFetcher,
        config_text: Option<&str>,
        scrape_text: Option<&str>,
    ) {
        for field in self.profile.fields {
            let fetched = match field.source {
                FieldSource::SnmpGet(oid) => match snmp {
                    Some(snmp) => Self::snmp_scalar(snmp, oid).await,
                    None => None,
                },
                FieldSource::SnmpGetMapped { oid, map, fallback } => match snmp {
                    Some(snmp) => {
                        let value = Self::snmp_scalar(snmp, oid).await;
                        value.map(|v| {
                            let name = v
                                .as_int()
                                .and_then(|code| {
                                    map.iter().find(|(c, _)| *c == code).map(|(_, n)| *n)
                                })
                                .unwrap_or(fallback);
                            Scalar::from(name)
                        })
                    }
                    None => None,
                },
                FieldSource::HttpJsonPath { uri, path } => {
                    match http.get(address, self.probes.http_port, uri).await {
                        Some(body) => serde_json::from_str::<Value>(&body)
                            .ok()
                            .as_ref()
                            .and_then(|doc| collect::json_path(doc, path))
                            .map(scalar_from_json),
                        None => None,
                    }
                }
                FieldSource::ConfigXmlAttr { tag, attr } => config_text
                    .and_then(|doc| xml::tag_attr(doc, tag, attr))
                    .map(|v| Scalar::from(v.trim())),
                FieldSource::ConfigXmlNamed {
                    key_attr,
                    key,
                    value_attr,
                } => config_text
                    .and_then(|doc| xml::attr_by_key(doc, key_attr, key, value_attr))
                    .map(|v| Scalar::from(v.trim())),
                FieldSource::ConfigXmlChipId {
                    key_attr,
                    key,
                    value_attr,
                } => config_text
                    .and_then(|doc| xml::attr_by_key(doc, key_attr, key, value_attr))
                    .and_then(|v| v.replace(' ', "").parse::<u64>().ok())
                    .map(|id| Scalar::Text(format!("{:012x}", id))),
                FieldSource::ScrapeRegex(pattern) => scrape_text.and_then(|text| {
                    let regex = Regex::new(pattern).ok()?;
                    let capture = regex.captures(text)?.get(1)?;
                    Some(Scalar::from(capture.as_str().trim()))
                }),
            };

            // only overwrite the declared default with a usable value
            if let Some(value) = fetched {
                if truthy(&value) {
                    self.record.set_info(field.name, value);
                }
            }
        }
    }

    async fn snmp_scalar(snmp: &SnmpClient, oid: &str) -> Option<Scalar> {
        let oid = oid.parse::<Oid>().ok()?;
        snmp.get(&oid).await.map(scalar_from)
    }

    async fn collect_licenses(&mut self, snmp: Option<&SnmpClient>, http: &HttpFetcher) {
        let address = self.record.address().to_string();
        match self.profile.licenses {
            LicenseSource::None => {}
            LicenseSource::SnmpStatus {
                index_oid,
                name_oid,
                status_oid,
            } => {
                let Some(snmp) = snmp else { return };
                for idx in Self::license_indexes(snmp, index_oid).await {
                    let name = Self::column_text(snmp, name_oid, &idx).await;
                    let enabled = get_suffixed(snmp, status_oid, &idx)
                        .await
                        .and_then(|v| v.as_int())
                        == Some(2);
                    if let (Some(name), true) = (name, enabled) {
                        self.record.licenses.insert(name, Scalar::Bool(true));
                    }
                }
            }
            LicenseSource::SnmpValue {
                index_oid,
                name_oid,
                value_oid,
            } => {
                let Some(snmp) = snmp else { return };
                for idx in Self::license_indexes(snmp, index_oid).await {
                    let name = Self::column_text(snmp, name_oid, &idx).await;
                    let value = get_suffixed(snmp, value_oid, &idx).await.map(scalar_from);
                    if let (Some(name), Some(value)) = (name, value) {
                        if truthy(&value) {
                            self.record.licenses.insert(name, value);
                        }
                    }
                }
            }
            LicenseSource::SnmpBoth {
                index_oid,
                name_oid,
                status_oid,
            } => {
                let Some(snmp) = snmp else { return };
                for idx in Self::license_indexes(snmp, index_oid).await {
                    let name = Self::column_text(snmp, name_oid, &idx).await;
                    let status = get_suffixed(snmp, status_oid, &idx).await.map(scalar_from);
                    if let (Some(name), Some(status)) = (name, status) {
                        if !status.is_null() {
                            self.record.licenses.insert(name, status);
                        }
                    }
                }
            }
            LicenseSource::SnmpNames { name_oid } => {
                let Some(snmp) = snmp else { return };
                let Ok(root) = name_oid.parse::<Oid>() else { return };
                for (_, value) in collect::walk_column(snmp, &root).await {
                    if let Some(name) = value.as_text() {
                        self.record.licenses.insert(name, Scalar::Bool(true));
                    }
                }
            }
            LicenseSource::HttpXml { uri } => {
                let Some(body) = http.get(&address, self.probes.http_port, uri).await else {
                    return;
                };
                for entry in xml::sections(&body, "licenseKey") {
                    let desc = xml::tag_text(entry, "licenseDescription");
                    let count = xml::tag_text(entry, "instances")
                        .and_then(|n| n.trim().parse::<i64>().ok());
                    if let (Some(desc), Some(count)) = (desc, count) {
                        self.record.licenses.insert(desc, Scalar::Int(count));
                    }
                }
            }
        }
    }

    async fn license_indexes(snmp: &SnmpClient, index_oid: &str) -> Vec<String> {
        match index_oid.parse::<Oid>() {
            Ok(root) => walk_indexes(snmp, &root).await,
            Err(_) => Vec::new(),
        }
    }

    async fn column_text(snmp: &SnmpClient, column: &str, suffix: &str) -> Option<String> {
        get_suffixed(snmp, column, suffix)
            .await
            .and_then(|v| v.as_text())
            .filter(|t| !t.is_empty())
    }

    async fn collect_cards(&mut self, snmp: &SnmpClient, cards: &CardProfile) {
        let Ok(slot_root) = cards.slot_oid.parse::<Oid>() else {
            return;
        };
        let slots: Vec<i64> = collect::walk_column(snmp, &slot_root)
            .await
            .into_iter()
            .filter_map(|(_, value)| value.as_int())
            .collect();

        for slot in slots {
            let mut row = Row::new();
            for (name, column) in cards.columns {
                let value = Self::card_cell(snmp, column, slot, cards.index_style).await;
                let Some(value) = value else { continue };
                let scalar = if *name == "type" {
                    match cards.type_map {
                        Some(map) => {
                            let board = value
                                .as_int()
                                .and_then(|code| {
                                    map.codes.iter().find(|(c, _)| *c == code).map(|(_, n)| *n)
                                })
                                .unwrap_or(map.fallback);
                            Scalar::from(board)
                        }
                        None => scalar_from(value),
                    }
                } else {
                    scalar_from(value)
                };
                row.insert(name.to_string(), scalar);
            }

            // rows are keyed on slot and board name; a partial row where
            // the type column never answered still gets a keyed entry
            let type_text = row
                .get("type")
                .map(|t| t.to_string())
                .unwrap_or_default();
            let key = format!("{:02} - {}", slot, type_text);
            if row.is_empty() {
                debug!(slot, "card slot answered the walk but no columns");
            }
            self.record.optioncards.insert(key, row);
        }
    }

    async fn card_cell(
        snmp: &SnmpClient,
        column: &str,
        slot: i64,
        style: CardIndexStyle,
    ) -> Option<SnmpValue> {
        let value = match style {
            CardIndexStyle::Plain => get_suffixed(snmp, column, &slot.to_string()).await,
            CardIndexStyle::SubZero => {
                get_suffixed(snmp, column, &format!("{}.0", slot)).await
            }
            CardIndexStyle::PlusOneSubZero => {
                get_suffixed(snmp, column, &format!("{}.0", slot + 1)).await
            }
            CardIndexStyle::NextFromPrevious => {
                let oid = column.parse::<Oid>().ok()?.join(&(slot - 1).to_string());
                snmp.get_next(&oid).await.map(|(_, value)| value)
            }
        };
        value.filter(|v| !v.is_absent())
    }
}

#[async_trait]
impl Driver for TableDriver {
    fn device_type(&self) -> DeviceTypeId {
        self.device_type
    }

    async fn populate(&mut self) {
        let address = self.record.address().to_string();
        let http = self.probes.http_fetcher();
        let snmp = self.probes.snmp_client(&address);

        // config comes first: some identity fields are cut out of it
        self.record.raw_config = self.capture_config(&address, &http).await;
        let config_text = self
            .record
            .raw_config
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
        let scrape_text = self.fetch_scrape(&address, &http).await;

        self.fill_fields(
            &address,
            snmp.as_ref(),
            &http,
            config_text.as_deref(),
            scrape_text.as_deref(),
        )
        .await;

        self.collect_licenses(snmp.as_ref(), &http).await;
        if let Some(snmp) = snmp.as_ref() {
            if let Some(cards) = self.profile.cards {
                self.collect_cards(snmp, &cards).await;
            }
            if self.profile.interfaces {
                self.record.interfaces = collect::collect_interfaces(snmp).await;
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

fn truthy(value: &Scalar) -> bool {
    match value {
        Scalar::Null => false,
        Scalar::Bool(b) => *b,
        Scalar::Int(n) => *n != 0,
        Scalar::Text(t) => !t.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::profile;

    #[test]
    fn test_skeleton_carries_defaults() {
        let probes = ProbeConfig::default();
        let driver = TableDriver::new(
            DeviceTypeId::Rx9500,
            &profile::RX9500,
            "10.0.0.9",
            &probes,
        );
        // declared default survives until a probe overwrites it
        assert_eq!(
            driver.record().info["productname"],
            Scalar::from("ViPENC")
        );
        assert_eq!(driver.record().info["serialnumber"], Scalar::Null);
        assert_eq!(driver.record().address(), "10.0.0.9");
    }
}
