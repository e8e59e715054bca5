//! Ordered protocol cascade that decides what kind of unit answered a ping.
//!
//! Rules run strictly in order and the first match wins. A probe that times
//! out or returns garbage is a non-match, never an error. The one exception
//! is the opening vendor-OID rule: a host that answers it with text we do
//! not recognize is declared [`DeviceTypeId::Unknown`] on the spot, since
//! it has already identified itself as something we have no collector for.

use crate::net::{telnet, HttpFetcher, Oid, SnmpClient};
use crate::types::DeviceTypeId;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Ericsson/Tandberg cfgProductName.
const PRODUCT_NAME_OID: &str = "1.3.6.1.4.1.1773.1.1.1.7.0";
/// nCompass service identity.
const NCC_PRODUCT_OID: &str = "1.3.6.1.4.1.1773.3.1.1.1.0";
/// NDS-era MX5000 product code.
const MX5000_PRODUCT_OID: &str = "1.3.6.1.4.1.1855.2.21.1.1.2.0";
/// Cisco enterprise subtree.
const CISCO_ROOT_OID: &str = "1.3.6.1.4.1.9";
/// Brocade/Foundry enterprise subtree.
const BROCADE_ROOT_OID: &str = "1.3.6.1.4.1.1991";
/// Newtec device type string.
const NEWTEC_TYPE_OID: &str = "1.3.6.1.4.1.5835.5.2.100.1.1.4.0";

/// Product-name substrings for the Ericsson/Tandberg families, checked in
/// order against the cfgProductName reply.
const PRODUCT_SUBSTRINGS: &[(&str, DeviceTypeId)] = &[
    ("RX95", DeviceTypeId::Rx9500),
    ("RX8", DeviceTypeId::Rx8000),
    ("RX12", DeviceTypeId::Rx1200),
    ("TT12", DeviceTypeId::Rx1200),
    ("ViPENC", DeviceTypeId::En8100),
    ("CENC", DeviceTypeId::En8100),
    ("EMSP", DeviceTypeId::Spr1000),
    ("SPR", DeviceTypeId::Spr1000),
    ("EN80", DeviceTypeId::En8000),
    ("E57", DeviceTypeId::En8000),
    ("MX84", DeviceTypeId::Mx8400),
    ("SM66", DeviceTypeId::Sm6600),
    ("EQ80", DeviceTypeId::Eq8000),
    ("6120", DeviceTypeId::Tt6120),
    ("5210", DeviceTypeId::Mx5210),
    ("IPLEX", DeviceTypeId::Iplex),
];

/// Ports and per-protocol timeouts the cascade and the drivers use.
/// Overridable so tests can aim everything at loopback simulators.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub snmp_port: u16,
    pub http_port: u16,
    pub http_alt_port: u16,
    pub telnet_port: u16,
    pub snmp_timeout: Duration,
    pub http_timeout: Duration,
    pub telnet_timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            snmp_port: 161,
            http_port: 80,
            http_alt_port: 8080,
            telnet_port: 23,
            snmp_timeout: Duration::from_secs(2),
            http_timeout: Duration::from_secs(5),
            telnet_timeout: Duration::from_secs(2),
        }
    }
}

impl ProbeConfig {
    pub fn snmp_client(&self, address: &str) -> Option<SnmpClient> {
        let ip: IpAddr = address.parse().ok()?;
        Some(SnmpClient::new(
            SocketAddr::new(ip, self.snmp_port),
            self.snmp_timeout,
        ))
    }

    pub fn http_fetcher(&self) -> HttpFetcher {
        HttpFetcher::new(self.http_timeout)
    }
}

/// Runs the identification cascade for one address.
pub struct Classifier {
    probes: ProbeConfig,
    http: HttpFetcher,
}

impl Classifier {
    pub fn new(probes: ProbeConfig) -> Self {
        let http = probes.http_fetcher();
        Self { probes, http }
    }

    /// Decide what kind of unit is at `address`.
    pub async fn classify(&self, address: &str) -> DeviceTypeId {
        let Some(snmp) = self.probes.snmp_client(address) else {
            return DeviceTypeId::Unknown;
        };

        // Ericsson/Tandberg devices all answer cfgProductName.
        if let Some(name) = Self::get_text(&snmp, PRODUCT_NAME_OID).await {
            for (needle, device) in PRODUCT_SUBSTRINGS {
                if name.contains(needle) {
                    debug!(%address, %name, ?device, "matched product name");
                    return *device;
                }
            }
            // answered the vendor OID but we have no collector for it
            debug!(%address, %name, "unrecognized product name");
            return DeviceTypeId::Unknown;
        }

        // maybe a service host rather than a device
        if let Some(name) = Self::get_text(&snmp, NCC_PRODUCT_OID).await {
            if name.contains("nCompass") {
                return DeviceTypeId::NccServer;
            }
        }

        // old-school NDS mux: any answer on its product code is enough
        if let Some(oid) = parse_oid(MX5000_PRODUCT_OID) {
            if snmp.get(&oid).await.is_some_and(|v| !v.is_absent()) {
                return DeviceTypeId::Mx5000;
            }
        }

        // enterprise subtree walks for the switch vendors
        if self.subtree_answers(&snmp, CISCO_ROOT_OID).await {
            return DeviceTypeId::Cisco;
        }
        if self.subtree_answers(&snmp, BROCADE_ROOT_OID).await {
            return DeviceTypeId::Brocade;
        }

        if let Some(name) = Self::get_text(&snmp, NEWTEC_TYPE_OID).await {
            if name.contains("M6100") {
                return DeviceTypeId::M6100;
            }
        }

        // HTTP guesses: one request to the front page covers two products
        let page = self.http.get(address, self.probes.http_port, "/").await;
        if let Some(page) = &page {
            if page.contains("lemental") {
                return DeviceTypeId::Elemental;
            }
            if page.contains("DEV Systemtechnik") {
                return DeviceTypeId::Dev;
            }
        }

        if let Some(page) = self.http.get(address, self.probes.http_port, "/objects").await {
            if page.contains("SVP") {
                return DeviceTypeId::Svp2000;
            }
        }

        // SVP1000 serves its login page on the alternate port
        if let Some(page) = self
            .http
            .get(address, self.probes.http_alt_port, "/admin/login.php")
            .await
        {
            if page.contains("goob") {
                return DeviceTypeId::Svp1000;
            }
        }

        // scraping the barrel: read the telnet banner
        if let Some(banner) =
            telnet::read_banner(address, self.probes.telnet_port, self.probes.telnet_timeout).await
        {
            debug!(%address, %banner, "got telnet banner");
            if banner.to_uppercase().contains("LEITCH") {
                return DeviceTypeId::Leitch;
            }
        }

        DeviceTypeId::Unknown
    }

    async fn get_text(snmp: &SnmpClient, oid: &str) -> Option<String> {
        let oid = parse_oid(oid)?;
        snmp.get(&oid).await.and_then(|value| value.as_text())
    }

    /// GET-NEXT at the subtree root; a reply whose OID is still inside the
    /// subtree means the agent carries that vendor's objects.
    async fn subtree_answers(&self, snmp: &SnmpClient, root: &str) -> bool {
        let Some(root) = parse_oid(root) else {
            return false;
        };
        match snmp.get_next(&root).await {
            Some((oid, _)) => oid.starts_with(&root),
            None => false,
        }
    }
}

fn parse_oid(text: &str) -> Option<Oid> {
    Oid::from_str(text).ok()
}
